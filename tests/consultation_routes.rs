//! Integration tests for the consultation REST API.
//!
//! Each test spins up an Axum server on a random port and drives it with
//! reqwest, exercising the real JSON contract.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use renovation_consult::consultation::catalog;
use renovation_consult::consultation::{
    ConsultationManager, ConsultationRouteState, TransitionEngine, consultation_routes,
};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start an Axum server on a random port, return (base url, manager).
async fn start_server() -> (String, Arc<ConsultationManager>) {
    let manager = Arc::new(ConsultationManager::with_receipt_seed(
        TransitionEngine::default(),
        Some(2024),
    ));
    let app = consultation_routes(ConsultationRouteState {
        manager: Arc::clone(&manager),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}/api/consultation"), manager)
}

async fn post_event(client: &reqwest::Client, base: &str, event: Value) -> (u16, Value) {
    let resp = client
        .post(format!("{base}/events"))
        .json(&event)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn fresh_session_is_at_intro() {
    timeout(TEST_TIMEOUT, async {
        let (base, _manager) = start_server().await;

        let resp = reqwest::get(format!("{base}/session")).await.unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["current_step"], "intro");
        assert!(body["project_type"].is_null());
        assert_eq!(body["measurement"], "15");
        assert_eq!(body["cart"], json!([]));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn flooring_consultation_end_to_end() {
    timeout(TEST_TIMEOUT, async {
        let (base, manager) = start_server().await;
        let client = reqwest::Client::new();
        let product = serde_json::to_value(catalog::product("classen").unwrap()).unwrap();

        let events = [
            json!({"event": "start"}),
            json!({"event": "select_project", "project": "flooring"}),
            json!({"event": "complete_meeting"}),
            json!({"event": "submit_diagnosis", "value": "swollen"}),
            json!({"event": "complete_demolition"}),
            json!({"event": "complete_support_check"}),
            json!({"event": "select_product", "product": product}),
            json!({"event": "submit_measurement", "dimensions": {"length": 4.0, "width": 3.5}}),
            json!({"event": "submit_installation_items", "items": ["Spacers", "Underlay Foil"]}),
            json!({"event": "submit_services", "services": ["installation", "transport"]}),
        ];
        for event in events {
            let (status, body) = post_event(&client, &base, event.clone()).await;
            assert_eq!(status, 200, "{event} -> {body}");
        }

        let session = manager.snapshot().await;
        assert_eq!(session.cart().len(), 5 + 3 + 2);
        assert_eq!(
            session.selected_services(),
            &["installation".to_string(), "transport".to_string()]
        );

        let resp = reqwest::get(format!("{base}/summary")).await.unwrap();
        assert_eq!(resp.status(), 200);
        let summary: Value = resp.json().await.unwrap();
        assert_eq!(summary["material"], "Parquet");
        assert_eq!(summary["quantity"], "15.4");
        assert_eq!(summary["unit"], "square_metres");
        assert_eq!(summary["product"], "Classen Parquet");
        assert_eq!(
            summary["services"],
            json!(["Pro Installation", "Express Transport"])
        );
        let code = summary["code"].as_str().unwrap();
        assert!(code.starts_with("HB-") && code.len() == 7);

        // Same receipt on the second read
        let again: Value = reqwest::get(format!("{base}/summary"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(again["code"], summary["code"]);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn diagnosis_returns_acknowledgement() {
    timeout(TEST_TIMEOUT, async {
        let (base, _manager) = start_server().await;
        let client = reqwest::Client::new();

        post_event(&client, &base, json!({"event": "start"})).await;
        post_event(&client, &base, json!({"event": "select_project", "project": "painting"})).await;
        let (status, body) =
            post_event(&client, &base, json!({"event": "submit_diagnosis", "value": "mold"})).await;

        assert_eq!(status, 200);
        assert_eq!(body["acknowledgement"], "Understood.");
        assert_eq!(body["session"]["current_step"], "calculator");
        assert_eq!(body["session"]["wall_diagnosis"], "mold");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn illegal_event_is_409_and_session_unchanged() {
    timeout(TEST_TIMEOUT, async {
        let (base, _manager) = start_server().await;
        let client = reqwest::Client::new();

        let (status, body) =
            post_event(&client, &base, json!({"event": "submit_services", "services": []})).await;

        assert_eq!(status, 409);
        assert_eq!(body["session"]["current_step"], "intro");
        assert!(body["error"].as_str().unwrap().contains("submit_services"));
        assert!(body.get("acknowledgement").is_none());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unrecognized_answer_is_422_with_generic_reply() {
    timeout(TEST_TIMEOUT, async {
        let (base, _manager) = start_server().await;
        let client = reqwest::Client::new();

        post_event(&client, &base, json!({"event": "start"})).await;
        post_event(&client, &base, json!({"event": "select_project", "project": "garden"})).await;
        let (status, body) =
            post_event(&client, &base, json!({"event": "submit_diagnosis", "value": "pond"})).await;

        assert_eq!(status, 422);
        assert_eq!(body["acknowledgement"], "Understood.");
        assert_eq!(body["session"]["current_step"], "assessment");
        assert!(body["session"]["garden_type"].is_null());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn summary_is_404_before_the_end() {
    timeout(TEST_TIMEOUT, async {
        let (base, _manager) = start_server().await;

        let resp = reqwest::get(format!("{base}/summary")).await.unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn scene_reports_background_and_legal_events() {
    timeout(TEST_TIMEOUT, async {
        let (base, _manager) = start_server().await;
        let client = reqwest::Client::new();
        post_event(&client, &base, json!({"event": "start"})).await;

        let scene: Value = reqwest::get(format!("{base}/scene"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(scene["step"], "project_select");
        assert_eq!(scene["background"], "project_board");
        assert_eq!(scene["show_characters"], true);
        assert_eq!(scene["legal_events"], json!(["select_project", "restart"]));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn restart_returns_fresh_session() {
    timeout(TEST_TIMEOUT, async {
        let (base, manager) = start_server().await;
        let client = reqwest::Client::new();
        post_event(&client, &base, json!({"event": "start"})).await;
        post_event(&client, &base, json!({"event": "select_project", "project": "garden"})).await;

        let resp = client.post(format!("{base}/restart")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["current_step"], "intro");
        assert!(body["project_type"].is_null());
        assert_eq!(manager.snapshot().await.current_step().ordinal(), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn malformed_event_is_rejected_by_the_extractor() {
    timeout(TEST_TIMEOUT, async {
        let (base, manager) = start_server().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/events"))
            .json(&json!({"event": "teleport"}))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
        assert_eq!(manager.snapshot().await.current_step().ordinal(), 0);
    })
    .await
    .expect("test timed out");
}
