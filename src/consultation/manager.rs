//! ConsultationManager — owns one live session and serializes events to it.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::engine::{Event, Transition, TransitionEngine};
use super::graph::EventKind;
use super::presentation::SceneView;
use super::session::ConsultationSession;
use super::summary::{CodeGenerator, ConsultationSummary, SeededCodes};
use crate::error::TransitionError;

/// The session plus the receipt issued for it, swapped together.
#[derive(Debug)]
struct Slot {
    session: ConsultationSession,
    receipt: Option<ConsultationSummary>,
}

/// A rejected event together with the session it was rejected against.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub error: TransitionError,
    pub session: ConsultationSession,
}

/// Coordinates one consultation: applies events under a write lock, logs
/// every outcome, and hands out snapshots.
pub struct ConsultationManager {
    session_id: Uuid,
    engine: TransitionEngine,
    slot: Arc<RwLock<Slot>>,
    codes: Mutex<Box<dyn CodeGenerator>>,
}

impl ConsultationManager {
    pub fn new(engine: TransitionEngine, codes: Box<dyn CodeGenerator>) -> Self {
        let session_id = Uuid::new_v4();
        debug!(session_id = %session_id, "Consultation session created");
        Self {
            session_id,
            engine,
            slot: Arc::new(RwLock::new(Slot {
                session: engine.initial_session(),
                receipt: None,
            })),
            codes: Mutex::new(codes),
        }
    }

    /// Default engine, receipt codes drawn from `seed` when given.
    pub fn with_receipt_seed(engine: TransitionEngine, seed: Option<u64>) -> Self {
        let codes = match seed {
            Some(seed) => SeededCodes::new(seed),
            None => SeededCodes::from_entropy(),
        };
        Self::new(engine, Box::new(codes))
    }

    /// Identifier used to correlate log lines for this session.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Copy of the current session.
    pub async fn snapshot(&self) -> ConsultationSession {
        self.slot.read().await.session.clone()
    }

    /// Scene description for the current step.
    pub async fn scene(&self) -> SceneView {
        SceneView::for_session(&self.slot.read().await.session)
    }

    /// Apply `event`. On error the stored session is untouched.
    pub async fn submit(&self, event: Event) -> Result<Transition, TransitionError> {
        self.try_submit(event).await.map_err(|rejection| rejection.error)
    }

    /// Like [`submit`](Self::submit), but a rejection also carries the
    /// session as it stood under the same write guard.
    pub async fn try_submit(&self, event: Event) -> Result<Transition, Rejection> {
        let mut slot = self.slot.write().await;

        match self.engine.apply(&slot.session, event) {
            Ok(transition) => {
                info!(
                    session_id = %self.session_id,
                    event = %transition.event,
                    from = %transition.from,
                    to = %transition.session.current_step(),
                    "Consultation advanced"
                );
                debug_assert!(transition.session.invariant_violation().is_none());
                if transition.event == EventKind::Restart {
                    slot.receipt = None;
                }
                slot.session = transition.session.clone();
                Ok(transition)
            }
            Err(e) => {
                warn!(
                    session_id = %self.session_id,
                    step = %slot.session.current_step(),
                    error = %e,
                    "Consultation event rejected"
                );
                Err(Rejection {
                    error: e,
                    session: slot.session.clone(),
                })
            }
        }
    }

    /// Return to INTRO with default values.
    pub async fn restart(&self) -> ConsultationSession {
        let mut slot = self.slot.write().await;
        info!(
            session_id = %self.session_id,
            from = %slot.session.current_step(),
            "Consultation restarted"
        );
        slot.session = self.engine.initial_session();
        slot.receipt = None;
        slot.session.clone()
    }

    /// Receipt for a finished consultation.
    ///
    /// Issued once on first request and returned unchanged afterwards, until
    /// the next restart. `None` while the consultation is still running.
    pub async fn summary(&self) -> Option<ConsultationSummary> {
        let mut slot = self.slot.write().await;
        if let Some(ref receipt) = slot.receipt {
            return Some(receipt.clone());
        }

        let mut codes = self.codes.lock().await;
        let receipt = ConsultationSummary::build(&slot.session, Utc::now(), &mut **codes)?;
        info!(
            session_id = %self.session_id,
            code = %receipt.code,
            project = %receipt.project,
            "Consultation receipt issued"
        );
        slot.receipt = Some(receipt.clone());
        Some(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consultation::model::{Dimensions, ProjectType, Step};

    fn manager() -> ConsultationManager {
        ConsultationManager::with_receipt_seed(TransitionEngine::default(), Some(7))
    }

    async fn finish_garden(m: &ConsultationManager) {
        for event in [
            Event::Start,
            Event::SelectProject {
                project: ProjectType::Garden,
            },
            Event::SubmitDiagnosis {
                value: "lawn".into(),
            },
            Event::SubmitMeasurement {
                dimensions: Dimensions::new(10.0, 5.0),
            },
            Event::SubmitTools {
                items: vec!["Lawn Mower".into()],
            },
            Event::SubmitServices { services: vec![] },
        ] {
            m.submit(event).await.unwrap();
        }
    }

    #[tokio::test]
    async fn submit_commits_accepted_events() {
        let m = manager();
        let t = m.submit(Event::Start).await.unwrap();
        assert_eq!(t.from, Step::Intro);
        assert_eq!(m.snapshot().await.current_step(), Step::ProjectSelect);
    }

    #[tokio::test]
    async fn rejected_event_leaves_session_unchanged() {
        let m = manager();
        m.submit(Event::Start).await.unwrap();
        let before = m.snapshot().await;
        let err = m.submit(Event::CompleteMeeting).await.unwrap_err();
        assert!(err.is_invalid_transition());
        assert_eq!(m.snapshot().await, before);
    }

    #[tokio::test]
    async fn rejection_carries_the_session_it_was_checked_against() {
        let m = manager();
        m.submit(Event::Start).await.unwrap();
        m.submit(Event::SelectProject {
            project: ProjectType::Garden,
        })
        .await
        .unwrap();
        let before = m.snapshot().await;

        let rejection = m
            .try_submit(Event::SubmitDiagnosis {
                value: "pond".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(rejection.error.acknowledgement(), Some("Understood."));
        assert_eq!(rejection.session, before);
        assert_eq!(rejection.session.current_step(), Step::Assessment);
    }

    #[tokio::test]
    async fn summary_is_issued_once_per_flow() {
        let m = manager();
        assert!(m.summary().await.is_none());

        finish_garden(&m).await;
        let first = m.summary().await.unwrap();
        let second = m.summary().await.unwrap();
        assert_eq!(first.code, second.code);
        assert_eq!(first.issued_at, second.issued_at);

        m.restart().await;
        assert!(m.summary().await.is_none());
    }

    #[tokio::test]
    async fn restart_event_clears_receipt() {
        let m = manager();
        finish_garden(&m).await;
        assert!(m.summary().await.is_some());
        m.submit(Event::Restart).await.unwrap();
        assert_eq!(m.snapshot().await, ConsultationSession::new());
        assert!(m.summary().await.is_none());
    }

    #[tokio::test]
    async fn concurrent_submits_are_serialized() {
        let m = Arc::new(manager());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let m = Arc::clone(&m);
            handles.push(tokio::spawn(async move { m.submit(Event::Start).await }));
        }
        let mut accepted = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(m.snapshot().await.current_step(), Step::ProjectSelect);
    }

    #[tokio::test]
    async fn seeded_managers_issue_the_same_code() {
        let a = manager();
        let b = manager();
        finish_garden(&a).await;
        finish_garden(&b).await;
        assert_eq!(
            a.summary().await.unwrap().code,
            b.summary().await.unwrap().code
        );
        assert_ne!(a.session_id(), b.session_id());
    }
}
