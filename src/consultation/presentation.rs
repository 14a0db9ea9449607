//! Presentation helpers — what an adapter needs to draw the current step.
//!
//! Nothing here touches session state. Adapters call these to pick a
//! background, decide whether the two characters are on stage, and time the
//! speaker hand-off after an event has already been committed.

use std::time::Duration;

use serde::Serialize;

use super::catalog;
use super::graph::{self, EventKind};
use super::model::{ProjectType, Step};
use super::session::ConsultationSession;

/// Background artwork for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetId {
    Storefront,
    ProjectBoard,
    MeetingRoom,
    Inspection,
    Demolition,
    Subfloor,
    Showroom,
    Measuring,
    Installation,
    PaintStudio,
    Garden,
    Workshop,
}

impl AssetId {
    /// Image location for the asset.
    pub fn url(&self) -> &'static str {
        match self {
            Self::Storefront => "https://images.unsplash.com/photo-1556740758-90de374c12ad?auto=format&fit=crop&w=2000&q=80",
            Self::ProjectBoard => "https://images.unsplash.com/photo-1581244277943-fe4a9c777189?auto=format&fit=crop&w=2000&q=80",
            Self::MeetingRoom => "https://images.unsplash.com/photo-1556761175-5973dc0f32e7?auto=format&fit=crop&w=2000&q=80",
            Self::Inspection => "https://images.unsplash.com/photo-1581092918056-0c4c3acd3789?auto=format&fit=crop&w=2000&q=80",
            Self::Demolition => "https://images.unsplash.com/photo-1504307651254-35680f356dfd?auto=format&fit=crop&w=2000&q=80",
            Self::Subfloor => "https://images.unsplash.com/photo-1620626012761-d97f7e0f3a01?auto=format&fit=crop&w=2000&q=80",
            Self::Showroom => "https://images.unsplash.com/photo-1516455590571-18256e5bb9ff?auto=format&fit=crop&w=2000&q=80",
            Self::Measuring => "https://images.unsplash.com/photo-1503387762-592deb58ef4e?auto=format&fit=crop&w=2000&q=80",
            Self::Installation => "https://images.unsplash.com/photo-1581092921461-39b9d08a9b21?auto=format&fit=crop&w=2000&q=80",
            Self::PaintStudio => "https://images.unsplash.com/photo-1589939705384-5185137a7f0f?auto=format&fit=crop&w=2000&q=80",
            Self::Garden => "https://images.unsplash.com/photo-1558904541-efa843a96f01?auto=format&fit=crop&w=2000&q=80",
            Self::Workshop => "https://images.unsplash.com/photo-1581092580497-e0d23cbdf1dc?auto=format&fit=crop&w=2000&q=80",
        }
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Storefront => "storefront",
            Self::ProjectBoard => "project_board",
            Self::MeetingRoom => "meeting_room",
            Self::Inspection => "inspection",
            Self::Demolition => "demolition",
            Self::Subfloor => "subfloor",
            Self::Showroom => "showroom",
            Self::Measuring => "measuring",
            Self::Installation => "installation",
            Self::PaintStudio => "paint_studio",
            Self::Garden => "garden",
            Self::Workshop => "workshop",
        };
        write!(f, "{s}")
    }
}

/// Background for `step`. Steps up to INSTALLATION have their own artwork;
/// later steps fall back on the project.
pub fn background_asset_for(step: Step, project: Option<ProjectType>) -> AssetId {
    match step {
        Step::Intro => AssetId::Storefront,
        Step::ProjectSelect => AssetId::ProjectBoard,
        Step::Meeting => AssetId::MeetingRoom,
        Step::Assessment => AssetId::Inspection,
        Step::Demolition => AssetId::Demolition,
        Step::SupportCheck => AssetId::Subfloor,
        Step::ProductSelect => AssetId::Showroom,
        Step::Calculator => AssetId::Measuring,
        Step::Installation => AssetId::Installation,
        Step::ColorMixer => AssetId::PaintStudio,
        _ => match project {
            Some(ProjectType::Painting) => AssetId::PaintStudio,
            Some(ProjectType::Garden) => AssetId::Garden,
            _ => AssetId::Workshop,
        },
    }
}

/// Whether consultant and client are drawn for `step`.
///
/// Compares ordinals, so COLOR_MIXER and TOOLS_GENERIC (numbered after
/// SUMMARY) are drawn without characters.
pub fn shows_characters(step: Step) -> bool {
    step.ordinal() >= Step::ProjectSelect.ordinal() && step.ordinal() < Step::Summary.ordinal()
}

/// Who is talking on stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    #[default]
    Consultant,
    Client,
}

/// How long the client holds the floor after an event before the consultant
/// answers. Purely cosmetic: the session has already moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelays {
    /// Plain "continue" events.
    pub advance: Duration,
    /// Answers to the assessment question.
    pub diagnosis: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            advance: Duration::from_millis(500),
            diagnosis: Duration::from_millis(600),
        }
    }
}

impl SettleDelays {
    /// No pauses at all, for tests and scripted runs.
    pub fn none() -> Self {
        Self {
            advance: Duration::ZERO,
            diagnosis: Duration::ZERO,
        }
    }

    /// Pause owed to `event`. Selections hand straight back to the consultant.
    pub fn for_event(&self, event: EventKind) -> Duration {
        match event {
            EventKind::Start | EventKind::CompleteMeeting => self.advance,
            EventKind::SubmitDiagnosis => self.diagnosis,
            _ => Duration::ZERO,
        }
    }
}

/// Speaker while the settle delay for `event` runs.
pub fn speaker_during(event: EventKind, delays: &SettleDelays) -> Speaker {
    if delays.for_event(event).is_zero() {
        Speaker::Consultant
    } else {
        Speaker::Client
    }
}

/// Everything needed to draw the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub step: Step,
    pub ordinal: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectType>,
    pub background: AssetId,
    pub background_url: &'static str,
    pub show_characters: bool,
    pub legal_events: Vec<EventKind>,
    /// Consultant line for the step, when it asks something.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'static str>,
}

impl SceneView {
    pub fn for_session(session: &ConsultationSession) -> Self {
        let step = session.current_step();
        let project = session.project_type();
        let background = background_asset_for(step, project);
        Self {
            step,
            ordinal: step.ordinal(),
            project,
            background,
            background_url: background.url(),
            show_characters: shows_characters(step),
            legal_events: graph::legal_events(step, project),
            prompt: prompt_for(step, project),
        }
    }
}

fn prompt_for(step: Step, project: Option<ProjectType>) -> Option<&'static str> {
    match (step, project) {
        (Step::Intro, _) => Some("Welcome! Ready to plan your renovation?"),
        (Step::ProjectSelect, _) => Some("What are we working on today?"),
        (Step::Assessment, Some(p)) => Some(catalog::assessment_question(p)),
        (Step::ProductSelect, _) => Some("Pick the flooring you like best."),
        (Step::Calculator, Some(ProjectType::Painting)) => {
            Some("Tell me the wall size and how many coats you want.")
        }
        (Step::Calculator, _) => Some("Let's measure the area."),
        (Step::ColorMixer, _) => Some("Which shade should we mix?"),
        (Step::ToolsGeneric, _) => Some("Which tools do you still need?"),
        (Step::Services, _) => Some("Would you like delivery or installation?"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consultation::engine::{Event, apply};

    #[test]
    fn early_steps_have_their_own_backgrounds() {
        assert_eq!(background_asset_for(Step::Intro, None), AssetId::Storefront);
        assert_eq!(
            background_asset_for(Step::Calculator, Some(ProjectType::Garden)),
            AssetId::Measuring
        );
        assert_eq!(
            background_asset_for(Step::Installation, Some(ProjectType::Flooring)),
            AssetId::Installation
        );
    }

    #[test]
    fn late_steps_fall_back_on_project() {
        assert_eq!(
            background_asset_for(Step::Services, Some(ProjectType::Painting)),
            AssetId::PaintStudio
        );
        assert_eq!(
            background_asset_for(Step::ToolsGeneric, Some(ProjectType::Garden)),
            AssetId::Garden
        );
        assert_eq!(
            background_asset_for(Step::Summary, Some(ProjectType::Flooring)),
            AssetId::Workshop
        );
        assert_eq!(background_asset_for(Step::ColorMixer, None), AssetId::PaintStudio);
    }

    #[test]
    fn background_is_deterministic() {
        for step in Step::ALL {
            for project in [None, Some(ProjectType::Flooring), Some(ProjectType::Garden)] {
                assert_eq!(
                    background_asset_for(step, project),
                    background_asset_for(step, project)
                );
            }
        }
    }

    #[test]
    fn characters_follow_ordinals() {
        assert!(!shows_characters(Step::Intro));
        assert!(shows_characters(Step::ProjectSelect));
        assert!(shows_characters(Step::Services));
        assert!(!shows_characters(Step::Summary));
        assert!(!shows_characters(Step::ColorMixer));
        assert!(!shows_characters(Step::ToolsGeneric));
    }

    #[test]
    fn settle_delays_by_event() {
        let delays = SettleDelays::default();
        assert_eq!(delays.for_event(EventKind::Start), Duration::from_millis(500));
        assert_eq!(
            delays.for_event(EventKind::SubmitDiagnosis),
            Duration::from_millis(600)
        );
        assert_eq!(delays.for_event(EventKind::SelectProject), Duration::ZERO);
        assert_eq!(speaker_during(EventKind::SubmitDiagnosis, &delays), Speaker::Client);
        assert_eq!(speaker_during(EventKind::SelectColor, &delays), Speaker::Consultant);
        assert_eq!(
            speaker_during(EventKind::Start, &SettleDelays::none()),
            Speaker::Consultant
        );
    }

    #[test]
    fn scene_view_for_assessment_asks_the_project_question() {
        let mut s = ConsultationSession::new();
        for event in [
            Event::Start,
            Event::SelectProject {
                project: ProjectType::Garden,
            },
        ] {
            s = apply(&s, event).unwrap().session;
        }
        let view = SceneView::for_session(&s);
        assert_eq!(view.step, Step::Assessment);
        assert_eq!(view.ordinal, 3);
        assert_eq!(view.background, AssetId::Inspection);
        assert!(view.show_characters);
        assert_eq!(
            view.legal_events,
            vec![EventKind::SubmitDiagnosis, EventKind::Restart]
        );
        assert_eq!(view.prompt, Some("Which area are we working on?"));
    }

    #[test]
    fn scene_view_serializes_snake_case() {
        let json = serde_json::to_value(SceneView::for_session(&ConsultationSession::new())).unwrap();
        assert_eq!(json["step"], "intro");
        assert_eq!(json["background"], "storefront");
        assert_eq!(json["legal_events"], serde_json::json!(["start", "restart"]));
        assert!(json.get("project").is_none());
    }
}
