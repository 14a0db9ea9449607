//! Step graph — the explicit table of legal transitions.
//!
//! Every forward move of a consultation is one row of [`EDGES`]:
//! `(from step, project, event) → to step`. Restart is not an edge; it is
//! legal from anywhere and always lands on [`Step::Intro`].

use serde::{Deserialize, Serialize};

use super::model::{ProjectType, Step};

/// The kind of a user event, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Start,
    SelectProject,
    CompleteMeeting,
    SubmitDiagnosis,
    CompleteDemolition,
    CompleteSupportCheck,
    SelectProduct,
    SubmitMeasurement,
    SelectColor,
    SubmitInstallationItems,
    SubmitTools,
    SubmitServices,
    Restart,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::SelectProject => "select_project",
            Self::CompleteMeeting => "complete_meeting",
            Self::SubmitDiagnosis => "submit_diagnosis",
            Self::CompleteDemolition => "complete_demolition",
            Self::CompleteSupportCheck => "complete_support_check",
            Self::SelectProduct => "select_product",
            Self::SubmitMeasurement => "submit_measurement",
            Self::SelectColor => "select_color",
            Self::SubmitInstallationItems => "submit_installation_items",
            Self::SubmitTools => "submit_tools",
            Self::SubmitServices => "submit_services",
            Self::Restart => "restart",
        };
        write!(f, "{s}")
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: Step,
    /// Project the edge belongs to; `None` means any project.
    ///
    /// For [`EventKind::SelectProject`] this is the project being chosen.
    pub project: Option<ProjectType>,
    pub event: EventKind,
    pub to: Step,
}

impl Edge {
    const fn new(from: Step, project: Option<ProjectType>, event: EventKind, to: Step) -> Self {
        Self {
            from,
            project,
            event,
            to,
        }
    }

    /// Whether this edge is available to a session of `project`.
    pub fn applies_to(&self, project: Option<ProjectType>) -> bool {
        match self.project {
            None => true,
            Some(p) => project == Some(p),
        }
    }
}

use EventKind as E;
use ProjectType::{Flooring, Garden, Painting};
use Step as S;

/// The complete transition table.
pub const EDGES: &[Edge] = &[
    Edge::new(S::Intro, None, E::Start, S::ProjectSelect),
    // Project selection fixes the rest of the path
    Edge::new(S::ProjectSelect, Some(Flooring), E::SelectProject, S::Meeting),
    Edge::new(S::ProjectSelect, Some(Painting), E::SelectProject, S::Assessment),
    Edge::new(S::ProjectSelect, Some(Garden), E::SelectProject, S::Assessment),
    Edge::new(S::Meeting, Some(Flooring), E::CompleteMeeting, S::Assessment),
    Edge::new(S::Assessment, Some(Flooring), E::SubmitDiagnosis, S::Demolition),
    Edge::new(S::Assessment, Some(Painting), E::SubmitDiagnosis, S::Calculator),
    Edge::new(S::Assessment, Some(Garden), E::SubmitDiagnosis, S::Calculator),
    Edge::new(S::Demolition, Some(Flooring), E::CompleteDemolition, S::SupportCheck),
    Edge::new(S::SupportCheck, Some(Flooring), E::CompleteSupportCheck, S::ProductSelect),
    Edge::new(S::ProductSelect, Some(Flooring), E::SelectProduct, S::Calculator),
    // Measurement is the second branch point
    Edge::new(S::Calculator, Some(Flooring), E::SubmitMeasurement, S::Installation),
    Edge::new(S::Calculator, Some(Painting), E::SubmitMeasurement, S::ColorMixer),
    Edge::new(S::Calculator, Some(Garden), E::SubmitMeasurement, S::ToolsGeneric),
    Edge::new(S::Installation, Some(Flooring), E::SubmitInstallationItems, S::Services),
    Edge::new(S::ColorMixer, Some(Painting), E::SelectColor, S::ToolsGeneric),
    Edge::new(S::ToolsGeneric, Some(Painting), E::SubmitTools, S::Services),
    Edge::new(S::ToolsGeneric, Some(Garden), E::SubmitTools, S::Services),
    Edge::new(S::Services, None, E::SubmitServices, S::Summary),
];

/// All edges of the graph.
pub fn edges() -> &'static [Edge] {
    EDGES
}

/// Target of `event` from `step` for a session of `project`, if legal.
///
/// For [`EventKind::SelectProject`], pass the project being chosen.
pub fn next_step(step: Step, project: Option<ProjectType>, event: EventKind) -> Option<Step> {
    EDGES
        .iter()
        .find(|e| e.from == step && e.event == event && e.applies_to(project))
        .map(|e| e.to)
}

/// Events accepted at `step` for a session of `project`. Always includes
/// [`EventKind::Restart`].
pub fn legal_events(step: Step, project: Option<ProjectType>) -> Vec<EventKind> {
    let mut events: Vec<EventKind> = Vec::new();
    for edge in EDGES.iter().filter(|e| e.from == step) {
        let open = edge.applies_to(project)
            || (edge.event == EventKind::SelectProject && project.is_none());
        if open && !events.contains(&edge.event) {
            events.push(edge.event);
        }
    }
    events.push(EventKind::Restart);
    events
}

/// The ordered list of edges a `project` consultation walks from INTRO to SUMMARY.
pub fn canonical_path(project: ProjectType) -> Vec<Edge> {
    let mut path = Vec::new();
    let mut step = Step::Intro;
    while !step.is_terminal() {
        let Some(edge) = EDGES
            .iter()
            .find(|e| e.from == step && e.applies_to(Some(project)))
        else {
            break;
        };
        path.push(*edge);
        step = edge.to;
    }
    path
}
