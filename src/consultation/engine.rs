//! Transition engine — applies one event to a session and returns the next one.
//!
//! `apply` is a pure reducer: it reads the current session, checks the event
//! against the step graph, validates the payload, and builds the successor on
//! a copy. A rejected event returns an error and the caller keeps the session
//! it already had, so a half-applied update is never observable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator;
use super::cart::{self, MergePolicy};
use super::catalog;
use super::graph::{self, EventKind};
use super::model::{Diagnosis, Dimensions, Product, ProductCategory, ProjectType, Step};
use super::session::{ConsultationSession, SEED_MEASUREMENT};
use crate::error::{QuantityError, TransitionError};

/// A user-originated event, as emitted by a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Leave the intro screen.
    Start,
    SelectProject { project: ProjectType },
    CompleteMeeting,
    /// Raw answer from the assessment step, validated against the project.
    SubmitDiagnosis { value: String },
    CompleteDemolition,
    CompleteSupportCheck,
    SelectProduct { product: Product },
    SubmitMeasurement { dimensions: Dimensions },
    SelectColor { color: String },
    SubmitInstallationItems { items: Vec<String> },
    SubmitTools { items: Vec<String> },
    SubmitServices { services: Vec<String> },
    Restart,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Start => EventKind::Start,
            Self::SelectProject { .. } => EventKind::SelectProject,
            Self::CompleteMeeting => EventKind::CompleteMeeting,
            Self::SubmitDiagnosis { .. } => EventKind::SubmitDiagnosis,
            Self::CompleteDemolition => EventKind::CompleteDemolition,
            Self::CompleteSupportCheck => EventKind::CompleteSupportCheck,
            Self::SelectProduct { .. } => EventKind::SelectProduct,
            Self::SubmitMeasurement { .. } => EventKind::SubmitMeasurement,
            Self::SelectColor { .. } => EventKind::SelectColor,
            Self::SubmitInstallationItems { .. } => EventKind::SubmitInstallationItems,
            Self::SubmitTools { .. } => EventKind::SubmitTools,
            Self::SubmitServices { .. } => EventKind::SubmitServices,
            Self::Restart => EventKind::Restart,
        }
    }
}

/// Outcome of an accepted event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The session after the event.
    pub session: ConsultationSession,
    /// Step the session was at before the event.
    pub from: Step,
    pub event: EventKind,
    /// Consultant reply for the answer, when there is one.
    pub acknowledgement: Option<String>,
}

/// Applies events to sessions.
///
/// Holds only the defaults a restart returns to, so the same engine can
/// serve any number of independent sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEngine {
    seed_measurement: Decimal,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self {
            seed_measurement: SEED_MEASUREMENT,
        }
    }
}

impl TransitionEngine {
    pub fn new(seed_measurement: Decimal) -> Self {
        Self { seed_measurement }
    }

    /// The session a consultation starts from, and returns to on restart.
    pub fn initial_session(&self) -> ConsultationSession {
        ConsultationSession::with_seed(self.seed_measurement)
    }

    /// Apply `event` to `session`.
    pub fn apply(
        &self,
        session: &ConsultationSession,
        event: Event,
    ) -> Result<Transition, TransitionError> {
        let from = session.current_step;
        let kind = event.kind();

        if kind == EventKind::Restart {
            return Ok(Transition {
                session: self.initial_session(),
                from,
                event: kind,
                acknowledgement: None,
            });
        }

        // Project selection routes on the chosen project, everything else on
        // the one already stored.
        let routing_project = match &event {
            Event::SelectProject { project } if session.project_type.is_none() => Some(*project),
            _ => session.project_type,
        };

        let to = graph::next_step(from, routing_project, kind).ok_or(
            TransitionError::InvalidTransition {
                step: from,
                project: session.project_type,
                event: kind,
            },
        )?;

        let mut next = session.clone();
        let mut acknowledgement = None;

        match event {
            Event::Start | Event::CompleteMeeting | Event::Restart => {}
            Event::SelectProject { project } => {
                next.project_type = Some(project);
            }
            Event::SubmitDiagnosis { value } => {
                let project = require_project(session, kind)?;
                let diagnosis = Diagnosis::parse(project, &value)
                    .ok_or_else(|| unrecognized("diagnosis", value, session))?;
                next.set_diagnosis(diagnosis);
                acknowledgement = Some(catalog::acknowledgement(diagnosis).to_string());
            }
            Event::CompleteDemolition => {
                next.cart = cart::merge(
                    &session.cart,
                    catalog::DEMOLITION_TOOLS.iter().copied(),
                    MergePolicy::Append,
                );
            }
            Event::CompleteSupportCheck => {
                next.cart = cart::merge(
                    &session.cart,
                    catalog::SUPPORT_MATERIALS.iter().copied(),
                    MergePolicy::Append,
                );
            }
            Event::SelectProduct { product } => {
                let stocked = catalog::product(&product.id)
                    .filter(|p| p.category == ProductCategory::Floor)
                    .ok_or_else(|| unrecognized("product", product.id.clone(), session))?;
                next.selected_product = Some(stocked);
            }
            Event::SubmitMeasurement { dimensions } => {
                let project = require_project(session, kind)?;
                let quantity = calculator::calculate(&dimensions, project).map_err(|e| match e {
                    QuantityError::UnsupportedLayers(layers) => {
                        unrecognized("layers", layers.to_string(), session)
                    }
                })?;
                next.measurement = quantity.measurement();
                next.quantity = Some(quantity);
            }
            Event::SelectColor { color } => {
                let shade = catalog::palette_color(&color)
                    .ok_or_else(|| unrecognized("color", color.clone(), session))?;
                next.selected_color = Some(shade.name.to_string());
            }
            Event::SubmitInstallationItems { items } => {
                let known = catalog::installation_items();
                if let Some(bad) = items.iter().find(|i| !known.contains(i)) {
                    return Err(unrecognized("installation item", bad.clone(), session));
                }
                next.cart = cart::merge(&session.cart, items, MergePolicy::Append);
            }
            Event::SubmitTools { items } => {
                let project = require_project(session, kind)?;
                let offered = catalog::generic_tools(project);
                let is_offered = |item: &String| offered.iter().any(|t| t.label == item.as_str());
                if let Some(bad) = items.iter().find(|i| !is_offered(i)) {
                    return Err(unrecognized("tool", bad.clone(), session));
                }
                next.cart = cart::merge(&session.cart, items, MergePolicy::Replace);
            }
            Event::SubmitServices { services } => {
                let mut chosen: Vec<String> = Vec::with_capacity(services.len());
                for id in services {
                    if catalog::service(&id).is_none() {
                        return Err(unrecognized("service", id, session));
                    }
                    if !chosen.contains(&id) {
                        chosen.push(id);
                    }
                }
                next.selected_services = chosen;
            }
        }

        next.current_step = to;

        Ok(Transition {
            session: next,
            from,
            event: kind,
            acknowledgement,
        })
    }
}

/// Apply `event` with the default engine.
pub fn apply(session: &ConsultationSession, event: Event) -> Result<Transition, TransitionError> {
    TransitionEngine::default().apply(session, event)
}

fn require_project(
    session: &ConsultationSession,
    event: EventKind,
) -> Result<ProjectType, TransitionError> {
    session
        .project_type
        .ok_or(TransitionError::InvalidTransition {
            step: session.current_step,
            project: None,
            event,
        })
}

fn unrecognized(
    field: &'static str,
    value: impl Into<String>,
    session: &ConsultationSession,
) -> TransitionError {
    TransitionError::UnrecognizedOption {
        field,
        value: value.into(),
        project: session.project_type,
        acknowledgement: catalog::GENERIC_ACKNOWLEDGEMENT.to_string(),
    }
}
