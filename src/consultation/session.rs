//! The consultation session value.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::calculator::Quantity;
use super::model::{Diagnosis, FloorDiagnosis, GardenType, Product, ProjectType, Step, WallDiagnosis};

/// Measurement a session starts with before the calculator step.
pub const SEED_MEASUREMENT: Decimal = dec!(15);

/// One user's progress through a consultation.
///
/// Sessions are values: the transition engine never edits one in place, it
/// builds the next value and hands it back. Fields are read through
/// accessors so nothing outside the engine can alter them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultationSession {
    pub(super) current_step: Step,
    pub(super) project_type: Option<ProjectType>,
    pub(super) floor_diagnosis: Option<FloorDiagnosis>,
    pub(super) wall_diagnosis: Option<WallDiagnosis>,
    pub(super) garden_type: Option<GardenType>,
    /// Area in m², or litres for painting once measured.
    pub(super) measurement: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) quantity: Option<Quantity>,
    pub(super) selected_product: Option<Product>,
    pub(super) selected_color: Option<String>,
    pub(super) cart: Vec<String>,
    pub(super) selected_services: Vec<String>,
}

impl Default for ConsultationSession {
    fn default() -> Self {
        Self::with_seed(SEED_MEASUREMENT)
    }
}

impl ConsultationSession {
    /// A fresh session at INTRO.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh session whose measurement starts at `seed`.
    pub fn with_seed(seed: Decimal) -> Self {
        Self {
            current_step: Step::Intro,
            project_type: None,
            floor_diagnosis: None,
            wall_diagnosis: None,
            garden_type: None,
            measurement: seed,
            quantity: None,
            selected_product: None,
            selected_color: None,
            cart: Vec::new(),
            selected_services: Vec::new(),
        }
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn project_type(&self) -> Option<ProjectType> {
        self.project_type
    }

    pub fn floor_diagnosis(&self) -> Option<FloorDiagnosis> {
        self.floor_diagnosis
    }

    pub fn wall_diagnosis(&self) -> Option<WallDiagnosis> {
        self.wall_diagnosis
    }

    pub fn garden_type(&self) -> Option<GardenType> {
        self.garden_type
    }

    /// The stored diagnosis, whichever project it belongs to.
    pub fn diagnosis(&self) -> Option<Diagnosis> {
        self.floor_diagnosis
            .map(Diagnosis::Flooring)
            .or(self.wall_diagnosis.map(Diagnosis::Painting))
            .or(self.garden_type.map(Diagnosis::Garden))
    }

    pub fn measurement(&self) -> Decimal {
        self.measurement
    }

    /// Full calculator result of the last measurement.
    pub fn quantity(&self) -> Option<&Quantity> {
        self.quantity.as_ref()
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    pub fn selected_color(&self) -> Option<&str> {
        self.selected_color.as_deref()
    }

    pub fn cart(&self) -> &[String] {
        &self.cart
    }

    pub fn selected_services(&self) -> &[String] {
        &self.selected_services
    }

    /// Store a diagnosis in the field matching its project, clearing the others.
    pub(super) fn set_diagnosis(&mut self, diagnosis: Diagnosis) {
        self.floor_diagnosis = None;
        self.wall_diagnosis = None;
        self.garden_type = None;
        match diagnosis {
            Diagnosis::Flooring(d) => self.floor_diagnosis = Some(d),
            Diagnosis::Painting(d) => self.wall_diagnosis = Some(d),
            Diagnosis::Garden(d) => self.garden_type = Some(d),
        }
    }

    /// Describe the first broken session invariant, if any.
    pub fn invariant_violation(&self) -> Option<&'static str> {
        if self.project_type.is_none() && !self.current_step.is_pre_project() {
            return Some("project type unset past project selection");
        }
        let set = [
            self.floor_diagnosis.is_some(),
            self.wall_diagnosis.is_some(),
            self.garden_type.is_some(),
        ]
        .iter()
        .filter(|s| **s)
        .count();
        if set > 1 {
            return Some("more than one diagnosis field set");
        }
        if let Some(diagnosis) = self.diagnosis() {
            if self.project_type != Some(diagnosis.project()) {
                return Some("diagnosis does not match project type");
            }
        }
        None
    }
}
