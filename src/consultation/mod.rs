//! Consultation workflow — a guided renovation consultation as a state machine.
//!
//! A consultation walks a customer from the store entrance to a receipt. The
//! path depends on the project chosen (flooring, painting or garden) and is
//! spelled out in the [`graph`] table. The [`engine`] applies one event at a
//! time to an immutable [`ConsultationSession`], the [`manager`] owns the live
//! session for an adapter, and [`presentation`] answers the questions a UI
//! asks about the current step.

pub mod calculator;
pub mod cart;
pub mod catalog;
pub mod engine;
pub mod graph;
pub mod manager;
pub mod model;
pub mod presentation;
pub mod routes;
pub mod session;
pub mod summary;

pub use calculator::{Quantity, QuantityUnit, calculate};
pub use cart::MergePolicy;
pub use engine::{Event, Transition, TransitionEngine, apply};
pub use graph::{Edge, EventKind, legal_events, next_step};
pub use manager::{ConsultationManager, Rejection};
pub use model::{
    Diagnosis, Dimensions, FloorDiagnosis, GardenType, Product, ProductCategory, ProjectType, Step,
    WallDiagnosis,
};
pub use presentation::{AssetId, SceneView, SettleDelays, Speaker, background_asset_for};
pub use routes::{ConsultationRouteState, consultation_routes};
pub use session::ConsultationSession;
pub use summary::{CodeGenerator, ConsultationSummary, ReceiptCode, SeededCodes};
