//! Renovation consult — a guided DIY renovation consultation.

pub mod channels;
pub mod config;
pub mod consultation;
pub mod error;
