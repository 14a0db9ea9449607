//! Channels — front ends that drive a consultation.

pub mod cli;

pub use cli::{CliChannel, Command, CommandParser};
