//! Core domain types and logic.

pub mod bounds;
pub mod catalog;
pub mod chart;
pub mod config_validation;
pub mod error;
pub mod fetch;
pub mod indicator;
pub mod preset;
pub mod price;
pub mod quadrant;
pub mod render;
pub mod rrg;
pub mod session;
pub mod ticker;
pub mod universe;
