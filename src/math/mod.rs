//! Mathematical utilities for the planner

/// Action noise profiles and weighted random selection
pub mod probability;

pub use probability::NoiseProfile;
