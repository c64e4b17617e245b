//! Boundary-layer rendering.
//!
//! Turns engine output into user-facing text: summary reports, employee
//! listings, the AI context block, and AI failure messages.

pub mod generator;

pub use generator::*;
