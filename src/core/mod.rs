//! Core business logic - framework-agnostic drawer, reconciliation and reporting operations.
//!
//! Nothing in here knows about HTTP. The `api` layer parses requests into the
//! types defined here and maps [`crate::errors::Error`] onto status codes.

/// Shift lifecycle: open, close, lookups and the nested drawer view
pub mod drawer;
/// Denomination tally and advisory mismatch check
pub mod denomination;
/// Customer display event channel
pub mod display;
/// Employee lookups and seeding
pub mod employee;
/// Closed-shift filtering and aggregation
pub mod history;
/// Defensive parsing of monetary input
pub mod money;
/// Mid-shift cash drops and pickups
pub mod movement;
/// Shift notes
pub mod note;
/// Expected cash, net movement and variance
pub mod reconciliation;
/// Sales attributed to a drawer
pub mod sale;
