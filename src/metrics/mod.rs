//! Metric functions over a filtered order set.
//!
//! Every function is pure and independent of the others: it takes the
//! filtered orders (plus at most one scalar) and returns a scalar or a small
//! ordered table.

pub mod deliverers;
pub mod restaurants;
pub mod types;
pub mod utility;
pub mod volume;
