//! Procedures applied by the controller to a [search context](crate::context::SearchContext).
//!
//! - [Propagation](propagation) of fixed domains.
//! - [Detection](equality) of equal individuals.
//! - [Creation](cut_creation) of cuts.

pub mod cut_creation;
pub mod equality;
pub mod propagation;
