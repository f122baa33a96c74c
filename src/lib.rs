//! A library for finding patterns of marker states which separate two groups of individuals, by cut-and-solve.
//!
//! A pattern is a set of *k* marker states.
//! An individual carries a pattern if the individual carries every state of the pattern, and the objective value of a pattern is the ratio of group one individuals carrying the pattern less the ratio of group two individuals carrying the pattern.
//! csfs finds a pattern with the greatest objective value, or every pattern above a threshold.
//!
//! # Orientation
//!
//! The search space of all patterns is far too large to examine directly.
//! Instead, a search alternates between:
//! - A [relaxation](crate::solvers::relaxation) of the remaining search space, which bounds the objective value of any pattern not yet examined.
//! - [Sparse subproblems](crate::solvers::sparse), each examining every pattern within the markers of a single *cut*, solved in parallel by workers.
//!
//! Each cut is stored, and excludes every pattern within the cut from later relaxations.
//! So, the upper bound from the relaxation falls while the lower bound from sparse subproblems rises, until the two meet.
//!
//! Useful starting points, then, may be:
//! - The [controller](crate::parallel::controller), to inspect the dynamics of a search.
//! - The [search context](crate::context), to inspect what is known during a search.
//! - The [procedures], to inspect how cuts are made and how the search space is pruned.
//! - The [configuration](crate::config), to see what features are supported.
//!
//! # Example
//!
//! ```rust
//! # use std::sync::Arc;
//! # use csfs::config::Config;
//! # use csfs::context::SearchContext;
//! # use csfs::dataset::Dataset;
//! # use csfs::dispatch::Outcome;
//! # use csfs::parallel::controller::Controller;
//! # use csfs::structures::domain::Group;
//! let states = vec![
//!     vec![true, true, false, false],
//!     vec![true, true, true, false],
//!     vec![true, false, false, true],
//!     vec![false, true, true, true],
//! ];
//! let groups = vec![Group::One, Group::One, Group::Two, Group::Two];
//! let data = Arc::new(Dataset::new(states, groups, 2).expect("valid dataset"));
//!
//! let ctx = SearchContext::from_config(Config::default(), data);
//! let mut controller = Controller::with_lp(ctx).expect("workers");
//!
//! assert_eq!(controller.run(), Ok(Outcome::Converged));
//! assert_eq!(controller.best().map(|s| s.markers()), Some([0, 1].as_slice()));
//! ```
//!
//! # Logs
//!
//! Calls to [log!](log) are made throughout the library, with targets listed in [misc::log].
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - Logs related to [propagation](crate::procedures::propagation) can be filtered with `RUST_LOG=propagation …` or,
//! - Bounds at each iteration without detail on cuts can be found with `RUST_LOG=controller=debug …`

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::single_match)]

pub mod checkpoint;
pub mod config;
pub mod context;
pub mod dataset;
pub mod db;
pub mod dispatch;
pub mod misc;
pub mod parallel;
pub mod procedures;
pub mod solvers;
pub mod structures;
pub mod types;
