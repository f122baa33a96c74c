//! Statistics regarding a search.
use std::time::Duration;

/// Dispatches containing statistics.
#[derive(Clone, Debug)]
pub enum Stat {
    /// The count of iterations made.
    Iterations(usize),

    /// The count of cuts stored, and the count of cuts issued.
    Cuts(usize, usize),

    /// Counts of free markers and free individuals.
    Free(usize, usize),

    /// The time elapsed.
    Time(Duration),
}
