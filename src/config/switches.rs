/// Boolean valued search configurations
///
/// When set to true things related to the identifier are enabled.
#[derive(Clone, Debug)]
pub struct Switches {
    /// Collect every solution above a fixed threshold, rather than search for an optimum.
    ///
    /// The lower bound is clamped to the threshold, and does not advance as solutions are found.
    pub pool_threshold: bool,

    /// Search for risk patterns, with cases as group one.
    /// Otherwise, search for protective patterns, with controls as group one.
    pub risk: bool,

    /// Require sparse solutions to improve on the lower bound sent with the subproblem.
    pub lower_cutoff: bool,

    /// Fix individuals of a sparse subproblem which carry too few, or all, of the states of the subproblem before solving.
    pub sparse_constraints: bool,

    /// Report only the final outcome of a search.
    pub quiet: bool,

    /// Report each solution and each iteration in detail.
    pub verbose: bool,
}

impl Default for Switches {
    fn default() -> Self {
        Switches {
            pool_threshold: false,
            risk: true,
            lower_cutoff: false,
            sparse_constraints: true,
            quiet: false,
            verbose: false,
        }
    }
}
