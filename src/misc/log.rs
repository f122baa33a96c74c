/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide a trace of a search, for inspecting how a cut or fix came about.

Note, no log implementation is provided by the library.
The binary installs [env_logger](https://docs.rs/env_logger) when built with the `log` feature.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to the [cut set](crate::db::cut_set)
    pub const CUT_SET: &str = "cut_set";

    /// Logs related to [cut creation](crate::procedures::cut_creation)
    pub const CUT_CREATOR: &str = "cut_creator";

    /// Logs related to [propagation](crate::procedures::propagation)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to [equality detection](crate::procedures::equality)
    pub const EQUALITY: &str = "equality";

    /// Logs related to the [relaxation](crate::solvers::relaxation)
    pub const RELAXATION: &str = "relaxation";

    /// Logs related to [sparse subproblems](crate::solvers::sparse)
    pub const SPARSE: &str = "sparse";

    /// Logs related to the [controller](crate::parallel::controller)
    pub const CONTROLLER: &str = "controller";

    /// Logs related to [workers](crate::parallel::worker)
    pub const WORKER: &str = "worker";

    /// Logs related to [checkpoints](crate::checkpoint)
    pub const CHECKPOINT: &str = "checkpoint";

    /// Logs related to reading [data](crate::dataset)
    pub const DATA: &str = "data";
}
