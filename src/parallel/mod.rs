/*!
Parallel search, with a controller and a pool of workers.

# Overview

The [controller](controller) holds the only [search context](crate::context::SearchContext), and is the only part of a search to mutate search state.
Workers share only the immutable [dataset](crate::dataset::Dataset).

Controller and workers communicate by message passing over [crossbeam](crossbeam::channel) channels:
- Each worker has its own channel of [ToWorker] messages, so a subproblem is sent to exactly one worker.
- Every worker sends [FromWorker] messages on a single shared channel, so the controller may await a completion from any worker.

A worker loops on its channel, solving each subproblem received and replying with the result, until a terminate message is received or the controller hangs up.
There is no cancellation of a subproblem in flight.

```text
controller                 worker (rank r)
    |  Problem(subproblem)     |
    |------------------------->|  solve
    |  Completed { rank: r }   |
    |<-------------------------|
    |        Terminate         |
    |------------------------->|  end
```

# Invariants

<div class="warning">
No worker is sent a subproblem while busy with another.
</div>

<div class="warning">
Completions are applied in the order received.
</div>
*/

pub mod controller;
pub mod pool;
pub mod worker;

use std::time::Duration;

use crate::{solvers::SparseProblem, structures::solution::Solution, types::err::ErrorKind};

/// Messages from the controller to a worker.
#[derive(Debug)]
pub enum ToWorker {
    Problem(SparseProblem),
    Terminate,
}

/// Messages from a worker to the controller.
#[derive(Debug)]
pub enum FromWorker {
    /// The subproblem sent to the worker of `rank` was solved.
    Completed {
        rank: usize,
        solutions: Vec<Solution>,
        elapsed: Duration,
    },

    /// The solver of the worker of `rank` returned an error.
    Failed { rank: usize, error: ErrorKind },
}

impl FromWorker {
    pub fn rank(&self) -> usize {
        match self {
            FromWorker::Completed { rank, .. } | FromWorker::Failed { rank, .. } => *rank,
        }
    }
}
