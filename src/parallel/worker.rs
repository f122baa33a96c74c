//! The loop of a worker.

use std::time::Instant;

use crossbeam::channel::{Receiver, Sender};

use crate::{
    misc::log::targets::WORKER,
    parallel::{FromWorker, ToWorker},
    solvers::SparseSolver,
};

pub struct Worker<S: SparseSolver> {
    rank: usize,

    solver: S,

    rx: Receiver<ToWorker>,

    tx: Sender<FromWorker>,
}

impl<S: SparseSolver> Worker<S> {
    pub fn new(rank: usize, solver: S, rx: Receiver<ToWorker>, tx: Sender<FromWorker>) -> Self {
        Worker {
            rank,
            solver,
            rx,
            tx,
        }
    }

    /// Solves each subproblem received, until told to terminate or the controller hangs up.
    pub fn run(mut self) {
        log::trace!(target: WORKER, "Worker {} started", self.rank);

        while let Ok(message) = self.rx.recv() {
            let problem = match message {
                ToWorker::Problem(problem) => problem,
                ToWorker::Terminate => break,
            };

            let start = Instant::now();
            let reply = match self.solver.solve(&problem) {
                Ok(solutions) => FromWorker::Completed {
                    rank: self.rank,
                    solutions,
                    elapsed: start.elapsed(),
                },
                Err(error) => FromWorker::Failed {
                    rank: self.rank,
                    error,
                },
            };

            log::trace!(target: WORKER, "Worker {} solved {} in {:.2?}", self.rank, problem.cut, start.elapsed());

            if self.tx.send(reply).is_err() {
                break;
            }
        }

        log::trace!(target: WORKER, "Worker {} ended", self.rank);
    }
}
