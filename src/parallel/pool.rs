/*!
The pool of workers held by the controller.

Workers are identified by rank, from zero.
A worker is either idle or busy:
- Idle workers are kept on a stack, so the worker most recently made idle is the next to be sent a subproblem.
- Busy workers are kept as a set, together with the cut of the subproblem each is solving.

When the pool is [terminated](WorkerPool::terminate), or dropped, every worker is sent a terminate message, busy workers are drained, and each thread is joined.
*/

use std::{
    collections::{BTreeMap, BTreeSet},
    thread::JoinHandle,
};

use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::{
    misc::log::targets::WORKER,
    parallel::{worker::Worker, FromWorker, ToWorker},
    solvers::{SparseProblem, SparseSolver},
    structures::cut::Cut,
    types::err::{self, ErrorKind, IoError, TransportError},
};

pub struct WorkerPool {
    senders: Vec<Sender<ToWorker>>,

    receiver: Receiver<FromWorker>,

    /// Ranks of idle workers, with the most recently idle last.
    idle: Vec<usize>,

    busy: BTreeSet<usize>,

    /// The cut of the subproblem each busy worker is solving.
    in_flight: BTreeMap<usize, Cut>,

    handles: Vec<Option<JoinHandle<()>>>,

    terminated: bool,
}

impl WorkerPool {
    /// Spawns `count` workers, each with a solver from `make_solver`, given the rank of the worker.
    pub fn spawn<S, F>(count: usize, mut make_solver: F) -> Result<Self, ErrorKind>
    where
        S: SparseSolver + 'static,
        F: FnMut(usize) -> S,
    {
        let (tx, receiver) = unbounded::<FromWorker>();

        let mut senders = Vec::with_capacity(count);
        let mut handles = Vec::with_capacity(count);

        for rank in 0..count {
            let (to_tx, to_rx) = unbounded::<ToWorker>();
            let worker = Worker::new(rank, make_solver(rank), to_rx, tx.clone());

            let handle = std::thread::Builder::new()
                .name(format!("worker-{rank}"))
                .spawn(move || worker.run())
                .map_err(|e| IoError::new(format!("worker-{rank}"), &e))?;

            senders.push(to_tx);
            handles.push(Some(handle));
        }

        log::debug!(target: WORKER, "Spawned {count} workers");

        Ok(WorkerPool {
            senders,
            receiver,
            idle: (0..count).rev().collect(),
            busy: BTreeSet::default(),
            in_flight: BTreeMap::default(),
            handles,
            terminated: false,
        })
    }

    pub fn num_workers(&self) -> usize {
        self.senders.len()
    }

    pub fn has_idle(&self) -> bool {
        !self.idle.is_empty()
    }

    pub fn num_busy(&self) -> usize {
        self.busy.len()
    }

    pub fn is_busy(&self, rank: usize) -> bool {
        self.busy.contains(&rank)
    }

    /// Cuts of subproblems sent to a worker without a reply.
    pub fn in_flight_cuts(&self) -> impl Iterator<Item = &Cut> {
        self.in_flight.values()
    }

    /// Sends `problem` to an idle worker, returning the rank of the worker.
    pub fn dispatch(&mut self, problem: SparseProblem) -> Result<usize, ErrorKind> {
        let Some(rank) = self.idle.pop() else {
            return Err(err::ErrorKind::from(TransportError::NoWorkers));
        };

        let cut = problem.cut.clone();
        if self.senders[rank].send(ToWorker::Problem(problem)).is_err() {
            return Err(err::ErrorKind::from(TransportError::Send(rank)));
        }

        self.busy.insert(rank);
        self.in_flight.insert(rank, cut);
        Ok(rank)
    }

    /// Blocks until some busy worker replies, and marks the worker idle.
    ///
    /// Returns the reply, together with the cut of the subproblem solved.
    pub fn await_completion(&mut self) -> Result<(FromWorker, Cut), ErrorKind> {
        if self.busy.is_empty() {
            return Err(err::ErrorKind::from(TransportError::NoWorkers));
        }

        let reply = match self.receiver.recv() {
            Ok(reply) => reply,
            Err(_) => return Err(err::ErrorKind::from(TransportError::Disconnected)),
        };

        let rank = reply.rank();
        self.busy.remove(&rank);
        self.idle.push(rank);

        match self.in_flight.remove(&rank) {
            Some(cut) => Ok((reply, cut)),
            None => Err(err::ErrorKind::from(TransportError::Disconnected)),
        }
    }

    /// Sends terminate to every worker, waits on each busy worker, and joins every thread.
    ///
    /// Returns the replies of busy workers.
    pub fn terminate(&mut self) -> Vec<(FromWorker, Cut)> {
        if self.terminated {
            return Vec::default();
        }
        self.terminated = true;

        for sender in &self.senders {
            let _ = sender.send(ToWorker::Terminate);
        }

        let mut drained = Vec::default();
        while !self.busy.is_empty() {
            match self.await_completion() {
                Ok(reply) => drained.push(reply),
                Err(_) => break,
            }
        }

        for (rank, handle) in self.handles.iter_mut().enumerate() {
            if let Some(handle) = handle.take() {
                if handle.join().is_err() {
                    log::error!(target: WORKER, "Worker {rank} panicked");
                }
            }
        }

        log::debug!(target: WORKER, "Terminated {} workers", self.senders.len());
        drained
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{domain::Domain, solution::Solution};

    struct Echo;

    impl SparseSolver for Echo {
        fn solve(&mut self, problem: &SparseProblem) -> Result<Vec<Solution>, ErrorKind> {
            Ok(vec![Solution::new(problem.cut.true_elements(), 0.5)])
        }
    }

    fn problem(cut: &[usize]) -> SparseProblem {
        SparseProblem {
            threshold: 0.0,
            cut: Cut::from_elements(4, cut),
            cuts: Vec::default(),
            marker_domains: vec![Domain::Free; 4],
            individual_domains: vec![Domain::Free; 2],
        }
    }

    #[test]
    fn idle_and_busy() {
        let mut pool = WorkerPool::spawn(2, |_| Echo).expect("spawned");
        assert_eq!(pool.num_workers(), 2);

        assert_eq!(pool.dispatch(problem(&[0, 1])).expect("sent"), 0);
        assert_eq!(pool.dispatch(problem(&[2, 3])).expect("sent"), 1);
        assert!(!pool.has_idle());
        assert_eq!(pool.in_flight_cuts().count(), 2);
        assert_eq!(
            pool.dispatch(problem(&[1, 2])).err(),
            Some(ErrorKind::Transport(TransportError::NoWorkers))
        );

        let (reply, cut) = pool.await_completion().expect("reply");
        assert!(!pool.is_busy(reply.rank()));
        assert!(pool.has_idle());
        assert!(matches!(reply, FromWorker::Completed { .. }));
        assert_eq!(cut.size(), 2);

        let drained = pool.terminate();
        assert_eq!(drained.len(), 1);
        assert_eq!(pool.num_busy(), 0);
    }

    #[test]
    fn await_without_busy() {
        let mut pool = WorkerPool::spawn(1, |_| Echo).expect("spawned");
        assert_eq!(
            pool.await_completion().err(),
            Some(ErrorKind::Transport(TransportError::NoWorkers))
        );
    }
}
