use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;

use crate::error::{KernelError, KernelResult};
use crate::sleep::Sleep;
use crate::timeline::Timeline;

/// Cheap, cloneable reference to the running kernel's clock and timeline.
///
/// Every primitive in this crate (`Sleep`, `Mailbox`, `Compute`) is built on
/// top of a `KernelHandle` rather than the `Kernel` itself, since the kernel
/// is moved into its own run loop while tasks spawned onto it still need to
/// reach the clock.
#[derive(Clone)]
pub struct KernelHandle {
    clock: Rc<Cell<f64>>,
    timeline: Rc<RefCell<Timeline>>,
    spawner: LocalSpawner,
    active_tasks: Rc<Cell<usize>>,
}

impl KernelHandle {
    pub fn now(&self) -> f64 {
        self.clock.get()
    }

    pub fn sleep(&self, duration: f64) -> Sleep {
        Sleep::new(self.clone(), self.now() + duration)
    }

    pub fn sleep_until(&self, deadline: f64) -> Sleep {
        Sleep::new(self.clone(), deadline)
    }

    pub(crate) fn timeline(&self) -> &Rc<RefCell<Timeline>> {
        &self.timeline
    }

    /// Spawn a task onto the pool driving this kernel.
    pub fn spawn(&self, fut: impl Future<Output = ()> + 'static) -> KernelResult<()> {
        let active = self.active_tasks.clone();
        active.set(active.get() + 1);
        let guarded = async move {
            fut.await;
            active.set(active.get() - 1);
        };
        self.spawner
            .spawn_local(guarded)
            .map_err(|e| KernelError::SpawnFailed(e.to_string()))
    }
}

/// Owns the timeline and the local task pool; drives virtual time forward.
pub struct Kernel {
    pool: LocalPool,
    handle: KernelHandle,
}

impl Kernel {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        let handle = KernelHandle {
            clock: Rc::new(Cell::new(0.0)),
            timeline: Rc::new(RefCell::new(Timeline::new())),
            spawner,
            active_tasks: Rc::new(Cell::new(0)),
        };
        Self { pool, handle }
    }

    pub fn handle(&self) -> KernelHandle {
        self.handle.clone()
    }

    pub fn spawn(&self, fut: impl Future<Output = ()> + 'static) -> KernelResult<()> {
        self.handle.spawn(fut)
    }

    pub fn now(&self) -> f64 {
        self.handle.now()
    }

    /// Run until every spawned task has completed, jumping the clock straight
    /// to the next pending wake-up whenever the pool stalls with no runnable
    /// task. Returns [`KernelError::Deadlock`] if the pool stalls with live
    /// tasks and an empty timeline, since nothing would ever wake them again.
    pub fn run(&mut self) -> KernelResult<()> {
        loop {
            self.pool.run_until_stalled();

            if self.handle.active_tasks.get() == 0 {
                return Ok(());
            }

            let advanced = self.handle.timeline.borrow_mut().advance();
            match advanced {
                Some(time) => self.handle.clock.set(time),
                None => return Err(KernelError::Deadlock(self.handle.active_tasks.get())),
            }
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell as StdRefCell;

    #[test]
    fn sleeping_tasks_advance_the_clock() {
        let mut kernel = Kernel::new();
        let handle = kernel.handle();
        let log = Rc::new(StdRefCell::new(Vec::new()));

        for (name, delay) in [("a", 3.0), ("b", 1.0), ("c", 2.0)] {
            let h = handle.clone();
            let l = log.clone();
            kernel
                .spawn(async move {
                    h.sleep(delay).await;
                    l.borrow_mut().push((name, h.now()));
                })
                .unwrap();
        }

        kernel.run().unwrap();
        assert_eq!(
            *log.borrow(),
            vec![("b", 1.0), ("c", 2.0), ("a", 3.0)]
        );
        assert_eq!(kernel.now(), 3.0);
    }

    #[test]
    fn no_tasks_runs_to_completion_immediately() {
        let mut kernel = Kernel::new();
        kernel.run().unwrap();
        assert_eq!(kernel.now(), 0.0);
    }
}
