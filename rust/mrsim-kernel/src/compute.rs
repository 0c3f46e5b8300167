use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::executor::KernelHandle;
use crate::timeline::TimerId;

struct State {
    cancelled: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

/// Outcome of a [`Compute`] future: either it ran to completion, or it was
/// cancelled mid-flight via its [`ComputeHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    Completed,
    Cancelled,
}

/// Handle used to cancel a running [`Compute`] from outside the task that
/// awaits it, mirroring `MSG_task_cancel` against a running `MSG_task_execute`.
#[derive(Clone)]
pub struct ComputeHandle {
    state: Rc<State>,
}

impl ComputeHandle {
    pub fn cancel(&self) {
        self.state.cancelled.set(true);
        if let Some(waker) = self.state.waker.borrow_mut().take() {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }
}

/// A cancellable CPU-bound compute step for `flops` floating-point
/// operations at `speed` flops/second.
///
/// The deadline is bound lazily, on first poll, rather than at construction:
/// a task may be created (and made cancellable) well before the host that
/// will run it is actually free, so the clock for "how long will this take"
/// should start when execution begins, not when the task object is built —
/// the same distinction SimGrid draws between `MSG_task_create` and
/// `MSG_task_execute`.
pub struct Compute {
    kernel: KernelHandle,
    flops: f64,
    speed: f64,
    deadline: Option<f64>,
    state: Rc<State>,
    timer: Option<TimerId>,
}

/// Create a compute future for `flops` floating-point operations at `speed`
/// flops/second, along with a handle that can cancel it before or during
/// execution.
pub fn compute(kernel: &KernelHandle, flops: f64, speed: f64) -> (Compute, ComputeHandle) {
    let state = Rc::new(State {
        cancelled: Cell::new(false),
        waker: RefCell::new(None),
    });
    let fut = Compute {
        kernel: kernel.clone(),
        flops,
        speed,
        deadline: None,
        state: state.clone(),
        timer: None,
    };
    (fut, ComputeHandle { state })
}

impl Future for Compute {
    type Output = ExecuteOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<ExecuteOutcome> {
        let this = self.get_mut();

        if this.state.cancelled.get() {
            return Poll::Ready(ExecuteOutcome::Cancelled);
        }

        let deadline = *this
            .deadline
            .get_or_insert_with(|| this.kernel.now() + this.flops / this.speed);

        if this.kernel.now() >= deadline {
            return Poll::Ready(ExecuteOutcome::Completed);
        }

        *this.state.waker.borrow_mut() = Some(cx.waker().clone());
        if this.timer.is_none() {
            let id = this
                .kernel
                .timeline()
                .borrow_mut()
                .schedule(deadline, cx.waker().clone());
            this.timer = Some(id);
        }
        Poll::Pending
    }
}

impl Drop for Compute {
    fn drop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.kernel.timeline().borrow_mut().cancel(id);
        }
    }
}
