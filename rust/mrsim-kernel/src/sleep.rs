use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::executor::KernelHandle;
use crate::timeline::TimerId;

/// A future that resolves once the kernel's virtual clock reaches `deadline`.
pub struct Sleep {
    kernel: KernelHandle,
    deadline: f64,
    timer: Option<TimerId>,
}

impl Sleep {
    pub(crate) fn new(kernel: KernelHandle, deadline: f64) -> Self {
        Self {
            kernel,
            deadline,
            timer: None,
        }
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.kernel.now() >= this.deadline {
            return Poll::Ready(());
        }
        if let Some(id) = this.timer.take() {
            this.kernel.timeline().borrow_mut().cancel(id);
        }
        let id = this
            .kernel
            .timeline()
            .borrow_mut()
            .schedule(this.deadline, cx.waker().clone());
        this.timer = Some(id);
        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.kernel.timeline().borrow_mut().cancel(id);
        }
    }
}
