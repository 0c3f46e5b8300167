use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct Inner<T> {
    queue: VecDeque<T>,
    waker: Option<Waker>,
}

/// A named, unbounded, single-consumer message queue.
///
/// Mirrors the original simulator's convention of addressing a process by a
/// well-known mailbox name and blocking on a single outstanding `receive()`;
/// callers that need to fan a mailbox out to several names should keep one
/// `Mailbox` per name rather than multiplexing inside a single instance.
pub struct Mailbox<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                queue: VecDeque::new(),
                waker: None,
            })),
        }
    }

    /// Enqueue a message and wake a pending receiver, if any.
    pub fn send(&self, msg: T) {
        let mut inner = self.inner.borrow_mut();
        inner.queue.push_back(msg);
        if let Some(waker) = inner.waker.take() {
            waker.wake();
        }
    }

    pub fn recv(&self) -> Recv<T> {
        Recv {
            inner: self.inner.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Future returned by [`Mailbox::recv`].
pub struct Recv<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Future for Recv<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut inner = self.inner.borrow_mut();
        if let Some(msg) = inner.queue.pop_front() {
            Poll::Ready(msg)
        } else {
            inner.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}
