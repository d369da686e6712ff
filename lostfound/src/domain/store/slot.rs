//! Observable result slot.

use tokio::sync::watch;

use crate::domain::Resource;

/// One published [`Resource`] value plus its subscribers.
///
/// Writes use `send_replace`, so the latest value is kept even while
/// nobody is subscribed.
#[derive(Debug)]
pub(crate) struct Slot<T> {
    tx: watch::Sender<Resource<T>>,
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(Resource::Idle);
        Self { tx }
    }

    pub(crate) fn set(&self, value: Resource<T>) {
        self.tx.send_replace(value);
    }

    pub(crate) fn reset(&self) {
        self.set(Resource::Idle);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Resource<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Slot<T> {
    pub(crate) fn current(&self) -> Resource<T> {
        self.tx.borrow().clone()
    }
}
