//! Completion handle for a dispatched request.

use crate::Error;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Outcome of one dispatched request.
///
/// Resolves exactly once, to `Ok(())` when the service accepted the payload
/// or to the transport or rejection error otherwise. Dropping a `Delivery`
/// does not cancel the request; its outcome is discarded.
#[derive(Debug)]
#[must_use = "dropping a Delivery discards the request outcome"]
pub struct Delivery {
    handle: JoinHandle<Result<(), Error>>,
}

impl Delivery {
    pub(crate) fn new(handle: JoinHandle<Result<(), Error>>) -> Self {
        Self { handle }
    }

    /// Whether the request has run to completion.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for Delivery {
    type Output = Result<(), Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) => Err(Error::Dispatch(e)),
        })
    }
}
