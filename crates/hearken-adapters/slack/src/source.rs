//! Inbound event sources.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// A stream of native events owned by a transport loop.
///
/// The wire client (websocket, reconnection, authentication) lives behind
/// this trait. `None` means the stream has ended and the loop should stop.
#[async_trait]
pub trait EventSource<E>: Send {
    async fn next_event(&mut self) -> Option<E>;
}

#[async_trait]
impl<E: Send> EventSource<E> for mpsc::Receiver<E> {
    async fn next_event(&mut self) -> Option<E> {
        self.recv().await
    }
}

#[async_trait]
impl<E: Send> EventSource<E> for mpsc::UnboundedReceiver<E> {
    async fn next_event(&mut self) -> Option<E> {
        self.recv().await
    }
}

#[async_trait]
impl<E, S> EventSource<E> for Box<S>
where
    E: Send,
    S: EventSource<E> + ?Sized,
{
    async fn next_event(&mut self) -> Option<E> {
        (**self).next_event().await
    }
}
