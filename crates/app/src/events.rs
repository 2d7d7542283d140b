//! Change notifications for storefront consumers.
//!
//! Services emit an event after every successful mutation on either storage
//! scope. Delivery is same-process only; consumers re-fetch on receipt rather
//! than receiving the new state.

use tokio::sync::broadcast;

/// Buffered events per subscriber before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 32;

/// What changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The cart changed in some scope.
    CartChanged,
    /// The wishlist changed in some scope.
    WishlistChanged,
}

/// Subscription channel for data-change notifications.
#[derive(Debug, Clone)]
pub struct Changes {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Changes {
    /// Create a channel with no subscribers yet.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to change events. Events emitted before this call are not
    /// replayed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Emit an event. Emission with no subscribers is not an error.
    pub(crate) fn notify(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for Changes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let changes = Changes::new();
        let mut receiver = changes.subscribe();

        changes.notify(ChangeEvent::CartChanged);

        assert!(matches!(receiver.recv().await, Ok(ChangeEvent::CartChanged)));
    }

    #[test]
    fn notify_without_subscribers_is_harmless() {
        let changes = Changes::new();

        changes.notify(ChangeEvent::WishlistChanged);
    }
}
