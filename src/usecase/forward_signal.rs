//! UseCase: point-to-point signal forwarding.
//!
//! The relay's only job here is delivery: the payload is opaque, no room
//! membership is checked (any joined connection may signal any known
//! connection id), and a miss is a silent drop.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventPusher};

pub struct ForwardSignalUseCase {
    pusher: Arc<dyn EventPusher>,
}

impl ForwardSignalUseCase {
    pub fn new(pusher: Arc<dyn EventPusher>) -> Self {
        Self { pusher }
    }

    /// Forward a pre-serialized `signal` event to exactly one connection.
    ///
    /// Fire-and-forget: an unknown or just-dropped target produces no
    /// observable effect beyond a debug log.
    pub async fn execute(&self, target: &ConnectionId, event: &str) {
        if let Err(e) = self.pusher.send_to(target, event).await {
            tracing::debug!("Signal to '{}' dropped: {}", target.as_str(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pusher::WebSocketEventPusher;
    use tokio::sync::mpsc;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string())
    }

    #[tokio::test]
    async fn test_signal_is_delivered_to_target_only() {
        // given:
        let pusher = Arc::new(WebSocketEventPusher::new());
        let usecase = ForwardSignalUseCase::new(pusher.clone());
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        pusher.register(conn("b"), tx_b).await;
        pusher.register(conn("c"), tx_c).await;

        // when:
        usecase.execute(&conn("b"), r#"{"type":"signal"}"#).await;

        // then:
        assert_eq!(rx_b.recv().await.unwrap(), r#"{"type":"signal"}"#);
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_signal_to_unknown_target_is_silently_dropped() {
        // given:
        let pusher = Arc::new(WebSocketEventPusher::new());
        let usecase = ForwardSignalUseCase::new(pusher.clone());

        // when: no such target exists
        usecase.execute(&conn("ghost"), r#"{"type":"signal"}"#).await;

        // then: no panic, no error surfaced anywhere
    }
}
