use serde::Serialize;
use tokio::sync::broadcast;

use alba_shared::TeaId;

/// Buffered events per subscriber before the slowest one starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Changes the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum AppEvent {
    TeaAdded { tea_id: TeaId },
    TeaUpdated { tea_id: TeaId },
    TeaRemoved { tea_id: TeaId },
    CollectionCleared { dropped: usize },
    /// A durable write failed; changes may not survive a reload.
    PersistenceDegraded { slot: String, reason: String },
    WeatherUpdated { city: String, temperature: i32 },
}

pub type EventSender = broadcast::Sender<AppEvent>;

pub fn emit_event(tx: &EventSender, event: AppEvent) {
    // No subscribers is not an error for the sender.
    if tx.send(event).is_err() {
        tracing::trace!("event dropped, no subscribers");
    }
}
