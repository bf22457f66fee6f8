//! Event Bus - timestamped gameplay events for one session
//!
//! The session emits every event produced during a tick. Callers either
//! drain them (front end logging, simulation metrics) or peek (tests).

use super::types::GameEvent;

/// Timestamped event for the event bus
#[derive(Debug, Clone)]
pub struct BusEvent {
    /// Time in milliseconds since session start
    pub time_ms: u32,
    /// The event data
    pub event: GameEvent,
}

#[derive(Debug, Default)]
pub struct EventBus {
    /// Events emitted and not yet consumed
    pending: Vec<BusEvent>,

    /// Events that have been consumed
    processed: Vec<BusEvent>,

    /// Current elapsed time in milliseconds (for timestamping)
    elapsed_ms: u32,

    /// Whether the bus is enabled
    enabled: bool,

    /// Keep drained events in `processed`
    retain_processed: bool,
}

impl EventBus {
    /// Create a new enabled event bus
    pub fn new() -> Self {
        Self {
            enabled: true,
            retain_processed: true,
            ..Default::default()
        }
    }

    /// Create a disabled event bus (events are dropped)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Batch sessions drain every tick and never read history
    pub fn without_history() -> Self {
        Self {
            enabled: true,
            retain_processed: false,
            ..Default::default()
        }
    }

    /// Update the elapsed time (called each tick)
    pub fn update_time(&mut self, elapsed_secs: f32) {
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
    }

    /// Emit an event to the bus
    pub fn emit(&mut self, event: GameEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            event,
        });
    }

    /// Emit multiple events at once
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        if !self.enabled {
            return;
        }
        let time_ms = self.elapsed_ms;
        self.pending
            .extend(events.into_iter().map(|event| BusEvent { time_ms, event }));
    }

    /// Get pending events for consumption (does not drain)
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    /// Drain pending events, moving them to processed
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let events = std::mem::take(&mut self.pending);
        if self.retain_processed {
            self.processed.extend(events.iter().cloned());
        }
        events
    }

    /// Get all processed events
    pub fn processed(&self) -> &[BusEvent] {
        &self.processed
    }

    pub fn clear_processed(&mut self) {
        self.processed.clear();
    }

    /// Get the number of pending events
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if the bus has any pending events
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Check if the bus is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the bus
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Get current elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::ActorId;

    #[test]
    fn test_emit_and_drain() {
        let mut bus = EventBus::new();
        bus.update_time(1.5);

        bus.emit(GameEvent::Jump {
            actor: ActorId::Player,
        });

        assert_eq!(bus.pending_count(), 1);
        assert!(bus.has_pending());

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time_ms, 1500);
        assert_eq!(bus.pending_count(), 0);
        assert_eq!(bus.processed().len(), 1);
    }

    #[test]
    fn test_disabled_bus() {
        let mut bus = EventBus::disabled();
        bus.emit(GameEvent::Death {
            actor: ActorId::Enemy(0),
        });
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_without_history_drops_processed() {
        let mut bus = EventBus::without_history();
        bus.emit_all([
            GameEvent::Jump {
                actor: ActorId::Player,
            },
            GameEvent::Dodge {
                actor: ActorId::Player,
            },
        ]);
        assert_eq!(bus.drain().len(), 2);
        assert!(bus.processed().is_empty());
    }
}
