//! Discrete host events and the per-tick event queue

use std::collections::VecDeque;

/// Discrete input from the host, delivered between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// User selection action (tap / trigger press)
    Select,

    /// Viewport resized
    Resize { width: u32, height: u32 },

    /// The AR session ended; no more frames will arrive
    SessionEnded,
}

impl HostEvent {
    pub fn is_select(&self) -> bool {
        matches!(self, HostEvent::Select)
    }

    pub fn is_session_end(&self) -> bool {
        matches!(self, HostEvent::SessionEnded)
    }
}

/// FIFO of host events, drained once per tick.
///
/// Closing the queue stands in for deregistering host listeners: anything
/// pushed afterwards is dropped.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<HostEvent>,
    closed: bool,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HostEvent) {
        if self.closed {
            tracing::debug!("dropping {:?}: event queue closed", event);
            return;
        }
        self.events.push_back(event);
    }

    pub fn extend<I: IntoIterator<Item = HostEvent>>(&mut self, events: I) {
        for event in events {
            self.push(event);
        }
    }

    /// Take every queued event in arrival order
    pub fn drain(&mut self) -> Vec<HostEvent> {
        self.events.drain(..).collect()
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.events.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        queue.push(HostEvent::Resize {
            width: 800,
            height: 600,
        });
        queue.push(HostEvent::Select);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(drained[1].is_select());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_closed_queue_drops_events() {
        let mut queue = EventQueue::new();
        queue.push(HostEvent::Select);
        queue.close();
        queue.push(HostEvent::Select);

        assert!(queue.is_closed());
        assert!(queue.drain().is_empty());
    }
}
