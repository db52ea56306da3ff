//! Overlap events
//!
//! The collision pass queues an [`OverlapEvent`] for every pair of game
//! objects whose colliders begin, continue or stop overlapping. Queued
//! events are delivered to registered handlers at the end of the frame.
//! The last dispatch's events stay available to `drain` until the next
//! dispatch replaces them.
//!
//! Handlers subscribe per phase. A handler returning `true` consumes the
//! event and later handlers for that phase never see it.

use std::collections::HashMap;

use crate::foundation::collections::GameObjectId;

/// Lifecycle phase of an overlapping pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapPhase {
    /// First frame the pair overlaps
    Enter,
    /// Every following frame the pair still overlaps
    Stay,
    /// First frame the pair no longer overlaps, or one side was removed
    Exit,
}

/// Overlap notification for a pair of game objects
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapEvent {
    /// Lifecycle phase
    pub phase: OverlapPhase,
    /// First object of the pair
    pub a: GameObjectId,
    /// Second object of the pair
    pub b: GameObjectId,
    /// Name of `a` when the event was raised
    pub a_name: String,
    /// Name of `b` when the event was raised
    pub b_name: String,
    /// Whether either collider is a trigger
    pub trigger: bool,
}

impl OverlapEvent {
    /// Whether the event involves the named object
    pub fn involves(&self, name: &str) -> bool {
        self.a_name == name || self.b_name == name
    }

    /// Name of the object paired with `name`, if `name` takes part
    pub fn other(&self, name: &str) -> Option<&str> {
        if self.a_name == name {
            Some(&self.b_name)
        } else if self.b_name == name {
            Some(&self.a_name)
        } else {
            None
        }
    }
}

/// Receives overlap events for the phases it was registered on
pub trait EventHandler {
    /// `true` stops delivery to the remaining handlers
    fn on_event(&mut self, event: &OverlapEvent) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&OverlapEvent) -> bool,
{
    fn on_event(&mut self, event: &OverlapEvent) -> bool {
        self(event)
    }
}

/// Event queue with per-phase handler registration
#[derive(Default)]
pub struct EventSystem {
    queue: Vec<OverlapEvent>,
    delivered: Vec<OverlapEvent>,
    handlers: HashMap<OverlapPhase, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// No handlers, nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one phase
    pub fn register_handler(&mut self, phase: OverlapPhase, handler: Box<dyn EventHandler>) {
        self.handlers.entry(phase).or_default().push(handler);
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: OverlapEvent) {
        self.queue.push(event);
    }

    /// Deliver every queued event in send order
    ///
    /// Events of the previous dispatch that were never drained are dropped.
    pub fn dispatch(&mut self) {
        self.delivered.clear();
        let queued = std::mem::take(&mut self.queue);
        for event in queued {
            if let Some(handlers) = self.handlers.get_mut(&event.phase) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(&event) {
                        break;
                    }
                }
            }
            self.delivered.push(event);
        }
    }

    /// Take the events of the last dispatch
    pub fn drain(&mut self) -> Vec<OverlapEvent> {
        std::mem::take(&mut self.delivered)
    }

    /// Number of events waiting for dispatch
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of dispatched events not drained yet
    pub fn undrained(&self) -> usize {
        self.delivered.len()
    }
}
