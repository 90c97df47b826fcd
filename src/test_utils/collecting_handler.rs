//! A simple handler that accumulates events in memory for test assertions.

use crate::event::LogEvent;
use crate::handler::{FemtoHandlerTrait, HandlerError};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

/// Handler that stores every event it receives for later inspection.
#[derive(Clone, Default)]
pub struct CollectingHandler {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl CollectingHandler {
    /// Create a new empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot of all events received so far.
    pub fn collected(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }
}

impl FemtoHandlerTrait for CollectingHandler {
    fn handle(&self, event: LogEvent) -> Result<(), HandlerError> {
        self.events.lock().push(event);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
