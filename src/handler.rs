//! Handler trait and error types shared across the crate.

use std::{any::Any, io};

use thiserror::Error;

use crate::event::LogEvent;

/// Errors raised when a symbolic name falls outside its closed domain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("unknown severity '{0}'")]
    UnknownSeverity(String),
    #[error("unknown facility '{0}'")]
    UnknownFacility(String),
    #[error("unknown wire format '{0}'; expected rfc3164 or rfc5424")]
    UnknownWireFormat(String),
}

/// Errors returned while forwarding events.
///
/// Every variant except [`HandlerError::Closed`] terminates the worker that
/// raised it.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler was closed or its worker has already exited.
    #[error("handler is closed")]
    Closed,
    /// The encoder could not serialise a record.
    #[error("failed to encode record: {0}")]
    Encode(#[source] io::Error),
    /// The datagram could not be sent.
    #[error("failed to send datagram: {0}")]
    Transport(#[source] io::Error),
    /// The worker thread panicked, for example inside a caller-supplied
    /// encoder or renderer.
    #[error("worker thread panicked")]
    WorkerPanicked,
    /// An event carried a severity outside the closed set.
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Trait implemented by every event consumer.
///
/// Implementations must be `Send + Sync` so a single handler can be shared
/// between producers (for example the `log` bridge and application code).
pub trait FemtoHandlerTrait: Send + Sync {
    /// Submit an event for forwarding.
    fn handle(&self, event: LogEvent) -> Result<(), HandlerError>;

    /// Wait until previously submitted events have been processed.
    fn flush(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;
}
