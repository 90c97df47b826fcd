//! Handler builders and associated traits.
//!
//! Provides a minimal builder API for constructing handlers in a
//! type‑safe manner. Each builder implements [`HandlerBuilderTrait`]
//! which returns a boxed [`FemtoHandlerTrait`] ready to receive events.

use std::io;

use thiserror::Error;

use crate::handler::{FemtoHandlerTrait, SymbolError};

mod common;
pub mod syslog_builder;

pub use syslog_builder::SyslogHandlerBuilder;

/// Errors that may occur while building a handler.
#[derive(Debug, Error)]
pub enum HandlerBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid handler configuration: {0}")]
    InvalidConfig(String),
    /// Underlying I/O error whilst creating the handler.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<SymbolError> for HandlerBuildError {
    fn from(err: SymbolError) -> Self {
        HandlerBuildError::InvalidConfig(err.to_string())
    }
}

/// Trait implemented by all handler builders.
///
/// Builders return boxed [`FemtoHandlerTrait`] objects so the caller can
/// register them without knowing the concrete handler type.
pub trait HandlerBuilderTrait: Send + Sync {
    /// Build the handler instance.
    fn build(&self) -> Result<Box<dyn FemtoHandlerTrait>, HandlerBuildError>;
}
