//! UDP syslog forwarding handler.
//!
//! This module defines `FemtoSyslogHandler`, a handler that normalises
//! [`LogEvent`](crate::event::LogEvent) values into
//! [`FemtoLogRecord`](crate::log_record::FemtoLogRecord)s and sends each line
//! of each record as one datagram to a remote collector. A single worker
//! thread owns the socket; informational events are shed when its queue
//! grows past the configured limit, and any send failure stops the worker.

mod config;
mod handler;
mod worker;


pub use config::{
    DEFAULT_DEST_HOST, DEFAULT_DEST_PORT, DEFAULT_FLUSH_TIMEOUT, SyslogHandlerConfig,
};
pub use handler::FemtoSyslogHandler;
pub use worker::ExitSignal;
