//! Routing of incoming events to message or report construction.

use crate::{
    backpressure::BackpressureGate,
    event::{LogEvent, MessageEvent, ReportEvent},
    severity::Severity,
};

/// Outcome of classifying one event.
#[derive(Debug, PartialEq)]
pub enum Classification<'a> {
    /// Build a record from a plain message.
    Message {
        nominal: Severity,
        event: &'a MessageEvent,
    },
    /// Build a record from a structured report.
    Report {
        nominal: Severity,
        event: &'a ReportEvent,
    },
    /// Informational event dropped by the backpressure gate.
    Shed,
    /// Event shape the forwarder does not handle.
    Ignored,
}

/// Classify `event` given the current pending-queue depth.
///
/// Error and warning events always pass. Informational events pass only when
/// `gate` admits `backlog`.
pub fn classify<'a>(
    event: &'a LogEvent,
    gate: &BackpressureGate,
    backlog: usize,
) -> Classification<'a> {
    match event {
        LogEvent::ErrorMsg(event) => Classification::Message {
            nominal: Severity::Error,
            event,
        },
        LogEvent::ErrorReport(event) => Classification::Report {
            nominal: Severity::Error,
            event,
        },
        LogEvent::WarningMsg(event) => Classification::Message {
            nominal: Severity::Warning,
            event,
        },
        LogEvent::WarningReport(event) => Classification::Report {
            nominal: Severity::Warning,
            event,
        },
        LogEvent::InfoMsg(_) | LogEvent::InfoReport(_) if !gate.admits(backlog) => {
            Classification::Shed
        }
        LogEvent::InfoMsg(event) => Classification::Message {
            nominal: Severity::Informational,
            event,
        },
        LogEvent::InfoReport(event) => Classification::Report {
            nominal: Severity::Informational,
            event,
        },
        LogEvent::Unrecognized(_) => Classification::Ignored,
    }
}
