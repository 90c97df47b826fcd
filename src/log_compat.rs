//! Compatibility bridge for the Rust `log` crate.
//!
//! `FemtoLogAdapter` implements `log::Log` and turns each record into a
//! [`LogEvent`] for a forwarding handler. Error, warn and info records become
//! message events of the matching class; debug and trace records become
//! informational reports tagged with the `debug` severity. Records emitted by
//! this crate itself are skipped so a failing handler cannot feed itself.

use std::sync::Arc;

use log::{LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::{
    event::{LogEvent, MessageEvent, Origin, ReportEvent},
    handler::FemtoHandlerTrait,
    severity::Severity,
};

const OWN_TARGET: &str = "femtosyslog";

/// Adapter implementing the Rust `log::Log` trait.
pub struct FemtoLogAdapter {
    handler: Arc<dyn FemtoHandlerTrait>,
    max_level: LevelFilter,
}

impl FemtoLogAdapter {
    pub fn new(handler: Arc<dyn FemtoHandlerTrait>, max_level: LevelFilter) -> Self {
        Self { handler, max_level }
    }
}

fn is_own_target(target: &str) -> bool {
    target.starts_with(OWN_TARGET)
}

/// Convert a `log` record into the event the forwarder understands.
pub fn event_from_record(record: &Record<'_>) -> LogEvent {
    let origin = Origin::Registered(record.target().to_owned());
    let text = record.args().to_string();
    match Severity::from(record.level()) {
        Severity::Error => LogEvent::ErrorMsg(MessageEvent::text(origin, text)),
        Severity::Warning => LogEvent::WarningMsg(MessageEvent::text(origin, text)),
        Severity::Informational => LogEvent::InfoMsg(MessageEvent::text(origin, text)),
        severity => LogEvent::InfoReport(ReportEvent::tagged(
            origin,
            severity,
            "{}",
            vec![Value::String(text)],
        )),
    }
}

impl log::Log for FemtoLogAdapter {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level && !is_own_target(metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // A closed handler has already reported its failure.
        let _ = self.handler.handle(event_from_record(record));
    }

    fn flush(&self) {
        self.handler.flush();
    }
}

static GLOBAL_ADAPTER: OnceCell<FemtoLogAdapter> = OnceCell::new();

/// Install `handler` as the destination of the global `log` facade.
///
/// Returns `false` when an adapter was already installed or a different
/// global logger is set.
pub fn install_global_logger(handler: Arc<dyn FemtoHandlerTrait>, max_level: LevelFilter) -> bool {
    let mut fresh = false;
    let adapter = GLOBAL_ADAPTER.get_or_init(|| {
        fresh = true;
        FemtoLogAdapter::new(handler, max_level)
    });
    if !fresh || log::set_logger(adapter).is_err() {
        return false;
    }
    log::set_max_level(max_level);
    true
}
