//! Construction of canonical records from events.
//!
//! [`construct_report`] decides severity, facility and message text for a
//! report by inspecting its kind tag and payload shape in a fixed priority
//! order. [`RecordFactory`] stamps the result with the handler-wide context
//! and a timestamp.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    event::{MessageEvent, ReportEvent, ReportKind},
    facility::{Facility, FacilityMap},
    handler::SymbolError,
    log_record::{FemtoLogRecord, RecordContext},
    render::{DEFAULT_DUMP_WIDTH, SharedRenderer, bounded_dump, render_bare, render_format},
    severity::Severity,
};

/// Placeholder used when a progress report does not name its child.
const UNKNOWN_CHILD: &str = "undefined";

/// Which configured facility a record is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacilityChoice {
    Default,
    Error,
    /// Derived from the record's severity.
    BySeverity,
}

impl FacilityChoice {
    pub fn resolve(self, map: &FacilityMap, severity: Severity) -> Facility {
        match self {
            FacilityChoice::Default => map.default,
            FacilityChoice::Error => map.error,
            FacilityChoice::BySeverity => map.select(severity),
        }
    }
}

/// Severity, facility and text decided for one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordDraft {
    pub severity: Severity,
    pub facility: FacilityChoice,
    pub message: String,
}

/// Draft for a plain message event.
pub fn construct_message(nominal: Severity, event: &MessageEvent) -> RecordDraft {
    RecordDraft {
        severity: nominal,
        facility: FacilityChoice::BySeverity,
        message: render_format(&event.format, &event.args),
    }
}

/// Draft for a report event.
///
/// Fails only when a tagged report names a severity outside the closed set.
pub fn construct_report(
    nominal: Severity,
    event: &ReportEvent,
    renderer: &SharedRenderer,
) -> Result<RecordDraft, SymbolError> {
    let payload = &event.payload;

    if event.kind == ReportKind::Crash {
        return Ok(RecordDraft {
            severity: Severity::Critical,
            facility: FacilityChoice::Error,
            message: renderer.render(&event.kind, payload),
        });
    }

    if let (Some(app), Some(node)) = (payload.get("application"), payload.get("started_at")) {
        return Ok(RecordDraft {
            severity: Severity::Informational,
            facility: FacilityChoice::Default,
            message: format!(
                "started application {} on node {}",
                render_bare(app),
                render_bare(node)
            ),
        });
    }

    if let (Some(app), Some(reason)) = (payload.get("application"), payload.get("exited")) {
        return Ok(RecordDraft {
            severity: Severity::Error,
            facility: FacilityChoice::Error,
            message: format!(
                "application {} exited with {}",
                render_bare(app),
                bounded_dump(reason, DEFAULT_DUMP_WIDTH)
            ),
        });
    }

    if event.kind == ReportKind::Progress {
        let started = payload.get("started").unwrap_or(payload);
        let child = first_field(started, &["name", "id", "pid"])
            .map(render_bare)
            .unwrap_or_else(|| UNKNOWN_CHILD.to_owned());
        let spec = first_field(started, &["mfargs", "start", "mfa"]).unwrap_or(&Value::Null);
        return Ok(RecordDraft {
            severity: Severity::Informational,
            facility: FacilityChoice::Default,
            message: format!(
                "started child {child} using {}",
                bounded_dump(spec, DEFAULT_DUMP_WIDTH)
            ),
        });
    }

    if event.kind == ReportKind::Supervisor {
        return Ok(RecordDraft {
            severity: Severity::Error,
            facility: FacilityChoice::Error,
            message: renderer.render(&event.kind, payload),
        });
    }

    if let (Some(args), Some(fmt), Some(severity)) = (
        payload.get("args"),
        payload.get("fmt"),
        payload.get("severity"),
    ) {
        let severity = parse_severity(severity)?;
        let args = match args {
            Value::Array(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };
        let format = match fmt {
            Value::String(s) => s.clone(),
            other => render_bare(other),
        };
        return Ok(RecordDraft {
            severity,
            facility: FacilityChoice::BySeverity,
            message: render_format(&format, args),
        });
    }

    Ok(RecordDraft {
        severity: nominal,
        facility: FacilityChoice::BySeverity,
        message: bounded_dump(payload, DEFAULT_DUMP_WIDTH),
    })
}

fn first_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| value.get(*key))
}

fn parse_severity(value: &Value) -> Result<Severity, SymbolError> {
    match value {
        Value::String(symbol) => symbol.parse(),
        other => Err(SymbolError::UnknownSeverity(other.to_string())),
    }
}

/// Builds records carrying one handler's constant context.
#[derive(Clone, Debug)]
pub struct RecordFactory {
    context: Arc<RecordContext>,
    facilities: FacilityMap,
    renderer: SharedRenderer,
}

impl RecordFactory {
    pub fn new(context: RecordContext, facilities: FacilityMap, renderer: SharedRenderer) -> Self {
        Self {
            context: Arc::new(context),
            facilities,
            renderer,
        }
    }

    pub fn context(&self) -> &Arc<RecordContext> {
        &self.context
    }

    pub fn message_record(&self, nominal: Severity, event: &MessageEvent) -> FemtoLogRecord {
        self.finish(construct_message(nominal, event), event.origin.as_str())
    }

    pub fn report_record(
        &self,
        nominal: Severity,
        event: &ReportEvent,
    ) -> Result<FemtoLogRecord, SymbolError> {
        let draft = construct_report(nominal, event, &self.renderer)?;
        Ok(self.finish(draft, event.origin.as_str()))
    }

    fn finish(&self, draft: RecordDraft, origin: &str) -> FemtoLogRecord {
        let facility = draft.facility.resolve(&self.facilities, draft.severity);
        FemtoLogRecord::new(
            Arc::clone(&self.context),
            draft.severity,
            facility,
            origin,
            draft.message,
        )
    }
}
