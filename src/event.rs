//! Runtime log events accepted by the forwarder.
//!
//! Events arrive as one of a closed set of shapes. Message events carry a
//! format string and its arguments; report events carry a kind tag and a
//! structured JSON payload which the report constructor inspects.

use std::fmt;
use std::thread;

use serde_json::{Value, json};

use crate::severity::Severity;

/// Source of an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// A source registered under a symbolic name.
    Registered(String),
    /// An anonymous source identified by a generic process identifier.
    Process(String),
}

impl Origin {
    /// Origin describing the calling thread.
    ///
    /// Named threads are treated as registered sources; unnamed threads fall
    /// back to their thread id.
    pub fn current_thread() -> Self {
        let current = thread::current();
        match current.name() {
            Some(name) => Origin::Registered(name.to_owned()),
            None => Origin::Process(format!("{:?}", current.id())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Origin::Registered(name) => name,
            Origin::Process(id) => id,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plain format-string message.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageEvent {
    pub origin: Origin,
    pub format: String,
    pub args: Vec<Value>,
}

impl MessageEvent {
    pub fn new(origin: Origin, format: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            origin,
            format: format.into(),
            args,
        }
    }

    /// A message forwarded verbatim; braces in `text` are not interpreted.
    pub fn text(origin: Origin, text: impl Into<String>) -> Self {
        Self::new(origin, "{}", vec![Value::String(text.into())])
    }
}

/// Kind tag attached to a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// Standard report without a more specific tag.
    Standard,
    /// Crash of a supervised worker.
    Crash,
    /// Report emitted by a supervisor about one of its children.
    Supervisor,
    /// Startup progress of supervised children and applications.
    Progress,
    /// Caller-defined tag.
    Custom(String),
}

impl ReportKind {
    pub fn as_str(&self) -> &str {
        match self {
            ReportKind::Standard => "standard",
            ReportKind::Crash => "crash",
            ReportKind::Supervisor => "supervisor",
            ReportKind::Progress => "progress",
            ReportKind::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportEvent {
    pub origin: Origin,
    pub kind: ReportKind,
    pub payload: Value,
}

impl ReportEvent {
    pub fn new(origin: Origin, kind: ReportKind, payload: Value) -> Self {
        Self {
            origin,
            kind,
            payload,
        }
    }

    /// Lifecycle report announcing that an application started on a node.
    pub fn application_started(
        origin: Origin,
        application: impl Into<String>,
        node: impl Into<String>,
    ) -> Self {
        Self::new(
            origin,
            ReportKind::Progress,
            json!({ "application": application.into(), "started_at": node.into() }),
        )
    }

    /// Lifecycle report announcing that an application exited.
    pub fn application_exited(origin: Origin, application: impl Into<String>, reason: Value) -> Self {
        Self::new(
            origin,
            ReportKind::Standard,
            json!({ "application": application.into(), "exited": reason }),
        )
    }

    /// Progress report for a supervised child that was started.
    pub fn child_started(
        origin: Origin,
        supervisor: impl Into<String>,
        child: impl Into<String>,
        start_spec: Value,
    ) -> Self {
        Self::new(
            origin,
            ReportKind::Progress,
            json!({
                "supervisor": supervisor.into(),
                "started": { "name": child.into(), "start": start_spec },
            }),
        )
    }

    /// Report carrying its own severity, format string and arguments.
    pub fn tagged(
        origin: Origin,
        severity: Severity,
        format: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self::new(
            origin,
            ReportKind::Standard,
            json!({ "severity": severity, "fmt": format.into(), "args": args }),
        )
    }
}

/// Event delivered to the forwarder.
#[derive(Clone, Debug, PartialEq)]
pub enum LogEvent {
    ErrorMsg(MessageEvent),
    ErrorReport(ReportEvent),
    WarningMsg(MessageEvent),
    WarningReport(ReportEvent),
    InfoMsg(MessageEvent),
    InfoReport(ReportEvent),
    /// Any other event; ignored by the forwarder.
    Unrecognized(String),
}

impl LogEvent {
    /// Severity implied by the event's class, if it has one.
    pub fn nominal_severity(&self) -> Option<Severity> {
        match self {
            LogEvent::ErrorMsg(_) | LogEvent::ErrorReport(_) => Some(Severity::Error),
            LogEvent::WarningMsg(_) | LogEvent::WarningReport(_) => Some(Severity::Warning),
            LogEvent::InfoMsg(_) | LogEvent::InfoReport(_) => Some(Severity::Informational),
            LogEvent::Unrecognized(_) => None,
        }
    }
}
