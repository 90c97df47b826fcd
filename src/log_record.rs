//! Canonical log record representation.
//!
//! `FemtoLogRecord` is the normalised form every event is reduced to before
//! encoding. Fields that are constant for a handler live in a shared
//! [`RecordContext`] so records only carry what varies per event.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};

use crate::{facility::Facility, identity::Identity, severity::Severity};

/// UTF-8 byte-order mark prepended to RFC5424 messages when enabled.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Byte-order-mark mode applied to encoded messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ByteOrderMark {
    #[default]
    None,
    Utf8,
}

impl ByteOrderMark {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            ByteOrderMark::None => &[],
            ByteOrderMark::Utf8 => &UTF8_BOM,
        }
    }
}

/// Handler-wide constants stamped on every record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordContext {
    pub identity: Identity,
    pub byte_order_mark: ByteOrderMark,
}

impl RecordContext {
    pub fn new(identity: Identity, byte_order_mark: ByteOrderMark) -> Self {
        Self {
            identity,
            byte_order_mark,
        }
    }
}

/// Current time truncated to microsecond resolution.
pub fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    let micros = now.timestamp_subsec_micros();
    now.with_nanosecond(micros * 1_000).unwrap_or(now)
}

#[derive(Clone, Debug)]
pub struct FemtoLogRecord {
    pub severity: Severity,
    pub facility: Facility,
    /// Capture time, microsecond resolution.
    pub timestamp: DateTime<Utc>,
    /// Registered name or generic identifier of the event source.
    pub origin_pid: String,
    /// Formatted payload. May span several lines until split.
    pub message: String,
    context: Arc<RecordContext>,
}

impl FemtoLogRecord {
    /// Construct a record stamped with the current time.
    pub fn new(
        context: Arc<RecordContext>,
        severity: Severity,
        facility: Facility,
        origin_pid: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            facility,
            timestamp: now_micros(),
            origin_pid: origin_pid.into(),
            message: message.into(),
            context,
        }
    }

    /// Copy of this record carrying a different message.
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self.clone()
        }
    }

    /// Syslog priority value: `facility * 8 + severity`.
    pub fn priority(&self) -> u8 {
        self.facility.code() * 8 + self.severity.code()
    }

    pub fn hostname(&self) -> &str {
        &self.context.identity.hostname
    }

    pub fn domain(&self) -> &str {
        &self.context.identity.domain
    }

    pub fn app_name(&self) -> &str {
        &self.context.identity.app_name
    }

    pub fn runtime_id(&self) -> &str {
        &self.context.identity.runtime_id
    }

    pub fn byte_order_mark(&self) -> &'static [u8] {
        self.context.byte_order_mark.as_bytes()
    }

    pub fn context(&self) -> &Arc<RecordContext> {
        &self.context
    }
}

impl fmt::Display for FemtoLogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}: {}", self.priority(), self.origin_pid, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Arc<RecordContext> {
        let identity = Identity::resolve_with(Some("app@host.example.org"), String::new);
        Arc::new(RecordContext::new(identity, ByteOrderMark::Utf8))
    }

    #[test]
    fn exposes_context_fields() {
        let record = FemtoLogRecord::new(
            context(),
            Severity::Warning,
            Facility::Local0,
            "worker",
            "disk low",
        );
        assert_eq!(record.hostname(), "host.example.org");
        assert_eq!(record.domain(), "example.org");
        assert_eq!(record.app_name(), "app");
        assert_eq!(record.byte_order_mark(), &UTF8_BOM);
        assert_eq!(record.priority(), 16 * 8 + 4);
        assert_eq!(record.to_string(), "<132> worker: disk low");
    }

    #[test]
    fn timestamp_has_microsecond_resolution() {
        let ts = now_micros();
        assert_eq!(ts.nanosecond() % 1_000, 0);
    }

    #[test]
    fn with_message_preserves_other_fields() {
        let record = FemtoLogRecord::new(context(), Severity::Error, Facility::Daemon, "p", "a\nb");
        let copy = record.with_message("a");
        assert_eq!(copy.message, "a");
        assert_eq!(record.message, "a\nb");
        assert_eq!(copy.timestamp, record.timestamp);
        assert_eq!(copy.severity, record.severity);
        assert!(Arc::ptr_eq(copy.context(), record.context()));
    }

    #[test]
    fn bom_defaults_to_empty() {
        assert!(ByteOrderMark::default().as_bytes().is_empty());
    }
}
