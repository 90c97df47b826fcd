//! Synchronous forwarding pipeline.
//!
//! [`Forwarder`] runs one event through classification, record construction,
//! line splitting and transport. It holds no per-event state, so the handler
//! worker simply calls [`Forwarder::forward`] for each dequeued event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;

use crate::{
    backpressure::BackpressureGate,
    classifier::{Classification, classify},
    event::LogEvent,
    handler::HandlerError,
    log_record::FemtoLogRecord,
    report::RecordFactory,
    splitter::split_lines,
    transport::UdpTransport,
};

/// Counters describing a handler's activity.
#[derive(Debug, Default)]
pub struct HandlerStats {
    received: AtomicU64,
    sent: AtomicU64,
    shed: AtomicU64,
    ignored: AtomicU64,
}

/// Point-in-time copy of [`HandlerStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub received: u64,
    pub sent: u64,
    pub shed: u64,
    pub ignored: u64,
}

impl HandlerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    fn record_shed(&self) {
        self.shed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Events accepted by the handler, including shed and ignored ones.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Datagrams sent successfully.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Informational events dropped by the backpressure gate.
    pub fn shed(&self) -> u64 {
        self.shed.load(Ordering::Relaxed)
    }

    /// Unrecognized events skipped.
    pub fn ignored(&self) -> u64 {
        self.ignored.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received(),
            sent: self.sent(),
            shed: self.shed(),
            ignored: self.ignored(),
        }
    }
}

/// Classifies, builds, splits and sends events.
#[derive(Debug)]
pub struct Forwarder {
    factory: RecordFactory,
    gate: BackpressureGate,
    transport: UdpTransport,
    stats: Arc<HandlerStats>,
}

impl Forwarder {
    pub fn new(
        factory: RecordFactory,
        gate: BackpressureGate,
        transport: UdpTransport,
        stats: Arc<HandlerStats>,
    ) -> Self {
        Self {
            factory,
            gate,
            transport,
            stats,
        }
    }

    pub fn stats(&self) -> &Arc<HandlerStats> {
        &self.stats
    }

    /// Build the canonical record for `event`, if it is not shed or ignored.
    pub fn build_record(
        &self,
        event: &LogEvent,
        backlog: usize,
    ) -> Result<Option<FemtoLogRecord>, HandlerError> {
        match classify(event, &self.gate, backlog) {
            Classification::Message { nominal, event } => {
                Ok(Some(self.factory.message_record(nominal, event)))
            }
            Classification::Report { nominal, event } => {
                Ok(Some(self.factory.report_record(nominal, event)?))
            }
            Classification::Shed => {
                self.stats.record_shed();
                Ok(None)
            }
            Classification::Ignored => {
                self.stats.record_ignored();
                Ok(None)
            }
        }
    }

    /// Forward `event`, returning the number of datagrams sent.
    ///
    /// `backlog` is the number of events still queued behind this one. Any
    /// error is fatal to the caller; lines already sent are not recalled.
    pub fn forward(&self, event: &LogEvent, backlog: usize) -> Result<usize, HandlerError> {
        let Some(record) = self.build_record(event, backlog)? else {
            return Ok(0);
        };
        let mut sent = 0;
        for line in split_lines(&record) {
            self.transport.send(&line)?;
            self.stats.record_sent();
            sent += 1;
        }
        if sent == 0 {
            debug!("femtosyslog: record from {} had no lines to send", record.origin_pid);
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        net::{SocketAddr, UdpSocket},
        time::Duration,
    };

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::{
        encoder::SharedEncoder,
        event::{MessageEvent, Origin, ReportEvent},
        facility::{Facility, FacilityMap},
        identity::Identity,
        log_record::{ByteOrderMark, RecordContext},
        render::SharedRenderer,
        severity::Severity,
        transport::bind_ephemeral,
    };

    struct Harness {
        forwarder: Forwarder,
        receiver: UdpSocket,
    }

    impl Harness {
        fn recv_all(&self) -> Vec<String> {
            let mut out = Vec::new();
            let mut buf = [0u8; 1024];
            while let Ok(n) = self.receiver.recv(&mut buf) {
                out.push(String::from_utf8_lossy(&buf[..n]).into_owned());
            }
            out
        }
    }

    fn priority_encoder() -> SharedEncoder {
        Arc::new(|record: &FemtoLogRecord| -> io::Result<Vec<u8>> {
            Ok(format!("<{}>{}", record.priority(), record.message).into_bytes())
        })
    }

    #[fixture]
    fn harness() -> Harness {
        let receiver = UdpSocket::bind("127.0.0.1:0").expect("bind receiver");
        receiver
            .set_read_timeout(Some(Duration::from_millis(200)))
            .expect("set timeout");
        let destination: SocketAddr = receiver.local_addr().expect("receiver addr");
        let socket = bind_ephemeral(destination).expect("bind sender");
        let identity = Identity::resolve_with(Some("app@host"), String::new);
        let factory = RecordFactory::new(
            RecordContext::new(identity, ByteOrderMark::None),
            FacilityMap::new(Facility::User, Facility::Local0),
            SharedRenderer::default(),
        );
        let forwarder = Forwarder::new(
            factory,
            BackpressureGate::new(2),
            UdpTransport::new(socket, destination, priority_encoder()),
            Arc::new(HandlerStats::new()),
        );
        Harness {
            forwarder,
            receiver,
        }
    }

    fn origin() -> Origin {
        Origin::Registered("web".into())
    }

    #[rstest]
    fn multi_line_message_sends_one_datagram_per_line(harness: Harness) {
        let event = LogEvent::ErrorMsg(MessageEvent::text(origin(), "a\nb\n\nc"));
        let sent = harness.forwarder.forward(&event, 0).expect("forward");
        assert_eq!(sent, 3);
        // local0.err = 16 * 8 + 3
        assert_eq!(harness.recv_all(), ["<131>a", "<131>b", "<131>c"]);
        assert_eq!(harness.forwarder.stats().sent(), 3);
    }

    #[rstest]
    fn info_below_limit_is_sent(harness: Harness) {
        let event = LogEvent::InfoMsg(MessageEvent::text(origin(), "ready"));
        assert_eq!(harness.forwarder.forward(&event, 1).expect("forward"), 1);
        assert_eq!(harness.recv_all(), ["<14>ready"]);
    }

    #[rstest]
    fn info_at_limit_is_shed(harness: Harness) {
        let event = LogEvent::InfoReport(ReportEvent::application_started(origin(), "a", "n"));
        assert_eq!(harness.forwarder.forward(&event, 2).expect("forward"), 0);
        assert!(harness.recv_all().is_empty());
        assert_eq!(harness.forwarder.stats().shed(), 1);
    }

    #[rstest]
    fn warning_is_never_shed(harness: Harness) {
        let event = LogEvent::WarningMsg(MessageEvent::text(origin(), "slow"));
        assert_eq!(harness.forwarder.forward(&event, 10_000).expect("forward"), 1);
        assert_eq!(harness.recv_all(), ["<12>slow"]);
    }

    #[rstest]
    fn unrecognized_event_is_counted_and_skipped(harness: Harness) {
        let event = LogEvent::Unrecognized("trace".into());
        assert_eq!(harness.forwarder.forward(&event, 0).expect("forward"), 0);
        assert_eq!(harness.forwarder.stats().ignored(), 1);
    }

    #[rstest]
    fn tagged_report_with_bad_severity_is_fatal(harness: Harness) {
        let report = ReportEvent::new(
            origin(),
            crate::event::ReportKind::Standard,
            json!({"fmt": "x", "args": [], "severity": "loud"}),
        );
        let err = harness
            .forwarder
            .forward(&LogEvent::WarningReport(report), 0)
            .unwrap_err();
        assert!(matches!(err, HandlerError::Symbol(_)));
    }

    #[rstest]
    fn built_record_carries_resolved_fields(harness: Harness) {
        let report = ReportEvent::application_exited(origin(), "myapp", json!("shutdown"));
        let record = harness
            .forwarder
            .build_record(&LogEvent::InfoReport(report), 0)
            .expect("build")
            .expect("record present");
        assert_eq!(record.severity, Severity::Error);
        assert_eq!(record.facility, Facility::Local0);
        assert_eq!(record.message, "application myapp exited with shutdown");
        assert_eq!(record.origin_pid, "web");
    }
}
