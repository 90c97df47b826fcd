//! End-to-end forwarding through handlers built from `SyslogHandlerBuilder`.

mod test_utils;

use std::{io, sync::Arc};

use femtosyslog::{
    ByteOrderMark, FemtoHandlerTrait, FemtoLogRecord, HandlerBuilderTrait, LogEvent,
    MessageEvent, Origin, ReportEvent, ReportKind, ReportRenderer, Severity,
    SyslogHandlerBuilder, WireFormat, test_utils::UdpCollector,
};
use rstest::rstest;
use serde_json::{Value, json};
use test_utils::{HandlerPair, fixtures::builder_for, handler_pair, recv_text};

fn origin() -> Origin {
    Origin::Registered("billing_sup".into())
}

#[derive(Default)]
struct DummyHandler;

impl FemtoHandlerTrait for DummyHandler {
    fn handle(&self, _event: LogEvent) -> Result<(), femtosyslog::HandlerError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[test]
fn default_flush_returns_true() {
    let handler = DummyHandler;
    let trait_obj: &dyn FemtoHandlerTrait = &handler;
    assert!(trait_obj.flush());
}

#[rstest]
#[case::started(
    LogEvent::InfoReport(ReportEvent::application_started(origin(), "billing", "node1")),
    "<14>started application billing on node node1"
)]
#[case::exited(
    LogEvent::InfoReport(ReportEvent::application_exited(origin(), "billing", json!("stopped"))),
    "<131>application billing exited with stopped"
)]
#[case::child(
    LogEvent::InfoReport(ReportEvent::child_started(origin(), "billing_sup", "worker", json!(["m", "f", []]))),
    r#"<14>started child worker using ["m","f",[]]"#
)]
#[case::tagged(
    LogEvent::ErrorReport(ReportEvent::tagged(origin(), Severity::Notice, "{} of {}", vec![json!(3), json!(4)])),
    "<13>3 of 4"
)]
#[case::fallback(
    LogEvent::WarningReport(ReportEvent::new(origin(), ReportKind::Standard, json!({"disk": "full"}))),
    r#"<12>{"disk":"full"}"#
)]
fn reports_arrive_with_resolved_priority(
    handler_pair: HandlerPair,
    #[case] event: LogEvent,
    #[case] expected: &str,
) {
    let HandlerPair { collector, handler } = handler_pair;
    handler.handle(event).expect("handle");
    assert!(handler.flush());
    assert_eq!(recv_text(&collector).as_deref(), Some(expected));
}

struct OneLineRenderer;

impl ReportRenderer for OneLineRenderer {
    fn render(&self, kind: &ReportKind, payload: &Value) -> String {
        format!("{kind}: {}", payload["reason"])
    }
}

#[rstest]
#[case(ReportKind::Crash, "<130>crash: \"badarg\"")]
#[case(ReportKind::Supervisor, "<131>supervisor: \"badarg\"")]
fn verbose_reports_use_the_configured_renderer(
    #[case] kind: ReportKind,
    #[case] expected: &str,
) {
    let collector = UdpCollector::bind().expect("bind collector");
    let handler = builder_for(&collector)
        .with_report_renderer(OneLineRenderer)
        .build_inner()
        .expect("build");
    let event = ReportEvent::new(origin(), kind, json!({"reason": "badarg"}));
    handler.handle(LogEvent::InfoReport(event)).expect("handle");
    assert!(handler.flush());
    assert_eq!(recv_text(&collector).as_deref(), Some(expected));
}

#[rstest]
fn default_renderer_output_is_split_per_line(handler_pair: HandlerPair) {
    let HandlerPair { collector, handler } = handler_pair;
    let event = ReportEvent::new(origin(), ReportKind::Crash, json!({"reason": "badarg"}));
    handler.handle(LogEvent::ErrorReport(event)).expect("handle");
    assert!(handler.flush());
    // local0.crit = 16 * 8 + 2
    assert_eq!(
        collector.drain(),
        ["<130>crash report", "<130>{", "<130>  \"reason\": \"badarg\"", "<130>}"]
    );
}

fn identity_encoder(record: &FemtoLogRecord) -> io::Result<Vec<u8>> {
    let mut out = record.byte_order_mark().to_vec();
    out.extend_from_slice(
        format!(
            "{} {} {} {}",
            record.app_name(),
            record.hostname(),
            record.domain(),
            record.message
        )
        .as_bytes(),
    );
    Ok(out)
}

#[rstest]
fn records_carry_identity_and_byte_order_mark() {
    let collector = UdpCollector::bind().expect("bind collector");
    let handler = builder_for(&collector)
        .with_wire_format(WireFormat::Rfc5424)
        .with_encoder(WireFormat::Rfc5424, identity_encoder)
        .with_utf8_bom(true)
        .build_inner()
        .expect("build");
    handler
        .handle(LogEvent::WarningMsg(MessageEvent::text(origin(), "hi")))
        .expect("handle");
    assert!(handler.flush());
    let datagram = collector.recv().expect("datagram");
    let mut expected = ByteOrderMark::Utf8.as_bytes().to_vec();
    expected.extend_from_slice(b"billing db1.example.org example.org hi");
    assert_eq!(datagram, expected);
}

#[rstest]
fn builder_trait_returns_working_handler() {
    let collector = UdpCollector::bind().expect("bind collector");
    let builder: Box<dyn HandlerBuilderTrait> = Box::new(builder_for(&collector));
    let handler: Arc<dyn FemtoHandlerTrait> = Arc::from(builder.build().expect("build"));
    let msg = MessageEvent::new(origin(), "{} jobs queued", vec![json!(12)]);
    handler.handle(LogEvent::InfoMsg(msg)).expect("handle");
    assert!(handler.flush());
    assert_eq!(recv_text(&collector).as_deref(), Some("<14>12 jobs queued"));
}

#[rstest]
fn unresolvable_destination_is_a_build_error() {
    let err = SyslogHandlerBuilder::new()
        .with_destination("collector.invalid", 514)
        .with_encoder(WireFormat::Rfc3164, femtosyslog::test_utils::priority_encoder)
        .build_inner()
        .expect_err("must fail");
    assert!(matches!(err, femtosyslog::HandlerBuildError::InvalidConfig(_)));
}
