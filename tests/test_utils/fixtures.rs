//! Fixtures pairing a loopback collector with a handler that targets it.

use femtosyslog::{
    Facility, FemtoSyslogHandler, SyslogHandlerBuilder, WireFormat,
    test_utils::{UdpCollector, priority_encoder},
};
use rstest::fixture;

/// Collector and handler sharing one loopback port.
pub struct HandlerPair {
    pub collector: UdpCollector,
    pub handler: FemtoSyslogHandler,
}

/// Builder preconfigured for `collector`: `user` facility for normal
/// records, `local0` for errors, `<PRI>message` datagrams.
pub fn builder_for(collector: &UdpCollector) -> SyslogHandlerBuilder {
    SyslogHandlerBuilder::new()
        .with_destination("127.0.0.1", collector.port())
        .with_node_name("billing@db1.example.org")
        .with_facility(Facility::User)
        .with_error_facility(Facility::Local0)
        .with_encoder(WireFormat::Rfc3164, priority_encoder)
}

#[fixture]
pub fn handler_pair() -> HandlerPair {
    let collector = UdpCollector::bind().expect("bind collector");
    let handler = builder_for(&collector).build_inner().expect("build handler");
    HandlerPair { collector, handler }
}

/// Receive the next datagram as text.
pub fn recv_text(collector: &UdpCollector) -> Option<String> {
    collector
        .recv()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
