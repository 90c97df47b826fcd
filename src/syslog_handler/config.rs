//! Configuration consumed by the syslog handler lifecycle.
//!
//! [`SyslogHandlerBuilder`](crate::handlers::SyslogHandlerBuilder) validates
//! user input and produces these values before passing them to
//! [`FemtoSyslogHandler::attach`](super::FemtoSyslogHandler::attach).

use std::time::Duration;

use crate::{
    backpressure::DEFAULT_QUEUE_LIMIT,
    encoder::WireFormat,
    facility::FacilityMap,
    log_record::ByteOrderMark,
    render::SharedRenderer,
    transport::UdpDestination,
};

/// Default collector host.
pub const DEFAULT_DEST_HOST: &str = "localhost";
/// Default collector port.
pub const DEFAULT_DEST_PORT: u16 = 514;
/// Default time `flush` waits for the worker to acknowledge.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Settings fixed for the lifetime of one handler.
#[derive(Clone, Debug)]
pub struct SyslogHandlerConfig {
    pub destination: UdpDestination,
    /// Pending-queue depth at which informational events are shed.
    pub queue_limit: usize,
    pub facilities: FacilityMap,
    pub wire_format: WireFormat,
    pub byte_order_mark: ByteOrderMark,
    /// Runtime identifier (`app@host.domain`) used to resolve identity.
    pub node_name: Option<String>,
    /// Overrides the app name derived from `node_name`.
    pub app_name: Option<String>,
    pub renderer: SharedRenderer,
    pub flush_timeout: Duration,
}

impl Default for SyslogHandlerConfig {
    fn default() -> Self {
        Self {
            destination: UdpDestination::new(DEFAULT_DEST_HOST, DEFAULT_DEST_PORT),
            queue_limit: DEFAULT_QUEUE_LIMIT,
            facilities: FacilityMap::default(),
            wire_format: WireFormat::default(),
            byte_order_mark: ByteOrderMark::default(),
            node_name: None,
            app_name: None,
            renderer: SharedRenderer::default(),
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
        }
    }
}

impl SyslogHandlerConfig {
    /// Override the destination.
    pub fn with_destination(mut self, destination: UdpDestination) -> Self {
        self.destination = destination;
        self
    }
}
