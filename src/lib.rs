//! Forward log events to a remote syslog collector over UDP.
//!
//! Events are submitted to a [`FemtoSyslogHandler`], which normalises them
//! into [`FemtoLogRecord`]s on a dedicated worker thread and sends each line
//! as one datagram. Informational events are shed once the pending queue
//! reaches its limit; errors and warnings are always forwarded.

pub mod backpressure;
pub mod classifier;
pub mod encoder;
pub mod event;
pub mod facility;
pub mod handler;
pub mod handlers;
pub mod identity;
#[cfg(feature = "log-compat")]
pub mod log_compat;
pub mod log_record;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod severity;
pub mod splitter;
pub mod syslog_handler;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use backpressure::{BackpressureGate, DEFAULT_QUEUE_LIMIT};
pub use encoder::{EncoderRegistry, SharedEncoder, SyslogEncoder, WireFormat};
pub use event::{LogEvent, MessageEvent, Origin, ReportEvent, ReportKind};
pub use facility::{Facility, FacilityMap};
pub use handler::{FemtoHandlerTrait, HandlerError, SymbolError};
pub use handlers::{HandlerBuildError, HandlerBuilderTrait, SyslogHandlerBuilder};
pub use identity::{DEFAULT_APP_NAME, Identity};
#[cfg(feature = "log-compat")]
pub use log_compat::{FemtoLogAdapter, install_global_logger};
pub use log_record::{ByteOrderMark, FemtoLogRecord, RecordContext};
pub use pipeline::{HandlerStats, StatsSnapshot};
pub use render::{PrettyReportRenderer, ReportRenderer, SharedRenderer};
pub use severity::Severity;
pub use syslog_handler::{ExitSignal, FemtoSyslogHandler, SyslogHandlerConfig};
pub use transport::UdpDestination;
