//! Builder for [`FemtoSyslogHandler`](crate::syslog_handler::FemtoSyslogHandler).
//!
//! Exposes destination selection, facility routing, the backpressure limit,
//! wire-format encoders and identity overrides. Settings can also be read
//! from `FEMTOSYSLOG_*` environment variables via [`SyslogHandlerBuilder::from_env`].

use std::{fmt, net::UdpSocket, time::Duration};

use crate::{
    encoder::{EncoderRegistry, SyslogEncoder, WireFormat},
    facility::{Facility, FacilityMap},
    handler::FemtoHandlerTrait,
    log_record::ByteOrderMark,
    render::{ReportRenderer, SharedRenderer},
    syslog_handler::{
        DEFAULT_DEST_HOST, DEFAULT_DEST_PORT, FemtoSyslogHandler, SyslogHandlerConfig,
    },
    transport::UdpDestination,
};

use super::{
    HandlerBuildError, HandlerBuilderTrait,
    common::{ensure_non_zero, parse_flag, parse_value},
};

/// Prefix shared by every environment variable read by [`SyslogHandlerBuilder::from_env`].
pub const ENV_PREFIX: &str = "FEMTOSYSLOG_";

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`FemtoSyslogHandler`] instances.
#[derive(Default)]
pub struct SyslogHandlerBuilder {
    host: Option<String>,
    port: Option<u16>,
    queue_limit: Option<usize>,
    facility: Option<Facility>,
    error_facility: Option<Facility>,
    wire_format: Option<WireFormat>,
    use_bom: bool,
    node_name: Option<String>,
    app_name: Option<String>,
    flush_timeout_ms: Option<u64>,
    socket: Option<UdpSocket>,
    encoders: EncoderRegistry,
    renderer: Option<SharedRenderer>,
}

impl SyslogHandlerBuilder {
    /// Create a builder targeting `localhost:514` with RFC3164 selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder populated from `FEMTOSYSLOG_*` environment variables.
    pub fn from_env() -> Result<Self, HandlerBuildError> {
        Self::from_vars(std::env::vars())
    }

    /// Builder populated from `(key, value)` pairs using the environment
    /// variable names. Keys without the `FEMTOSYSLOG_` prefix are ignored;
    /// unknown prefixed keys are rejected.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, HandlerBuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut builder = Self::new();
        for (key, value) in vars {
            let key = key.as_ref();
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref();
            builder = match name {
                "DEST_HOST" => builder.with_destination_host(value.trim()),
                "DEST_PORT" => builder.with_destination_port(parse_value(key, value)?),
                "PROTOCOL" => builder.with_wire_format(parse_value(key, value)?),
                "FACILITY" => builder.with_facility(parse_value(key, value)?),
                "ERROR_FACILITY" => builder.with_error_facility(parse_value(key, value)?),
                "QUEUE_LIMIT" => builder.with_queue_limit(parse_value(key, value)?),
                "USE_BOM" => builder.with_utf8_bom(parse_flag(key, value)?),
                "APP_NAME" => builder.with_app_name(value.trim()),
                "NODE_NAME" => builder.with_node_name(value.trim()),
                "FLUSH_TIMEOUT_MS" => builder.with_flush_timeout_ms(parse_value(key, value)?),
                _ => {
                    return Err(HandlerBuildError::InvalidConfig(format!(
                        "unknown setting {key}"
                    )));
                }
            };
        }
        Ok(builder)
    }

    /// Set the collector host and port.
    pub fn with_destination(self, host: impl Into<String>, port: u16) -> Self {
        self.with_destination_host(host).with_destination_port(port)
    }

    pub fn with_destination_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    option_setter!(with_destination_port, port, u16);
    option_setter!(
        #[doc = "Pending-queue depth at which informational events are shed."]
        with_queue_limit,
        queue_limit,
        usize
    );
    option_setter!(
        #[doc = "Facility for non-error records."]
        with_facility,
        facility,
        Facility
    );
    option_setter!(
        #[doc = "Facility for `error` and `critical` records."]
        with_error_facility,
        error_facility,
        Facility
    );
    option_setter!(with_wire_format, wire_format, WireFormat);
    option_setter!(with_flush_timeout_ms, flush_timeout_ms, u64);

    /// Prefix messages with a UTF-8 byte-order mark.
    pub fn with_utf8_bom(mut self, enabled: bool) -> Self {
        self.use_bom = enabled;
        self
    }

    /// Runtime identifier (`app@host.domain`) used to derive host, domain and
    /// app name.
    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = Some(node_name.into());
        self
    }

    /// Override the app name derived from the node name.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Send from a pre-opened socket instead of binding an ephemeral one.
    pub fn with_socket(mut self, socket: UdpSocket) -> Self {
        self.socket = Some(socket);
        self
    }

    /// Register the encoder used when `format` is selected.
    pub fn with_encoder<E>(mut self, format: WireFormat, encoder: E) -> Self
    where
        E: SyslogEncoder + 'static,
    {
        self.encoders.register(format, encoder);
        self
    }

    /// Renderer for the verbose text of crash and supervisor reports.
    pub fn with_report_renderer<R>(mut self, renderer: R) -> Self
    where
        R: ReportRenderer + 'static,
    {
        self.renderer = Some(SharedRenderer::new(renderer));
        self
    }

    fn validate(&self) -> Result<(), HandlerBuildError> {
        if self.host.as_deref().is_some_and(|h| h.trim().is_empty()) {
            return Err(HandlerBuildError::InvalidConfig(
                "destination host must not be empty".into(),
            ));
        }
        ensure_non_zero("destination port", self.port)?;
        ensure_non_zero("queue_limit", self.queue_limit)?;
        ensure_non_zero("flush_timeout_ms", self.flush_timeout_ms)?;
        Ok(())
    }

    /// Assemble the handler configuration without attaching.
    pub fn config(&self) -> Result<SyslogHandlerConfig, HandlerBuildError> {
        self.validate()?;
        let defaults = SyslogHandlerConfig::default();
        let facility = self.facility.unwrap_or(defaults.facilities.default);
        let destination = UdpDestination::new(
            self.host.as_deref().unwrap_or(DEFAULT_DEST_HOST),
            self.port.unwrap_or(DEFAULT_DEST_PORT),
        );
        Ok(SyslogHandlerConfig {
            queue_limit: self.queue_limit.unwrap_or(defaults.queue_limit),
            facilities: FacilityMap::new(facility, self.error_facility.unwrap_or(facility)),
            wire_format: self.wire_format.unwrap_or(defaults.wire_format),
            byte_order_mark: if self.use_bom {
                ByteOrderMark::Utf8
            } else {
                ByteOrderMark::None
            },
            node_name: self.node_name.clone(),
            app_name: self.app_name.clone(),
            renderer: self.renderer.clone().unwrap_or(defaults.renderer),
            flush_timeout: self
                .flush_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.flush_timeout),
            ..defaults
        }
        .with_destination(destination))
    }

    /// Build and attach the handler.
    pub fn build_inner(&self) -> Result<FemtoSyslogHandler, HandlerBuildError> {
        let config = self.config()?;
        let encoder = self.encoders.get(config.wire_format).ok_or_else(|| {
            HandlerBuildError::InvalidConfig(format!(
                "no encoder registered for {}",
                config.wire_format
            ))
        })?;
        let socket = self
            .socket
            .as_ref()
            .map(UdpSocket::try_clone)
            .transpose()?;
        FemtoSyslogHandler::attach(config, encoder, socket)
    }
}

impl HandlerBuilderTrait for SyslogHandlerBuilder {
    fn build(&self) -> Result<Box<dyn FemtoHandlerTrait>, HandlerBuildError> {
        Ok(Box::new(self.build_inner()?))
    }
}

impl fmt::Debug for SyslogHandlerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogHandlerBuilder")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("queue_limit", &self.queue_limit)
            .field("facility", &self.facility)
            .field("error_facility", &self.error_facility)
            .field("wire_format", &self.wire_format)
            .field("use_bom", &self.use_bom)
            .field("node_name", &self.node_name)
            .field("app_name", &self.app_name)
            .field("encoders", &self.encoders)
            .finish_non_exhaustive()
    }
}
