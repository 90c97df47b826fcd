//! Pluggable wire-format encoders.
//!
//! The byte layout of each syslog protocol variant is supplied by the caller
//! as a [`SyslogEncoder`]. A handler registers one encoder per
//! [`WireFormat`] and uses the one matching its configured format.

use std::{collections::HashMap, fmt, io, str::FromStr, sync::Arc};

use crate::{handler::SymbolError, log_record::FemtoLogRecord};

/// Serialises a record into the bytes of one datagram.
pub trait SyslogEncoder: Send + Sync {
    fn encode(&self, record: &FemtoLogRecord) -> io::Result<Vec<u8>>;
}

impl<F> SyslogEncoder for F
where
    F: Fn(&FemtoLogRecord) -> io::Result<Vec<u8>> + Send + Sync,
{
    fn encode(&self, record: &FemtoLogRecord) -> io::Result<Vec<u8>> {
        self(record)
    }
}

/// Syslog protocol variant selecting the encoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WireFormat {
    /// BSD syslog.
    #[default]
    Rfc3164,
    /// IETF syslog.
    Rfc5424,
}

impl WireFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            WireFormat::Rfc3164 => "rfc3164",
            WireFormat::Rfc5424 => "rfc5424",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireFormat {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rfc3164" => Ok(Self::Rfc3164),
            "rfc5424" => Ok(Self::Rfc5424),
            _ => Err(SymbolError::UnknownWireFormat(s.to_owned())),
        }
    }
}

/// Shared encoder trait object.
pub type SharedEncoder = Arc<dyn SyslogEncoder>;

/// Encoders registered per wire format.
#[derive(Clone, Default)]
pub struct EncoderRegistry {
    encoders: HashMap<WireFormat, SharedEncoder>,
}

impl EncoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `encoder` for `format`, replacing any previous registration.
    pub fn register<E>(&mut self, format: WireFormat, encoder: E)
    where
        E: SyslogEncoder + 'static,
    {
        self.encoders.insert(format, Arc::new(encoder));
    }

    pub fn get(&self, format: WireFormat) -> Option<SharedEncoder> {
        self.encoders.get(&format).cloned()
    }
}

impl fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.encoders.keys()).finish()
    }
}
