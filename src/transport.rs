//! UDP transport for encoded records.

use std::{
    fmt, io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
};

use crate::{encoder::SharedEncoder, handler::HandlerError, log_record::FemtoLogRecord};

/// Remote collector address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UdpDestination {
    /// Hostname or IP address of the collector.
    pub host: String,
    /// UDP port number.
    pub port: u16,
}

impl UdpDestination {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    fn socket_addrs(&self) -> io::Result<Vec<SocketAddr>> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map(|iter| iter.collect())
    }

    /// Resolve to one address, preferring `family_hint`'s address family.
    pub fn resolve(&self, family_hint: Option<SocketAddr>) -> io::Result<SocketAddr> {
        let addrs = self.socket_addrs()?;
        let preferred = family_hint.and_then(|hint| {
            addrs
                .iter()
                .find(|addr| addr.is_ipv4() == hint.is_ipv4())
                .copied()
        });
        preferred.or_else(|| addrs.first().copied()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}:{} resolved to no addresses", self.host, self.port),
            )
        })
    }
}

impl fmt::Display for UdpDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Bind an ephemeral socket in the address family of `destination`.
pub fn bind_ephemeral(destination: SocketAddr) -> io::Result<UdpSocket> {
    let local: SocketAddr = if destination.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    UdpSocket::bind(local)
}

/// Encodes records and sends each as a single datagram.
pub struct UdpTransport {
    socket: UdpSocket,
    destination: SocketAddr,
    encoder: SharedEncoder,
}

impl UdpTransport {
    pub fn new(socket: UdpSocket, destination: SocketAddr, encoder: SharedEncoder) -> Self {
        Self {
            socket,
            destination,
            encoder,
        }
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Encode `record` and send it. No retry is attempted on failure.
    pub fn send(&self, record: &FemtoLogRecord) -> Result<(), HandlerError> {
        let payload = self.encoder.encode(record).map_err(HandlerError::Encode)?;
        let written = self
            .socket
            .send_to(&payload, self.destination)
            .map_err(HandlerError::Transport)?;
        if written != payload.len() {
            return Err(HandlerError::Transport(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {written} of {} bytes", payload.len()),
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UdpTransport")
            .field("destination", &self.destination)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        facility::Facility,
        identity::Identity,
        log_record::{ByteOrderMark, RecordContext},
        severity::Severity,
    };

    fn record(message: &str) -> FemtoLogRecord {
        let identity = Identity::resolve_with(Some("app@host"), String::new);
        FemtoLogRecord::new(
            Arc::new(RecordContext::new(identity, ByteOrderMark::None)),
            Severity::Notice,
            Facility::User,
            "origin",
            message,
        )
    }

    fn message_encoder() -> SharedEncoder {
        Arc::new(|record: &FemtoLogRecord| -> io::Result<Vec<u8>> {
            Ok(record.message.clone().into_bytes())
        })
    }

    #[test]
    fn resolves_loopback_destination() {
        let addr = UdpDestination::new("127.0.0.1", 5514)
            .resolve(None)
            .expect("resolve loopback");
        assert_eq!(addr, "127.0.0.1:5514".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn prefers_hinted_address_family() {
        let hint: SocketAddr = "[::1]:0".parse().unwrap();
        let addr = UdpDestination::new("127.0.0.1", 514)
            .resolve(Some(hint))
            .expect("resolve");
        assert!(addr.is_ipv4(), "falls back to the only family available");
    }

    #[test]
    fn sends_one_datagram_per_record() {
        let receiver = UdpSocket::bind("127.0.0.1:0").expect("bind receiver");
        receiver
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("set timeout");
        let destination = receiver.local_addr().expect("receiver addr");
        let socket = bind_ephemeral(destination).expect("bind sender");
        let transport = UdpTransport::new(socket, destination, message_encoder());

        transport.send(&record("first")).expect("send first");
        transport.send(&record("second")).expect("send second");

        let mut buf = [0u8; 64];
        let n = receiver.recv(&mut buf).expect("recv first");
        assert_eq!(&buf[..n], b"first");
        let n = receiver.recv(&mut buf).expect("recv second");
        assert_eq!(&buf[..n], b"second");
    }

    #[test]
    fn encoder_failure_is_reported() {
        let destination: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let socket = bind_ephemeral(destination).expect("bind sender");
        let encoder: SharedEncoder = Arc::new(|_: &FemtoLogRecord| -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "unencodable"))
        });
        let transport = UdpTransport::new(socket, destination, encoder);
        let err = transport.send(&record("x")).unwrap_err();
        assert!(matches!(err, HandlerError::Encode(_)));
    }

    #[test]
    fn send_failure_is_reported() {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind v4 sender");
        let destination: SocketAddr = "[::1]:514".parse().unwrap();
        let transport = UdpTransport::new(socket, destination, message_encoder());
        let err = transport.send(&record("x")).unwrap_err();
        assert!(matches!(err, HandlerError::Transport(_)));
    }
}
