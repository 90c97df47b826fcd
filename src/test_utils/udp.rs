//! Loopback UDP collector and a minimal encoder for datagram assertions.

use std::{
    io,
    net::{SocketAddr, UdpSocket},
    time::Duration,
};

use crate::log_record::FemtoLogRecord;

/// Encoder producing `<PRI>message`, enough to assert routing and ordering.
pub fn priority_encoder(record: &FemtoLogRecord) -> io::Result<Vec<u8>> {
    Ok(format!("<{}>{}", record.priority(), record.message).into_bytes())
}

/// Loopback socket standing in for a syslog collector.
pub struct UdpCollector {
    socket: UdpSocket,
}

impl UdpCollector {
    /// Bind on `127.0.0.1` with an ephemeral port.
    pub fn bind() -> io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0")?;
        socket.set_read_timeout(Some(Duration::from_millis(250)))?;
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn port(&self) -> u16 {
        self.local_addr().map(|addr| addr.port()).unwrap_or_default()
    }

    /// Receive one datagram, or `None` once the read timeout elapses.
    pub fn recv(&self) -> Option<Vec<u8>> {
        let mut buf = vec![0u8; 65_536];
        let n = self.socket.recv(&mut buf).ok()?;
        buf.truncate(n);
        Some(buf)
    }

    /// Drain datagrams until the read timeout elapses, decoded lossily.
    pub fn drain(&self) -> Vec<String> {
        std::iter::from_fn(|| self.recv())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .collect()
    }
}
