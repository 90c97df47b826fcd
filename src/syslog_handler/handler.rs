//! Public handler type exported by the crate.

use std::{
    net::{SocketAddr, UdpSocket},
    thread::JoinHandle,
    time::Duration,
};

use crossbeam_channel::Sender;
use delegate::delegate;
use log::warn;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    backpressure::BackpressureGate,
    encoder::SharedEncoder,
    event::LogEvent,
    handler::{FemtoHandlerTrait, HandlerError},
    handlers::HandlerBuildError,
    identity::Identity,
    log_record::RecordContext,
    pipeline::{Forwarder, HandlerStats, StatsSnapshot},
    report::RecordFactory,
    transport::{UdpTransport, bind_ephemeral},
};

use super::{
    config::SyslogHandlerConfig,
    worker::{ExitSignal, SyslogCommand, flush_queue, spawn_worker},
};

/// Handler forwarding events to a syslog collector over UDP.
///
/// Each instance owns one worker thread and one socket. Events are queued
/// without blocking the caller and processed in submission order. A
/// transport or encoding failure stops the worker; later submissions return
/// [`HandlerError::Closed`] and [`close`](Self::close) reports the cause.
pub struct FemtoSyslogHandler {
    tx: Option<Sender<SyslogCommand>>,
    handle: Mutex<Option<JoinHandle<Result<(), HandlerError>>>>,
    exit: ExitSignal,
    stats: Arc<HandlerStats>,
    destination: SocketAddr,
    flush_timeout: Duration,
}

impl FemtoSyslogHandler {
    /// Attach a handler: resolve identity and destination, then start the
    /// worker.
    ///
    /// When `socket` is `None` an ephemeral socket is bound in the
    /// destination's address family.
    pub fn attach(
        config: SyslogHandlerConfig,
        encoder: SharedEncoder,
        socket: Option<UdpSocket>,
    ) -> Result<Self, HandlerBuildError> {
        let hint = socket.as_ref().and_then(|s| s.local_addr().ok());
        let destination = config.destination.resolve(hint).map_err(|err| {
            HandlerBuildError::InvalidConfig(format!(
                "cannot resolve destination {}: {err}",
                config.destination
            ))
        })?;
        let socket = match socket {
            Some(socket) => socket,
            None => bind_ephemeral(destination)?,
        };

        let mut identity = Identity::resolve(config.node_name.as_deref());
        if let Some(app_name) = &config.app_name {
            identity = identity.with_app_name(app_name.clone());
        }
        let factory = RecordFactory::new(
            RecordContext::new(identity, config.byte_order_mark),
            config.facilities,
            config.renderer.clone(),
        );

        let stats = Arc::new(HandlerStats::new());
        let forwarder = Forwarder::new(
            factory,
            BackpressureGate::new(config.queue_limit),
            UdpTransport::new(socket, destination, encoder),
            Arc::clone(&stats),
        );
        let parts = spawn_worker(forwarder)?;
        Ok(Self {
            tx: Some(parts.tx),
            handle: Mutex::new(Some(parts.handle)),
            exit: parts.exit,
            stats,
            destination,
            flush_timeout: config.flush_timeout,
        })
    }

    /// Resolved collector address.
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Signal that fires when the worker exits.
    pub fn exit_signal(&self) -> ExitSignal {
        self.exit.clone()
    }

    /// Whether the worker is still processing events.
    pub fn is_running(&self) -> bool {
        !self.exit.has_exited()
    }

    delegate! {
        to self.stats {
            /// Snapshot of the handler's counters.
            #[call(snapshot)]
            pub fn stats(&self) -> StatsSnapshot;
        }
    }

    /// Flush any pending events.
    pub fn flush(&self) -> bool {
        <Self as FemtoHandlerTrait>::flush(self)
    }

    /// Detach the handler and wait for the worker to exit.
    ///
    /// Events queued before the call are processed first. Returns the error
    /// that stopped the worker, if any, including a worker panic. Later calls
    /// return `Ok(())`.
    pub fn close(&mut self) -> Result<(), HandlerError> {
        self.tx = None;
        let Some(handle) = self.handle.lock().take() else {
            return Ok(());
        };
        handle.join().unwrap_or(Err(HandlerError::WorkerPanicked))
    }
}

impl FemtoHandlerTrait for FemtoSyslogHandler {
    fn handle(&self, event: LogEvent) -> Result<(), HandlerError> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(HandlerError::Closed);
        };
        tx.send(SyslogCommand::Event(event))
            .map_err(|_| HandlerError::Closed)?;
        self.stats.record_received();
        Ok(())
    }

    fn flush(&self) -> bool {
        let Some(tx) = self.tx.as_ref() else {
            return false;
        };
        flush_queue(tx, self.flush_timeout)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Drop for FemtoSyslogHandler {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("FemtoSyslogHandler closed after failure: {err}");
        }
    }
}

impl std::fmt::Debug for FemtoSyslogHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FemtoSyslogHandler")
            .field("destination", &self.destination)
            .field("flush_timeout", &self.flush_timeout)
            .finish()
    }
}
