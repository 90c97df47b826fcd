//! Worker thread driving the forwarding pipeline.
//!
//! The worker owns the [`Forwarder`] (and with it the UDP socket) and
//! processes queued commands strictly in order. It stops when every sender
//! is dropped or when forwarding fails; a failure is never retried.

use std::{
    io,
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use log::error;

use crate::{event::LogEvent, handler::HandlerError, pipeline::Forwarder};

const WORKER_THREAD_NAME: &str = "femtosyslog-worker";

/// Commands processed by the worker thread.
#[derive(Debug)]
pub enum SyslogCommand {
    Event(LogEvent),
    Flush(Sender<()>),
}

/// Observes the exit of a handler's worker.
///
/// The worker holds the only sender of the underlying channel; once it
/// exits, for any reason, every clone of the signal reports the exit.
#[derive(Clone, Debug)]
pub struct ExitSignal {
    rx: Receiver<()>,
}

impl ExitSignal {
    /// Whether the worker has already exited.
    pub fn has_exited(&self) -> bool {
        matches!(
            self.rx.recv_timeout(Duration::ZERO),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    /// Block until the worker exits or `timeout` elapses. Returns whether it
    /// exited.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        matches!(
            self.rx.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    /// Block until the worker exits.
    pub fn wait(&self) {
        while self.rx.recv().is_ok() {}
    }
}

pub(crate) struct WorkerParts {
    pub(crate) tx: Sender<SyslogCommand>,
    pub(crate) handle: JoinHandle<Result<(), HandlerError>>,
    pub(crate) exit: ExitSignal,
}

pub(crate) fn spawn_worker(forwarder: Forwarder) -> io::Result<WorkerParts> {
    let (tx, rx) = unbounded();
    let (exit_tx, exit_rx) = bounded::<()>(0);
    let handle = thread::Builder::new()
        .name(WORKER_THREAD_NAME.into())
        .spawn(move || {
            let result = worker_loop(&rx, &forwarder);
            // Close the queue before signalling so producers observe the exit.
            drop(rx);
            drop(forwarder);
            if let Err(err) = &result {
                error!("FemtoSyslogHandler worker stopped: {err}");
            }
            drop(exit_tx);
            result
        })?;
    Ok(WorkerParts {
        tx,
        handle,
        exit: ExitSignal { rx: exit_rx },
    })
}

fn worker_loop(rx: &Receiver<SyslogCommand>, forwarder: &Forwarder) -> Result<(), HandlerError> {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            SyslogCommand::Event(event) => {
                // Snapshot of the events still queued behind this one.
                let backlog = rx.len();
                forwarder.forward(&event, backlog)?;
            }
            SyslogCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    Ok(())
}

/// Ask the worker to acknowledge once everything queued before is processed.
pub fn flush_queue(tx: &Sender<SyslogCommand>, timeout: Duration) -> bool {
    let (ack_tx, ack_rx) = bounded(1);
    if tx
        .send_timeout(SyslogCommand::Flush(ack_tx), timeout)
        .is_err()
    {
        return false;
    }
    ack_rx.recv_timeout(timeout).is_ok()
}
