//! Resolution of the handler-wide identity fields.
//!
//! The host, domain, app name and runtime id stamped on every record are
//! derived once when a handler is built. A runtime identifier of the form
//! `app@host.domain` supplies all three names; anything else falls back to
//! the local machine's hostname, an empty domain and [`DEFAULT_APP_NAME`].

use std::process;

use log::warn;

/// App name used when the runtime identifier does not provide one.
pub const DEFAULT_APP_NAME: &str = "femtosyslog";

/// Hostname used when the local hostname cannot be determined.
const FALLBACK_HOSTNAME: &str = "localhost";

/// Identity fields shared by every record of one handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub hostname: String,
    pub domain: String,
    pub app_name: String,
    /// Identifier of the running process instance.
    pub runtime_id: String,
}

impl Identity {
    /// Resolve identity from an optional runtime identifier.
    pub fn resolve(node_name: Option<&str>) -> Self {
        Self::resolve_with(node_name, local_hostname)
    }

    /// Resolve identity using `local` to look up the machine hostname when
    /// the identifier is absent or unnamed.
    pub fn resolve_with(node_name: Option<&str>, local: impl FnOnce() -> String) -> Self {
        let runtime_id = process::id().to_string();
        match node_name.and_then(split_node_name) {
            Some((app, host)) => Self {
                hostname: host.to_owned(),
                domain: domain_of(host).to_owned(),
                app_name: app.to_owned(),
                runtime_id,
            },
            None => Self {
                hostname: local(),
                domain: String::new(),
                app_name: DEFAULT_APP_NAME.to_owned(),
                runtime_id,
            },
        }
    }

    /// Replace the resolved app name.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

fn split_node_name(name: &str) -> Option<(&str, &str)> {
    let (app, host) = name.trim().split_once('@')?;
    if app.is_empty() || host.is_empty() {
        return None;
    }
    Some((app, host))
}

fn domain_of(host: &str) -> &str {
    host.split_once('.').map(|(_, domain)| domain).unwrap_or("")
}

/// Hostname of the local machine.
#[cfg(unix)]
pub fn local_hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => match name.into_string() {
            Ok(name) if !name.is_empty() => name,
            _ => {
                warn!("local hostname is empty or not valid UTF-8; using '{FALLBACK_HOSTNAME}'");
                FALLBACK_HOSTNAME.to_owned()
            }
        },
        Err(err) => {
            warn!("failed to read local hostname: {err}; using '{FALLBACK_HOSTNAME}'");
            FALLBACK_HOSTNAME.to_owned()
        }
    }
}

/// Hostname of the local machine.
#[cfg(not(unix))]
pub fn local_hostname() -> String {
    match std::env::var("COMPUTERNAME") {
        Ok(name) if !name.is_empty() => name,
        _ => {
            warn!("COMPUTERNAME is not set; using '{FALLBACK_HOSTNAME}'");
            FALLBACK_HOSTNAME.to_owned()
        }
    }
}
