//! Network infrastructure — implements `ConnectivityProbe` with a bounded
//! TCP connect.

use std::time::Duration;

use crate::application::ports::{Connectivity, ConnectivityProbe};
use crate::domain::config::ConnectivityConfig;

/// Probes a well-known host by opening (and immediately dropping) a TCP
/// connection. Every failure mode maps to [`Connectivity::Unreachable`].
pub struct TcpConnectivityProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &ConnectivityConfig) -> Self {
        Self::new(config.host.clone(), config.port, config.timeout())
    }
}

impl ConnectivityProbe for TcpConnectivityProbe {
    async fn check(&self) -> Connectivity {
        let target = (self.host.as_str(), self.port);
        let outcome =
            tokio::time::timeout(self.timeout, tokio::net::TcpStream::connect(target)).await;

        let result = match outcome {
            Ok(Ok(_stream)) => Connectivity::Reachable,
            Ok(Err(e)) => Connectivity::Unreachable(e.to_string()),
            Err(_) => Connectivity::Unreachable(format!(
                "no answer within {}s",
                self.timeout.as_secs()
            )),
        };
        tracing::debug!(host = %self.host, port = self.port, ?result, "connectivity probe");
        result
    }
}
