use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest SSID permitted by 802.11, in bytes.
pub const MAX_SSID_BYTES: usize = 32;
/// WPA-PSK passphrase length bounds, in characters.
pub const MIN_PASSPHRASE_LEN: usize = 8;
pub const MAX_PASSPHRASE_LEN: usize = 63;

/// Why operator-supplied credentials were rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("SSID must not be empty")]
    EmptySsid,

    #[error("SSID is {0} bytes; at most 32 are allowed")]
    SsidTooLong(usize),

    #[error("passphrase must be 8 to 63 characters, got {0}")]
    PassphraseLength(usize),

    #[error("SSID and passphrase must not contain control characters")]
    ControlCharacter,
}

/// Target network credentials submitted by an operator.
///
/// Field names follow the JSON body accepted by `POST /api/enable_wifi`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCredentials {
    #[serde(rename = "wifi_ssid")]
    pub ssid: String,
    /// Empty for open networks.
    #[serde(rename = "wifi_passcode", default)]
    pub passphrase: String,
}

impl std::fmt::Debug for NetworkCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkCredentials")
            .field("ssid", &self.ssid)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

impl NetworkCredentials {
    #[must_use]
    pub fn new(ssid: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Returns `true` when no passphrase was supplied.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.passphrase.is_empty()
    }

    /// Checks the credentials against 802.11 / WPA limits.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.ssid.is_empty() {
            return Err(CredentialsError::EmptySsid);
        }
        if self.ssid.len() > MAX_SSID_BYTES {
            return Err(CredentialsError::SsidTooLong(self.ssid.len()));
        }
        if self.ssid.chars().chain(self.passphrase.chars()).any(char::is_control) {
            return Err(CredentialsError::ControlCharacter);
        }
        if !self.is_open() {
            let len = self.passphrase.chars().count();
            if !(MIN_PASSPHRASE_LEN..=MAX_PASSPHRASE_LEN).contains(&len) {
                return Err(CredentialsError::PassphraseLength(len));
            }
        }
        Ok(())
    }
}

/// Encryption advertised by a scanned network.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Security {
    #[default]
    Open,
    Wep,
    Wpa,
    Wpa2,
}

/// A network visible from the device's radio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WifiNetwork {
    pub ssid: String,
    /// Signal strength in dBm, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_dbm: Option<f32>,
    pub security: Security,
}

/// Body of `GET /api/rescan_wifi`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanResponse {
    pub networks: Vec<WifiNetwork>,
}

/// Body of a successful `POST /api/enable_wifi`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnableResponse {
    pub status: String,
}

/// Body returned with any 4xx/5xx from the configuration API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
}
