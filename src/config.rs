//! Runtime configuration loaded from a JSON file.
//!
//! The file (`cfg.json` by default) carries the mail relay coordinates, the
//! recipient list, and an optional translation API key:
//!
//! ```json
//! {
//!     "mailer": {
//!         "server": "smtp.example.com",
//!         "port": 465,
//!         "sender": "newsletter@example.com"
//!     },
//!     "sendto": ["fan@example.com"],
//!     "translate-key": "trnsl.1.1...."
//! }
//! ```
//!
//! The settings are validated once at startup and treated as immutable for
//! the rest of the run. Any violation is fatal: the process reports the
//! problem and does not proceed.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Validated runtime settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Mail relay coordinates and sender address.
    pub mailer: MailerSettings,
    /// Recipient list. Non-empty, entries unique.
    pub sendto: Vec<String>,
    /// Yandex translate API key. Translation is skipped when absent.
    #[serde(rename = "translate-key")]
    pub translate_key: Option<String>,
}

/// The `mailer` section of the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailerSettings {
    /// Hostname of the SMTP relay.
    pub server: String,
    /// Port of the SMTP relay (implicit TLS, typically 465).
    pub port: u16,
    /// Sender address, also used as the login name.
    pub sender: String,
}

impl Settings {
    /// Load and validate settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, is not valid JSON, or
    /// violates the constraints checked by [`Settings::validate`].
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.mailer.server.trim().is_empty() {
            return Err(AppError::Config("mailer.server must not be empty".to_string()));
        }
        if self.mailer.sender.trim().is_empty() {
            return Err(AppError::Config("mailer.sender must not be empty".to_string()));
        }
        if self.sendto.is_empty() {
            return Err(AppError::Config(
                "sendto must list at least one recipient".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for addr in &self.sendto {
            if addr.trim().is_empty() {
                return Err(AppError::Config("sendto entries must not be empty".to_string()));
            }
            if !seen.insert(addr.as_str()) {
                return Err(AppError::Config(format!("duplicate recipient: {addr}")));
            }
        }
        if let Some(key) = &self.translate_key {
            if key.trim().is_empty() {
                return Err(AppError::Config(
                    "translate-key must not be empty when present".to_string(),
                ));
            }
        }
        Ok(())
    }
}
