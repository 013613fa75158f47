#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration for the Hearth homelab agent.
//!
//! A single [`Config`] covers the approval workflow, the audit trail, the
//! Telegram channel, and the gating registry. Values come from built-in
//! defaults, an optional TOML file, and `HEARTH_*` environment overrides,
//! in that order.
//!
//! # Usage
//!
//! ```rust,no_run
//! use hearth_config::Config;
//!
//! let config = Config::load(None)?;
//! println!("approval timeout: {}s", config.approval.timeout_secs);
//! # Ok::<(), hearth_config::ConfigError>(())
//! ```

mod error;
mod loader;
mod types;

pub use error::{ConfigError, ConfigResult};
pub use types::{
    ApprovalSection, AuditSection, Config, CriticalId, GatingSection, HighestRisk,
    LoggingSection, TelegramSection,
};

impl Config {
    /// Load configuration from the default locations.
    ///
    /// Discovery order: explicit `path`, `$HEARTH_CONFIG`, then
    /// `~/.hearth/config.toml`. A missing discovered file falls back to
    /// defaults; a missing explicit `path` is an error.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a config file is malformed or the final
    /// configuration fails validation.
    pub fn load(path: Option<&std::path::Path>) -> ConfigResult<Self> {
        loader::load(path)
    }
}
