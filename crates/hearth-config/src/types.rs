//! Configuration types.
//!
//! Domain types are deliberately not imported here: sections mirror them
//! with plain strings and numbers, and the consuming crates convert at the
//! boundary. This keeps the config crate free of internal dependencies.

use serde::ser::SerializeStruct as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unified configuration for the Hearth agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Approval workflow settings.
    pub approval: ApprovalSection,
    /// Audit trail settings.
    pub audit: AuditSection,
    /// Telegram approval channel settings.
    pub telegram: TelegramSection,
    /// Which resources require approval before remediation.
    pub gating: GatingSection,
    /// Logging filter settings.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// ApprovalSection
// ---------------------------------------------------------------------------

/// Approval workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalSection {
    /// How long to wait for a human decision before auto-rejecting, in
    /// seconds.
    pub timeout_secs: u64,
}

impl Default for ApprovalSection {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

// ---------------------------------------------------------------------------
// AuditSection
// ---------------------------------------------------------------------------

/// Audit trail settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Path to the on-disk JSONL audit log. `None` means in-memory only.
    pub path: Option<String>,
}

// ---------------------------------------------------------------------------
// TelegramSection
// ---------------------------------------------------------------------------

/// Telegram approval channel configuration.
///
/// Both fields must be set for the channel to be constructed; leaving both
/// unset runs the agent without an approval channel (critical actions are
/// then allowed by the fail-open rule). Setting only one is a validation
/// error.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramSection {
    /// Telegram Bot API token (from `@BotFather`).
    /// Prefer environment variables over storing this in a file.
    pub bot_token: Option<String>,
    /// Chat the bot prompts in and accepts replies from.
    pub chat_id: Option<i64>,
}

impl TelegramSection {
    /// Whether both credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

impl std::fmt::Debug for TelegramSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSection")
            .field("has_bot_token", &self.bot_token.is_some())
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Serialize for TelegramSection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TelegramSection", 1)?;
        // bot_token is intentionally omitted (secret).
        state.serialize_field("chat_id", &self.chat_id)?;
        state.end()
    }
}

// ---------------------------------------------------------------------------
// GatingSection
// ---------------------------------------------------------------------------

/// Which resources require approval before remediation.
///
/// Keys of `critical` are resource category names (`lxc`, `vm`, `docker`,
/// `database`, `dns`, `network`); values list the protected identifiers.
/// Unknown category names are rejected when the registry is built.
///
/// ```toml
/// [gating.critical]
/// lxc = [200, 201]
/// docker = ["postgres"]
///
/// [gating.highest_risk]
/// category = "lxc"
/// id = 200
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingSection {
    /// Protected resources per category.
    pub critical: HashMap<String, Vec<CriticalId>>,
    /// The single most sensitive resource; its prompts escalate to
    /// critical severity.
    pub highest_risk: Option<HighestRisk>,
}

/// A protected resource identifier: numeric VMID or symbolic name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriticalId {
    /// Numeric identifier (e.g. a Proxmox VMID).
    Num(u64),
    /// Symbolic name (e.g. a Docker container name).
    Name(String),
}

/// The single most sensitive resource in the lab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestRisk {
    /// Resource category name.
    pub category: String,
    /// Resource identifier.
    pub id: CriticalId,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Tracing filter directive, e.g. `"info"` or `"warn,hearth=debug"`.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.approval.timeout_secs, 300);
        assert_eq!(config.audit.path, None);
        assert!(!config.telegram.is_configured());
        assert!(config.gating.critical.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_telegram_debug_hides_token() {
        let section = TelegramSection {
            bot_token: Some("123456:secret".to_string()),
            chat_id: Some(42),
        };
        let debug = format!("{section:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("has_bot_token: true"));
    }

    #[test]
    fn test_telegram_serialize_omits_token() {
        let section = TelegramSection {
            bot_token: Some("123456:secret".to_string()),
            chat_id: Some(42),
        };
        let toml = toml::to_string(&section).unwrap();
        assert!(!toml.contains("secret"));
        assert!(toml.contains("chat_id"));
    }

    #[test]
    fn test_gating_section_parses_mixed_ids() {
        let toml = r#"
            [critical]
            lxc = [200, 201]
            docker = ["postgres", "unifi"]

            [highest_risk]
            category = "lxc"
            id = 200
        "#;
        let section: GatingSection = toml::from_str(toml).unwrap();
        assert_eq!(
            section.critical["lxc"],
            vec![CriticalId::Num(200), CriticalId::Num(201)]
        );
        assert_eq!(
            section.critical["docker"],
            vec![
                CriticalId::Name("postgres".to_string()),
                CriticalId::Name("unifi".to_string())
            ]
        );
        let highest = section.highest_risk.unwrap();
        assert_eq!(highest.category, "lxc");
        assert_eq!(highest.id, CriticalId::Num(200));
    }
}
