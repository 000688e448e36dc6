//! Authorization configuration consumed by the operation gate.

use serde::Deserialize;

/// Authorization switches for the two request planes.
///
/// Loaded from the host's option map; see [`AuthConfig::from_options`].
/// Defaults follow the management-plane-first posture: console auth on,
/// client auth off, strict modes off.
///
/// # Examples
///
/// ```
/// use policy_linkage::AuthConfig;
///
/// let config = AuthConfig::default();
/// assert!(config.console_auth_enabled);
/// assert!(!config.client_auth_enabled);
/// assert!(config.auth_enabled());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Whether console (management-plane) requests are authorized.
    #[serde(rename = "consoleOpen")]
    pub console_auth_enabled: bool,
    /// Whether client (data-plane) requests are authorized.
    #[serde(rename = "clientOpen")]
    pub client_auth_enabled: bool,
    /// Strict token checking for console requests.
    #[serde(rename = "consoleStrict")]
    pub console_strict: bool,
    /// Strict token checking for client requests.
    #[serde(rename = "clientStrict")]
    pub client_strict: bool,
    /// Deprecated single strict flag. If set, console authorization is
    /// forced on at load time. Use `consoleStrict`/`clientStrict` instead.
    #[serde(rename = "strict")]
    pub legacy_strict: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            console_auth_enabled: true,
            client_auth_enabled: false,
            console_strict: false,
            client_strict: false,
            legacy_strict: false,
        }
    }
}

impl AuthConfig {
    /// Loads the configuration from a JSON option map and applies the
    /// legacy-flag migration.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the option map does not
    /// match the expected shape.
    pub fn from_options(options: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_value(options.clone())?;
        config.migrate_legacy();
        Ok(config)
    }

    /// Applies the deprecated `strict` flag: when set, console
    /// authorization is forced on.
    pub fn migrate_legacy(&mut self) {
        if self.legacy_strict {
            self.console_auth_enabled = true;
        }
    }

    /// Returns `true` if authorization is enabled on at least one plane.
    pub fn auth_enabled(&self) -> bool {
        self.console_auth_enabled || self.client_auth_enabled
    }
}
