//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use grocer_commerce::checkout::DeliveryOptions;
use grocer_commerce::Currency;
use grocer_storefront::BackendSettings;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["grocer.toml", ".grocer.toml", "grocer.json"];

/// Environment variable overriding `backend.url`.
pub const ENV_BACKEND_URL: &str = "GROCER_BACKEND_URL";
/// Environment variable overriding `backend.anon_key`.
pub const ENV_ANON_KEY: &str = "GROCER_ANON_KEY";

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrocerConfig {
    /// Hosted backend.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Sign-in settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Storefront settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Local session state.
    #[serde(default)]
    pub session: SessionConfig,
}

impl GrocerConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Apply `GROCER_*` overrides. `lookup` is normally `std::env::var`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.url = url;
        }
        if let Some(key) = lookup(ENV_ANON_KEY).filter(|v| !v.trim().is_empty()) {
            self.backend.anon_key = key;
        }
    }

    /// Settings for reaching the backend. Fails when url or key is missing.
    pub fn backend_settings(&self) -> Result<BackendSettings> {
        if self.backend.url.trim().is_empty() {
            bail!("backend.url is not set. Add it to grocer.toml or set {ENV_BACKEND_URL}.");
        }
        if self.backend.anon_key.trim().is_empty() {
            bail!("backend.anon_key is not set. Add it to grocer.toml or set {ENV_ANON_KEY}.");
        }

        let mut settings = BackendSettings::new(self.backend.url.trim(), self.backend.anon_key.trim());
        settings.request_timeout = Duration::from_secs(self.backend.request_timeout_secs);
        settings.redirect_url = self.auth.redirect_url.clone();
        Ok(settings)
    }

    pub fn delivery_options(&self) -> DeliveryOptions {
        DeliveryOptions {
            hostels: self.store.hostels.clone(),
            locations: self.store.locations.clone(),
        }
    }

    /// Problems found in the config, split into errors and warnings.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let url = self.backend.url.trim();
        if url.is_empty() {
            errors.push("backend.url is required".to_string());
        } else if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.push(format!("backend.url '{url}' must start with http:// or https://"));
        } else if url.starts_with("http://") && !is_local(url) {
            warnings.push("backend.url uses plain http".to_string());
        }

        if self.backend.anon_key.trim().is_empty() {
            errors.push("backend.anon_key is required".to_string());
        }

        if self.backend.request_timeout_secs == 0 {
            errors.push("backend.request_timeout_secs must be at least 1".to_string());
        }

        if self.store.hostels.is_empty() {
            errors.push("store.hostels must list at least one hostel".to_string());
        }
        if self.store.locations.is_empty() {
            errors.push("store.locations must list at least one location".to_string());
        }

        if self.auth.redirect_url.is_none() {
            warnings.push(
                "auth.redirect_url is not set; sign-in links use the backend's default site URL"
                    .to_string(),
            );
        }

        (errors, warnings)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn is_local(url: &str) -> bool {
    let host = url.trim_start_matches("http://");
    host.starts_with("localhost") || host.starts_with("127.0.0.1")
}

/// Hosted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL.
    #[serde(default)]
    pub url: String,

    /// Public anon key.
    #[serde(default)]
    pub anon_key: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where sign-in links send the browser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Storefront settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Currency prices are shown in.
    #[serde(default)]
    pub currency: Currency,

    /// Hostels offered at checkout.
    #[serde(default = "default_hostels")]
    pub hostels: Vec<String>,

    /// Locations offered at checkout.
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,
}

fn default_hostels() -> Vec<String> {
    DeliveryOptions::default().hostels
}

fn default_locations() -> Vec<String> {
    DeliveryOptions::default().locations
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            hostels: default_hostels(),
            locations: default_locations(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where the session and cart are kept. Defaults to the user data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

/// Generate a default grocer.toml config file.
pub fn generate_default_config() -> String {
    r#"# GroceryGo storefront configuration

[backend]
# Project URL and public anon key of the hosted backend.
# Either can also come from GROCER_BACKEND_URL / GROCER_ANON_KEY.
url = "https://your-project.supabase.co"
anon_key = ""
request_timeout_secs = 15

[auth]
# redirect_url = "https://your-storefront.example.app/"

[store]
currency = "USD"
hostels = ["1", "2", "3"]
locations = ["Loc1", "Loc2", "Loc3"]

[session]
# state_file = "/path/to/state.json"
"#
    .to_string()
}
