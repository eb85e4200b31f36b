//! Session and cart state kept between invocations.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use grocer_auth::AuthSession;
use grocer_commerce::cart::CartStore;
use serde::{Deserialize, Serialize};

/// Everything the CLI remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// Signed-in session, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<AuthSession>,

    /// Address a sign-in link was last sent to, awaiting `login --verify`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_email: Option<String>,

    /// Cart lines.
    #[serde(default)]
    pub cart: CartStore,
}

impl StoreState {
    /// Load state. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse state file: {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read state file: {}", path.display())),
        }
    }

    /// Write state, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace state file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), lines = self.cart.unique_item_count(), "state saved");
        Ok(())
    }

    /// Forget the session. The cart is kept.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.pending_email = None;
    }
}

/// Default state file location.
pub fn default_state_path() -> PathBuf {
    data_dir().join("grocer").join("state.json")
}

/// Get the platform-specific data directory.
fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_DATA_HOME").filter(|d| !d.is_empty()) {
        PathBuf::from(dir)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}
