//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use grocer_auth::{AuthError, AuthSession};
use grocer_storefront::Backend;

use crate::config::{GrocerConfig, CONFIG_NAMES};
use crate::output::Output;
use crate::state::{default_state_path, StoreState};

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with environment overrides applied.
    pub config: GrocerConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config_path, mut config) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, Path::new(path));
                let config = GrocerConfig::load(&path)?;
                (Some(path), config)
            }
            None => match find_config(&cwd)? {
                Some((path, config)) => (Some(path), config),
                None => (None, GrocerConfig::default()),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());

        match &config_path {
            Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
            None => tracing::debug!("no config file found, using defaults"),
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Where session and cart state live.
    pub fn state_path(&self) -> PathBuf {
        match &self.config.session.state_file {
            Some(path) => resolve(&self.cwd, path),
            None => default_state_path(),
        }
    }

    pub fn load_state(&self) -> Result<StoreState> {
        StoreState::load(&self.state_path())
    }

    pub fn save_state(&self, state: &StoreState) -> Result<()> {
        state.save(&self.state_path())
    }

    /// Backend handle built from the configuration.
    pub fn backend(&self) -> Result<Backend> {
        let settings = self.config.backend_settings()?;
        Backend::connect(&settings).context("Failed to set up the backend client")
    }

    /// The stored session, refreshed first if it is about to expire.
    ///
    /// A refreshed session is written back to the state file. A session that
    /// can no longer be refreshed is dropped.
    pub async fn session(&self, backend: &Backend, state: &mut StoreState) -> Result<AuthSession> {
        let Some(session) = state.session.clone() else {
            bail!("Not signed in. Run `grocer login <email>` first.");
        };
        if !session.needs_refresh() {
            return Ok(session);
        }

        let spinner = self.output.spinner("Refreshing session...");
        let result = backend.auth().ensure_fresh(session).await;
        spinner.finish_and_clear();

        match result {
            Ok(fresh) => {
                state.session = Some(fresh.clone());
                self.save_state(state)?;
                Ok(fresh)
            }
            Err(AuthError::SessionExpired) => {
                state.sign_out();
                self.save_state(state)?;
                bail!("Your session has expired. Run `grocer login <email>` to sign in again.")
            }
            Err(e) => Err(e).context("Failed to refresh session"),
        }
    }

    /// Fail unless a session is stored. No network access.
    pub fn require_signed_in(&self, state: &StoreState) -> Result<()> {
        if state.session.is_none() {
            bail!("Not signed in. Run `grocer login <email>` first.");
        }
        Ok(())
    }
}

/// Find config file in directory tree, starting at `start`.
pub fn find_config(start: &Path) -> Result<Option<(PathBuf, GrocerConfig)>> {
    let mut current = Some(start);
    while let Some(dir) = current {
        for name in CONFIG_NAMES {
            let path = dir.join(name);
            if path.is_file() {
                let config = GrocerConfig::load(&path)?;
                return Ok(Some((path, config)));
            }
        }
        current = dir.parent();
    }
    Ok(None)
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("grocer.toml"),
            "[backend]\nurl = \"https://found.example.co\"\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, config) = find_config(&nested).unwrap().unwrap();
        assert_eq!(path, root.path().join("grocer.toml"));
        assert_eq!(config.backend.url, "https://found.example.co");
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("grocer.toml"), "[backend]\nurl = \"outer\"\n").unwrap();
        let inner = root.path().join("inner");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(inner.join(".grocer.toml"), "[backend]\nurl = \"inner\"\n").unwrap();

        let (_, config) = find_config(&inner).unwrap().unwrap();
        assert_eq!(config.backend.url, "inner");
    }

    #[test]
    fn test_find_config_surfaces_parse_errors() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("grocer.json"), "{").unwrap();
        assert!(find_config(root.path()).is_err());
    }

    #[test]
    fn test_state_path_resolution() {
        let cwd = tempfile::tempdir().unwrap();
        let mut ctx = Context {
            config: GrocerConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: cwd.path().to_path_buf(),
        };
        assert_eq!(ctx.state_path(), default_state_path());

        ctx.config.session.state_file = Some(PathBuf::from("state/dev.json"));
        assert_eq!(ctx.state_path(), cwd.path().join("state").join("dev.json"));
    }

    #[test]
    fn test_require_signed_in() {
        let ctx = Context {
            config: GrocerConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: PathBuf::from("/"),
        };
        assert!(ctx.require_signed_in(&StoreState::default()).is_err());
    }
}
