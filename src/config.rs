use anyhow::{bail, Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "molecule-finder";
const CONFIG_FILE: &str = "config.json";

const DEFAULT_USER_AGENT: &str =
    "MoleculeFinder/0.1 (https://github.com/molecule-finder/molecule-finder)";
const DEFAULT_PUBCHEM_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub server: ServerConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Settings shared by the external clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Sent on every outbound request. Wikimedia rejects anonymous agents.
    pub user_agent: String,
    /// Wikipedia language edition, e.g. `en`.
    pub wikipedia_language: String,
    pub timeout_secs: u64,
    pub pubchem_base_url: String,
    /// Full `api.php` URL. Overrides `wikipedia_language` when set.
    pub wikipedia_base_url: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            wikipedia_language: "en".to_string(),
            timeout_secs: 10,
            pubchem_base_url: DEFAULT_PUBCHEM_URL.to_string(),
            wikipedia_base_url: None,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn wikipedia_api_url(&self) -> String {
        match &self.wikipedia_base_url {
            Some(url) => url.clone(),
            None => format!("https://{}.wikipedia.org/w/api.php", self.wikipedia_language),
        }
    }
}

impl FinderConfig {
    /// Load defaults, then the config file, then `MOLFINDER_*` environment
    /// variables. A missing file is not an error; an unreadable one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().ok(),
        };

        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply overrides from a variable source, normally the process
    /// environment.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(agent) = var("MOLFINDER_USER_AGENT") {
            self.lookup.user_agent = agent;
        }
        if let Some(lang) = var("MOLFINDER_WIKI_LANG") {
            self.lookup.wikipedia_language = lang;
        }
        if let Some(secs) = var("MOLFINDER_TIMEOUT_SECS") {
            self.lookup.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("MOLFINDER_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        if let Some(url) = var("MOLFINDER_PUBCHEM_URL") {
            self.lookup.pubchem_base_url = url;
        }
        if let Some(url) = var("MOLFINDER_WIKIPEDIA_URL") {
            self.lookup.wikipedia_base_url = Some(url);
        }
        if let Some(host) = var("MOLFINDER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("MOLFINDER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("MOLFINDER_PORT is not a port number: {}", port))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookup.user_agent.trim().is_empty() {
            bail!("user_agent must not be empty");
        }
        if self.lookup.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.lookup.wikipedia_language.trim().is_empty() {
            bail!("wikipedia_language must not be empty");
        }
        Ok(())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
