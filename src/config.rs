//! Optional per project settings in `project.ini`
//!
//! ```ini
//! [piptool]
//! index_url = https://pypi.org/pypi
//! env_dir = .venv
//! ```

use anyhow::{anyhow, Context};
use configparser::ini::Ini;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "project.ini";
const SECTION: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ProjectConfig {
    pub index_url: Option<String>,
    /// Relative paths are resolved against the project root
    pub env_dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Reads `project.ini` from the project root. A missing file is an empty config
    pub fn load(project_root: &Path) -> anyhow::Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.is_file() {
            debug!("No {} in {}", CONFIG_FILE, project_root.display());
            return Ok(Self::default());
        }
        let mut ini = Ini::new();
        ini.load(&path)
            .map_err(|err| anyhow!(err))
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let get = |key: &str| ini.get(SECTION, key).filter(|value| !value.is_empty());
        Ok(Self {
            index_url: get("index_url"),
            env_dir: get("env_dir").map(|env_dir| project_root.join(env_dir)),
        })
    }
}
