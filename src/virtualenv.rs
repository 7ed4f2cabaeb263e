//! Locating and activating the project's virtual environment

use crate::config::ProjectConfig;
use anyhow::{bail, Context};
use fs_err as fs;
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::iter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// `ENV_DIR`, then `env_dir` from `project.ini`, then `<project root>/env`
pub fn env_dir(project_root: &Path, config: &ProjectConfig) -> PathBuf {
    resolve_env_dir(env::var_os("ENV_DIR"), project_root, config)
}

fn resolve_env_dir(
    env_dir_var: Option<OsString>,
    project_root: &Path,
    config: &ProjectConfig,
) -> PathBuf {
    if let Some(env_dir) = env_dir_var.filter(|env_dir| !env_dir.is_empty()) {
        PathBuf::from(env_dir)
    } else if let Some(env_dir) = &config.env_dir {
        env_dir.clone()
    } else {
        project_root.join("env")
    }
}

/// `bin` on unix, `Scripts` on windows
fn scripts_dir(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts")
    } else {
        venv.join("bin")
    }
}

/// Does for this process what `activate_this.py` does for a python process: sets `VIRTUAL_ENV`
/// and puts the environment's scripts first on `PATH`.
///
/// Nothing happens if `VIRTUAL_ENV` is already set or `env_dir` is no virtualenv environment.
/// Returns the activated environment. Activation is best effort, problems are only logged.
pub fn activate(env_dir: &Path) -> Option<PathBuf> {
    if let Some(active) = env::var_os("VIRTUAL_ENV") {
        debug!(
            "Virtual environment already active: {}",
            Path::new(&active).display()
        );
        return None;
    }
    let scripts = scripts_dir(env_dir);
    let activate_this = scripts.join("activate_this.py");
    if !activate_this.is_file() {
        debug!("No virtual environment at {}", env_dir.display());
        return None;
    }
    info!("using {}", activate_this.display());
    match get_venv_python_version(env_dir) {
        Ok((major, minor)) => debug!("Virtual environment python is {}.{}", major, minor),
        Err(err) => debug!("Couldn't determine virtual environment python: {:#}", err),
    }

    let path = env::var_os("PATH").unwrap_or_default();
    let path = match env::join_paths(iter::once(scripts).chain(env::split_paths(&path))) {
        Ok(path) => path,
        Err(err) => {
            warn!(
                "Not activating {}, it can't be put on PATH: {}",
                env_dir.display(),
                err
            );
            return None;
        }
    };
    env::set_var("PATH", path);
    env::set_var("VIRTUAL_ENV", env_dir);
    Some(env_dir.to_path_buf())
}

/// Parse pyvenv.cfg from the root of the virtualenv and returns the python major and minor version
pub fn get_venv_python_version(venv: &Path) -> anyhow::Result<(u8, u8)> {
    let pyvenv_cfg = venv.join("pyvenv.cfg");
    if !pyvenv_cfg.is_file() {
        bail!(
            "The virtual environment needs to have a pyvenv.cfg, but {} doesn't exist",
            pyvenv_cfg.display(),
        );
    }
    get_pyvenv_cfg_python_version(&fs::read_to_string(pyvenv_cfg)?)
}

/// Reads `version_info` (virtualenv) or `version` (venv) from the contents of a pyvenv.cfg
pub fn get_pyvenv_cfg_python_version(pyvenv_cfg: &str) -> anyhow::Result<(u8, u8)> {
    let pyvenv_cfg: HashMap<&str, &str> = pyvenv_cfg
        .lines()
        // Actual pyvenv.cfg doesn't have trailing newlines, but some program might insert some
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
                .with_context(|| format!("Invalid line in pyvenv.cfg: {}", line))
        })
        .collect::<anyhow::Result<_>>()?;

    let version_info = pyvenv_cfg
        .get("version_info")
        .or_else(|| pyvenv_cfg.get("version"))
        .context("Missing version_info in pyvenv.cfg")?;
    match version_info.split('.').collect::<Vec<_>>()[..] {
        [major, minor, ..] => Ok((
            major
                .parse()
                .context("Invalid major version_info in pyvenv.cfg")?,
            minor
                .parse()
                .context("Invalid minor version_info in pyvenv.cfg")?,
        )),
        _ => bail!("Invalid version_info in pyvenv.cfg: {}", version_info),
    }
}
