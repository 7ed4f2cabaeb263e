use crate::config::ProjectConfig;
use crate::project_root::discover_project_root;
use crate::srcinfo::{srcinfo, VersionSelector};
use crate::virtualenv::{activate, env_dir};
use clap::{Parser, Subcommand};
use pipinfo::DEFAULT_INDEX_URL;
use std::io::Write;
use tracing::debug;

#[derive(Parser)]
#[clap(name = "piptool", about = "Python project and package index helper")]
pub struct Cli {
    /// Base url of a pypi style json api, `project.ini` `index_url` and then pypi.org otherwise
    #[clap(long, global = true, env = "PIPTOOL_INDEX_URL")]
    pub index_url: Option<String>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print `<name> <version> sha256 <hexdigest> <url>` for the source distribution of a release
    Srcinfo {
        name: String,
        /// An exact version, `latest` or `all`
        #[clap(long, short = 'n', default_value = "latest")]
        version: VersionSelector,
    },
    /// Print all release versions of a package, highest first
    Versions { name: String },
    /// Print the project root directory
    ProjectRoot,
    /// Print the virtual environment directory
    EnvDir,
}

/// Runs a parsed command, writing the report to `out`
pub fn run_cli(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let project_root = discover_project_root()?;
    debug!("Project root: {}", project_root.display());
    let config = ProjectConfig::load(&project_root)?;
    let env_dir = env_dir(&project_root, &config);
    activate(&env_dir);

    let index_url = cli
        .index_url
        .or(config.index_url)
        .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string());
    match cli.command {
        Command::Srcinfo { name, version } => {
            srcinfo(&index_url, &name, &version, out)?;
        }
        Command::Versions { name } => {
            let pip_data = pipinfo::pip_data(&index_url, &name)?;
            for version in pip_data.versions() {
                writeln!(out, "{}", version)?;
            }
        }
        Command::ProjectRoot => writeln!(out, "{}", project_root.display())?,
        Command::EnvDir => writeln!(out, "{}", env_dir.display())?,
    }
    Ok(())
}

/// The exit code of the first [`pipinfo::Error`] in the chain, 1 for everything else
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<pipinfo::Error>())
        .map_or(1, pipinfo::Error::exit_code)
}
