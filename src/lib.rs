pub use cli::{exit_code, run_cli, Cli, Command};
pub use config::ProjectConfig;
pub use project_root::{discover_project_root, find_project_root, PROJECT_MARKERS};
pub use srcinfo::{select_source_infos, srcinfo, SourceInfo, VersionSelector};
pub use utils::assert_cli_error;
pub use virtualenv::{activate, env_dir, get_venv_python_version};

mod cli;
mod config;
mod project_root;
mod srcinfo;
mod utils;
mod virtualenv;
