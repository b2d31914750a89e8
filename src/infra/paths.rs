// src/infra/paths.rs — Path management
//
// All paths respect the RALPH_HOME environment variable for isolation.
// When RALPH_HOME is set, config and data live under that directory.
// When unset, config uses ~/.ralph/ and data uses the XDG data dir.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static PROJECT_DIRS: OnceLock<ProjectDirs> = OnceLock::new();

fn project_dirs() -> &'static ProjectDirs {
    PROJECT_DIRS.get_or_init(|| {
        ProjectDirs::from("", "", "ralph").expect("Could not determine home directory")
    })
}

/// Returns the RALPH_HOME override, if set.
fn ralph_home() -> Option<PathBuf> {
    std::env::var_os("RALPH_HOME").map(PathBuf::from)
}

/// Configuration directory: $RALPH_HOME/ or ~/.ralph/
pub fn config_dir() -> PathBuf {
    if let Some(home) = ralph_home() {
        return home;
    }
    dirs_home().join(".ralph")
}

/// Data directory: $RALPH_HOME/data/ or XDG_DATA_HOME/ralph
pub fn data_dir() -> PathBuf {
    if let Some(home) = ralph_home() {
        return home.join("data");
    }
    project_dirs().data_local_dir().to_path_buf()
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Database path
pub fn db_path() -> PathBuf {
    data_dir().join("ralph.db")
}
