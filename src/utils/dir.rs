use std::{
    env, io,
    path::{Component, Path, PathBuf},
};

use anyhow::{anyhow, Result};

const APPLICATION_NAME: &str = "timeblock";
pub const DEFAULT_PROFILE: &str = "default";

/// `$XDG_STATE_HOME/timeblock`, `$HOME/.local/state/timeblock` or `%APPDATA%\timeblock`.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path = env::var("APPDATA")
                .map(PathBuf::from)
                .map_err(|_| anyhow!("APPDATA is not set"))?;
            path.push(APPLICATION_NAME);
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/state");
                        path
                    })
                })
                .map_err(|_| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))?;
            path.push(APPLICATION_NAME);
            path
        }
    };

    ensure_dir(path)
}

/// `dir` when it's given, the default location otherwise. Either way the directory exists
/// afterwards.
pub fn application_path(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => ensure_dir(dir),
        None => create_application_default_path(),
    }
}

/// Directory holding all data of one profile. Every profile is isolated from the others.
pub fn profile_path(application_path: &Path, profile: &str) -> Result<PathBuf> {
    let mut components = Path::new(profile).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(anyhow!("Profile name {profile:?} must be a plain name")),
    }
    ensure_dir(application_path.join("profiles").join(profile))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
