use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use thiserror::Error;

use crate::config::BrowserEntry;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("no browser entry at index {0}")]
    NoSuchEntry(usize),

    #[error("browser entry {0:?} has no executable path")]
    EmptyPath(String),

    #[error("failed to launch {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    true
}

#[cfg(unix)]
fn dir_world_writable(dir: &Path) -> bool {
    if let Ok(meta) = fs::metadata(dir) {
        let mode = meta.permissions().mode();
        mode & 0o002 != 0
    } else {
        true
    }
}

#[cfg(not(unix))]
fn dir_world_writable(_dir: &Path) -> bool {
    false
}

fn executable_file(path: &Path) -> Option<PathBuf> {
    let meta = fs::metadata(path).ok()?;
    // Symlinks are kept as chosen, multi-call binaries dispatch on argv[0]
    if meta.is_file() && is_executable(&meta) {
        std::path::absolute(path).ok()
    } else {
        None
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, cmd: &str) -> Vec<PathBuf> {
    let path = dir.join(cmd);
    if path.extension().is_some() {
        vec![path]
    } else {
        vec![path.with_extension("exe"), path]
    }
}

#[cfg(not(windows))]
fn candidates(dir: &Path, cmd: &str) -> Vec<PathBuf> {
    vec![dir.join(cmd)]
}

/// Resolve what the user typed into the add prompt to an executable.
///
/// Anything containing a path separator is taken as a path. A bare name is
/// looked up on `PATH`.
pub fn resolve_command(cmd: &str) -> Option<PathBuf> {
    let path_env = env::var_os("PATH").unwrap_or_default();
    resolve_in(cmd, &path_env)
}

fn resolve_in(cmd: &str, path_env: &OsStr) -> Option<PathBuf> {
    let cmd = cmd.trim();
    if cmd.is_empty() {
        return None;
    }

    let candidate = PathBuf::from(cmd);
    if candidate.is_absolute() || candidate.components().count() > 1 {
        return executable_file(&candidate);
    }

    for dir in env::split_paths(path_env) {
        // Relative and world-writable PATH entries are never searched
        if !dir.is_absolute() || dir_world_writable(&dir) {
            continue;
        }
        for path in candidates(&dir, cmd) {
            if let Some(found) = executable_file(&path) {
                return Some(found);
            }
        }
    }
    None
}

/// Arguments for the child process: `[path, ...args, url]`, with the URL
/// only present when non-empty.
pub fn launch_args(entry: &BrowserEntry, url: &str) -> Vec<OsString> {
    let mut argv = Vec::with_capacity(entry.args.len() + 2);
    argv.push(OsString::from(&entry.path));
    argv.extend(entry.args.iter().map(OsString::from));
    if !url.is_empty() {
        argv.push(OsString::from(url));
    }
    argv
}

pub fn launch(entry: &BrowserEntry, url: &str) -> Result<Child, LaunchError> {
    if entry.path.is_empty() {
        return Err(LaunchError::EmptyPath(entry.name.clone()));
    }
    let argv = launch_args(entry, url);
    log::debug!("Spawning {:?}", argv);
    spawn_detached(Command::new(&argv[0]).args(&argv[1..]))
}

/// Show `dir` in the platform file manager.
pub fn open_directory(dir: &Path) -> Result<Child, LaunchError> {
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let opener = "xdg-open";

    log::debug!("Opening {} with {}", dir.display(), opener);
    spawn_detached(Command::new(opener).arg(dir))
}

fn spawn_detached(command: &mut Command) -> Result<Child, LaunchError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: PathBuf::from(command.get_program()),
            source,
        })
}
