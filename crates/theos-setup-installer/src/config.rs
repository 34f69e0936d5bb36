use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use theos_setup_core::INSTALL_ROOT_VAR;

use crate::layout::SystemPaths;

pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/theos/theos.git";
pub const DEFAULT_SECONDARY_SDK: &str = "iPhoneOS14.5";
pub const DEFAULT_TOOLCHAIN_REPOSITORY: &str = "deb https://repo.theos.dev/ ./";
pub const UNATTENDED_MARKER_VAR: &str = "CI";

/// The process environment, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub install_root: Option<PathBuf>,
    pub unattended_marker: bool,
    pub shell: Option<String>,
    pub zdotdir: Option<PathBuf>,
    pub home: Option<PathBuf>,
    pub no_color: bool,
    pub euid_is_root: bool,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        Self::from_lookup(|name| std::env::var_os(name), effective_uid_is_root())
    }

    pub fn from_lookup<F>(lookup: F, euid_is_root: bool) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            install_root: non_empty(INSTALL_ROOT_VAR).map(PathBuf::from),
            unattended_marker: non_empty(UNATTENDED_MARKER_VAR)
                .is_some_and(|value| marker_is_set(&value)),
            shell: non_empty("SHELL").map(|value| value.to_string_lossy().into_owned()),
            zdotdir: non_empty("ZDOTDIR").map(PathBuf::from),
            home: non_empty("HOME").map(PathBuf::from),
            no_color: non_empty("NO_COLOR").is_some(),
            euid_is_root,
        }
    }
}

/// Falsy values such as `CI=false` switch the marker off.
fn marker_is_set(value: &OsStr) -> bool {
    let value = value.to_string_lossy();
    let value = value.trim();
    !(value == "0" || value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("no"))
}

#[cfg(unix)]
fn effective_uid_is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn effective_uid_is_root() -> bool {
    false
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub non_interactive: bool,
    pub verbose: bool,
    pub repository_url: Option<String>,
    pub secondary_sdk: Option<String>,
    pub toolchain_repository: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub preset_install_root: Option<PathBuf>,
    pub unattended: bool,
    pub verbose: bool,
    pub shell: Option<String>,
    pub zdotdir: Option<PathBuf>,
    pub home: Option<PathBuf>,
    pub running_as_root: bool,
    pub repository_url: String,
    pub secondary_sdk: String,
    pub toolchain_repository: String,
    pub system_paths: SystemPaths,
}

impl InstallConfig {
    pub fn from_snapshot(snapshot: &EnvSnapshot, overrides: ConfigOverrides) -> Self {
        Self {
            preset_install_root: snapshot.install_root.clone(),
            unattended: snapshot.unattended_marker || overrides.non_interactive,
            verbose: overrides.verbose,
            shell: snapshot.shell.clone(),
            zdotdir: snapshot.zdotdir.clone(),
            home: snapshot.home.clone(),
            running_as_root: snapshot.euid_is_root,
            repository_url: overrides
                .repository_url
                .unwrap_or_else(|| DEFAULT_REPOSITORY_URL.to_string()),
            secondary_sdk: overrides
                .secondary_sdk
                .unwrap_or_else(|| DEFAULT_SECONDARY_SDK.to_string()),
            toolchain_repository: overrides
                .toolchain_repository
                .unwrap_or_else(|| DEFAULT_TOOLCHAIN_REPOSITORY.to_string()),
            system_paths: SystemPaths::default(),
        }
    }
}
