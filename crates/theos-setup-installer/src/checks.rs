use std::fs;
use std::path::Path;

use anyhow::Result;
use theos_setup_core::{fail, ErrorCode, ResultExt};

use crate::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Skipped,
    Performed,
}

pub fn dir_has_entries(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

pub fn sdks_present(sdks_dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(sdks_dir) else {
        return false;
    };
    entries.filter_map(|entry| entry.ok()).any(|entry| {
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(".sdk"))
    })
}

#[cfg(unix)]
pub fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

pub fn dependency_available(host: &dyn Host, name: &str) -> bool {
    host.command_exists(name)
}

pub fn missing_dependencies<'a>(host: &dyn Host, names: &[&'a str]) -> Vec<&'a str> {
    names
        .iter()
        .copied()
        .filter(|name| !dependency_available(host, name))
        .collect()
}

pub fn symlink_points_to(link: &Path, target: &Path) -> bool {
    fs::read_link(link).is_ok_and(|resolved| resolved == target)
}

/// Runs `action` unless `satisfied` already holds, then requires `satisfied` to hold.
pub fn ensure_step<P, A>(
    satisfied: P,
    action: A,
    code: ErrorCode,
    unconfirmed_message: &str,
) -> Result<StepStatus>
where
    P: Fn() -> bool,
    A: FnOnce() -> Result<()>,
{
    if satisfied() {
        return Ok(StepStatus::Skipped);
    }

    action().or_code(code)?;

    if !satisfied() {
        return Err(fail(code, unconfirmed_message));
    }
    Ok(StepStatus::Performed)
}
