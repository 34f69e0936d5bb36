use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use theos_setup_core::{
    fail, resolve_shell_target, ErrorCode, ResultExt, ShellTarget, INSTALL_ROOT_VAR,
};

use crate::checks::StepStatus;
use crate::config::InstallConfig;

pub fn shell_target(config: &InstallConfig) -> ShellTarget {
    resolve_shell_target(
        config.shell.as_deref(),
        config.home.as_deref(),
        config.zdotdir.as_deref(),
        Path::exists,
    )
}

/// Appends the install-root export to the user's startup file unless it is already there.
pub fn persist_install_root(config: &InstallConfig, root: &Path) -> Result<(StepStatus, ShellTarget)> {
    let target = shell_target(config);
    let ShellTarget::File { shell, path } = &target else {
        return Err(fail(
            ErrorCode::UnsupportedShell,
            format!(
                "cannot persist {INSTALL_ROOT_VAR} for shell '{}'; add `export {INSTALL_ROOT_VAR}=\"{}\"` to your shell profile manually",
                config.shell.as_deref().unwrap_or("<unset>"),
                root.display()
            ),
        ));
    };

    let line = shell.render_export(INSTALL_ROOT_VAR, root);
    if file_has_line(path, &line) {
        return Ok((StepStatus::Skipped, target));
    }

    append_line(path, &line).or_code(ErrorCode::InstallRootUnset)?;

    if !file_has_line(path, &line) {
        return Err(fail(
            ErrorCode::InstallRootUnset,
            format!("{} does not contain the {INSTALL_ROOT_VAR} export after writing it", path.display()),
        ));
    }
    Ok((StepStatus::Performed, target))
}

fn file_has_line(path: &Path, line: &str) -> bool {
    fs::read_to_string(path)
        .map(|raw| raw.lines().any(|existing| existing.trim() == line))
        .unwrap_or(false)
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let needs_separator = fs::read(path)
        .map(|raw| raw.last().is_some_and(|byte| *byte != b'\n'))
        .unwrap_or(false);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {} for appending", path.display()))?;
    let mut payload = String::new();
    if needs_separator {
        payload.push('\n');
    }
    payload.push_str(line);
    payload.push('\n');
    file.write_all(payload.as_bytes())
        .with_context(|| format!("failed to append to {}", path.display()))?;
    Ok(())
}
