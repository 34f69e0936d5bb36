use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use theos_setup_core::{
    offers_swift_bundle, select_toolchain_bundle, ErrorCode, ResultExt, ToolchainBundle,
};

use crate::checks::{dir_has_entries, ensure_step, is_executable_file, sdks_present, StepStatus};
use crate::context::InstallContext;
use crate::host::{RunMode, StatusKind};

pub(crate) fn base_git_command() -> Command {
    let mut command = Command::new("git");
    command
        .arg("-c")
        .arg("core.autocrlf=false")
        .arg("-c")
        .arg("core.eol=lf");
    command
}

/// Clones the tree into an empty root, or runs its updater when it is already populated.
pub fn ensure_repository(ctx: &mut InstallContext<'_>) -> Result<StepStatus> {
    let layout = ctx.layout()?;
    let root = layout.root().to_path_buf();

    if dir_has_entries(&root) {
        ctx.status(
            StatusKind::Progress,
            &format!("Theos found at {}; checking for updates...", root.display()),
        );
        let mut command = Command::new(layout.update_script());
        ctx.run(&mut command, "update-theos failed", RunMode::Captured)
            .or_code(ErrorCode::RepositoryFetchFailed)?;
        ctx.status(StatusKind::Ok, "Theos is up to date");
        return Ok(StepStatus::Skipped);
    }

    let repository_url = ctx.config.repository_url.clone();
    ctx.status(
        StatusKind::Progress,
        &format!("Cloning {repository_url} into {}...", root.display()),
    );
    let status = ensure_step(
        || dir_has_entries(&root),
        || {
            let mut command = base_git_command();
            command
                .arg("clone")
                .arg("--recursive")
                .arg(&repository_url)
                .arg(&root);
            ctx.run(
                &mut command,
                &format!("git clone failed for {repository_url}"),
                RunMode::Captured,
            )
        },
        ErrorCode::RepositoryFetchFailed,
        &format!("{} is still empty after cloning", root.display()),
    )?;
    ctx.status(StatusKind::Ok, &format!("Theos cloned to {}", root.display()));
    Ok(status)
}

/// Fetches the prebuilt iOS toolchain for Linux hosts.
pub fn ensure_linux_toolchain(ctx: &mut InstallContext<'_>) -> Result<StepStatus> {
    let layout = ctx.layout()?;
    let toolchain_dir = layout.linux_toolchain_dir();
    if dir_has_entries(&toolchain_dir) {
        ctx.status(
            StatusKind::Ok,
            &format!("Toolchain already present at {}", toolchain_dir.display()),
        );
        return Ok(StepStatus::Skipped);
    }

    let arch = ctx.platform.arch.clone();
    let want_swift = if offers_swift_bundle(&arch) {
        ctx.ask_yes_no(
            "Install the Swift-enabled toolchain? It is larger than the default one.",
            false,
        )?
    } else {
        false
    };

    let Some(bundle) = select_toolchain_bundle(&arch, want_swift) else {
        ctx.status(
            StatusKind::Warn,
            &format!(
                "No prebuilt toolchain is published for {}; build one yourself and place it in {}",
                arch.as_str(),
                toolchain_dir.display()
            ),
        );
        return Ok(StepStatus::Skipped);
    };

    let clang = layout.linux_clang_path();
    let part_path = layout.toolchain_download_path(bundle.archive_name());
    let status = ensure_step(
        || is_executable_file(&clang),
        || download_and_unpack(ctx, &bundle, &part_path, &layout.toolchain_dir()),
        ErrorCode::ToolchainInstallFailed,
        &format!("{} is missing after unpacking the toolchain", clang.display()),
    )?;
    ctx.status(
        StatusKind::Ok,
        &format!("Installed {} toolchain", bundle.flavor.as_str()),
    );
    Ok(status)
}

fn download_and_unpack(
    ctx: &mut InstallContext<'_>,
    bundle: &ToolchainBundle,
    part_path: &Path,
    destination: &Path,
) -> Result<()> {
    fs::create_dir_all(destination)
        .with_context(|| format!("failed to create {}", destination.display()))?;

    ctx.status(
        StatusKind::Progress,
        &format!("Downloading {}...", bundle.archive_name()),
    );
    let mut download = Command::new("curl");
    download
        .arg("-fL")
        .arg("--retry")
        .arg("2")
        .arg("-o")
        .arg(part_path)
        .arg(bundle.url);
    ctx.run(&mut download, "curl download failed", RunMode::Captured)?;

    let mut unpack = Command::new("tar");
    unpack
        .arg("-xJf")
        .arg(part_path)
        .arg("-C")
        .arg(destination);
    ctx.run(
        &mut unpack,
        &format!("failed to unpack {}", bundle.archive_name()),
        RunMode::Captured,
    )?;

    if part_path.exists() {
        fs::remove_file(part_path)
            .with_context(|| format!("failed to remove {}", part_path.display()))?;
    }
    Ok(())
}

/// Installs the newest SDK plus the configured secondary one when no SDK is present.
pub fn ensure_sdks(ctx: &mut InstallContext<'_>) -> Result<StepStatus> {
    let layout = ctx.layout()?;
    let sdks_dir = layout.sdks_dir();
    if sdks_present(&sdks_dir) {
        ctx.status(
            StatusKind::Ok,
            &format!("SDKs already present in {}", sdks_dir.display()),
        );
        return Ok(StepStatus::Skipped);
    }

    let secondary = ctx.config.secondary_sdk.clone();
    let installer = layout.install_sdk_script();
    let status = ensure_step(
        || sdks_present(&sdks_dir),
        || {
            for selector in ["latest", secondary.as_str()] {
                ctx.status(
                    StatusKind::Progress,
                    &format!("Installing SDK {selector}..."),
                );
                let mut command = Command::new(&installer);
                command.arg(selector);
                ctx.run(
                    &mut command,
                    &format!("install-sdk {selector} failed"),
                    RunMode::Captured,
                )?;
            }
            Ok(())
        },
        ErrorCode::SdkInstallFailed,
        &format!("no SDK found in {} after installing", sdks_dir.display()),
    )?;
    ctx.status(StatusKind::Ok, "SDKs installed");
    Ok(status)
}
