use std::path::Path;

use anyhow::Result;
use theos_setup_core::{fail, ErrorCode, ResultExt};

use crate::context::InstallContext;
use crate::host::{privileged, RunMode, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipAction {
    Created,
    AlreadyOwned,
    Transferred,
}

/// Makes `dir` exist and belong to `owner`; every failure is a shared-root setup failure.
pub fn reconcile_owned_dir(
    ctx: &mut InstallContext<'_>,
    dir: &Path,
    owner: &str,
) -> Result<OwnershipAction> {
    let ownership = format!("{owner}:{owner}");

    let action = if !dir.exists() {
        ctx.status(
            StatusKind::Progress,
            &format!("Creating {} for {owner}...", dir.display()),
        );
        let mut command = privileged("install");
        command
            .arg("-d")
            .arg("-o")
            .arg(owner)
            .arg("-g")
            .arg(owner)
            .arg("-m")
            .arg("0755")
            .arg(dir);
        ctx.run(
            &mut command,
            &format!("failed to create {}", dir.display()),
            RunMode::Interactive,
        )
        .or_code(ErrorCode::Ra1nSetupFailed)?;
        OwnershipAction::Created
    } else {
        let current = ctx
            .owner_of(dir)
            .or_code(ErrorCode::Ra1nSetupFailed)?;
        if current == owner {
            return Ok(OwnershipAction::AlreadyOwned);
        }

        ctx.status(
            StatusKind::Progress,
            &format!(
                "{} is owned by {current}; transferring it to {owner}...",
                dir.display()
            ),
        );
        let mut command = privileged("chown");
        command.arg(&ownership).arg(dir);
        ctx.run(
            &mut command,
            &format!("failed to change owner of {}", dir.display()),
            RunMode::Interactive,
        )
        .or_code(ErrorCode::Ra1nSetupFailed)?;
        OwnershipAction::Transferred
    };

    let confirmed = ctx
        .owner_of(dir)
        .or_code(ErrorCode::Ra1nSetupFailed)?;
    if confirmed != owner {
        return Err(fail(
            ErrorCode::Ra1nSetupFailed,
            format!(
                "{} is owned by {confirmed} after setup, expected {owner}",
                dir.display()
            ),
        ));
    }
    Ok(action)
}
