use std::path::PathBuf;

use anyhow::Result;
use theos_setup_core::{fail, Bootstrap, ErrorCode, Variant};

use super::{home_install_root, InstallStrategy, StrategyKey};
use crate::context::InstallContext;
use crate::dependencies::{
    install_dependency_set, jailbroken_dependency_set, offer_optional_swift, require_commands,
};
use crate::host::StatusKind;
use crate::layout::SHARED_ROOT_OWNER;
use crate::reconcile::{reconcile_owned_dir, OwnershipAction};

/// On-device installs for jailbroken iOS.
pub struct JailbrokenStrategy;

fn swift_package(bootstrap: Bootstrap) -> &'static str {
    match bootstrap {
        Bootstrap::Procursus => "swift",
        Bootstrap::Elucubratus => "org.swift.toolchain",
    }
}

impl InstallStrategy for JailbrokenStrategy {
    fn key(&self) -> StrategyKey {
        StrategyKey::Jailbroken
    }

    fn check_prerequisites(&self, ctx: &mut InstallContext<'_>) -> Result<()> {
        require_commands(ctx, &["sudo", "apt", "tar"])
    }

    fn install_dependencies(&self, ctx: &mut InstallContext<'_>) -> Result<()> {
        let Variant::Jailbroken {
            kernel, bootstrap, ..
        } = ctx.platform.variant
        else {
            return Err(fail(
                ErrorCode::UnsupportedPlatform,
                format!("{} is not a jailbroken device", ctx.platform.summary()),
            ));
        };

        let set = jailbroken_dependency_set(
            bootstrap,
            kernel,
            ctx.config.system_paths.apt_sources_entry.clone(),
            &ctx.config.toolchain_repository,
        );
        install_dependency_set(ctx, &set)?;
        offer_optional_swift(ctx, swift_package(bootstrap))?;
        Ok(())
    }

    fn resolve_install_root(&self, ctx: &mut InstallContext<'_>) -> Result<PathBuf> {
        let rootless = matches!(
            ctx.platform.variant,
            Variant::Jailbroken { rootless: true, .. }
        );
        if !rootless {
            return home_install_root(ctx);
        }

        let shared = ctx.config.system_paths.shared_install_root.clone();
        let action = reconcile_owned_dir(ctx, &shared, SHARED_ROOT_OWNER)?;
        let message = match action {
            OwnershipAction::Created => format!("Created {} for {SHARED_ROOT_OWNER}", shared.display()),
            OwnershipAction::AlreadyOwned => {
                format!("{} already belongs to {SHARED_ROOT_OWNER}", shared.display())
            }
            OwnershipAction::Transferred => {
                format!("{} now belongs to {SHARED_ROOT_OWNER}", shared.display())
            }
        };
        ctx.status(StatusKind::Ok, &message);
        Ok(shared)
    }
}
