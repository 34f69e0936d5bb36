use anyhow::Result;
use theos_setup_core::Variant;

use super::{InstallStrategy, StrategyKey};
use crate::checks::StepStatus;
use crate::context::InstallContext;
use crate::dependencies::{
    apply_wsl1_fakeroot_fix, install_dependency_set, linux_dependency_set, require_commands,
    INSTALLATION_DOCS_URL,
};
use crate::fetch;
use crate::host::StatusKind;

/// Desktop Linux, WSL1 and WSL2.
pub struct LinuxStrategy;

impl InstallStrategy for LinuxStrategy {
    fn key(&self) -> StrategyKey {
        StrategyKey::Linux
    }

    fn check_prerequisites(&self, ctx: &mut InstallContext<'_>) -> Result<()> {
        require_commands(ctx, &["sudo", "tar"])?;
        // git and curl come from the dependency set unless there is none to install.
        if linux_dependency_set(ctx.platform.package_manager).is_none() {
            require_commands(ctx, &["git", "curl"])?;
        }
        Ok(())
    }

    fn install_dependencies(&self, ctx: &mut InstallContext<'_>) -> Result<()> {
        match linux_dependency_set(ctx.platform.package_manager) {
            Some(set) => {
                install_dependency_set(ctx, &set)?;
            }
            None => ctx.status(
                StatusKind::Warn,
                &format!(
                    "Could not identify your distribution's package manager; install the Theos dependencies manually (see {INSTALLATION_DOCS_URL})"
                ),
            ),
        }

        if ctx.platform.variant == Variant::Wsl1 {
            apply_wsl1_fakeroot_fix(ctx)?;
        }
        Ok(())
    }

    fn ensure_toolchain(&self, ctx: &mut InstallContext<'_>) -> Result<StepStatus> {
        fetch::ensure_linux_toolchain(ctx)
    }
}
