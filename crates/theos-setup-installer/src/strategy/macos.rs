use anyhow::Result;
use theos_setup_core::{fail, ErrorCode, PackageManager};

use super::{InstallStrategy, StrategyKey};
use crate::context::InstallContext;
use crate::dependencies::{install_dependency_set, macos_dependency_set, require_commands};

pub struct MacosStrategy;

impl InstallStrategy for MacosStrategy {
    fn key(&self) -> StrategyKey {
        StrategyKey::Macos
    }

    fn check_prerequisites(&self, ctx: &mut InstallContext<'_>) -> Result<()> {
        match ctx.platform.package_manager {
            PackageManager::Brew => require_commands(ctx, &["brew", "git", "tar"]),
            PackageManager::Port => require_commands(ctx, &["port", "sudo", "git", "tar"]),
            _ => Err(fail(
                ErrorCode::DependencyIssue,
                "neither Homebrew ('brew') nor MacPorts ('port') was found; install one of them and re-run",
            )),
        }
    }

    fn install_dependencies(&self, ctx: &mut InstallContext<'_>) -> Result<()> {
        if let Some(set) = macos_dependency_set(ctx.platform.package_manager) {
            install_dependency_set(ctx, &set)?;
        }
        Ok(())
    }
}
