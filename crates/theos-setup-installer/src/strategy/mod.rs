mod jailbroken;
mod linux;
mod macos;

use std::path::PathBuf;

use anyhow::Result;
use theos_setup_core::{fail, ErrorCode, OsFamily, Platform, Variant, INSTALL_ROOT_VAR};

use crate::checks::StepStatus;
use crate::context::InstallContext;
use crate::fetch;
use crate::host::StatusKind;
use crate::layout::default_install_root;
use crate::profile::persist_install_root;

pub use jailbroken::JailbrokenStrategy;
pub use linux::LinuxStrategy;
pub use macos::MacosStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKey {
    Linux,
    Macos,
    Jailbroken,
}

impl StrategyKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Jailbroken => "jailbroken",
        }
    }

    pub fn for_platform(platform: &Platform) -> Self {
        match (platform.family, platform.variant) {
            (_, Variant::Jailbroken { .. }) => Self::Jailbroken,
            (OsFamily::Darwin, _) => Self::Macos,
            (OsFamily::Linux, _) => Self::Linux,
        }
    }
}

/// One install pipeline for a platform family and variant.
///
/// The orchestrator calls these in declaration order and stops at the first error.
pub trait InstallStrategy {
    fn key(&self) -> StrategyKey;

    fn check_prerequisites(&self, ctx: &mut InstallContext<'_>) -> Result<()>;

    fn install_dependencies(&self, ctx: &mut InstallContext<'_>) -> Result<()>;

    fn resolve_install_root(&self, ctx: &mut InstallContext<'_>) -> Result<PathBuf> {
        home_install_root(ctx)
    }

    fn configure_environment(&self, ctx: &mut InstallContext<'_>) -> Result<()> {
        let root = self.resolve_install_root(ctx)?;
        let (status, target) = persist_install_root(ctx.config, &root)?;
        let file = target
            .path()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        match status {
            StepStatus::Skipped => ctx.status(
                StatusKind::Ok,
                &format!("{INSTALL_ROOT_VAR} already exported in {file}"),
            ),
            StepStatus::Performed => ctx.status(
                StatusKind::Ok,
                &format!(
                    "Exported {INSTALL_ROOT_VAR}={} in {file}; open a new shell to pick it up",
                    root.display()
                ),
            ),
        }
        ctx.set_install_root(root);
        Ok(())
    }

    fn ensure_repository(&self, ctx: &mut InstallContext<'_>) -> Result<StepStatus> {
        fetch::ensure_repository(ctx)
    }

    fn ensure_toolchain(&self, _ctx: &mut InstallContext<'_>) -> Result<StepStatus> {
        Ok(StepStatus::Skipped)
    }

    fn ensure_sdks(&self, ctx: &mut InstallContext<'_>) -> Result<StepStatus> {
        fetch::ensure_sdks(ctx)
    }
}

pub(crate) fn home_install_root(ctx: &InstallContext<'_>) -> Result<PathBuf> {
    ctx.config
        .home
        .as_deref()
        .map(default_install_root)
        .ok_or_else(|| {
            fail(
                ErrorCode::InstallRootUnset,
                format!("HOME is not set; cannot choose a location for {INSTALL_ROOT_VAR}"),
            )
        })
}

pub type StrategyFactory = fn() -> Box<dyn InstallStrategy>;

pub struct StrategyRegistry {
    entries: Vec<(StrategyKey, StrategyFactory)>,
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers `factory` for `key`, replacing any earlier registration.
    pub fn register(&mut self, key: StrategyKey, factory: StrategyFactory) {
        self.entries.retain(|(existing, _)| *existing != key);
        self.entries.push((key, factory));
    }

    pub fn keys(&self) -> Vec<StrategyKey> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    pub fn select(&self, platform: &Platform) -> Result<Box<dyn InstallStrategy>> {
        let key = StrategyKey::for_platform(platform);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, factory)| factory())
            .ok_or_else(|| {
                fail(
                    ErrorCode::UnsupportedPlatform,
                    format!("no install strategy registered for {}", platform.summary()),
                )
            })
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(StrategyKey::Linux, || Box::new(LinuxStrategy));
        registry.register(StrategyKey::Macos, || Box::new(MacosStrategy));
        registry.register(StrategyKey::Jailbroken, || Box::new(JailbrokenStrategy));
        registry
    }
}
