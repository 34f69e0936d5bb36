use std::path::PathBuf;

use anyhow::Result;
use theos_setup_core::{
    detect_platform, fail, ErrorCode, HostSignals, Platform, ResultExt, INSTALL_ROOT_VAR,
};

use crate::config::InstallConfig;
use crate::context::InstallContext;
use crate::host::{Host, Reporter, StatusKind};
use crate::strategy::{StrategyKey, StrategyRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    PlatformDetected,
    StrategySelected,
    DependenciesInstalled,
    EnvironmentConfigured,
    ToolchainReady,
    SdksReady,
    Done,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::PlatformDetected => "platform-detected",
            Self::StrategySelected => "strategy-selected",
            Self::DependenciesInstalled => "dependencies-installed",
            Self::EnvironmentConfigured => "environment-configured",
            Self::ToolchainReady => "toolchain-ready",
            Self::SdksReady => "sdks-ready",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub platform: Platform,
    pub strategy: StrategyKey,
    pub install_root: PathBuf,
    pub environment_preset: bool,
    pub stages: Vec<Stage>,
}

impl RunReport {
    pub fn final_stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Start)
    }
}

/// Drives one full install. The first failing step ends the run with its code attached.
pub fn run_install(
    config: &InstallConfig,
    signals: &HostSignals,
    registry: &StrategyRegistry,
    host: &mut dyn Host,
    reporter: &mut dyn Reporter,
) -> Result<RunReport> {
    let mut stages = vec![Stage::Start];

    if config.running_as_root {
        return Err(fail(
            ErrorCode::PrivilegedExecutionRefused,
            "refusing to run as root; run theos-setup as your regular user and it will use sudo where needed",
        ));
    }

    let platform = detect_platform(signals).or_code(ErrorCode::UnsupportedPlatform)?;
    reporter.status(StatusKind::Ok, &format!("Detected {}", platform.summary()));
    stages.push(Stage::PlatformDetected);

    let strategy = registry
        .select(&platform)
        .or_code(ErrorCode::UnsupportedPlatform)?;
    stages.push(Stage::StrategySelected);

    let mut ctx = InstallContext::new(config, &platform, host, reporter);

    ctx.section("Dependencies");
    strategy
        .check_prerequisites(&mut ctx)
        .or_code(ErrorCode::DependencyIssue)?;
    strategy
        .install_dependencies(&mut ctx)
        .or_code(ErrorCode::DependencyIssue)?;
    stages.push(Stage::DependenciesInstalled);

    ctx.section("Environment");
    let environment_preset = config.preset_install_root.is_some();
    if let Some(root) = &config.preset_install_root {
        ctx.status(
            StatusKind::Ok,
            &format!("{INSTALL_ROOT_VAR} is already set to {}", root.display()),
        );
    } else {
        strategy
            .configure_environment(&mut ctx)
            .or_code(ErrorCode::InstallRootUnset)?;
    }
    stages.push(Stage::EnvironmentConfigured);

    ctx.section("Theos");
    strategy
        .ensure_repository(&mut ctx)
        .or_code(ErrorCode::RepositoryFetchFailed)?;
    strategy
        .ensure_toolchain(&mut ctx)
        .or_code(ErrorCode::ToolchainInstallFailed)?;
    stages.push(Stage::ToolchainReady);

    ctx.section("SDKs");
    strategy
        .ensure_sdks(&mut ctx)
        .or_code(ErrorCode::SdkInstallFailed)?;
    stages.push(Stage::SdksReady);

    let install_root = ctx.layout()?.root().to_path_buf();
    ctx.status(
        StatusKind::Ok,
        &format!("Theos is ready at {}", install_root.display()),
    );
    stages.push(Stage::Done);

    Ok(RunReport {
        platform: platform.clone(),
        strategy: strategy.key(),
        install_root,
        environment_preset,
        stages,
    })
}
