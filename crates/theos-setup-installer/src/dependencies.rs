use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use theos_setup_core::{fail, Bootstrap, ErrorCode, KernelGeneration, PackageManager, ResultExt};

use crate::checks::{ensure_step, missing_dependencies, symlink_points_to, StepStatus};
use crate::context::InstallContext;
use crate::host::{privileged, RunMode, StatusKind};
use crate::layout::FAKEROOT_TCP_PATH;

const DESKTOP_LINUX_PROBES: &[&str] = &[
    "make", "fakeroot", "rsync", "curl", "perl", "zip", "unzip", "git", "xz",
];
const MACOS_PROBES: &[&str] = &["ldid", "xz"];
const IOS_PROBES: &[&str] = &[
    "clang", "curl", "git", "ldid", "make", "perl", "rsync", "unzip", "xz", "zip",
];

pub const ELUCUBRATUS_META_PACKAGE: &str = "org.theos.dependencies";
pub const ELUCUBRATUS_LEGACY_TOOLCHAIN_PACKAGE: &str = "org.coolstar.iostoolchain";
pub const INSTALLATION_DOCS_URL: &str = "https://theos.dev/docs/installation";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInvocation {
    pub privileged: bool,
    pub program: &'static str,
    pub args: Vec<String>,
}

impl PackageInvocation {
    fn elevated(program: &'static str, args: &[&str]) -> Self {
        Self {
            privileged: true,
            program,
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    fn plain(program: &'static str, args: &[&str]) -> Self {
        Self {
            privileged: false,
            ..Self::elevated(program, args)
        }
    }

    pub fn command(&self) -> Command {
        let mut command = if self.privileged {
            privileged(self.program)
        } else {
            Command::new(self.program)
        };
        command.args(&self.args);
        command
    }
}

/// An external apt repository the user has to approve before it is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTrust {
    pub question: String,
    pub sources_entry: PathBuf,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySet {
    pub manager: PackageManager,
    pub invocations: Vec<PackageInvocation>,
    pub probe_commands: &'static [&'static str],
    pub trust: Option<RepositoryTrust>,
}

pub fn linux_dependency_set(manager: PackageManager) -> Option<DependencySet> {
    let invocations = match manager {
        PackageManager::Apt => vec![
            PackageInvocation::elevated("apt-get", &["update"]),
            PackageInvocation::elevated(
                "apt-get",
                &[
                    "install", "-y", "build-essential", "fakeroot", "rsync", "curl", "perl",
                    "zip", "unzip", "git", "libxml2", "xz-utils",
                ],
            ),
        ],
        PackageManager::Pacman => vec![PackageInvocation::elevated(
            "pacman",
            &[
                "-Syu", "--noconfirm", "--needed", "base-devel", "curl", "fakeroot", "git",
                "libxml2", "perl", "rsync", "unzip", "zip", "xz",
            ],
        )],
        PackageManager::Dnf => vec![
            PackageInvocation::elevated(
                "dnf",
                &["group", "install", "-y", "C Development Tools and Libraries"],
            ),
            PackageInvocation::elevated(
                "dnf",
                &[
                    "install", "-y", "fakeroot", "lzma", "libbsd", "rsync", "curl", "perl", "zip",
                    "unzip", "git", "libxml2", "xz",
                ],
            ),
        ],
        PackageManager::Zypper => vec![
            PackageInvocation::elevated(
                "zypper",
                &["install", "-y", "-t", "pattern", "devel_basis"],
            ),
            PackageInvocation::elevated(
                "zypper",
                &[
                    "install", "-y", "fakeroot", "libbsd0", "rsync", "curl", "perl", "zip",
                    "unzip", "git", "libxml2", "xz",
                ],
            ),
        ],
        PackageManager::Brew | PackageManager::Port | PackageManager::Unknown => return None,
    };

    Some(DependencySet {
        manager,
        invocations,
        probe_commands: DESKTOP_LINUX_PROBES,
        trust: None,
    })
}

pub fn macos_dependency_set(manager: PackageManager) -> Option<DependencySet> {
    let invocations = match manager {
        PackageManager::Brew => vec![PackageInvocation::plain(
            "brew",
            &["install", "ldid", "xz", "make"],
        )],
        PackageManager::Port => vec![PackageInvocation::elevated(
            "port",
            &["install", "ldid", "xz", "gmake"],
        )],
        _ => return None,
    };

    Some(DependencySet {
        manager,
        invocations,
        probe_commands: MACOS_PROBES,
        trust: None,
    })
}

pub fn jailbroken_dependency_set(
    bootstrap: Bootstrap,
    kernel: KernelGeneration,
    sources_entry: PathBuf,
    repository_line: &str,
) -> DependencySet {
    match bootstrap {
        Bootstrap::Procursus => DependencySet {
            manager: PackageManager::Apt,
            invocations: vec![
                PackageInvocation::elevated("apt-get", &["update"]),
                PackageInvocation::elevated(
                    "apt-get",
                    &[
                        "install", "-y", "ca-certificates", "clang", "coreutils", "curl", "git",
                        "ldid", "make", "perl", "rsync", "unzip", "xz-utils", "zip",
                    ],
                ),
            ],
            probe_commands: IOS_PROBES,
            trust: None,
        },
        Bootstrap::Elucubratus => {
            let mut packages = vec!["install", "-y", ELUCUBRATUS_META_PACKAGE];
            if kernel == KernelGeneration::Legacy {
                packages.push(ELUCUBRATUS_LEGACY_TOOLCHAIN_PACKAGE);
            }
            DependencySet {
                manager: PackageManager::Apt,
                invocations: vec![
                    PackageInvocation::elevated("apt-get", &["update"]),
                    PackageInvocation::elevated("apt-get", &packages),
                ],
                probe_commands: IOS_PROBES,
                trust: Some(RepositoryTrust {
                    question: format!(
                        "Theos dependencies come from an external repository ({repository_line}). Add it to apt sources?"
                    ),
                    sources_entry,
                    line: repository_line.to_string(),
                }),
            }
        }
    }
}

/// Fails with a dependency issue naming the first tool that does not resolve.
pub fn require_commands(ctx: &InstallContext<'_>, names: &[&str]) -> Result<()> {
    let missing = missing_dependencies(ctx.host(), names);
    if let Some(first) = missing.first() {
        return Err(fail(
            ErrorCode::DependencyIssue,
            format!("required tool '{first}' was not found on PATH; install it and re-run"),
        ));
    }
    Ok(())
}

pub fn install_dependency_set(ctx: &mut InstallContext<'_>, set: &DependencySet) -> Result<StepStatus> {
    let missing = missing_dependencies(ctx.host(), set.probe_commands);
    if missing.is_empty() {
        ctx.status(StatusKind::Ok, "Dependencies already installed");
        return Ok(StepStatus::Skipped);
    }

    if let Some(trust) = &set.trust {
        trust_repository(ctx, trust)?;
    }

    ctx.status(
        StatusKind::Progress,
        &format!(
            "Installing dependencies with {} (missing: {})...",
            set.manager.as_str(),
            missing.join(", ")
        ),
    );
    for invocation in &set.invocations {
        let mut command = invocation.command();
        ctx.run(
            &mut command,
            &format!("{} {} failed", invocation.program, invocation.args.join(" ")),
            RunMode::Interactive,
        )
        .or_code(ErrorCode::DependencyIssue)?;
    }

    let still_missing = missing_dependencies(ctx.host(), set.probe_commands);
    if !still_missing.is_empty() {
        return Err(fail(
            ErrorCode::DependencyIssue,
            format!(
                "{} still missing after installing dependencies with {}",
                still_missing.join(", "),
                set.manager.as_str()
            ),
        ));
    }
    ctx.status(StatusKind::Ok, "Dependencies installed");
    Ok(StepStatus::Performed)
}

fn trust_repository(ctx: &mut InstallContext<'_>, trust: &RepositoryTrust) -> Result<()> {
    if trust.sources_entry.exists() {
        return Ok(());
    }

    if !ctx.ask_yes_no(&trust.question, false)? {
        return Err(fail(
            ErrorCode::DependencyIssue,
            "the toolchain repository was not trusted; Theos dependencies cannot be installed without it",
        ));
    }

    let entry = trust.sources_entry.clone();
    ensure_step(
        || entry.exists(),
        || {
            let mut command = privileged("sh");
            command
                .arg("-c")
                .arg("printf '%s\\n' \"$1\" > \"$2\"")
                .arg("sh")
                .arg(&trust.line)
                .arg(&entry);
            ctx.run(
                &mut command,
                &format!("failed to write {}", entry.display()),
                RunMode::Interactive,
            )
        },
        ErrorCode::DependencyIssue,
        &format!("{} is missing after adding the repository", entry.display()),
    )?;
    Ok(())
}

/// Offers the optional Swift package; declining only leaves a note.
pub fn offer_optional_swift(ctx: &mut InstallContext<'_>, package: &str) -> Result<StepStatus> {
    if ctx.command_exists("swift") {
        return Ok(StepStatus::Skipped);
    }

    let accepted = !ctx.config.unattended
        && ctx.ask_yes_no("Install optional Swift support?", false)?;
    if !accepted {
        ctx.status(
            StatusKind::Note,
            &format!("Skipping Swift support; install '{package}' later to enable it"),
        );
        return Ok(StepStatus::Skipped);
    }

    let mut command = privileged("apt-get");
    command.arg("install").arg("-y").arg(package);
    ctx.run(
        &mut command,
        &format!("failed to install {package}"),
        RunMode::Interactive,
    )
    .or_code(ErrorCode::DependencyIssue)?;
    ctx.status(StatusKind::Ok, "Swift support installed");
    Ok(StepStatus::Performed)
}

/// WSL1 cannot run the SysV IPC fakeroot; point the alternative at the TCP one.
pub fn apply_wsl1_fakeroot_fix(ctx: &mut InstallContext<'_>) -> Result<StepStatus> {
    let alternative = ctx.config.system_paths.fakeroot_alternative.clone();
    let target = PathBuf::from(FAKEROOT_TCP_PATH);
    let status = ensure_step(
        || symlink_points_to(&alternative, &target),
        || {
            ctx.status(StatusKind::Progress, "Switching fakeroot to fakeroot-tcp for WSL1...");
            let mut command = privileged("update-alternatives");
            command.arg("--set").arg("fakeroot").arg(&target);
            ctx.run(
                &mut command,
                "update-alternatives failed",
                RunMode::Interactive,
            )
        },
        ErrorCode::CompatibilityFixFailed,
        "fakeroot alternative does not point at fakeroot-tcp after switching",
    )?;
    Ok(status)
}
