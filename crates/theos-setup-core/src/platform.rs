use std::collections::BTreeSet;

use anyhow::Result;

use crate::error::{fail, ErrorCode};

/// Darwin kernels below this major release (iOS 14) are treated as legacy.
pub const LEGACY_KERNEL_THRESHOLD: u32 = 20;

pub const XCODE_SELECT_COMMAND: &str = "xcode-select";

pub const LINUX_PACKAGE_MANAGER_PROBE_ORDER: [PackageManager; 4] = [
    PackageManager::Apt,
    PackageManager::Pacman,
    PackageManager::Dnf,
    PackageManager::Zypper,
];

pub const MACOS_PACKAGE_MANAGER_PROBE_ORDER: [PackageManager; 2] =
    [PackageManager::Brew, PackageManager::Port];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Linux,
    Darwin,
}

impl OsFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
        }
    }

    pub fn parse(sysname: &str) -> Option<Self> {
        match sysname.trim() {
            "Linux" => Some(Self::Linux),
            "Darwin" => Some(Self::Darwin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
    Other(String),
}

impl Arch {
    pub fn parse(machine: &str) -> Self {
        match machine.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Self::X86_64,
            "aarch64" | "arm64" => Self::Aarch64,
            _ => Self::Other(machine.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Apt,
    Pacman,
    Dnf,
    Zypper,
    Brew,
    Port,
    Unknown,
}

impl PackageManager {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
            Self::Zypper => "zypper",
            Self::Brew => "brew",
            Self::Port => "port",
            Self::Unknown => "unknown",
        }
    }

    pub fn command(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            other => Some(other.as_str()),
        }
    }

    fn first_resolved(order: &[Self], signals: &HostSignals) -> Self {
        order
            .iter()
            .copied()
            .find(|manager| {
                manager
                    .command()
                    .is_some_and(|command| signals.has_command(command))
            })
            .unwrap_or(Self::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelGeneration {
    Legacy,
    Modern,
}

impl KernelGeneration {
    pub fn classify(kernel_release: &str) -> Self {
        match kernel_major(kernel_release) {
            Some(major) if major < LEGACY_KERNEL_THRESHOLD => Self::Legacy,
            _ => Self::Modern,
        }
    }
}

pub fn kernel_major(kernel_release: &str) -> Option<u32> {
    let digits = kernel_release
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect::<String>();
    digits.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bootstrap {
    Procursus,
    Elucubratus,
}

impl Bootstrap {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Procursus => "procursus",
            Self::Elucubratus => "elucubratus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Desktop,
    Wsl1,
    Wsl2,
    Jailbroken {
        kernel: KernelGeneration,
        bootstrap: Bootstrap,
        rootless: bool,
    },
}

impl Variant {
    pub fn describe(self) -> String {
        match self {
            Self::Desktop => "desktop".to_string(),
            Self::Wsl1 => "wsl1".to_string(),
            Self::Wsl2 => "wsl2".to_string(),
            Self::Jailbroken {
                kernel,
                bootstrap,
                rootless,
            } => format!(
                "jailbroken ({}, {}, {})",
                match kernel {
                    KernelGeneration::Legacy => "legacy",
                    KernelGeneration::Modern => "modern",
                },
                bootstrap.as_str(),
                if rootless { "rootless" } else { "rootful" }
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub family: OsFamily,
    pub arch: Arch,
    pub variant: Variant,
    pub package_manager: PackageManager,
    pub kernel_release: String,
}

impl Platform {
    pub fn is_jailbroken(&self) -> bool {
        matches!(self.variant, Variant::Jailbroken { .. })
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} ({}, package manager: {})",
            self.family.as_str(),
            self.arch.as_str(),
            self.variant.describe(),
            self.package_manager.as_str()
        )
    }
}

/// Raw facts gathered from the host; detection never looks past these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSignals {
    pub sysname: String,
    pub kernel_release: String,
    pub machine: String,
    pub resolved_commands: BTreeSet<String>,
    pub procursus_marker: bool,
    pub rootless_marker: bool,
}

impl HostSignals {
    pub fn has_command(&self, name: &str) -> bool {
        self.resolved_commands.contains(name)
    }
}

/// Every command name whose presence can influence detection.
pub fn probed_commands() -> Vec<&'static str> {
    let mut commands = vec![XCODE_SELECT_COMMAND];
    commands.extend(
        LINUX_PACKAGE_MANAGER_PROBE_ORDER
            .iter()
            .chain(MACOS_PACKAGE_MANAGER_PROBE_ORDER.iter())
            .filter_map(|manager| manager.command()),
    );
    commands
}

pub fn detect_platform(signals: &HostSignals) -> Result<Platform> {
    let Some(family) = OsFamily::parse(&signals.sysname) else {
        return Err(fail(
            ErrorCode::UnsupportedPlatform,
            format!(
                "'{}' is not a supported operating system (supported: Linux, Darwin)",
                signals.sysname.trim()
            ),
        ));
    };

    let arch = Arch::parse(&signals.machine);
    let kernel_release = signals.kernel_release.trim().to_string();

    let (variant, package_manager) = match family {
        OsFamily::Linux => (
            wsl_variant(&kernel_release),
            PackageManager::first_resolved(&LINUX_PACKAGE_MANAGER_PROBE_ORDER, signals),
        ),
        OsFamily::Darwin if signals.has_command(XCODE_SELECT_COMMAND) => (
            Variant::Desktop,
            PackageManager::first_resolved(&MACOS_PACKAGE_MANAGER_PROBE_ORDER, signals),
        ),
        OsFamily::Darwin => (
            Variant::Jailbroken {
                kernel: KernelGeneration::classify(&kernel_release),
                bootstrap: if signals.procursus_marker {
                    Bootstrap::Procursus
                } else {
                    Bootstrap::Elucubratus
                },
                rootless: signals.rootless_marker,
            },
            PackageManager::first_resolved(&[PackageManager::Apt], signals),
        ),
    };

    Ok(Platform {
        family,
        arch,
        variant,
        package_manager,
        kernel_release,
    })
}

pub fn wsl_variant(kernel_release: &str) -> Variant {
    let release = kernel_release.to_ascii_lowercase();
    if !release.contains("microsoft") {
        return Variant::Desktop;
    }
    if release.contains("wsl2") {
        Variant::Wsl2
    } else {
        Variant::Wsl1
    }
}
