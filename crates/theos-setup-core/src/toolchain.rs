use crate::platform::Arch;

pub const SWIFT_TOOLCHAIN_X86_64_URL: &str = "https://github.com/kabiroberai/swift-toolchain-linux/releases/download/v2.3.0/swift-5.8-ubuntu20.04.tar.xz";
pub const MINIMAL_TOOLCHAIN_X86_64_URL: &str =
    "https://github.com/L1ghtmann/llvm-project/releases/latest/download/iOSToolchain-x86_64.tar.xz";
pub const MINIMAL_TOOLCHAIN_AARCH64_URL: &str =
    "https://github.com/L1ghtmann/llvm-project/releases/latest/download/iOSToolchain-aarch64.tar.xz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainFlavor {
    Swift,
    Minimal,
}

impl ToolchainFlavor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Swift => "swift",
            Self::Minimal => "minimal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolchainBundle {
    pub flavor: ToolchainFlavor,
    pub url: &'static str,
}

impl ToolchainBundle {
    pub fn archive_name(&self) -> &'static str {
        self.url.rsplit('/').next().unwrap_or("toolchain.tar.xz")
    }
}

/// Whether the Swift-enabled bundle exists for `arch`, i.e. whether asking is meaningful.
pub fn offers_swift_bundle(arch: &Arch) -> bool {
    matches!(arch, Arch::X86_64)
}

/// `None` means no prebuilt toolchain exists for `arch`.
pub fn select_toolchain_bundle(arch: &Arch, want_swift: bool) -> Option<ToolchainBundle> {
    match arch {
        Arch::X86_64 if want_swift => Some(ToolchainBundle {
            flavor: ToolchainFlavor::Swift,
            url: SWIFT_TOOLCHAIN_X86_64_URL,
        }),
        Arch::X86_64 => Some(ToolchainBundle {
            flavor: ToolchainFlavor::Minimal,
            url: MINIMAL_TOOLCHAIN_X86_64_URL,
        }),
        Arch::Aarch64 => Some(ToolchainBundle {
            flavor: ToolchainFlavor::Minimal,
            url: MINIMAL_TOOLCHAIN_AARCH64_URL,
        }),
        Arch::Other(_) => None,
    }
}
