mod answer;
mod error;
mod platform;
mod shell;
mod toolchain;

pub use answer::{is_affirmative, Answer, AFFIRMATIVE_TOKENS, NEGATIVE_TOKENS};
pub use error::{code_of, fail, ErrorCode, ResultExt};
pub use platform::{
    detect_platform, kernel_major, probed_commands, wsl_variant, Arch, Bootstrap, HostSignals,
    KernelGeneration, OsFamily, PackageManager, Platform, Variant, LEGACY_KERNEL_THRESHOLD,
    LINUX_PACKAGE_MANAGER_PROBE_ORDER, MACOS_PACKAGE_MANAGER_PROBE_ORDER, XCODE_SELECT_COMMAND,
};
pub use shell::{resolve_shell_target, ShellFamily, ShellTarget};
pub use toolchain::{
    offers_swift_bundle, select_toolchain_bundle, ToolchainBundle, ToolchainFlavor,
    MINIMAL_TOOLCHAIN_AARCH64_URL, MINIMAL_TOOLCHAIN_X86_64_URL, SWIFT_TOOLCHAIN_X86_64_URL,
};

pub const INSTALL_ROOT_VAR: &str = "THEOS";

#[cfg(test)]
mod tests;
