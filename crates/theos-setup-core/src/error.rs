use std::fmt;

use anyhow::{anyhow, Result};

/// Process exit conditions. Every engine failure carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    PrivilegedExecutionRefused,
    UnsupportedPlatform,
    DependencyIssue,
    UnsupportedShell,
    InstallRootUnset,
    RepositoryFetchFailed,
    ToolchainInstallFailed,
    SdkInstallFailed,
    Ra1nSetupFailed,
    CompatibilityFixFailed,
    // Reserved for a binary-compatibility layer host; never produced today.
    BinaryCompatibilityLayer,
}

impl ErrorCode {
    pub const ALL: [Self; 11] = [
        Self::PrivilegedExecutionRefused,
        Self::UnsupportedPlatform,
        Self::DependencyIssue,
        Self::UnsupportedShell,
        Self::InstallRootUnset,
        Self::RepositoryFetchFailed,
        Self::ToolchainInstallFailed,
        Self::SdkInstallFailed,
        Self::Ra1nSetupFailed,
        Self::CompatibilityFixFailed,
        Self::BinaryCompatibilityLayer,
    ];

    pub fn exit_code(self) -> i32 {
        match self {
            Self::PrivilegedExecutionRefused => 1,
            Self::UnsupportedPlatform => 2,
            Self::DependencyIssue => 3,
            Self::UnsupportedShell => 4,
            Self::InstallRootUnset => 5,
            Self::RepositoryFetchFailed => 6,
            Self::ToolchainInstallFailed => 7,
            Self::SdkInstallFailed => 8,
            Self::Ra1nSetupFailed => 9,
            Self::CompatibilityFixFailed => 10,
            Self::BinaryCompatibilityLayer => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrivilegedExecutionRefused => "refusing to run with elevated privileges",
            Self::UnsupportedPlatform => "unsupported platform",
            Self::DependencyIssue => "dependency issue",
            Self::UnsupportedShell => "unsupported shell",
            Self::InstallRootUnset => "install root could not be set",
            Self::RepositoryFetchFailed => "theos repository fetch failed",
            Self::ToolchainInstallFailed => "toolchain install failed",
            Self::SdkInstallFailed => "sdk install failed",
            Self::Ra1nSetupFailed => "shared install root setup failed",
            Self::CompatibilityFixFailed => "compatibility fix failed",
            Self::BinaryCompatibilityLayer => "binary compatibility layer is not supported",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for ErrorCode {}

pub fn fail(code: ErrorCode, message: impl fmt::Display) -> anyhow::Error {
    anyhow!("{message}").context(code)
}

/// Outermost code attached to `err`, if any.
pub fn code_of(err: &anyhow::Error) -> Option<ErrorCode> {
    err.downcast_ref::<ErrorCode>().copied()
}

pub trait ResultExt<T> {
    /// Tags the error with `code` unless an earlier step already tagged it.
    fn or_code(self, code: ErrorCode) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn or_code(self, code: ErrorCode) -> Result<T> {
        self.map_err(|err| {
            if code_of(&err).is_some() {
                err
            } else {
                err.context(code)
            }
        })
    }
}
