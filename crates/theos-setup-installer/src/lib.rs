mod checks;
mod config;
mod context;
mod dependencies;
mod fetch;
mod host;
mod layout;
mod orchestrator;
mod probe;
mod profile;
mod reconcile;
mod strategy;

pub use checks::{
    dependency_available, dir_has_entries, ensure_step, is_executable_file, missing_dependencies,
    sdks_present, symlink_points_to, StepStatus,
};
pub use config::{
    ConfigOverrides, EnvSnapshot, InstallConfig, DEFAULT_REPOSITORY_URL, DEFAULT_SECONDARY_SDK,
    DEFAULT_TOOLCHAIN_REPOSITORY, UNATTENDED_MARKER_VAR,
};
pub use context::InstallContext;
pub use dependencies::{
    apply_wsl1_fakeroot_fix, install_dependency_set, jailbroken_dependency_set,
    linux_dependency_set, macos_dependency_set, offer_optional_swift, require_commands,
    DependencySet, PackageInvocation, RepositoryTrust, ELUCUBRATUS_LEGACY_TOOLCHAIN_PACKAGE,
    ELUCUBRATUS_META_PACKAGE, INSTALLATION_DOCS_URL,
};
pub use fetch::{ensure_linux_toolchain, ensure_repository, ensure_sdks};
pub use host::{
    privileged, render_command, Host, Reporter, RunMode, StatusKind, SystemHost, SystemIdentity,
};
pub use layout::{
    default_install_root, SystemPaths, TheosLayout, FAKEROOT_TCP_PATH, SHARED_ROOT_OWNER,
};
pub use orchestrator::{run_install, RunReport, Stage};
pub use probe::gather_host_signals;
pub use profile::{persist_install_root, shell_target};
pub use reconcile::{reconcile_owned_dir, OwnershipAction};
pub use strategy::{
    InstallStrategy, JailbrokenStrategy, LinuxStrategy, MacosStrategy, StrategyFactory,
    StrategyKey, StrategyRegistry,
};
