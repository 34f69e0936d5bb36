use std::path::{Path, PathBuf};

pub const SHARED_ROOT_OWNER: &str = "mobile";
pub const FAKEROOT_TCP_PATH: &str = "/usr/bin/fakeroot-tcp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheosLayout {
    root: PathBuf,
}

impl TheosLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn update_script(&self) -> PathBuf {
        self.bin_dir().join("update-theos")
    }

    pub fn install_sdk_script(&self) -> PathBuf {
        self.bin_dir().join("install-sdk")
    }

    pub fn sdks_dir(&self) -> PathBuf {
        self.root.join("sdks")
    }

    pub fn toolchain_dir(&self) -> PathBuf {
        self.root.join("toolchain")
    }

    pub fn linux_toolchain_dir(&self) -> PathBuf {
        self.toolchain_dir().join("linux").join("iphone")
    }

    pub fn linux_clang_path(&self) -> PathBuf {
        self.linux_toolchain_dir().join("bin").join("clang")
    }

    pub fn toolchain_download_path(&self, archive_name: &str) -> PathBuf {
        self.toolchain_dir().join(format!("{archive_name}.part"))
    }
}

pub fn default_install_root(home: &Path) -> PathBuf {
    home.join("theos")
}

/// Fixed host locations the engine inspects or writes outside the install root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPaths {
    pub procursus_marker: PathBuf,
    pub rootless_marker: PathBuf,
    pub shared_install_root: PathBuf,
    pub apt_sources_entry: PathBuf,
    pub fakeroot_alternative: PathBuf,
}

impl Default for SystemPaths {
    fn default() -> Self {
        Self {
            procursus_marker: PathBuf::from("/.procursus_strapped"),
            rootless_marker: PathBuf::from("/var/jb"),
            shared_install_root: PathBuf::from("/var/theos"),
            apt_sources_entry: PathBuf::from("/etc/apt/sources.list.d/theos-toolchain.list"),
            fakeroot_alternative: PathBuf::from("/etc/alternatives/fakeroot"),
        }
    }
}
