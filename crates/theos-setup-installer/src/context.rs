use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use theos_setup_core::{fail, is_affirmative, ErrorCode, Platform, INSTALL_ROOT_VAR};

use crate::config::InstallConfig;
use crate::host::{render_command, Host, Reporter, RunMode, StatusKind};
use crate::layout::TheosLayout;

/// Per-run state handed to every strategy step.
pub struct InstallContext<'a> {
    pub config: &'a InstallConfig,
    pub platform: &'a Platform,
    host: &'a mut dyn Host,
    reporter: &'a mut dyn Reporter,
    install_root: Option<PathBuf>,
}

impl<'a> InstallContext<'a> {
    pub fn new(
        config: &'a InstallConfig,
        platform: &'a Platform,
        host: &'a mut dyn Host,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            config,
            platform,
            host,
            reporter,
            install_root: config.preset_install_root.clone(),
        }
    }

    pub fn host(&self) -> &dyn Host {
        &*self.host
    }

    pub fn install_root(&self) -> Option<&Path> {
        self.install_root.as_deref()
    }

    pub fn set_install_root(&mut self, root: PathBuf) {
        self.install_root = Some(root);
    }

    pub fn layout(&self) -> Result<TheosLayout> {
        self.install_root
            .as_ref()
            .map(TheosLayout::new)
            .ok_or_else(|| {
                fail(
                    ErrorCode::InstallRootUnset,
                    format!("{INSTALL_ROOT_VAR} is not set for this run"),
                )
            })
    }

    pub fn section(&mut self, title: &str) {
        self.reporter.section(title);
    }

    pub fn status(&mut self, kind: StatusKind, message: &str) {
        self.reporter.status(kind, message);
    }

    pub fn command_exists(&self, name: &str) -> bool {
        self.host.command_exists(name)
    }

    pub fn owner_of(&self, path: &Path) -> Result<String> {
        self.host.owner_of(path)
    }

    /// Spawns `command` with the install root exported to it.
    pub fn run(&mut self, command: &mut Command, context_message: &str, mode: RunMode) -> Result<()> {
        if let Some(root) = &self.install_root {
            command.env(INSTALL_ROOT_VAR, root);
        }

        let rendered = render_command(command);
        if self.config.verbose {
            self.reporter
                .status(StatusKind::Progress, &format!("$ {rendered}"));
        }

        if mode == RunMode::Captured {
            self.reporter.begin_activity(&rendered);
        }
        let result = self.host.run(command, context_message, mode);
        if mode == RunMode::Captured {
            self.reporter.end_activity();
        }
        result
    }

    /// Yes/no prompt; unattended runs never block and take `unattended_default`.
    pub fn ask_yes_no(&mut self, question: &str, unattended_default: bool) -> Result<bool> {
        if self.config.unattended {
            self.reporter.status(
                StatusKind::Note,
                &format!(
                    "{question} -> {} (unattended)",
                    if unattended_default { "yes" } else { "no" }
                ),
            );
            return Ok(unattended_default);
        }
        let answer = self.host.ask(question)?;
        Ok(is_affirmative(&answer))
    }
}
