use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Child inherits the terminal; used for anything that may prompt (sudo, package managers).
    Interactive,
    /// Output is collected and only surfaced on failure.
    Captured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemIdentity {
    pub sysname: String,
    pub release: String,
    pub machine: String,
}

/// Everything the engine does to the outside world besides plain file reads and writes.
pub trait Host {
    fn command_exists(&self, name: &str) -> bool;

    fn run(&mut self, command: &mut Command, context_message: &str, mode: RunMode) -> Result<()>;

    fn ask(&mut self, question: &str) -> Result<String>;

    fn owner_of(&self, path: &Path) -> Result<String>;

    fn system_identity(&self) -> Result<SystemIdentity>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    Progress,
    Warn,
    Note,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Progress => "..",
            Self::Warn => "warn",
            Self::Note => "note",
        }
    }
}

pub trait Reporter {
    fn section(&mut self, title: &str);

    fn status(&mut self, kind: StatusKind, message: &str);

    fn begin_activity(&mut self, _label: &str) {}

    fn end_activity(&mut self) {}
}

pub fn privileged(program: impl AsRef<std::ffi::OsStr>) -> Command {
    let mut command = Command::new("sudo");
    command.arg(program);
    command
}

pub fn render_command(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn command_exists(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }

    fn run(&mut self, command: &mut Command, context_message: &str, mode: RunMode) -> Result<()> {
        match mode {
            RunMode::Captured => run_command(command, context_message),
            RunMode::Interactive => {
                let status = command
                    .status()
                    .with_context(|| format!("{context_message}: command failed to start"))?;
                if status.success() {
                    return Ok(());
                }
                Err(anyhow!("{context_message}: status={status}"))
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{question} [y/n] ").context("failed writing prompt")?;
        stdout.flush().context("failed flushing prompt")?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("failed reading answer from stdin")?;
        Ok(answer)
    }

    #[cfg(unix)]
    fn owner_of(&self, path: &Path) -> Result<String> {
        use std::os::unix::fs::MetadataExt;

        let uid = std::fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?
            .uid();
        let user = nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid))
            .with_context(|| format!("failed to look up owner of {}", path.display()))?;
        Ok(user.map(|user| user.name).unwrap_or_else(|| uid.to_string()))
    }

    #[cfg(not(unix))]
    fn owner_of(&self, path: &Path) -> Result<String> {
        Err(anyhow!(
            "ownership lookup is not supported on this host: {}",
            path.display()
        ))
    }

    #[cfg(unix)]
    fn system_identity(&self) -> Result<SystemIdentity> {
        let uts = nix::sys::utsname::uname().context("uname failed")?;
        Ok(SystemIdentity {
            sysname: uts.sysname().to_string_lossy().into_owned(),
            release: uts.release().to_string_lossy().into_owned(),
            machine: uts.machine().to_string_lossy().into_owned(),
        })
    }

    #[cfg(not(unix))]
    fn system_identity(&self) -> Result<SystemIdentity> {
        Ok(SystemIdentity {
            sysname: std::env::consts::OS.to_string(),
            release: String::new(),
            machine: std::env::consts::ARCH.to_string(),
        })
    }
}

pub(crate) fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}
