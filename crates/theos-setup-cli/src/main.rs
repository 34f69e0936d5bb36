mod render;

use std::io::IsTerminal;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use theos_setup_core::code_of;
use theos_setup_installer::{
    gather_host_signals, run_install, ConfigOverrides, EnvSnapshot, InstallConfig, RunReport,
    StrategyRegistry, SystemHost,
};

use crate::render::{output_style, TerminalRenderer};

/// Command-line misuse, reported before any install step runs (sysexits `EX_USAGE`).
const USAGE_EXIT_CODE: i32 = 64;
/// A failure that escaped the engine without a category (sysexits `EX_SOFTWARE`).
const UNCATEGORIZED_EXIT_CODE: i32 = 70;

#[derive(Parser, Debug)]
#[command(name = "theos-setup", version)]
#[command(about = "Installs Theos, its dependencies, toolchain and SDKs", long_about = None)]
struct Cli {
    /// Never prompt; optional choices fall back to the minimal option.
    #[arg(long)]
    non_interactive: bool,
    /// Disable badges, colors and spinners.
    #[arg(long)]
    plain: bool,
    /// Echo every command before it runs.
    #[arg(long, short)]
    verbose: bool,
    #[arg(long, value_name = "URL")]
    repository: Option<String>,
    #[arg(long, value_name = "NAME")]
    secondary_sdk: Option<String>,
    /// apt sources line for the toolchain repository on jailbroken devices.
    #[arg(long, value_name = "LINE")]
    toolchain_repo: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            non_interactive: self.non_interactive,
            verbose: self.verbose,
            repository_url: self.repository.clone(),
            secondary_sdk: self.secondary_sdk.clone(),
            toolchain_repository: self.toolchain_repo.clone(),
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = usage_exit_code(err.kind());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let snapshot = EnvSnapshot::capture();
    let style = output_style(cli.plain, snapshot.no_color, std::io::stdout().is_terminal());
    let config = InstallConfig::from_snapshot(&snapshot, cli.overrides());
    let mut renderer = TerminalRenderer::new(style);

    if let Err(err) = run(&config, &mut renderer) {
        let code = exit_code_for(&err);
        renderer.print_failure(&err, code);
        std::process::exit(code);
    }
}

fn run(config: &InstallConfig, renderer: &mut TerminalRenderer) -> Result<RunReport> {
    let mut host = SystemHost;
    let signals = gather_host_signals(&host, &config.system_paths)?;
    run_install(
        config,
        &signals,
        &StrategyRegistry::default(),
        &mut host,
        renderer,
    )
}

fn usage_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => USAGE_EXIT_CODE,
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    code_of(err)
        .map(|code| code.exit_code())
        .unwrap_or(UNCATEGORIZED_EXIT_CODE)
}

#[cfg(test)]
mod tests;
