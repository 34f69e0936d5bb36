use super::*;
use anyhow::anyhow;
use theos_setup_core::{fail, ErrorCode, ResultExt};

use crate::render::{render_failure_lines, render_status_line, OutputStyle};

#[test]
fn cli_parses_all_flags_into_overrides() {
    let cli = Cli::try_parse_from([
        "theos-setup",
        "--non-interactive",
        "--plain",
        "-v",
        "--repository",
        "https://example.test/theos.git",
        "--secondary-sdk",
        "iPhoneOS15.6",
        "--toolchain-repo",
        "deb https://example.test/ ./",
    ])
    .expect("flags must parse");

    assert!(cli.plain);
    let overrides = cli.overrides();
    assert!(overrides.non_interactive);
    assert!(overrides.verbose);
    assert_eq!(
        overrides.repository_url.as_deref(),
        Some("https://example.test/theos.git")
    );
    assert_eq!(overrides.secondary_sdk.as_deref(), Some("iPhoneOS15.6"));
    assert_eq!(
        overrides.toolchain_repository.as_deref(),
        Some("deb https://example.test/ ./")
    );
}

#[test]
fn cli_defaults_leave_overrides_empty() {
    let cli = Cli::try_parse_from(["theos-setup"]).expect("no flags must parse");
    assert_eq!(cli.overrides(), ConfigOverrides::default());
}

#[test]
fn unknown_flag_exits_with_usage_code() {
    let err = Cli::try_parse_from(["theos-setup", "--frobnicate"]).expect_err("must reject");
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    assert_eq!(usage_exit_code(err.kind()), USAGE_EXIT_CODE);
}

#[test]
fn help_and_version_exit_cleanly() {
    let err = Cli::try_parse_from(["theos-setup", "--version"]).expect_err("version output");
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    assert_eq!(usage_exit_code(err.kind()), 0);

    let err = Cli::try_parse_from(["theos-setup", "--help"]).expect_err("help output");
    assert_eq!(usage_exit_code(err.kind()), 0);
}

#[test]
fn usage_code_stays_outside_engine_codes() {
    assert!(ErrorCode::ALL
        .iter()
        .all(|code| code.exit_code() != USAGE_EXIT_CODE
            && code.exit_code() != UNCATEGORIZED_EXIT_CODE));
}

#[test]
fn exit_code_follows_attached_category() {
    let err = fail(ErrorCode::SdkInstallFailed, "no SDK found");
    assert_eq!(exit_code_for(&err), 8);

    let wrapped: Result<()> = Err(anyhow!("tar exited with status 2"));
    let err = wrapped
        .or_code(ErrorCode::ToolchainInstallFailed)
        .expect_err("must stay an error");
    assert_eq!(exit_code_for(&err), 7);

    assert_eq!(exit_code_for(&anyhow!("untagged")), UNCATEGORIZED_EXIT_CODE);
}

#[test]
fn output_style_is_plain_unless_terminal_allows_rich() {
    assert_eq!(output_style(false, false, true), OutputStyle::Rich);
    assert_eq!(output_style(true, false, true), OutputStyle::Plain);
    assert_eq!(output_style(false, true, true), OutputStyle::Plain);
    assert_eq!(output_style(false, false, false), OutputStyle::Plain);
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "Theos cloned to /home/dev/theos"),
        "Theos cloned to /home/dev/theos"
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "ok", "SDKs installed"),
        "[OK] SDKs installed"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "..", "Installing SDK latest..."),
        "[..] Installing SDK latest..."
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "warn", "No prebuilt toolchain"),
        "[WARN] No prebuilt toolchain"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "note", "Skipping Swift support"),
        "[NOTE] Skipping Swift support"
    );
}

#[test]
fn failure_lines_name_the_exit_category() {
    let err = fail(ErrorCode::UnsupportedShell, "cannot persist THEOS for shell 'nu'");

    assert_eq!(
        render_failure_lines(OutputStyle::Rich, &err, 4),
        vec![
            "[ERR] unsupported shell: cannot persist THEOS for shell 'nu'".to_string(),
            "exit code 4 (unsupported shell)".to_string(),
        ]
    );
    assert_eq!(
        render_failure_lines(OutputStyle::Plain, &err, 4)[0],
        "error: unsupported shell: cannot persist THEOS for shell 'nu'"
    );
    assert_eq!(
        render_failure_lines(OutputStyle::Plain, &anyhow!("boom"), UNCATEGORIZED_EXIT_CODE)[1],
        "exit code 70"
    );
}
