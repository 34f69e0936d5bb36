use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use super::*;

fn signals(sysname: &str, release: &str, machine: &str, commands: &[&str]) -> HostSignals {
    HostSignals {
        sysname: sysname.to_string(),
        kernel_release: release.to_string(),
        machine: machine.to_string(),
        resolved_commands: commands.iter().map(|name| name.to_string()).collect(),
        procursus_marker: false,
        rootless_marker: false,
    }
}

#[test]
fn detection_is_a_pure_function_of_signals() {
    let inputs = [
        signals("Linux", "6.5.0-14-generic", "x86_64", &["apt", "dnf"]),
        signals("Darwin", "23.1.0", "arm64", &["xcode-select", "brew"]),
        signals("Darwin", "19.6.0", "iPhone10,3", &["apt"]),
        signals("Linux", "4.4.0-19041-Microsoft", "x86_64", &[]),
    ];

    for input in inputs {
        let first = detect_platform(&input).expect("supported platform");
        let second = detect_platform(&input.clone()).expect("supported platform");
        assert_eq!(first, second);
    }
}

#[test]
fn unsupported_os_yields_unsupported_platform_code() {
    for sysname in ["Windows_NT", "CYGWIN_NT-10.0", "MINGW64_NT-10.0", "FreeBSD", ""] {
        let err = detect_platform(&signals(sysname, "1.0", "x86_64", &["apt"]))
            .expect_err("must reject");
        assert_eq!(code_of(&err), Some(ErrorCode::UnsupportedPlatform), "{sysname}");
    }
}

#[test]
fn linux_package_manager_is_first_resolved_in_probe_order() {
    let platform = detect_platform(&signals(
        "Linux",
        "6.1.0",
        "x86_64",
        &["zypper", "dnf", "pacman"],
    ))
    .expect("linux");
    assert_eq!(platform.package_manager, PackageManager::Pacman);

    let platform =
        detect_platform(&signals("Linux", "6.1.0", "x86_64", &["apt", "pacman"])).expect("linux");
    assert_eq!(platform.package_manager, PackageManager::Apt);
}

#[test]
fn linux_without_known_package_manager_is_unknown_not_an_error() {
    let platform =
        detect_platform(&signals("Linux", "6.1.0", "x86_64", &["emerge"])).expect("linux");
    assert_eq!(platform.family, OsFamily::Linux);
    assert_eq!(platform.package_manager, PackageManager::Unknown);
}

#[test]
fn wsl_generations_are_told_apart() {
    assert_eq!(wsl_variant("6.5.0-14-generic"), Variant::Desktop);
    assert_eq!(wsl_variant("4.4.0-19041-Microsoft"), Variant::Wsl1);
    assert_eq!(wsl_variant("4.4.0-22621-MICROSOFT"), Variant::Wsl1);
    assert_eq!(
        wsl_variant("6.6.36.3-microsoft-standard-wsl2"),
        Variant::Wsl2
    );
    assert_eq!(
        wsl_variant("5.15.153.1-microsoft-standard-WSL2"),
        Variant::Wsl2
    );
}

#[test]
fn darwin_with_xcode_select_is_desktop_macos() {
    let platform = detect_platform(&signals(
        "Darwin",
        "23.1.0",
        "arm64",
        &["xcode-select", "port", "brew"],
    ))
    .expect("darwin");
    assert_eq!(platform.variant, Variant::Desktop);
    assert_eq!(platform.arch, Arch::Aarch64);
    assert_eq!(platform.package_manager, PackageManager::Brew);
}

#[test]
fn darwin_without_xcode_select_is_jailbroken() {
    let mut input = signals("Darwin", "21.6.0", "iPhone14,2", &["apt", "brew"]);
    input.procursus_marker = true;
    input.rootless_marker = true;

    let platform = detect_platform(&input).expect("darwin");
    assert_eq!(
        platform.variant,
        Variant::Jailbroken {
            kernel: KernelGeneration::Modern,
            bootstrap: Bootstrap::Procursus,
            rootless: true,
        }
    );
    assert_eq!(platform.package_manager, PackageManager::Apt);
    assert_eq!(platform.arch, Arch::Other("iPhone14,2".to_string()));
    assert!(platform.is_jailbroken());
}

#[test]
fn jailbroken_without_procursus_marker_is_elucubratus() {
    let platform =
        detect_platform(&signals("Darwin", "18.7.0", "iPad7,5", &["apt"])).expect("darwin");
    assert_eq!(
        platform.variant,
        Variant::Jailbroken {
            kernel: KernelGeneration::Legacy,
            bootstrap: Bootstrap::Elucubratus,
            rootless: false,
        }
    );
}

#[test]
fn legacy_kernel_boundary_is_exact() {
    let below = format!("{}.6.0", LEGACY_KERNEL_THRESHOLD - 1);
    let at = format!("{}.0.0", LEGACY_KERNEL_THRESHOLD);
    let above = format!("{}.1.0", LEGACY_KERNEL_THRESHOLD + 1);

    assert_eq!(KernelGeneration::classify(&below), KernelGeneration::Legacy);
    assert_eq!(KernelGeneration::classify(&at), KernelGeneration::Modern);
    assert_eq!(KernelGeneration::classify(&above), KernelGeneration::Modern);
}

#[test]
fn kernel_major_reads_leading_digits_only() {
    assert_eq!(kernel_major("20.6.0"), Some(20));
    assert_eq!(kernel_major(" 7.0.0\n"), Some(7));
    assert_eq!(kernel_major("Darwin"), None);
    assert_eq!(KernelGeneration::classify("garbage"), KernelGeneration::Modern);
}

#[test]
fn probed_commands_cover_every_detection_input() {
    let probed = probed_commands().into_iter().collect::<BTreeSet<_>>();
    for expected in ["xcode-select", "apt", "pacman", "dnf", "zypper", "brew", "port"] {
        assert!(probed.contains(expected), "missing probe for {expected}");
    }
}

#[test]
fn affirmative_tokens_are_accepted_case_insensitively() {
    for input in ["Y", "y", "YES", "yes", "TRUE", "true", "Yes", "tRuE", "yes\n", "y\r\n"] {
        assert!(is_affirmative(input), "{input:?} should be affirmative");
        assert_eq!(Answer::parse(input), Answer::Affirmative);
    }
}

#[test]
fn everything_else_is_negative() {
    for input in ["", "Yes!", "1", "ye", "yess", "n", "no", "false", "sure", "ok"] {
        assert!(!is_affirmative(input), "{input:?} should not be affirmative");
    }
    assert_eq!(Answer::parse("NO"), Answer::Negative);
    assert_eq!(Answer::parse("Yes!"), Answer::Unrecognized);
    assert_eq!(Answer::parse(""), Answer::Unrecognized);
}

#[test]
fn error_codes_are_distinct_and_cover_one_through_eleven() {
    let codes = ErrorCode::ALL
        .iter()
        .map(|code| code.exit_code())
        .collect::<HashSet<_>>();
    assert_eq!(codes.len(), ErrorCode::ALL.len());
    assert_eq!(codes, (1..=11).collect::<HashSet<_>>());
}

#[test]
fn or_code_keeps_the_first_attached_code() {
    let err = Err::<(), _>(fail(ErrorCode::ToolchainInstallFailed, "clang missing"))
        .or_code(ErrorCode::SdkInstallFailed)
        .expect_err("error");
    assert_eq!(code_of(&err), Some(ErrorCode::ToolchainInstallFailed));

    let err = Err::<(), _>(anyhow::anyhow!("plain failure"))
        .or_code(ErrorCode::SdkInstallFailed)
        .expect_err("error");
    assert_eq!(code_of(&err), Some(ErrorCode::SdkInstallFailed));
    assert_eq!(format!("{err:#}"), "sdk install failed: plain failure");
}

#[test]
fn code_survives_additional_context() {
    let err = fail(ErrorCode::DependencyIssue, "sudo missing").context("checking prerequisites");
    assert_eq!(code_of(&err), Some(ErrorCode::DependencyIssue));
}

fn existing(paths: &[PathBuf]) -> impl Fn(&Path) -> bool + '_ {
    move |path: &Path| paths.iter().any(|candidate| candidate == path)
}

#[test]
fn bash_target_prefers_highest_priority_existing_file() {
    let home = Path::new("/home/dev");
    let present = vec![home.join(".profile"), home.join(".bash_login")];

    let target = resolve_shell_target(Some("/bin/bash"), Some(home), None, existing(&present));
    assert_eq!(
        target,
        ShellTarget::File {
            shell: ShellFamily::Bash,
            path: home.join(".bash_login"),
        }
    );
}

#[test]
fn missing_candidates_fall_back_to_lowest_priority_path() {
    let home = Path::new("/home/dev");
    let target = resolve_shell_target(Some("bash"), Some(home), None, |_| false);
    assert_eq!(target.path(), Some(home.join(".profile").as_path()));

    let target = resolve_shell_target(Some("/usr/bin/zsh"), Some(home), None, |_| false);
    assert_eq!(target.path(), Some(home.join(".zshrc").as_path()));
}

#[test]
fn zdotdir_is_honored_only_for_zsh() {
    let home = Path::new("/home/dev");
    let zdotdir = Path::new("/home/dev/.config/zsh");

    let zsh = resolve_shell_target(Some("zsh"), Some(home), Some(zdotdir), |_| false);
    assert_eq!(zsh.path(), Some(zdotdir.join(".zshrc").as_path()));

    let bash = resolve_shell_target(Some("bash"), Some(home), Some(zdotdir), |_| false);
    assert_eq!(bash.path(), Some(home.join(".profile").as_path()));
}

#[test]
fn unknown_shells_resolve_to_unknown() {
    let home = Path::new("/home/dev");
    for shell in [Some("/bin/tcsh"), Some("nu"), Some(""), None] {
        assert_eq!(
            resolve_shell_target(shell, Some(home), None, |_| true),
            ShellTarget::Unknown
        );
    }
    assert_eq!(
        resolve_shell_target(Some("bash"), None, None, |_| true),
        ShellTarget::Unknown
    );
}

#[test]
fn export_lines_follow_shell_syntax() {
    let root = Path::new("/home/dev/theos");
    assert_eq!(
        ShellFamily::Zsh.render_export(INSTALL_ROOT_VAR, root),
        "export THEOS=\"/home/dev/theos\""
    );
    assert_eq!(
        ShellFamily::Fish.render_export(INSTALL_ROOT_VAR, root),
        "set -gx THEOS \"/home/dev/theos\""
    );
    assert_eq!(
        ShellFamily::Bash.render_export(INSTALL_ROOT_VAR, Path::new("/tmp/a \"b\"")),
        "export THEOS=\"/tmp/a \\\"b\\\"\""
    );
}

#[test]
fn toolchain_bundle_follows_architecture_and_flavor() {
    let swift = select_toolchain_bundle(&Arch::X86_64, true).expect("bundle");
    assert_eq!(swift.flavor, ToolchainFlavor::Swift);
    assert_eq!(swift.url, SWIFT_TOOLCHAIN_X86_64_URL);

    let minimal = select_toolchain_bundle(&Arch::X86_64, false).expect("bundle");
    assert_eq!(minimal.flavor, ToolchainFlavor::Minimal);
    assert_eq!(minimal.archive_name(), "iOSToolchain-x86_64.tar.xz");

    let arm = select_toolchain_bundle(&Arch::Aarch64, true).expect("bundle");
    assert_eq!(arm.flavor, ToolchainFlavor::Minimal);
    assert!(!offers_swift_bundle(&Arch::Aarch64));

    assert!(select_toolchain_bundle(&Arch::Other("riscv64".to_string()), false).is_none());
}
