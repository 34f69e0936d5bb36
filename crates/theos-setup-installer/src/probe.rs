use anyhow::Result;
use theos_setup_core::{probed_commands, ErrorCode, HostSignals, ResultExt};

use crate::host::Host;
use crate::layout::SystemPaths;

/// Collects detection inputs without touching anything.
pub fn gather_host_signals(host: &dyn Host, paths: &SystemPaths) -> Result<HostSignals> {
    let identity = host
        .system_identity()
        .or_code(ErrorCode::UnsupportedPlatform)?;

    let resolved_commands = probed_commands()
        .into_iter()
        .filter(|name| host.command_exists(name))
        .map(str::to_string)
        .collect();

    Ok(HostSignals {
        sysname: identity.sysname,
        kernel_release: identity.release,
        machine: identity.machine,
        resolved_commands,
        procursus_marker: paths.procursus_marker.exists(),
        rootless_marker: paths.rootless_marker.is_dir(),
    })
}
