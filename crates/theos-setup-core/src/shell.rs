use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellFamily {
    Bash,
    Zsh,
    Fish,
}

impl ShellFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        }
    }

    /// Maps a `$SHELL` value (path or bare name) to a known family.
    pub fn from_shell_env(shell: &str) -> Option<Self> {
        let name = Path::new(shell.trim())
            .file_name()
            .and_then(|value| value.to_str())?;
        match name {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            _ => None,
        }
    }

    /// Startup files in priority order, highest first.
    pub fn startup_candidates(self, home: &Path, zdotdir: Option<&Path>) -> Vec<PathBuf> {
        match self {
            Self::Bash => vec![
                home.join(".bash_profile"),
                home.join(".bash_login"),
                home.join(".profile"),
            ],
            Self::Zsh => {
                let base = zdotdir.unwrap_or(home);
                vec![
                    base.join(".zshenv"),
                    base.join(".zprofile"),
                    base.join(".zshrc"),
                ]
            }
            Self::Fish => vec![home.join(".config").join("fish").join("config.fish")],
        }
    }

    pub fn render_export(self, variable: &str, value: &Path) -> String {
        let escaped = escape_double_quoted(&value.display().to_string());
        match self {
            Self::Bash | Self::Zsh => format!("export {variable}=\"{escaped}\""),
            Self::Fish => format!("set -gx {variable} \"{escaped}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellTarget {
    File { shell: ShellFamily, path: PathBuf },
    Unknown,
}

impl ShellTarget {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Unknown => None,
        }
    }
}

pub fn resolve_shell_target<F>(
    shell: Option<&str>,
    home: Option<&Path>,
    zdotdir: Option<&Path>,
    exists: F,
) -> ShellTarget
where
    F: Fn(&Path) -> bool,
{
    let Some(family) = shell.and_then(ShellFamily::from_shell_env) else {
        return ShellTarget::Unknown;
    };
    let Some(home) = home else {
        return ShellTarget::Unknown;
    };

    // ZDOTDIR is a zsh concept; other shells never see it.
    let zdotdir = match family {
        ShellFamily::Zsh => zdotdir,
        _ => None,
    };

    let candidates = family.startup_candidates(home, zdotdir);
    let chosen = candidates
        .iter()
        .find(|candidate| exists(candidate))
        .or_else(|| candidates.last())
        .cloned();

    match chosen {
        Some(path) => ShellTarget::File {
            shell: family,
            path,
        },
        None => ShellTarget::Unknown,
    }
}

fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
