use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use log::{debug, warn};

use crate::machine::{DEFAULT_TAPE_SIZE, EofPolicy, Interpreter};

/// Effective run settings for the `bf` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub tape_size: usize,
    pub eof: EofPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            eof: EofPolicy::default(),
        }
    }
}

/// Values read from `[interpreter]` in `bf.toml`. Missing keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSettings {
    pub tape_size: Option<usize>,
    pub eof: Option<EofPolicy>,
}

impl Settings {
    /// Resolve settings: flags -> env -> config file -> defaults.
    pub fn resolve(tape_size: Option<usize>, eof: Option<EofPolicy>) -> Self {
        let file = load_from_toml().unwrap_or_default();
        Self::resolve_with(tape_size, eof, |key| std::env::var(key).ok(), &file)
    }

    /// Resolution with the environment lookup and file values supplied by the caller.
    pub fn resolve_with<F>(
        tape_size: Option<usize>,
        eof: Option<EofPolicy>,
        env: F,
        file: &FileSettings,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tape_size = tape_size
            .or_else(|| env("BF_TAPE_SIZE").and_then(|s| s.trim().parse::<usize>().ok()))
            .or(file.tape_size)
            .unwrap_or(defaults.tape_size);
        let eof = eof
            .or_else(|| env("BF_EOF").and_then(|s| s.parse::<EofPolicy>().ok()))
            .or(file.eof)
            .unwrap_or(defaults.eof);

        let settings = Self { tape_size, eof };
        if settings.tape_size_overridden() {
            debug!(
                "tape size {} overrides the default of {DEFAULT_TAPE_SIZE} cells",
                settings.tape_size
            );
        }
        debug!("resolved settings: tape_size={} eof={}", settings.tape_size, settings.eof);
        settings
    }

    /// Whether the tape size differs from the fixed default.
    pub fn tape_size_overridden(&self) -> bool {
        self.tape_size != DEFAULT_TAPE_SIZE
    }

    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.tape_size).with_eof_policy(self.eof)
    }
}

fn config_path() -> Option<PathBuf> {
    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load_from_toml() -> Option<FileSettings> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    debug!("reading settings from {}", path.display());
    Some(parse_settings(&content))
}

/// Parse the `[interpreter]` section of a `bf.toml`.
///
/// Very small line-oriented parser: `key = value` pairs, values optionally
/// quoted, `#` comments. Unknown keys and unparseable values are skipped.
pub fn parse_settings(content: &str) -> FileSettings {
    let mut in_section = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = line[1..line.len() - 1].trim() == "interpreter";
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = line[eq + 1..].trim();
            let val = val_raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(val_raw);
            map.insert(key, val.to_string());
        }
    }

    let mut settings = FileSettings::default();
    if let Some(v) = map.get("tape_size") {
        match v.replace('_', "").parse::<usize>() {
            Ok(n) => settings.tape_size = Some(n),
            Err(_) => warn!("ignoring invalid tape_size '{v}' in bf.toml"),
        }
    }
    if let Some(v) = map.get("eof") {
        match v.parse::<EofPolicy>() {
            Ok(p) => settings.eof = Some(p),
            Err(e) => warn!("ignoring eof in bf.toml: {e}"),
        }
    }
    settings
}
