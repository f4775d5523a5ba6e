//! Command-line settings read from `~/.rcse.conf`
//!
//! Each non-blank line is `key = value`; lines starting with `#` are
//! skipped. `RCSE_CONFIG` points at a different file.
//!
//! ```text
//! # rcse
//! grammar = /home/me/grammars/odata.json
//! max-line-length = 100
//! generate-css = on
//! ```

use std::env;
use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::prettify::DEFAULT_MAX_LINE_LENGTH;

const SETTINGS_FILE: &str = ".rcse.conf";
const SETTINGS_ENV: &str = "RCSE_CONFIG";
const LINE_LENGTH: RangeInclusive<usize> = 20..=400;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Grammar document used when none is given on the command line
    pub grammar: Option<PathBuf>,
    /// Line length handed to the prettifier
    pub max_line_length: usize,
    /// Whether `highlight` prepends the generated stylesheet
    pub generate_css: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grammar: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            generate_css: false,
        }
    }
}

impl Settings {
    /// `$RCSE_CONFIG`, else `.rcse.conf` in the home directory
    pub fn settings_path() -> Option<PathBuf> {
        if let Some(path) = env::var_os(SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }
        ["HOME", "USERPROFILE"]
            .into_iter()
            .find_map(env::var_os)
            .map(|home| PathBuf::from(home).join(SETTINGS_FILE))
    }

    /// Settings from the settings file; a missing file means defaults
    pub fn load() -> Self {
        let path = match Self::settings_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), "loaded settings");
                Self::from_contents(&contents)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings file unreadable, using defaults");
                Self::default()
            }
        }
    }

    /// Settings described by file contents
    ///
    /// Lines that cannot be used are logged and skipped; the rest still apply.
    pub fn from_contents(contents: &str) -> Self {
        let mut settings = Self::default();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let outcome = match line.split_once('=') {
                Some((key, value)) => settings.set(key.trim(), value.trim()),
                None => Err("expected key = value"),
            };
            if let Err(reason) = outcome {
                warn!(line = index + 1, text = line, "ignoring setting: {}", reason);
            }
        }

        settings
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), &'static str> {
        match key.to_ascii_lowercase().as_str() {
            "grammar" if value.is_empty() => Err("grammar path is empty"),
            "grammar" => {
                self.grammar = Some(PathBuf::from(value));
                Ok(())
            }
            "max-line-length" => {
                let length: usize = value
                    .parse()
                    .map_err(|_| "max-line-length must be a whole number")?;
                self.max_line_length = length.clamp(*LINE_LENGTH.start(), *LINE_LENGTH.end());
                Ok(())
            }
            "generate-css" => {
                self.generate_css = switch(value).ok_or("generate-css must be on or off")?;
                Ok(())
            }
            _ => Err("unknown key"),
        }
    }
}

/// `on`/`off` and the usual spellings of each
fn switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
