use log::{LevelFilter, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, PoisonError};

pub const CONFIG_PATH: &str = "asciiwrite.ini";

/// `[Section]` / `key=value` reader for `asciiwrite.ini`. Keys before the
/// first section land in the "" section; `;` and `#` start comment lines.
#[derive(Debug, Default)]
pub struct SimpleIni {
    sections: HashMap<String, HashMap<String, String>>,
}

impl SimpleIni {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content);
        Ok(())
    }

    /// Replaces any previously read sections.
    pub fn parse_str(&mut self, content: &str) {
        self.sections.clear();

        let mut current_section: Option<String> = None;

        for raw_line in content.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                let section = line[1..line.len() - 1].trim().to_string();
                current_section = Some(section.clone());
                self.sections.entry(section).or_default();
                continue;
            }

            if let Some((key_raw, value_raw)) = line.split_once('=') {
                let key = key_raw.trim();
                if key.is_empty() {
                    continue;
                }
                let section = current_section.clone().unwrap_or_default();
                self.sections
                    .entry(section)
                    .or_default()
                    .insert(key.to_string(), value_raw.trim().to_string());
            }
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section).and_then(|s| s.get(key)).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: LogLevel,
    pub font_dir: PathBuf,
    pub default_font: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            font_dir: PathBuf::from("fonts"),
            default_font: "3x5".to_string(),
        }
    }
}

impl Config {
    /// Missing keys keep their defaults; bad values are logged and ignored.
    pub fn from_ini(conf: &SimpleIni) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = conf.get("Options", "LogLevel") {
            match v.parse::<LogLevel>() {
                Ok(level) => cfg.log_level = level,
                Err(()) => warn!("Invalid LogLevel '{v}' in '{CONFIG_PATH}', using default."),
            }
        }
        if let Some(v) = conf.get("Options", "FontDir").filter(|v| !v.is_empty()) {
            cfg.font_dir = PathBuf::from(v);
        }
        if let Some(v) = conf.get("Options", "DefaultFont").filter(|v| !v.is_empty()) {
            cfg.default_font = v;
        }
        cfg
    }
}

static CONFIG: LazyLock<Mutex<Config>> = LazyLock::new(|| Mutex::new(Config::default()));

// --- File I/O ---

pub fn load() {
    if !Path::new(CONFIG_PATH).exists() {
        info!("'{CONFIG_PATH}' not found, using default values.");
        return;
    }

    let mut conf = SimpleIni::new();
    match conf.load(CONFIG_PATH) {
        Ok(()) => {
            let loaded = Config::from_ini(&conf);
            info!("Configuration loaded from '{CONFIG_PATH}'.");
            *CONFIG.lock().unwrap_or_else(PoisonError::into_inner) = loaded;
        }
        Err(e) => warn!("Failed to read '{CONFIG_PATH}': {e}. Using default values."),
    }
}

pub fn get() -> Config {
    CONFIG
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
