use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::figfont::{self, Font, FontLoadData, ParseError};

const FONT_EXTENSION: &str = "flf";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("font not found: {0}")]
    NotFound(String),

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },
}

#[inline(always)]
fn is_font_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(FONT_EXTENSION))
}

#[inline(always)]
fn font_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parses one `.flf` file and names the font after the file stem.
pub fn load_file(path: &Path) -> Result<Font, LibraryError> {
    let name = font_name_from_path(path);
    let file = fs::File::open(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let FontLoadData {
        mut font,
        diagnostics,
        ..
    } = figfont::parse(BufReader::new(file)).map_err(|source| LibraryError::Parse {
        name: name.clone(),
        source,
    })?;

    for d in &diagnostics {
        warn!("Font '{name}': {d}");
    }
    font.name = name;
    info!(
        "Loaded font '{}' from '{}' ({} glyphs)",
        font.name,
        path.display(),
        font.letters.len()
    );
    Ok(font)
}

/// Read-only set of fonts from one directory, parsed on first use.
#[derive(Debug, Default)]
pub struct FontLibrary {
    paths: FxHashMap<String, PathBuf>,
    fonts: FxHashMap<String, Arc<Font>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every `*.flf` in `dir` (non-recursive).
    pub fn open(dir: &Path) -> Result<Self, LibraryError> {
        let io_err = |source: std::io::Error| LibraryError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut lib = Self::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !is_font_file(&path) {
                continue;
            }
            let name = font_name_from_path(&path);
            if let Some(prev) = lib.paths.insert(name.clone(), path) {
                warn!("Font '{name}' found twice, ignoring '{}'", prev.display());
            }
        }
        debug!("Indexed {} fonts in '{}'", lib.paths.len(), dir.display());
        Ok(lib)
    }

    /// Registers an already parsed font under its name, replacing any earlier one.
    pub fn insert(&mut self, font: Font) -> Arc<Font> {
        let font = Arc::new(font);
        self.fonts.insert(font.name.clone(), Arc::clone(&font));
        font
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .paths
            .keys()
            .chain(self.fonts.keys())
            .cloned()
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn get(&mut self, name: &str) -> Result<Arc<Font>, LibraryError> {
        if let Some(font) = self.fonts.get(name) {
            debug!("Font '{name}' served from cache");
            return Ok(Arc::clone(font));
        }
        let path = self
            .paths
            .get(name)
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))?;
        let font = load_file(path)?;
        Ok(self.insert(font))
    }
}
