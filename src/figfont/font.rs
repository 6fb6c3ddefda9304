use std::io::BufRead;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::error::ParseError;
use super::parsing;

/* ======================= TYPES ======================= */

/// Signed on purpose: FLF allows negative codes for glyphs outside Unicode.
pub type CodePoint = i32;

/// One glyph: `height` rows, end-marks already stripped.
pub type GlyphRows = Vec<String>;

/// A parsed FIGlet font. Immutable once the parser hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    /// Assigned by whoever loaded the font; the parser leaves it empty.
    #[serde(default)]
    pub name: String,
    pub hardblank: char,
    pub height: usize,
    pub baseline: i32,
    #[serde(default)]
    pub print_direction: i32,
    pub letters: FxHashMap<CodePoint, GlyphRows>,
}

impl Font {
    pub(crate) fn empty(
        hardblank: char,
        height: usize,
        baseline: i32,
        print_direction: i32,
    ) -> Self {
        Self {
            name: String::new(),
            hardblank,
            height,
            baseline,
            print_direction,
            letters: FxHashMap::default(),
        }
    }

    /// Parses FLF data, discarding diagnostics. See [`parsing::parse`] for the full result.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        parsing::parse(reader).map(|data| data.font)
    }

    #[inline(always)]
    pub fn glyph(&self, code_point: CodePoint) -> Option<&GlyphRows> {
        self.letters.get(&code_point)
    }

    #[inline(always)]
    pub const fn is_right_to_left(&self) -> bool {
        self.print_direction != 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::Font;

    const FIXTURE: &str = include_str!("../../fonts/3x5.flf");

    #[test]
    fn glyph_table_includes_directive_code_points() {
        let font = Font::from_reader(FIXTURE.as_bytes()).expect("fixture should parse");
        let mut keys: Vec<i32> = font.letters.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![32, 33, 34, 35, 65, 66, 67, 1058]);
        assert!(font.glyph(1058).is_some());
        assert!(font.glyph(36).is_none());
        assert!(font.name.is_empty(), "parser must not name the font");
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let mut font = Font::from_reader(FIXTURE.as_bytes()).expect("fixture should parse");
        font.name = "3x5".to_string();
        let json = font.to_json().expect("font should serialize");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "3x5");
        assert_eq!(value["hardblank"], "$");
        assert_eq!(value["height"], 6);
        assert_eq!(value["printDirection"], 0);
        assert_eq!(value["letters"]["33"][1], " #  ");

        let back = Font::from_json(&json).expect("font should deserialize");
        assert_eq!(back, font);
    }

    #[test]
    fn json_without_name_or_direction_uses_defaults() {
        let json = r#"{"hardblank":"$","height":1,"baseline":1,"letters":{"65":["A"]}}"#;
        let font = Font::from_json(json).expect("minimal font should deserialize");
        assert!(font.name.is_empty());
        assert_eq!(font.print_direction, 0);
        assert_eq!(font.glyph(65), Some(&vec!["A".to_string()]));
    }
}
