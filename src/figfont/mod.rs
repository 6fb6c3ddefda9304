//! FIGlet (FLF) fonts: parsing into a code-point glyph table and plain
//! concatenating render with hardblank substitution.

pub mod error;
pub mod font;
pub mod parsing;
pub mod render;

pub use error::{ParseError, RenderError};
pub use font::{CodePoint, Font, GlyphRows};
pub use parsing::{Diagnostic, FontLoadData, Header, parse, parse_char_code, parse_header};
pub use render::{render, render_code_points};
