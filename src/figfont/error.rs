use thiserror::Error;

/// Failures that abort a font parse. No partial font survives an error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("bad font signature (expected a header starting with \"flf2\")")]
    InvalidSignature,

    #[error("malformed header field {field}: {value:?}")]
    MalformedHeader { field: &'static str, value: String },

    #[error("line {line}: malformed character code {text:?}")]
    MalformedCharCode { line: usize, text: String },

    #[error("line {line}: malformed glyph block ({reason})")]
    MalformedGlyphBlock { line: usize, reason: &'static str },

    #[error("failed to read font data: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unknown letter (code point {0})")]
    UnknownGlyph(i32),
}
