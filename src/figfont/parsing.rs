//! FLF font parser: header line, comment skip, then the glyph-block state machine.
//!
//! ```text
//!           flf2a$ 6 5 20 15 3 0 143 229
//!             |  | | | |  |  | |  |   |
//!            /  /  | | |  |  | |  |   \
//!   Signature  /  /  | |  |  | |   \   Codetag_Count
//!     Hardblank  /  /  |  |  |  \   Full_Layout
//!          Height  /   |  |   \  Print_Direction
//!          Baseline   /    \   Comment_Lines
//!           Max_Length      Old_Layout
//! ```
//!
//! Only hardblank, height, baseline, comment lines and print direction are read;
//! the layout fields are accepted and ignored.

use std::fmt;
use std::io::{self, BufRead};

use log::trace;

use super::error::ParseError;
use super::font::{CodePoint, Font};

const FONT_SIGNATURE: &str = "flf2";
const ENDMARK_CHARS: [char; 4] = ['@', '#', '%', '$'];
const FIRST_CODE_POINT: CodePoint = 32;
const MAX_HEIGHT: usize = 4096;

const HEADER_FIELDS: [&str; 7] = [
    "signature",
    "height",
    "baseline",
    "max_length",
    "old_layout",
    "comment_lines",
    "print_direction",
];

/* ======================= TYPES ======================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub hardblank: char,
    pub height: usize,
    pub baseline: i32,
    pub comment_lines: usize,
    pub print_direction: i32,
}

/// Non-fatal observations made while reading glyph data. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The stream ended inside the comment section.
    TruncatedComments { expected: usize, found: usize },
    EmptyLineSkipped { line: usize },
    /// Row closed the glyph because `height - 1` rows were already read, not
    /// because the terminator was doubled.
    ForcedFinalRow { line: usize, code_point: CodePoint },
    /// Doubled terminator arrived before `height` rows.
    ShortGlyph { line: usize, code_point: CodePoint, rows: usize },
    DuplicateGlyph { line: usize, code_point: CodePoint },
    /// Rows left over at end of stream without a final row; dropped.
    IncompleteGlyph { code_point: CodePoint, rows: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::TruncatedComments { expected, found } => write!(
                f,
                "stream ended after {found} of {expected} comment lines"
            ),
            Self::EmptyLineSkipped { line } => write!(f, "line {line}: empty line skipped"),
            Self::ForcedFinalRow { line, code_point } => write!(
                f,
                "line {line}: glyph {code_point} closed at font height without a doubled end-mark"
            ),
            Self::ShortGlyph {
                line,
                code_point,
                rows,
            } => write!(f, "line {line}: glyph {code_point} has only {rows} rows"),
            Self::DuplicateGlyph { line, code_point } => {
                write!(f, "line {line}: glyph {code_point} redefined")
            }
            Self::IncompleteGlyph { code_point, rows } => write!(
                f,
                "glyph {code_point} dropped: stream ended after {rows} rows"
            ),
        }
    }
}

pub struct FontLoadData {
    pub font: Font,
    pub header: Header,
    pub diagnostics: Vec<Diagnostic>,
}

/* ======================= LINE CURSOR ======================= */

/// Line iterator over raw bytes. Decodes lossily and strips `\n` / `\r\n`.
struct Lines<R> {
    inner: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> Lines<R> {
    const fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/* ======================= SMALL PARSERS ======================= */

#[inline(always)]
fn header_int(fields: &[&str], idx: usize) -> Result<i32, ParseError> {
    let raw = fields.get(idx).copied().unwrap_or_default();
    raw.parse::<i32>().map_err(|_| ParseError::MalformedHeader {
        field: HEADER_FIELDS[idx],
        value: raw.to_string(),
    })
}

/// Parses the `flf2a...` header line.
pub fn parse_header(line: &str) -> Result<Header, ParseError> {
    if !line.starts_with(FONT_SIGNATURE) {
        return Err(ParseError::InvalidSignature);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 6 {
        return Err(ParseError::MalformedHeader {
            field: HEADER_FIELDS[fields.len()],
            value: String::new(),
        });
    }
    let hardblank = fields[0]
        .chars()
        .next_back()
        .ok_or(ParseError::InvalidSignature)?;

    let height = header_int(&fields, 1)?;
    let height = usize::try_from(height)
        .ok()
        .filter(|&h| (1..=MAX_HEIGHT).contains(&h))
        .ok_or_else(|| ParseError::MalformedHeader {
            field: "height",
            value: fields[1].to_string(),
        })?;
    let baseline = header_int(&fields, 2)?;
    // Negative counts skip nothing.
    let comment_lines = usize::try_from(header_int(&fields, 5)?).unwrap_or(0);
    let print_direction = if fields.len() > 6 {
        header_int(&fields, 6)?
    } else {
        0
    };

    Ok(Header {
        hardblank,
        height,
        baseline,
        comment_lines,
        print_direction,
    })
}

/// Parses an extended character code directive (`<code> [comment]`).
/// `0x` prefix is hex, a leading `0` is octal, anything else decimal.
/// A single leading `-` negates; no other sign is accepted.
pub fn parse_char_code(line: &str) -> Option<CodePoint> {
    let token = line.split_whitespace().next()?;
    let (negative, unsigned) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (digits, radix) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (hex, 16)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (&unsigned[1..], 8)
    } else {
        (unsigned, 10)
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    CodePoint::try_from(if negative { -magnitude } else { magnitude }).ok()
}

#[inline(always)]
fn is_endmark(ch: char) -> bool {
    ENDMARK_CHARS.contains(&ch)
}

#[inline(always)]
fn ends_with_doubled(line: &str, terminator: char) -> bool {
    let mut tail = line.chars().rev();
    tail.next() == Some(terminator) && tail.next() == Some(terminator)
}

/// Drops `count` trailing characters; short lines become empty.
#[inline(always)]
fn strip_trailing(line: &str, count: usize) -> &str {
    let cut = line
        .char_indices()
        .rev()
        .nth(count.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    &line[..cut]
}

/* ======================= GLYPH STATE MACHINE ======================= */

#[derive(Default)]
struct GlyphBlock {
    rows: Vec<String>,
    terminator: Option<char>,
}

fn skip_comments<R: BufRead>(
    lines: &mut Lines<R>,
    count: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> io::Result<bool> {
    for found in 0..count {
        if lines.next_line()?.is_none() {
            diagnostics.push(Diagnostic::TruncatedComments {
                expected: count,
                found,
            });
            return Ok(false);
        }
    }
    Ok(true)
}

fn parse_letters<R: BufRead>(
    lines: &mut Lines<R>,
    font: &mut Font,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), ParseError> {
    let height = font.height;
    let end_len = if height > 1 { 2 } else { 1 };
    let mut code_point = FIRST_CODE_POINT;
    let mut block = GlyphBlock::default();

    while let Some(line) = lines.next_line()? {
        let line_no = lines.line_no;

        let Some(last) = line.chars().next_back() else {
            trace!("line {line_no}: empty, skipped");
            diagnostics.push(Diagnostic::EmptyLineSkipped { line: line_no });
            continue;
        };

        if !is_endmark(last) {
            if !block.rows.is_empty() {
                return Err(ParseError::MalformedGlyphBlock {
                    line: line_no,
                    reason: "character code directive inside an unfinished glyph",
                });
            }
            code_point =
                parse_char_code(&line).ok_or_else(|| ParseError::MalformedCharCode {
                    line: line_no,
                    text: line.clone(),
                })?;
            trace!("line {line_no}: next glyph code point set to {code_point}");
            continue;
        }

        let terminator = *block.terminator.get_or_insert(last);
        let doubled = ends_with_doubled(&line, terminator);
        let forced = block.rows.len() + 1 >= height;

        if !(doubled || forced) {
            block.rows.push(strip_trailing(&line, 1).to_string());
            continue;
        }

        if !doubled && height > 1 {
            diagnostics.push(Diagnostic::ForcedFinalRow {
                line: line_no,
                code_point,
            });
        }
        block.rows.push(strip_trailing(&line, end_len).to_string());
        if block.rows.len() < height {
            diagnostics.push(Diagnostic::ShortGlyph {
                line: line_no,
                code_point,
                rows: block.rows.len(),
            });
        }

        let rows = std::mem::take(&mut block.rows);
        block.terminator = None;
        trace!("line {line_no}: glyph {code_point} committed ({} rows)", rows.len());
        if font.letters.insert(code_point, rows).is_some() {
            diagnostics.push(Diagnostic::DuplicateGlyph {
                line: line_no,
                code_point,
            });
        }
        code_point = code_point.saturating_add(1);
    }

    if !block.rows.is_empty() {
        diagnostics.push(Diagnostic::IncompleteGlyph {
            code_point,
            rows: block.rows.len(),
        });
    }
    Ok(())
}

/// Parses a whole FLF font. All-or-nothing: on error nothing of the font survives.
pub fn parse<R: BufRead>(reader: R) -> Result<FontLoadData, ParseError> {
    let mut lines = Lines::new(reader);
    let header_line = lines.next_line()?.ok_or(ParseError::InvalidSignature)?;
    let header = parse_header(&header_line)?;
    trace!("header parsed: {header:?}");

    let mut font = Font::empty(
        header.hardblank,
        header.height,
        header.baseline,
        header.print_direction,
    );
    let mut diagnostics = Vec::new();

    if skip_comments(&mut lines, header.comment_lines, &mut diagnostics)? {
        parse_letters(&mut lines, &mut font, &mut diagnostics)?;
    }

    trace!(
        "font parsed: {} glyphs, {} diagnostics",
        font.letters.len(),
        diagnostics.len()
    );
    Ok(FontLoadData {
        font,
        header,
        diagnostics,
    })
}
