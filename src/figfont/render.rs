use super::error::RenderError;
use super::font::{CodePoint, Font, GlyphRows};

#[inline(always)]
fn glyph_width(rows: &GlyphRows) -> usize {
    rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
}

#[inline(always)]
fn push_row(out: &mut String, row: &str, hardblank: char) {
    out.extend(row.chars().map(|ch| if ch == hardblank { ' ' } else { ch }));
}

/// Renders a phrase given as code points. Right-to-left fonts reverse the whole
/// phrase first. Rows are joined with `\n`; nothing is returned on a missing glyph.
pub fn render_code_points<I>(font: &Font, phrase: I) -> Result<String, RenderError>
where
    I: IntoIterator<Item = CodePoint>,
{
    let mut code_points: Vec<CodePoint> = phrase.into_iter().collect();
    if font.is_right_to_left() {
        code_points.reverse();
    }

    let glyphs = code_points
        .iter()
        .map(|&cp| {
            font.glyph(cp)
                .map(|rows| (rows, glyph_width(rows)))
                .ok_or(RenderError::UnknownGlyph(cp))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut lines = Vec::with_capacity(font.height);
    for row in 0..font.height {
        let mut line = String::new();
        for &(rows, width) in &glyphs {
            match rows.get(row) {
                Some(text) => push_row(&mut line, text, font.hardblank),
                // Glyph closed early: keep later columns aligned.
                None => line.extend(std::iter::repeat_n(' ', width)),
            }
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

pub fn render(font: &Font, phrase: &str) -> Result<String, RenderError> {
    render_code_points(font, phrase.chars().map(|ch| ch as CodePoint))
}

impl Font {
    #[inline(always)]
    pub fn render(&self, phrase: &str) -> Result<String, RenderError> {
        render(self, phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::{render, render_code_points};
    use crate::figfont::error::RenderError;
    use crate::figfont::font::Font;

    const FIXTURE: &str = include_str!("../../fonts/3x5.flf");

    fn fixture() -> Font {
        Font::from_reader(FIXTURE.as_bytes()).expect("fixture should parse")
    }

    #[test]
    fn glyph_rows_are_concatenated() {
        let font = fixture();
        let out = render(&font, "#A").expect("both glyphs exist");
        let expected = [
            "        ",
            "# #  #  ",
            "### # # ",
            "# # ### ",
            "### # # ",
            "# # # # ",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn hardblank_becomes_space_without_changing_width() {
        let font = fixture();
        let out = render(&font, " ").unwrap();
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 6);
        for line in lines {
            assert_eq!(line, "    ");
        }
        assert!(!out.contains('$'));
    }

    #[test]
    fn hardblank_is_font_specific() {
        let mut font = Font::empty('%', 1, 1, 0);
        font.letters.insert(65, vec!["a%$b".to_string()]);
        assert_eq!(render(&font, "A").unwrap(), "a $b");
    }

    #[test]
    fn unknown_glyph_fails_without_output() {
        let font = fixture();
        assert_eq!(render(&font, "A?B"), Err(RenderError::UnknownGlyph('?' as i32)));
        assert_eq!(
            render_code_points(&font, [65, -7]),
            Err(RenderError::UnknownGlyph(-7))
        );
    }

    #[test]
    fn right_to_left_matches_reversed_phrase() {
        let ltr = fixture();
        let mut rtl = ltr.clone();
        rtl.print_direction = 1;
        assert_eq!(render(&rtl, "AB!").unwrap(), render(&ltr, "!BA").unwrap());

        rtl.print_direction = -1;
        assert_eq!(render(&rtl, "C#").unwrap(), render(&ltr, "#C").unwrap());
    }

    #[test]
    fn rendering_is_repeatable() {
        let font = fixture();
        let first = render(&font, "ABC \u{0422}").unwrap();
        let second = font.render("ABC \u{0422}").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_phrase_renders_blank_rows() {
        let font = fixture();
        assert_eq!(render(&font, "").unwrap(), "\n\n\n\n\n");
    }

    #[test]
    fn short_glyph_is_padded_to_its_width() {
        let mut font = Font::empty('$', 3, 3, 0);
        font.letters.insert(65, vec!["ab".to_string(), "a".to_string()]);
        font.letters.insert(66, vec!["x".to_string(), "y".to_string(), "z".to_string()]);
        assert_eq!(render(&font, "AB").unwrap(), "abx\nay\n  z");
    }
}
