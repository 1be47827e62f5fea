use crate::units::Px;
use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

/// Anything that can report how wide a string would be if drawn. Implemented by
/// [SizedFont](crate::SizedFont) and by any `Fn(&str) -> f32` returning pixels, which
/// makes it easy to lay text out against synthetic metrics.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> Px;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn text_width(&self, text: &str) -> Px {
        Px(self(text))
    }
}

/// One wrapped line of text. Words are joined by single spaces; a line is only
/// ever empty when it stands for a blank paragraph.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deref, Display, From)]
pub struct Line(String);

impl Line {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The words making up the line, in order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|w| !w.is_empty())
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Line(s.to_string())
    }
}

impl From<Line> for String {
    fn from(line: Line) -> Self {
        line.0
    }
}

impl PartialEq<&str> for Line {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// What to do with paragraphs that contain nothing but whitespace
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankLines {
    /// Emit one empty [Line] per blank paragraph so the spacing of the message survives
    #[default]
    Preserve,
    /// Drop blank paragraphs entirely
    Collapse,
}

/// Wraps `text` into lines no wider than `max_width` as reported by `measure`.
///
/// # Wrapping Behavior
///
/// The text is split into paragraphs at newlines (`\r\n` and lone `\r` count as
/// newlines too), and each paragraph into whitespace-separated words. Words are
/// added greedily: the next word is appended tentatively, and if the resulting
/// line measures wider than `max_width` the line so far is finished and the word
/// starts the next one.
///
/// Words are never split. A word that is wider than `max_width` on its own gets a
/// line to itself and overflows; with a non-positive `max_width` every word does.
///
/// Paragraphs never share a line. Blank paragraphs are handled according to
/// `blank_lines`.
///
/// # Returns
///
/// The lines in reading order. Empty `text` yields no lines at all.
pub fn wrap_text<M>(text: &str, measure: &M, max_width: Px, blank_lines: BlankLines) -> Vec<Line>
where
    M: TextMeasure + ?Sized,
{
    if text.is_empty() {
        return Vec::new();
    }

    // normalize newlines
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<Line> = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            if blank_lines == BlankLines::Preserve {
                lines.push(Line::default());
            }
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if measure.text_width(&candidate) <= max_width {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(Line(std::mem::take(&mut current)));
                }
                current = word.to_string();
            }
        }

        if !current.is_empty() {
            lines.push(Line(current));
        }
    }

    tracing::trace!(
        lines = lines.len(),
        max_width = max_width.0,
        "wrapped text"
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// every character is 10px wide
    fn mono(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    fn wrap(text: &str, max_width: f32) -> Vec<Line> {
        wrap_text(text, &mono, Px(max_width), BlankLines::Preserve)
    }

    #[test]
    fn empty_text_yields_no_lines() {
        assert!(wrap("", 100.0).is_empty());
        assert!(wrap_text("", &mono, Px(100.0), BlankLines::Collapse).is_empty());
    }

    #[test]
    fn greedy_fill() {
        // "WELCOME TO" is exactly 100px and still fits
        let lines = wrap("WELCOME TO OREGON", 100.0);
        assert_eq!(lines, vec!["WELCOME TO", "OREGON"]);
    }

    #[test]
    fn single_overflowing_word_is_kept_whole() {
        let lines = wrap("SUPERCALIFRAGILISTIC", 50.0);
        assert_eq!(lines, vec!["SUPERCALIFRAGILISTIC"]);
    }

    #[test]
    fn overflowing_word_gets_its_own_line() {
        let lines = wrap("A SUPERCALIFRAGILISTIC B", 50.0);
        assert_eq!(lines, vec!["A", "SUPERCALIFRAGILISTIC", "B"]);
    }

    #[test]
    fn non_positive_width_puts_one_word_per_line() {
        assert_eq!(wrap("ONE TWO THREE", 0.0), vec!["ONE", "TWO", "THREE"]);
        assert_eq!(wrap("ONE TWO", -20.0), vec!["ONE", "TWO"]);
    }

    #[test]
    fn blank_lines_are_preserved() {
        let lines = wrap("LINE ONE\n\nLINE TWO", 1000.0);
        assert_eq!(lines, vec!["LINE ONE", "", "LINE TWO"]);
    }

    #[test]
    fn whitespace_only_paragraph_counts_as_blank() {
        let lines = wrap("A\n  \t \nB", 1000.0);
        assert_eq!(lines, vec!["A", "", "B"]);
    }

    #[test]
    fn blank_lines_can_be_collapsed() {
        let lines = wrap_text("LINE ONE\n\n\nLINE TWO", &mono, Px(1000.0), BlankLines::Collapse);
        assert_eq!(lines, vec!["LINE ONE", "LINE TWO"]);
    }

    #[test]
    fn paragraphs_never_share_a_line() {
        let lines = wrap("A\nB", 1000.0);
        assert_eq!(lines, vec!["A", "B"]);
    }

    #[test]
    fn carriage_returns_are_newlines() {
        assert_eq!(wrap("A\r\nB\rC", 1000.0), vec!["A", "B", "C"]);
    }

    #[test]
    fn runs_of_whitespace_collapse_to_one_space() {
        assert_eq!(wrap("  HELLO    \t WORLD  ", 1000.0), vec!["HELLO WORLD"]);
    }

    #[test]
    fn trailing_newline_leaves_a_blank_line() {
        assert_eq!(wrap("HELLO\n", 1000.0), vec!["HELLO", ""]);
    }

    #[test]
    fn lines_respect_max_width() {
        let text = lipsum::lipsum(300).to_uppercase();
        // longest lipsum word is well under 200px at 10px per char
        for max_width in [200.0, 333.0, 480.0, 1000.0] {
            for line in wrap(&text, max_width) {
                assert!(
                    mono(&line) <= max_width,
                    "{line:?} is wider than {max_width}"
                );
            }
        }
    }

    #[test]
    fn words_are_preserved_in_order() {
        let text = lipsum::lipsum_words(250).to_uppercase();
        let expected: Vec<&str> = text.split_whitespace().collect();
        for max_width in [0.0, 120.0, 400.0, 10_000.0] {
            let lines = wrap(&text, max_width);
            let words: Vec<&str> = lines.iter().flat_map(|l| l.words()).collect();
            assert_eq!(words, expected);
        }
    }

    #[test]
    fn wrapping_is_deterministic() {
        let text = lipsum::lipsum(120);
        assert_eq!(wrap(&text, 250.0), wrap(&text, 250.0));
    }

    #[test]
    fn measurement_is_of_the_joined_line() {
        // a measurer that charges extra for spaces
        let spacey = |s: &str| s.chars().map(|c| if c == ' ' { 50.0 } else { 10.0 }).sum::<f32>();
        let lines = wrap_text("AB CD", &spacey, Px(80.0), BlankLines::Preserve);
        assert_eq!(lines, vec!["AB", "CD"]);
    }
}
