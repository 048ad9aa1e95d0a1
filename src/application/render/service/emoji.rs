//! Emoji glyph substitution.
//!
//! Recognised emoji sequences are swapped for `<img class="emoji">` tags that
//! point at externally hosted SVG glyphs, so every renderer draws the same
//! artwork. Matching is longest-first, which keeps skin-tone modifiers and
//! ZWJ sequences together.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::markup::Markup;

const VARIATION_EMOJI: char = '\u{FE0F}';
const VARIATION_TEXT: char = '\u{FE0E}';
const ZERO_WIDTH_JOINER: char = '\u{200D}';
const COMBINING_KEYCAP: char = '\u{20E3}';

struct EmojiTable {
    sequences: HashSet<String>,
    max_chars: usize,
}

impl EmojiTable {
    fn build() -> Self {
        let mut sequences = HashSet::new();
        for emoji in emojis::iter() {
            insert_with_variants(&mut sequences, emoji.as_str());
            if let Some(tones) = emoji.skin_tones() {
                for toned in tones {
                    insert_with_variants(&mut sequences, toned.as_str());
                }
            }
        }

        let max_chars = sequences
            .iter()
            .map(|sequence| sequence.chars().count())
            .max()
            .unwrap_or(1);

        Self {
            sequences,
            max_chars,
        }
    }

    /// Byte length of the longest emoji sequence at the start of `text`.
    fn longest_match(&self, text: &str) -> Option<usize> {
        let ends: Vec<usize> = text
            .char_indices()
            .take(self.max_chars)
            .map(|(idx, ch)| idx + ch.len_utf8())
            .collect();

        ends.into_iter()
            .rev()
            .find(|&end| self.sequences.contains(&text[..end]))
    }
}

/// Characters that stay text unless U+FE0F explicitly asks for emoji.
const SELECTOR_REQUIRED: [char; 4] = ['\u{00A9}', '\u{00AE}', '\u{2122}', '\u{265F}'];

/// Also register the form without U+FE0F, which is how most keyboards emit
/// emoji, unless that leaves a lone ASCII character such as a digit or a
/// character from [`SELECTOR_REQUIRED`].
fn insert_with_variants(sequences: &mut HashSet<String>, sequence: &str) {
    sequences.insert(sequence.to_string());

    let stripped: String = sequence.chars().filter(|&c| c != VARIATION_EMOJI).collect();
    let mut chars = stripped.chars();
    let lone = match (chars.next(), chars.next()) {
        (Some(only), None) => only.is_ascii() || SELECTOR_REQUIRED.contains(&only),
        _ => false,
    };
    if !stripped.is_empty() && !lone {
        sequences.insert(stripped);
    }
}

static EMOJI_TABLE: Lazy<EmojiTable> = Lazy::new(EmojiTable::build);

/// Glyph file name for a sequence: lowercase hex code points joined by `-`,
/// with U+FE0F dropped unless the sequence is joined by U+200D.
pub(crate) fn glyph_id(sequence: &str) -> String {
    let keep_selector = sequence.contains(ZERO_WIDTH_JOINER);
    sequence
        .chars()
        .filter(|&c| keep_selector || c != VARIATION_EMOJI)
        .map(|c| format!("{:x}", u32::from(c)))
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone)]
pub struct EmojiReplacer {
    base_url: String,
}

impl EmojiReplacer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn substitute(&self, markup: Markup) -> Markup {
        Markup::from_rewrite(self.substitute_str(markup.as_str()))
    }

    fn substitute_str(&self, input: &str) -> String {
        let table = &*EMOJI_TABLE;
        let mut output = String::with_capacity(input.len());
        let mut in_tag = false;
        let mut offset = 0;

        while let Some(ch) = input[offset..].chars().next() {
            let rest = &input[offset..];

            if in_tag || ch == '<' {
                in_tag = ch != '>';
                output.push(ch);
                offset += ch.len_utf8();
                continue;
            }

            if !could_start_emoji(rest) {
                output.push(ch);
                offset += ch.len_utf8();
                continue;
            }

            match table.longest_match(rest) {
                Some(len) if !rest[len..].starts_with(VARIATION_TEXT) => {
                    self.push_glyph(&mut output, &rest[..len]);
                    offset += len;
                }
                Some(len) => {
                    output.push_str(&rest[..len]);
                    offset += len;
                }
                None => {
                    output.push(ch);
                    offset += ch.len_utf8();
                }
            }
        }

        output
    }

    fn push_glyph(&self, output: &mut String, sequence: &str) {
        output.push_str(r#"<img class="emoji" draggable="false" alt=""#);
        output.push_str(sequence);
        output.push_str(r#"" src=""#);
        output.push_str(&self.base_url);
        output.push_str("svg/");
        output.push_str(&glyph_id(sequence));
        output.push_str(r#".svg"/>"#);
    }
}

/// ASCII only starts an emoji as part of a keycap sequence.
fn could_start_emoji(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii() => {
            matches!(chars.next(), Some(VARIATION_EMOJI | COMBINING_KEYCAP))
        }
        Some(_) => true,
        None => false,
    }
}
