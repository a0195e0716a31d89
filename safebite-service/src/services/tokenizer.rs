//! Word tokenization for allergen detection.

/// Splits text into tokens. Loaded once at startup and shared read-only.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// English rule tokenizer.
///
/// Whitespace separates chunks; inside a chunk every run of alphanumeric
/// characters is a word token and every other character (punctuation,
/// hyphens, apostrophes) is a token of its own, so `"peanut-free,"` yields
/// `peanut`, `-`, `free`, `,`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleTokenizer;

impl Tokenizer for RuleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut word_buf = String::new();

        for chunk in text.split_whitespace() {
            for ch in chunk.chars() {
                if ch.is_alphanumeric() {
                    word_buf.push(ch);
                } else {
                    if !word_buf.is_empty() {
                        tokens.push(std::mem::take(&mut word_buf));
                    }
                    tokens.push(ch.to_string());
                }
            }

            if !word_buf.is_empty() {
                tokens.push(std::mem::take(&mut word_buf));
            }
        }

        tokens
    }
}
