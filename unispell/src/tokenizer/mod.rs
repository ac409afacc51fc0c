//! Word tokenization over Unicode word boundaries.
use unic_segment::Words;

/// Tokenizing extensions for string slices.
pub trait Tokenize {
    /// Segments containing at least one word character.
    fn words(&self) -> Words;
    /// Maximal runs of word characters.
    ///
    /// Segments such as `don't` are split further into `don` and `t`, so every
    /// token consists of alphanumerics and `_` only.
    fn tokens(&self) -> Tokens;
}

impl Tokenize for str {
    fn words(&self) -> Words {
        Words::new(self, |s| s.chars().any(is_word_char))
    }

    fn tokens(&self) -> Tokens {
        Tokens {
            words: self.words(),
            rest: "",
        }
    }
}

#[inline]
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Iterator returned by [`Tokenize::tokens`].
pub struct Tokens<'a> {
    words: Words<'a>,
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let rest = self.rest.trim_start_matches(|c: char| !is_word_char(c));
            if !rest.is_empty() {
                let end = rest
                    .char_indices()
                    .find(|(_, c)| !is_word_char(*c))
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                self.rest = &rest[end..];
                return Some(&rest[..end]);
            }

            self.rest = self.words.next()?;
        }
    }
}
