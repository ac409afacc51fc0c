//! Edit-distance-1 neighbourhood of a word.
use hashbrown::HashSet;

/// Letters used for replacements and insertions.
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Every string one deletion, adjacent transposition, replacement or
/// insertion away from `word`.
///
/// Works on `char`s, so non-ASCII input is never split inside a code point.
pub fn edits1(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    let mut out = HashSet::with_capacity(54 * len + 25);

    let splice = |left: &[char], mid: &[char], right: &[char]| -> String {
        left.iter().chain(mid).chain(right).collect()
    };

    for i in 0..=len {
        let (left, right) = chars.split_at(i);

        if !right.is_empty() {
            out.insert(splice(left, &[], &right[1..]));
        }

        if right.len() > 1 {
            out.insert(splice(left, &[right[1], right[0]], &right[2..]));
        }

        for c in LETTERS.chars() {
            if !right.is_empty() {
                out.insert(splice(left, &[c], &right[1..]));
            }
            out.insert(splice(left, &[c], right));
        }
    }

    out
}
