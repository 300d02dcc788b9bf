//! Rolling keystroke buffer that watches for the easter-egg word.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct SecretPhraseDetector {
    target: Vec<char>,
    buffer: VecDeque<char>,
}

impl SecretPhraseDetector {
    pub fn new(word: &str) -> Self {
        let target: Vec<char> = word.chars().flat_map(char::to_lowercase).collect();
        Self {
            buffer: VecDeque::with_capacity(target.len()),
            target,
        }
    }

    /// Feed one `KeyboardEvent.key` value. Returns `true` exactly when the
    /// buffer completes the word; the buffer is cleared in that case.
    ///
    /// Named keys (`Shift`, `Enter`, ...) carry no character and are skipped.
    pub fn push_key(&mut self, key: &str) -> bool {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return false;
        };
        if self.target.is_empty() {
            return false;
        }
        for lc in c.to_lowercase() {
            self.buffer.push_back(lc);
            while self.buffer.len() > self.target.len() {
                self.buffer.pop_front();
            }
        }
        if self.buffer.iter().eq(self.target.iter()) {
            self.buffer.clear();
            return true;
        }
        false
    }

    pub fn buffered(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn capacity(&self) -> usize {
        self.target.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(d: &mut SecretPhraseDetector, keys: &str) -> usize {
        keys.chars()
            .filter(|c| d.push_key(&c.to_string()))
            .count()
    }

    #[test]
    fn word_triggers_once() {
        let mut d = SecretPhraseDetector::new("learn");
        assert_eq!(feed(&mut d, "learn"), 1);
        assert_eq!(d.buffered(), "");
    }

    #[test]
    fn trailing_key_does_not_retrigger() {
        let mut d = SecretPhraseDetector::new("learn");
        assert_eq!(feed(&mut d, "learnn"), 1);
        assert_eq!(d.buffered(), "n");
    }

    #[test]
    fn case_insensitive_and_prefixed_noise() {
        let mut d = SecretPhraseDetector::new("learn");
        assert_eq!(feed(&mut d, "xxLEaRN"), 1);
        assert_eq!(feed(&mut d, "learnlearn"), 2);
    }

    #[test]
    fn buffer_never_exceeds_word_length() {
        let mut d = SecretPhraseDetector::new("learn");
        for c in "abcdefghijklmnopqrstuvwxyz".chars() {
            d.push_key(&c.to_string());
            assert!(d.buffered().chars().count() <= d.capacity());
        }
        assert_eq!(d.buffered(), "vwxyz");
    }

    #[test]
    fn named_keys_are_ignored() {
        let mut d = SecretPhraseDetector::new("learn");
        for key in ["l", "e", "Shift", "a", "r", "Enter", "n"] {
            let hit = d.push_key(key);
            assert_eq!(hit, key == "n");
        }
    }
}
