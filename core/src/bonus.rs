//! Optional character-pair additive bonus, applied to transition scores.
//!
//! Reference: `lexicon_aggregate.json`'s `word_bigram_bonus` field, as read by
//! `examples/original_source/src/cli/infer.py`.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Additive log-score keyed by an ordered character pair `(prev, cur)`.
/// Absent pairs contribute `0.0`.
#[derive(Debug, Clone, Default)]
pub struct BonusTable {
    table: HashMap<(char, char), f64>,
}

impl BonusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prev: char, cur: char, bonus: f64) {
        self.table.insert((prev, cur), bonus);
    }

    /// Additive bonus for the transition `prev -> cur`; `0.0` if unset.
    pub fn get(&self, prev: char, cur: char) -> f64 {
        self.table.get(&(prev, cur)).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Build a table from the raw `word_bigram_bonus` JSON map, where each key
    /// is the concatenation of exactly two Han characters. A key that does not
    /// decode to exactly two `char`s is a malformed resource, not silently
    /// dropped.
    pub fn from_raw(raw: &HashMap<String, f64>) -> Result<Self> {
        let mut table = HashMap::with_capacity(raw.len());
        for (key, bonus) in raw {
            let mut chars = key.chars();
            let a = chars.next();
            let b = chars.next();
            let rest = chars.next();
            match (a, b, rest) {
                (Some(a), Some(b), None) => {
                    table.insert((a, b), *bonus);
                }
                _ => {
                    return Err(Error::ResourceMalformed(format!(
                        "word_bigram_bonus key {key:?} is not exactly two characters"
                    )));
                }
            }
        }
        Ok(Self { table })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_pair_is_zero() {
        let bonus = BonusTable::new();
        assert_eq!(bonus.get('你', '好'), 0.0);
    }

    #[test]
    fn present_pair_returns_stored_value() {
        let mut bonus = BonusTable::new();
        bonus.insert('你', '号', 1.0);
        assert_eq!(bonus.get('你', '号'), 1.0);
        assert_eq!(bonus.get('你', '好'), 0.0);
    }

    #[test]
    fn from_raw_rejects_non_two_char_keys() {
        let mut raw = HashMap::new();
        raw.insert("你".to_string(), 1.0);
        assert!(BonusTable::from_raw(&raw).is_err());
    }

    #[test]
    fn from_raw_accepts_two_char_keys() {
        let mut raw = HashMap::new();
        raw.insert("你号".to_string(), 1.0);
        let table = BonusTable::from_raw(&raw).unwrap();
        assert_eq!(table.get('你', '号'), 1.0);
    }
}
