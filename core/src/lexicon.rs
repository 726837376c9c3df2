//! Pinyin -> candidate-characters lexicon.
//!
//! Backed by a `BTreeMap` rather than the hash-map-based lexicon this crate
//! used to carry: `starts_with` needs a deterministic key ordering, and a
//! `BTreeMap` gives that for free via range scans with no separate FST index.
//!
//! Reference upstream schema: `lexicon_aggregate.json`'s `base_pinyin_to_chars`
//! field, confirmed against `examples/original_source/src/cli/infer.py`.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bonus::BonusTable;
use crate::error::{Error, Result};

/// Hard cap on the number of syllables returned by [`Lexicon::starts_with`].
pub const PREFIX_CAP: usize = 10;

#[derive(Debug, Default, Deserialize, Serialize)]
struct AggregateRecord {
    #[serde(default)]
    base_pinyin_to_chars: BTreeMap<String, Vec<char>>,
    #[serde(default)]
    word_bigram_bonus: HashMap<String, f64>,
}

/// Ordered pinyin -> candidate-characters mapping, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    map: BTreeMap<String, Vec<char>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate characters for an exact pinyin key, in the order the source
    /// listed them. Empty if the pinyin is unknown.
    pub fn candidates_of(&self, pinyin: &str) -> &[char] {
        self.map.get(pinyin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Up to [`PREFIX_CAP`] syllables whose key starts with `prefix`, in
    /// lexicographic (and therefore deterministic) order.
    pub fn starts_with(&self, prefix: &str) -> Vec<&str> {
        self.map
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .take(PREFIX_CAP)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Insert (or replace) the candidate list for a pinyin key. Intended for
    /// tests and programmatic construction; the primary path is
    /// [`Lexicon::load_aggregate`].
    pub fn insert(&mut self, pinyin: impl Into<String>, candidates: Vec<char>) {
        self.map.insert(pinyin.into(), candidates);
    }

    /// Load the `base_pinyin_to_chars` (and optional `word_bigram_bonus`)
    /// fields of a `lexicon_aggregate.json` file. Other top-level fields are
    /// ignored.
    pub fn load_aggregate<P: AsRef<Path>>(path: P) -> Result<(Self, BonusTable)> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|_| Error::ResourceMissing(path.to_path_buf()))?;
        let reader = BufReader::new(file);
        let record: AggregateRecord = serde_json::from_reader(reader)?;
        let bonus = BonusTable::from_raw(&record.word_bigram_bonus)?;
        tracing::debug!(
            syllables = record.base_pinyin_to_chars.len(),
            bonus_pairs = bonus.len(),
            path = %path.display(),
            "loaded lexicon aggregate"
        );
        Ok((
            Self {
                map: record.base_pinyin_to_chars,
            },
            bonus,
        ))
    }

    /// Load only the `word_bigram_bonus` field of an aggregate-shaped JSON
    /// file, ignoring `base_pinyin_to_chars`. Used by drivers that keep the
    /// bonus table in a separate file from the main lexicon aggregate.
    pub fn load_bonus<P: AsRef<Path>>(path: P) -> Result<BonusTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|_| Error::ResourceMissing(path.to_path_buf()))?;
        let reader = BufReader::new(file);
        let record: AggregateRecord = serde_json::from_reader(reader)?;
        BonusTable::from_raw(&record.word_bigram_bonus)
    }
}
