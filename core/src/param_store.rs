//! HMM parameter store: initial, transition and emission log-probabilities.
//!
//! Reference upstream implementation: `examples/original_source/src/models/hmm.py`
//! (`HMMParams`, with `init`/`trans`/`emit` dict fields and JSON `save`/`load`).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel log-probability returned for any missing table entry.
///
/// Deliberately not actual floating-point negative infinity: downstream code
/// sums these values across a sequence, and `-inf + x` stays `-inf` forever,
/// swallowing any later signal. `-1e9` stays summable and still dominates any
/// realistic sequence of real log-probabilities.
pub const NEG_INF: f64 = -1e9;

/// On-disk schema for `hmm_params.json`. Character keys are stored as JSON
/// object keys, i.e. single-character strings; [`single_char`] converts them.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ParamRecord {
    #[serde(default)]
    init: HashMap<String, f64>,
    #[serde(default)]
    trans: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    emit: HashMap<String, HashMap<String, f64>>,
}

fn single_char(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::ResourceMalformed(format!(
            "expected a single character key, got {s:?}"
        ))),
    }
}

/// Initial, transition and emission log-probability tables over Han
/// characters. Immutable after construction; missing entries are synthesized
/// as [`NEG_INF`], never stored.
#[derive(Debug, Clone, Default)]
pub struct ParamStore {
    init: HashMap<char, f64>,
    trans: HashMap<char, HashMap<char, f64>>,
    emit: HashMap<char, HashMap<String, f64>>,
}

impl ParamStore {
    /// An empty store; every query returns [`NEG_INF`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_init(&self, c: char) -> f64 {
        self.init.get(&c).copied().unwrap_or(NEG_INF)
    }

    pub fn get_trans(&self, prev: char, c: char) -> f64 {
        self.trans
            .get(&prev)
            .and_then(|row| row.get(&c))
            .copied()
            .unwrap_or(NEG_INF)
    }

    pub fn get_emit(&self, c: char, pinyin: &str) -> f64 {
        self.emit
            .get(&c)
            .and_then(|row| row.get(pinyin))
            .copied()
            .unwrap_or(NEG_INF)
    }

    /// Insert an initial log-probability. Debug-asserts the invariant that
    /// stored values are finite (never `NEG_INF` itself).
    pub fn insert_init(&mut self, c: char, logprob: f64) {
        debug_assert!(logprob.is_finite());
        self.init.insert(c, logprob);
    }

    pub fn insert_trans(&mut self, prev: char, c: char, logprob: f64) {
        debug_assert!(logprob.is_finite());
        self.trans.entry(prev).or_default().insert(c, logprob);
    }

    pub fn insert_emit(&mut self, c: char, pinyin: impl Into<String>, logprob: f64) {
        debug_assert!(logprob.is_finite());
        self.emit
            .entry(c)
            .or_default()
            .insert(pinyin.into(), logprob);
    }

    /// Load a store from an `hmm_params.json` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|_| Error::ResourceMissing(path.to_path_buf()))?;
        let reader = BufReader::new(file);
        let record: ParamRecord = serde_json::from_reader(reader)?;

        let mut init = HashMap::with_capacity(record.init.len());
        for (k, v) in record.init {
            init.insert(single_char(&k)?, v);
        }

        let mut trans = HashMap::with_capacity(record.trans.len());
        for (prev, row) in record.trans {
            let prev = single_char(&prev)?;
            let mut out_row = HashMap::with_capacity(row.len());
            for (cur, v) in row {
                out_row.insert(single_char(&cur)?, v);
            }
            trans.insert(prev, out_row);
        }

        let mut emit = HashMap::with_capacity(record.emit.len());
        for (c, row) in record.emit {
            emit.insert(single_char(&c)?, row);
        }

        tracing::debug!(
            init = init.len(),
            trans = trans.len(),
            emit = emit.len(),
            path = %path.display(),
            "loaded hmm parameters"
        );
        Ok(Self { init, trans, emit })
    }

    /// Save this store to a path, round-trippable through [`ParamStore::load`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        let init = self
            .init
            .iter()
            .map(|(c, v)| (c.to_string(), *v))
            .collect();
        let trans = self
            .trans
            .iter()
            .map(|(prev, row)| {
                let row = row.iter().map(|(c, v)| (c.to_string(), *v)).collect();
                (prev.to_string(), row)
            })
            .collect();
        let emit = self
            .emit
            .iter()
            .map(|(c, row)| (c.to_string(), row.clone()))
            .collect();

        let record = ParamRecord { init, trans, emit };
        serde_json::to_writer_pretty(writer, &record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_yield_neg_inf() {
        let store = ParamStore::new();
        assert_eq!(store.get_init('你'), NEG_INF);
        assert_eq!(store.get_trans('你', '好'), NEG_INF);
        assert_eq!(store.get_emit('你', "ni"), NEG_INF);
    }

    #[test]
    fn insert_and_query_round_trip() {
        let mut store = ParamStore::new();
        store.insert_init('你', 0.6_f64.ln());
        store.insert_trans('你', '好', 0.7_f64.ln());
        store.insert_emit('你', "ni", 0.0);
        assert!((store.get_init('你') - 0.6_f64.ln()).abs() < 1e-9);
        assert!((store.get_trans('你', '好') - 0.7_f64.ln()).abs() < 1e-9);
        assert_eq!(store.get_emit('你', "ni"), 0.0);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hmm_params.json");

        let mut store = ParamStore::new();
        store.insert_init('你', -0.5);
        store.insert_trans('你', '好', -0.36);
        store.insert_emit('你', "ni", 0.0);
        store.save(&path).unwrap();

        let loaded = ParamStore::load(&path).unwrap();
        assert_eq!(loaded.get_init('你'), -0.5);
        assert_eq!(loaded.get_trans('你', '好'), -0.36);
        assert_eq!(loaded.get_emit('你', "ni"), 0.0);
    }

    #[test]
    fn load_missing_file_is_resource_missing() {
        let err = ParamStore::load("/nonexistent/hmm_params.json").unwrap_err();
        assert!(matches!(err, Error::ResourceMissing(_)));
    }

    #[test]
    fn load_rejects_multi_character_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hmm_params.json");
        std::fs::write(&path, r#"{"init":{"你好":0.0},"trans":{},"emit":{}}"#).unwrap();
        let err = ParamStore::load(&path).unwrap_err();
        assert!(matches!(err, Error::ResourceMalformed(_)));
    }
}
