//! Incremental decoder: a trellis that grows one pinyin token per keystroke.
//!
//! Reference: `examples/original_source/src/decoder/viterbi.py`'s
//! `IncrementalViterbi`, and the REPL loop in
//! `examples/original_source/demo_incremental.py`.

use crate::bonus::BonusTable;
use crate::lexicon::Lexicon;
use crate::param_store::ParamStore;
use crate::trellis::{backtrace, step_layer, TrellisLayer};

/// Default number of results returned when a caller doesn't specify `k`.
pub const DEFAULT_TOP_K: usize = 5;

/// A session's trellis, grown and shrunk one pinyin token at a time.
///
/// `pinyin_buffer` and `layers` are always the same length; a trailing empty
/// layer is a legal dead end, not an error (see module docs).
pub struct IncrementalDecoder<'a> {
    params: &'a ParamStore,
    lexicon: &'a Lexicon,
    bonus: Option<&'a BonusTable>,
    beam_size: usize,
    pinyin_buffer: Vec<String>,
    layers: Vec<TrellisLayer>,
}

impl<'a> IncrementalDecoder<'a> {
    pub fn new(
        params: &'a ParamStore,
        lexicon: &'a Lexicon,
        bonus: Option<&'a BonusTable>,
        beam_size: usize,
    ) -> Self {
        Self {
            params,
            lexicon,
            bonus,
            beam_size,
            pinyin_buffer: Vec::new(),
            layers: Vec::new(),
        }
    }

    pub fn pinyin_buffer(&self) -> &[String] {
        &self.pinyin_buffer
    }

    pub fn is_empty(&self) -> bool {
        self.pinyin_buffer.is_empty()
    }

    fn top_k_of_layer(&self, layer_idx: usize, k: usize) -> Vec<(String, f64)> {
        let layer = &self.layers[layer_idx];
        let mut ranked: Vec<(usize, f64)> = layer.iter().enumerate().map(|(i, e)| (i, e.score)).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        ranked
            .into_iter()
            .take(k)
            .map(|(idx, score)| (backtrace(&self.layers, layer_idx, idx), score))
            .collect()
    }

    /// Last non-empty layer's index, if any.
    fn last_non_empty(&self) -> Option<usize> {
        self.layers.iter().rposition(|l| !l.is_empty())
    }

    /// Append one pinyin token, growing the trellis by one layer.
    pub fn append(&mut self, pinyin: &str, k: Option<usize>) -> Vec<(String, f64)> {
        let k = k.unwrap_or(DEFAULT_TOP_K);
        let cands = self.lexicon.candidates_of(pinyin);
        self.pinyin_buffer.push(pinyin.to_string());

        if cands.is_empty() {
            tracing::trace!(pinyin, "dead-end layer: unknown pinyin");
            self.layers.push(Vec::new());
            return match self.last_non_empty() {
                Some(idx) => self.top_k_of_layer(idx, k),
                None => Vec::new(),
            };
        }

        let prev = self.layers.last().cloned().unwrap_or_default();
        let mut layer = step_layer(self.params, self.bonus, &prev, cands, pinyin);

        if layer.len() > self.beam_size {
            tracing::warn!(
                pinyin,
                kept = self.beam_size,
                dropped = layer.len() - self.beam_size,
                "beam pruning discarded entries"
            );
            layer.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
            layer.truncate(self.beam_size);
        }

        self.layers.push(layer);
        let last_idx = self.layers.len() - 1;
        self.top_k_of_layer(last_idx, k)
    }

    /// Pop the last token and layer. Earlier back-pointers remain valid by
    /// construction — pruning only ever touches the newest layer.
    pub fn backspace(&mut self, k: Option<usize>) -> Vec<(String, f64)> {
        let k = k.unwrap_or(DEFAULT_TOP_K);
        self.pinyin_buffer.pop();
        self.layers.pop();
        match self.last_non_empty() {
            Some(idx) if idx == self.layers.len().saturating_sub(1) => self.top_k_of_layer(idx, k),
            _ => Vec::new(),
        }
    }

    /// Clear the session back to `Empty`.
    pub fn reset(&mut self) {
        self.pinyin_buffer.clear();
        self.layers.clear();
    }

    /// Top-k completions ending at the current last layer. Empty if the
    /// session is empty or the last layer is a dead end (no silent fallback
    /// to an earlier layer).
    pub fn topk(&self, k: usize) -> Vec<(String, f64)> {
        match self.layers.last() {
            Some(layer) if !layer.is_empty() => self.top_k_of_layer(self.layers.len() - 1, k),
            _ => Vec::new(),
        }
    }

    /// Simulate one append step per syllable matching `prefix` (up to 10,
    /// via `Lexicon::starts_with`), without mutating session state. Results
    /// are deduplicated by string keeping the maximum score, sorted
    /// descending, truncated to `k`.
    pub fn predict_prefix(&self, prefix: &str, k: Option<usize>) -> Vec<(String, f64)> {
        let k = k.unwrap_or(DEFAULT_TOP_K);
        let syllables = self.lexicon.starts_with(prefix);
        let prev = self.layers.last().cloned().unwrap_or_default();

        let mut merged: Vec<(String, f64)> = Vec::new();
        for syllable in syllables {
            let cands = self.lexicon.candidates_of(syllable);
            let layer = step_layer(self.params, self.bonus, &prev, cands, syllable);
            for entry in &layer {
                let text = match entry.back {
                    Some(prev_idx) => {
                        let mut s = backtrace(&self.layers, self.layers.len() - 1, prev_idx);
                        s.push(entry.ch);
                        s
                    }
                    None => entry.ch.to_string(),
                };
                merged.push((text, entry.score));
            }
        }

        merged.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(b.1.partial_cmp(&a.1).unwrap())
        });
        merged.dedup_by(|a, b| {
            if a.0 == b.0 {
                if a.1 > b.1 {
                    b.1 = a.1;
                }
                true
            } else {
                false
            }
        });
        merged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        merged.truncate(k);
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (ParamStore, Lexicon) {
        let mut params = ParamStore::new();
        params.insert_init('你', 0.6_f64.ln());
        params.insert_init('尼', 0.4_f64.ln());
        params.insert_init('好', 0.5_f64.ln());
        params.insert_init('号', 0.5_f64.ln());
        params.insert_trans('你', '好', 0.7_f64.ln());
        params.insert_trans('你', '号', 0.3_f64.ln());
        params.insert_trans('尼', '好', 0.4_f64.ln());
        params.insert_trans('尼', '号', 0.6_f64.ln());
        params.insert_emit('你', "ni", 0.0);
        params.insert_emit('尼', "ni", 0.0);
        params.insert_emit('好', "hao", 0.0);
        params.insert_emit('号', "hao", 0.0);

        let mut lex = Lexicon::new();
        lex.insert("ni", vec!['你', '尼']);
        lex.insert("hao", vec!['好', '号']);
        (params, lex)
    }

    #[test]
    fn s4_append_first_token() {
        let (params, lex) = toy();
        let mut dec = IncrementalDecoder::new(&params, &lex, None, 16);
        let top = dec.append("ni", None);
        assert_eq!(top[0].0, "你");
    }

    #[test]
    fn s5_append_then_backspace_restores_top1() {
        let (params, lex) = toy();
        let mut dec = IncrementalDecoder::new(&params, &lex, None, 16);
        let before = dec.append("ni", None);
        dec.append("hao", None);
        let after = dec.backspace(None);
        assert_eq!(before[0].0, after[0].0);
        assert_eq!(before[0].1, after[0].1);
    }

    #[test]
    fn s6_predict_prefix_full_backtrace() {
        let (params, mut lex) = toy();
        lex.insert("ha", vec!['哈']);
        let mut dec = IncrementalDecoder::new(&params, &lex, None, 16);
        dec.append("ni", None);
        let predicted = dec.predict_prefix("ha", None);
        assert!(predicted.iter().any(|(s, _)| s == "你哈"));
    }

    #[test]
    fn reset_returns_to_empty() {
        let (params, lex) = toy();
        let mut dec = IncrementalDecoder::new(&params, &lex, None, 16);
        dec.append("ni", None);
        dec.reset();
        assert!(dec.is_empty());
        assert!(dec.topk(5).is_empty());
    }

    #[test]
    fn dead_end_then_restart_topk_is_not_empty() {
        let (params, lex) = toy();
        let mut dec = IncrementalDecoder::new(&params, &lex, None, 16);
        dec.append("mei", None); // unknown, dead-end layer
        let top = dec.append("hao", None); // restarts fresh
        assert_eq!(top[0].0, "好");
    }

    #[test]
    fn buffer_and_layers_stay_equal_length() {
        let (params, lex) = toy();
        let mut dec = IncrementalDecoder::new(&params, &lex, None, 16);
        dec.append("ni", None);
        dec.append("mei", None);
        dec.append("hao", None);
        assert_eq!(dec.pinyin_buffer.len(), dec.layers.len());
        dec.backspace(None);
        assert_eq!(dec.pinyin_buffer.len(), dec.layers.len());
    }
}
