//! Stateless batch decoding: Viterbi best path and a top-k beam extension.
//!
//! Reference: `examples/original_source/src/decoder/viterbi.py`
//! (`viterbi_decode` / `viterbi_topk`). Two behaviors are deliberately *not*
//! ported as-is from that file; see `SPEC_FULL.md` §4.3 and `DESIGN.md` for
//! why.

use crate::bonus::BonusTable;
use crate::lexicon::Lexicon;
use crate::param_store::ParamStore;
use crate::trellis::{backtrace, step_layer, TrellisLayer};

/// Stateless Viterbi decoder over a fixed `ParamStore` + `Lexicon` (+ optional
/// `BonusTable`). Construction borrows; a `BatchDecoder` is cheap to create
/// per call and carries no state of its own.
pub struct BatchDecoder<'a> {
    params: &'a ParamStore,
    lexicon: &'a Lexicon,
    bonus: Option<&'a BonusTable>,
}

impl<'a> BatchDecoder<'a> {
    pub fn new(params: &'a ParamStore, lexicon: &'a Lexicon, bonus: Option<&'a BonusTable>) -> Self {
        Self {
            params,
            lexicon,
            bonus,
        }
    }

    fn bonus_of(&self, prev: char, cur: char) -> f64 {
        self.bonus.map(|b| b.get(prev, cur)).unwrap_or(0.0)
    }

    /// Viterbi-optimal character string for `pinyin_seq`. Empty input yields
    /// an empty string; a dead-end as the final token yields an empty string
    /// too (no candidate survives to the last layer).
    pub fn decode_best(&self, pinyin_seq: &[&str]) -> String {
        if pinyin_seq.is_empty() {
            return String::new();
        }

        let mut layers: Vec<TrellisLayer> = Vec::with_capacity(pinyin_seq.len());
        for pinyin in pinyin_seq {
            let cands = self.lexicon.candidates_of(pinyin);
            let prev = layers.last().cloned().unwrap_or_default();
            layers.push(step_layer(self.params, self.bonus, &prev, cands, pinyin));
        }

        let last = layers.last().unwrap();
        if last.is_empty() {
            return String::new();
        }

        let (best_idx, _) = last
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(bi, bs), (i, e)| {
                if e.score > bs {
                    (i, e.score)
                } else {
                    (bi, bs)
                }
            });
        backtrace(&layers, layers.len() - 1, best_idx)
    }

    /// Approximate top-k decoding via beam search (not true k-best). A token
    /// with no candidates stops extension immediately and returns the best
    /// `k` of the beam as it stood.
    pub fn decode_topk(
        &self,
        pinyin_seq: &[&str],
        k: usize,
        beam_size: Option<usize>,
    ) -> Vec<(String, f64)> {
        let beam_size = beam_size.unwrap_or(k);
        if pinyin_seq.is_empty() || beam_size == 0 {
            return Vec::new();
        }

        let mut beam: Vec<(String, f64, char)> = Vec::new();

        let first_cands = self.lexicon.candidates_of(pinyin_seq[0]);
        if first_cands.is_empty() {
            return Vec::new();
        }
        for &c in first_cands {
            let score = self.params.get_init(c) + self.params.get_emit(c, pinyin_seq[0]);
            beam.push((c.to_string(), score, c));
        }
        beam.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        beam.truncate(beam_size);

        for pinyin in &pinyin_seq[1..] {
            let cands = self.lexicon.candidates_of(pinyin);
            if cands.is_empty() {
                break;
            }
            let mut next: Vec<(String, f64, char)> = Vec::with_capacity(beam.len() * cands.len());
            for (text, score, last) in &beam {
                for &c in cands {
                    let step = self.params.get_trans(*last, c)
                        + self.bonus_of(*last, c)
                        + self.params.get_emit(c, pinyin);
                    let mut extended = text.clone();
                    extended.push(c);
                    next.push((extended, score + step, c));
                }
            }
            next.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
            next.truncate(beam_size);
            beam = next;
        }

        beam.into_iter().take(k).map(|(s, sc, _)| (s, sc)).collect()
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
    fn s1_decode_best() {
        let (params, lex) = toy();
        let decoder = BatchDecoder::new(&params, &lex, None);
        assert_eq!(decoder.decode_best(&["ni", "hao"]), "你好");
    }

    #[test]
    fn s2_decode_topk_top1_and_contains_nihao2() {
        let (params, lex) = toy();
        let decoder = BatchDecoder::new(&params, &lex, None);
        let top = decoder.decode_topk(&["ni", "hao"], 3, None);
        assert_eq!(top[0].0, "你好");
        assert!(top.iter().any(|(s, _)| s == "你号"));
    }

    #[test]
    fn s3_bonus_flips_decode_best() {
        let (params, lex) = toy();
        let mut bonus = BonusTable::new();
        bonus.insert('你', '号', 1.0);
        let decoder = BatchDecoder::new(&params, &lex, Some(&bonus));
        assert_eq!(decoder.decode_best(&["ni", "hao"]), "你号");
    }

    #[test]
    fn empty_input_decodes_to_empty_string() {
        let (params, lex) = toy();
        let decoder = BatchDecoder::new(&params, &lex, None);
        assert_eq!(decoder.decode_best(&[]), "");
        assert!(decoder.decode_topk(&[], 3, None).is_empty());
    }

    #[test]
    fn dead_end_restarts_instead_of_collapsing_to_neg_inf() {
        let (params, lex) = toy();
        let decoder = BatchDecoder::new(&params, &lex, None);
        // "mei" has no candidates: a dead-end layer. The next token restarts
        // fresh via init+emit rather than propagating -inf through trans.
        let result = decoder.decode_best(&["mei", "hao"]);
        assert_eq!(result, "好");
    }

    #[test]
    fn decode_topk_short_circuits_on_dead_end() {
        let (params, lex) = toy();
        let decoder = BatchDecoder::new(&params, &lex, None);
        let top = decoder.decode_topk(&["ni", "mei", "hao"], 5, None);
        // Beam stops extending at "mei"; results are single-character paths
        // from the "ni" step, not three-character strings.
        assert!(top.iter().all(|(s, _)| s.chars().count() == 1));
    }

    #[test]
    fn no_bonus_matches_default_bonus() {
        let (params, lex) = toy();
        let empty_bonus = BonusTable::new();
        let without = BatchDecoder::new(&params, &lex, None).decode_best(&["ni", "hao"]);
        let with_empty = BatchDecoder::new(&params, &lex, Some(&empty_bonus)).decode_best(&["ni", "hao"]);
        assert_eq!(without, with_empty);
    }
}
