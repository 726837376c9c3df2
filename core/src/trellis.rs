//! Trellis layers shared by the batch and incremental decoders.
//!
//! A layer is a flat vector rather than a `char -> (score, back)` map: ties are
//! broken by lexicon candidate order, which is naturally preserved by
//! iterating candidates in order and pushing into a `Vec`. Back-pointers are
//! indices into the *previous* layer's vector, not owning references — the
//! systems-language idiom this crate follows even though Rust's GC-less
//! `char` keys make an interning table unnecessary (see `ParamStore`'s doc
//! comment for why `char` alone is already compact enough).

/// One candidate character reached at a given trellis step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrellisEntry {
    pub ch: char,
    pub score: f64,
    /// Index into the previous layer's entries. `None` only for layer 0, or
    /// for a layer that restarts fresh after a dead-end (empty previous
    /// layer).
    pub back: Option<usize>,
}

pub type TrellisLayer = Vec<TrellisEntry>;

/// Build one trellis layer for `pinyin`'s candidates given the previous
/// layer. Restarts fresh (via `init + emit`, `back: None`) when `prev_layer`
/// is empty — covers both the very first token and a token right after a
/// dead-end. Shared by `BatchDecoder` and `IncrementalDecoder` so the restart
/// rule can't drift between them.
pub fn step_layer(
    params: &crate::param_store::ParamStore,
    bonus: Option<&crate::bonus::BonusTable>,
    prev_layer: &TrellisLayer,
    cands: &[char],
    pinyin: &str,
) -> TrellisLayer {
    let bonus_of = |prev: char, cur: char| bonus.map(|b| b.get(prev, cur)).unwrap_or(0.0);

    if prev_layer.is_empty() {
        return cands
            .iter()
            .map(|&c| TrellisEntry {
                ch: c,
                score: params.get_init(c) + params.get_emit(c, pinyin),
                back: None,
            })
            .collect();
    }

    cands
        .iter()
        .map(|&c| {
            let (best_idx, best_score) = prev_layer
                .iter()
                .enumerate()
                .map(|(i, prev)| {
                    (i, prev.score + params.get_trans(prev.ch, c) + bonus_of(prev.ch, c))
                })
                .fold((0, f64::NEG_INFINITY), |(bi, bs), (i, s)| {
                    if s > bs {
                        (i, s)
                    } else {
                        (bi, bs)
                    }
                });
            TrellisEntry {
                ch: c,
                score: best_score + params.get_emit(c, pinyin),
                back: Some(best_idx),
            }
        })
        .collect()
}

/// Back-trace a complete string ending at `start` within `layers[..=up_to]`.
///
/// Walks backward through back-pointers and stops either at layer 0 or at the
/// first layer it cannot continue past (an empty layer reached via a
/// restarted — `back: None` — entry). Returns the traced suffix in forward
/// (left-to-right) order.
pub fn backtrace(layers: &[TrellisLayer], up_to: usize, mut idx: usize) -> String {
    let mut chars = Vec::with_capacity(up_to + 1);
    let mut layer = up_to;
    loop {
        let entry = layers[layer][idx];
        chars.push(entry.ch);
        match entry.back {
            Some(prev_idx) if layer > 0 => {
                idx = prev_idx;
                layer -= 1;
            }
            _ => break,
        }
    }
    chars.reverse();
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtrace_single_layer() {
        let layers = vec![vec![TrellisEntry {
            ch: '你',
            score: -0.1,
            back: None,
        }]];
        assert_eq!(backtrace(&layers, 0, 0), "你");
    }

    #[test]
    fn backtrace_two_layers() {
        let layers = vec![
            vec![TrellisEntry {
                ch: '你',
                score: -0.1,
                back: None,
            }],
            vec![TrellisEntry {
                ch: '好',
                score: -0.3,
                back: Some(0),
            }],
        ];
        assert_eq!(backtrace(&layers, 1, 0), "你好");
    }

    #[test]
    fn backtrace_stops_at_restart() {
        let layers = vec![
            vec![TrellisEntry {
                ch: '你',
                score: -0.1,
                back: None,
            }],
            vec![], // dead-end layer
            vec![TrellisEntry {
                ch: '好',
                score: -0.2,
                back: None, // restarted fresh after the dead-end
            }],
        ];
        assert_eq!(backtrace(&layers, 2, 0), "好");
    }
}
