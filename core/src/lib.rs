//! hanziime-core
//!
//! A character-level hidden Markov model that converts toneless Hanyu Pinyin
//! syllable sequences into Han character strings. Two decoding modes:
//! `BatchDecoder` for a fixed sequence (Viterbi best path + top-k beam), and
//! `IncrementalDecoder` for a keystroke-driven IME core (append/backspace/
//! reset/predict_prefix/topk over a trellis grown one token at a time).
//!
//! Public API:
//! - `ParamStore` - init/trans/emit log-probability tables
//! - `Lexicon` - pinyin -> ordered candidate characters, prefix queries
//! - `BonusTable` - optional additive character-pair bonus
//! - `BatchDecoder` / `IncrementalDecoder` - the two decoding entry points
//! - `DecoderConfig` - top-k/beam-size/select-key defaults
//! - `Error` - resource loading failures

pub mod batch;
pub mod bonus;
pub mod config;
pub mod error;
pub mod incremental;
pub mod lexicon;
pub mod param_store;
pub mod trellis;

pub use batch::BatchDecoder;
pub use bonus::BonusTable;
pub use config::DecoderConfig;
pub use error::{Error, Result};
pub use incremental::IncrementalDecoder;
pub use lexicon::Lexicon;
pub use param_store::{ParamStore, NEG_INF};
