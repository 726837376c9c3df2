use std::path::Path;

use anyhow::Context;
use hanziime_core::{BonusTable, Lexicon, ParamStore};

/// Load `ParamStore` + `Lexicon`, merging in a separate bonus file if given.
/// Mirrors `examples/rano-oss-libchinese/tools/src/main.rs`'s
/// "load, report, proceed" shape.
pub fn load(
    lexicon_path: &Path,
    params_path: &Path,
    bonus_path: Option<&Path>,
) -> anyhow::Result<(ParamStore, Lexicon, BonusTable)> {
    let params = ParamStore::load(params_path)
        .with_context(|| format!("loading hmm parameters from {}", params_path.display()))?;
    let (lexicon, mut bonus) = Lexicon::load_aggregate(lexicon_path)
        .with_context(|| format!("loading lexicon aggregate from {}", lexicon_path.display()))?;
    if let Some(bonus_path) = bonus_path {
        bonus = Lexicon::load_bonus(bonus_path)
            .with_context(|| format!("loading bonus table from {}", bonus_path.display()))?;
    }
    println!(
        "✓ loaded {} syllables, {} bonus pairs",
        lexicon.len(),
        bonus.len()
    );
    Ok((params, lexicon, bonus))
}
