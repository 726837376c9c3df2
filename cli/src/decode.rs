use std::path::Path;

use hanziime_core::{BatchDecoder, DecoderConfig};

use crate::resources;

pub fn run(
    config: &DecoderConfig,
    pinyin: &str,
    lexicon_path: &Path,
    params_path: &Path,
    bonus_path: Option<&Path>,
    k: Option<usize>,
    beam: Option<usize>,
) -> anyhow::Result<()> {
    let (params, lexicon, bonus) = resources::load(lexicon_path, params_path, bonus_path)?;
    let bonus = (!bonus.is_empty()).then_some(&bonus);
    let decoder = BatchDecoder::new(&params, &lexicon, bonus);

    let tokens: Vec<&str> = pinyin.split_whitespace().collect();
    let k = k.unwrap_or(config.default_top_k);
    let beam = beam.or(Some(config.default_beam_size));

    if k <= 1 {
        println!("{}", decoder.decode_best(&tokens));
        return Ok(());
    }

    let top = decoder.decode_topk(&tokens, k, beam);
    for (rank, (text, score)) in top.iter().enumerate() {
        println!("{}. {text}\t{score:.4}", rank + 1);
    }
    Ok(())
}
