use std::fs;
use std::path::Path;

use anyhow::Context;
use hanziime_core::{BatchDecoder, DecoderConfig};

use crate::resources;

/// Emits the block format spec'd for batch decoding: the original line, the
/// best string with its score, any additional candidates, and optionally a
/// reference line for accuracy accounting (same shape as
/// `examples/original_source/src/evaluation/metrics.py`'s `--ref` mode).
pub fn run(
    config: &DecoderConfig,
    input_path: &Path,
    lexicon_path: &Path,
    params_path: &Path,
    bonus_path: Option<&Path>,
    k: Option<usize>,
    reference_path: Option<&Path>,
) -> anyhow::Result<()> {
    let (params, lexicon, bonus) = resources::load(lexicon_path, params_path, bonus_path)?;
    let bonus = (!bonus.is_empty()).then_some(&bonus);
    let decoder = BatchDecoder::new(&params, &lexicon, bonus);
    let k = k.unwrap_or(config.default_top_k).max(1);

    let input = fs::read_to_string(input_path)
        .with_context(|| format!("reading batch input {}", input_path.display()))?;
    let references: Option<Vec<String>> = reference_path
        .map(|p| fs::read_to_string(p).with_context(|| format!("reading reference file {}", p.display())))
        .transpose()?
        .map(|text| text.lines().map(str::to_string).collect());

    let mut line_no = 0usize;
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let top = decoder.decode_topk(&tokens, k, Some(config.default_beam_size));

        println!("--- {line}");
        match top.first() {
            Some((text, score)) => println!("best: {text}\t{score:.4}"),
            None => println!("best: (no candidates)"),
        }
        for (text, score) in top.iter().skip(1) {
            println!("alt:  {text}\t{score:.4}");
        }
        if let Some(refs) = &references {
            if let Some(reference) = refs.get(line_no) {
                println!("ref:  {reference}");
            }
        }
        line_no += 1;
    }
    Ok(())
}
