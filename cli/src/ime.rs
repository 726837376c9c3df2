use std::io::{self, BufRead, Write};
use std::path::Path;

use hanziime_core::{DecoderConfig, IncrementalDecoder};

use crate::resources;

fn print_candidates(candidates: &[(String, f64)]) {
    if candidates.is_empty() {
        println!("(no candidates)");
        return;
    }
    for (rank, (text, score)) in candidates.iter().enumerate() {
        println!("  {}. {text}\t{score:.4}", rank + 1);
    }
}

/// A line-oriented REPL over `IncrementalDecoder`, in the spirit of
/// `examples/rano-oss-libchinese/libpinyin/src/main.rs`'s interactive demo
/// and `examples/original_source/demo_incremental.py`. A bare pinyin token
/// appends; `:bs` backspaces; `:reset` resets; `:predict <prefix>` predicts.
pub fn run(
    config: &DecoderConfig,
    lexicon_path: &Path,
    params_path: &Path,
    bonus_path: Option<&Path>,
) -> anyhow::Result<()> {
    let (params, lexicon, bonus) = resources::load(lexicon_path, params_path, bonus_path)?;
    let bonus = (!bonus.is_empty()).then_some(&bonus);
    let mut session = IncrementalDecoder::new(&params, &lexicon, bonus, config.default_beam_size);
    let k = Some(config.default_top_k);

    println!("hanziime ime — type a pinyin token, :bs, :reset, :predict <prefix>, or :quit");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == ":quit" {
            break;
        } else if line == ":bs" {
            print_candidates(&session.backspace(k));
        } else if line == ":reset" {
            session.reset();
            println!("(reset)");
        } else if let Some(prefix) = line.strip_prefix(":predict ") {
            print_candidates(&session.predict_prefix(prefix.trim(), k));
        } else {
            print_candidates(&session.append(line, k));
        }
    }
    Ok(())
}
