/*! Regression testing for frequency dictionaries

Shows how the position of the expected correction changes between two
dictionaries for every `input<TAB>expected` pair of a typo list. Can be used
in automated scripts to cap the amount of changes between two versions.

# Usage examples

```console
$ cargo run -- --old old.zip --new new.zip --words typos.tsv --threshold 0.1
```
will expect there to be less than 10 % regressions between `old.zip` and
`new.zip`.
*/

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use freqspell::dictionary;
use freqspell::frequency::WordFrequency;
use freqspell::speller::{Speller, SpellerConfig};
use freqspell::tokenizer::case_handling::CaseHandling;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "OLDFILE")]
    old: PathBuf,
    #[arg(short, long, value_name = "NEWFILE")]
    new: PathBuf,
    #[arg(short, long, value_name = "WORDFILE")]
    words: PathBuf,
    #[arg(short, long, value_name = "THOLD")]
    threshold: f32,
}

fn load_words(path: &Path) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    Ok(rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|r| {
            r.get(0)
                .and_then(|x| r.get(1).map(|y| (x.trim().to_string(), y.trim().to_string())))
        })
        .filter(|(input, _)| !input.is_empty())
        .collect())
}

fn load_speller(path: &Path) -> Result<Speller, Box<dyn Error>> {
    let source = dictionary::open(path)?;
    let mut model = WordFrequency::new(CaseHandling::Insensitive);
    dictionary::load_into(&mut model, source.as_ref())?;
    Ok(Speller::new(model, SpellerConfig::default()))
}

fn position(speller: &Speller, input: &str, expected: &str) -> Result<Option<usize>, Box<dyn Error>> {
    let suggestions = speller.suggest(input)?;
    Ok(suggestions.iter().position(|x| x.value() == expected))
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let old = load_speller(&cli.old)?;
    let new = load_speller(&cli.new)?;
    let words = load_words(&cli.words)?;
    if words.is_empty() {
        Err(format!("Could not find any words from {}", cli.words.display()))?
    }

    let mut regressions = 0;
    for (input, expected) in &words {
        let oldpos = position(&old, input, expected)?;
        let newpos = position(&new, input, expected)?;
        match (oldpos, newpos) {
            (x, y) if x == y => print!("."),
            (None, Some(y)) => {
                println!("Regression: {} -> {} was uncorrected now {}", input, expected, y);
                regressions += 1;
            }
            (Some(x), None) => {
                println!(
                    "Regression: {} -> {} was {} now uncorrectable!",
                    input, expected, x
                );
                regressions += 1;
            }
            (Some(x), Some(y)) => {
                println!("REGRESSION: {} -> {} was {} now {}", input, expected, x, y);
                regressions += 1;
            }
            (None, None) => unreachable!(),
        }
    }
    println!();

    let regressionrate = regressions as f32 / words.len() as f32;
    if cli.threshold > regressionrate {
        Ok(())
    } else {
        Err(format!(
            "regressions more than threshold {} > {}",
            regressionrate, cli.threshold
        ))?
    }
}
