/*! Accuracy testing for frequency-based spelling correction

Runs every `input<TAB>expected` pair of a typo list through the speller and
reports how often the expected word comes first, in the top five, anywhere,
or not at all.

# Usage examples

```console
$ cargo run -- typos.tsv en.zip
```
will produce statistics of spelling corrections. Several dictionaries are
layered in the order given:
```console
$ cargo run -- typos.tsv base.json user.tsv
```

The speller is tuned with a JSON file following [`SpellerConfig`]:
```console
$ cargo run -- --config config.json typos.tsv en.zip
```
For automated testing in CI there is a --threshold parametre:
```console
$ cargo run -- --threshold 90 typos.tsv en.zip
```
*/

use chrono::prelude::*;
use std::error::Error;
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};

use clap::Parser;
use distance::damerau_levenshtein;
use freqspell::dictionary::{self, meta::DictionaryMetadata};
use freqspell::frequency::WordFrequency;
use freqspell::speller::suggestion::Suggestion;
use freqspell::speller::{Speller, SpellerConfig, SpellerError};
use freqspell::tokenizer::case_handling::CaseHandling;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;

fn default_config() -> SpellerConfig {
    SpellerConfig {
        n_best: Some(10),
        recase: true,
        ..SpellerConfig::default()
    }
}

fn load_words(
    path: &Path,
    max_words: Option<usize>,
) -> Result<Vec<(String, String)>, Box<dyn Error>> {
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
        .take(max_words.unwrap_or(std::usize::MAX))
        .collect())
}

#[derive(Debug, Default, Serialize, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
struct Time {
    secs: u64,
    subsec_nanos: u32,
}

impl From<Duration> for Time {
    fn from(duration: Duration) -> Time {
        Time {
            secs: duration.as_secs(),
            subsec_nanos: duration.subsec_nanos(),
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let ms = self.secs * 1000 + (self.subsec_nanos as u64 / 1_000_000);
        write!(f, "{}ms", ms)
    }
}

#[derive(Debug, Serialize)]
struct AccuracyResult<'a> {
    input: &'a str,
    expected: &'a str,
    distance: usize,
    suggestions: Vec<Suggestion>,
    position: Option<usize>,
    time: Time,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    metadata: Vec<DictionaryMetadata>,
    config: &'a SpellerConfig,
    summary: Summary,
    results: Vec<AccuracyResult<'a>>,
    start_timestamp: Time,
    total_time: Time,
}

#[derive(Serialize, Default, Debug, Clone)]
struct Summary {
    total_words: u32,
    first_position: u32,
    top_five: u32,
    any_position: u32,
    no_suggestions: u32,
    only_wrong: u32,
    slowest_lookup: Time,
    fastest_lookup: Time,
    average_position_of_correct: f32,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let percent =
            |v: u32| -> String { format!("{:.2}%", v as f32 / self.total_words as f32 * 100f32) };

        write!(
            f,
            "[#1] {} [^5] {} [any] {} [none] {} [wrong] {} [fast] {} [slow] {}",
            percent(self.first_position),
            percent(self.top_five),
            percent(self.any_position),
            percent(self.no_suggestions),
            percent(self.only_wrong),
            self.fastest_lookup,
            self.slowest_lookup
        )
    }
}

impl Summary {
    fn new(results: &[AccuracyResult<'_>]) -> Summary {
        let mut summary = Summary::default();
        let mut total_position = 0;

        results.iter().for_each(|result| {
            summary.total_words += 1;

            if let Some(position) = result.position {
                summary.any_position += 1;
                total_position += position;

                if position == 0 {
                    summary.first_position += 1;
                }

                if position < 5 {
                    summary.top_five += 1;
                }
            } else if result.suggestions.is_empty() {
                summary.no_suggestions += 1;
            } else {
                summary.only_wrong += 1;
            }
        });

        if summary.any_position > 0 {
            summary.average_position_of_correct =
                total_position as f32 / summary.any_position as f32;
        }

        summary.slowest_lookup = results.iter().map(|r| r.time).max().unwrap_or_default();
        summary.fastest_lookup = results.iter().map(|r| r.time).min().unwrap_or_default();

        summary
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "freqspell-accuracy",
    version,
    about = "Accuracy testing for freqspell."
)]
struct Args {
    /// Provide JSON config file to override test defaults
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// The 'input -> expected' list in tab-delimited value file (TSV)
    words: PathBuf,

    /// Dictionaries to load, layered in order
    #[arg(required = true)]
    dictionaries: Vec<PathBuf>,

    /// The file path for the JSON report output
    #[arg(short = 'o', long = "json-output")]
    json_output: Option<PathBuf>,

    /// The file path for the TSV line append
    #[arg(short = 't', long = "tsv-output")]
    tsv_output: Option<PathBuf>,

    /// Truncate typos list to max number of words specified
    #[arg(short = 'w', long = "max-words")]
    max_words: Option<usize>,

    /// Minimum precision @ 5 for automated testing
    #[arg(short = 'T', long)]
    threshold: Option<f32>,
}

fn load_speller(
    paths: &[PathBuf],
    cfg: SpellerConfig,
) -> Result<(Speller, Vec<DictionaryMetadata>), Box<dyn Error>> {
    let mut model = WordFrequency::new(CaseHandling::from_sensitivity(cfg.case_sensitive));
    let mut metadata = vec![];

    for path in paths {
        let source = dictionary::open(path)?;
        if let Some(md) = source.metadata() {
            metadata.push(md.clone());
        }
        dictionary::load_into(&mut model, source.as_ref())?;
    }

    Ok((Speller::new(model, cfg), metadata))
}

fn git_output(args: &[&str]) -> Result<String, Box<dyn Error>> {
    let output = std::process::Command::new("git").args(args).output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let args = Args::parse();

    let cfg: SpellerConfig = match &args.config {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            serde_json::from_reader(file)?
        }
        None => default_config(),
    };

    let (speller, metadata) = load_speller(&args.dictionaries, cfg)?;
    let speller = Arc::new(speller);

    let words = load_words(&args.words, args.max_words)?;
    if words.is_empty() {
        eprintln!("No words found in {}; aborting.", args.words.display());
        std::process::exit(1);
    }

    let pb = ProgressBar::new(words.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} [{percent}%] {wide_bar} {elapsed_precise}"),
    );

    let start_time = Instant::now();
    let results = words
        .par_iter()
        .progress_with(pb)
        .map(|(input, expected)| -> Result<AccuracyResult, SpellerError> {
            let now = Instant::now();
            let suggestions = speller.suggest(input)?;
            let time = Time::from(now.elapsed());

            let position = suggestions
                .iter()
                .position(|x| x.value() == expected.as_str());

            let distance = damerau_levenshtein(input, expected);
            Ok(AccuracyResult {
                input,
                expected,
                distance,
                time,
                suggestions,
                position,
            })
        })
        .collect::<Result<Vec<_>, SpellerError>>()?;

    let total_time = Time::from(start_time.elapsed());
    let start_timestamp = Time::from(
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default(),
    );

    let summary = Summary::new(&results);
    println!("{}", summary);

    if let Some(path) = &args.json_output {
        let output = std::fs::File::create(path)?;
        let report = Report {
            metadata,
            config: speller.config(),
            summary: summary.clone(),
            results,
            start_timestamp,
            total_time,
        };
        println!("Writing JSON report…");
        serde_json::to_writer_pretty(output, &report)?;
    } else if let Some(path) = &args.tsv_output {
        let mut output = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        if output.metadata()?.len() == 0 {
            // new file, write headers:
            output.write_all(b"id\tdate\ttag/branch\ttop1\ttop5\tany\tno suggs\twrong suggs\n")?;
        }
        let line = [
            git_output(&["rev-parse", "--short", "HEAD"])?,
            Local::now().to_rfc3339(),
            git_output(&["describe"])?,
            summary.first_position.to_string(),
            summary.top_five.to_string(),
            summary.any_position.to_string(),
            summary.no_suggestions.to_string(),
            summary.only_wrong.to_string(),
        ]
        .join("\t");
        writeln!(output, "{}", line)?;
    };

    println!("Done!");

    match args.threshold {
        Some(threshold) => {
            if threshold < (summary.top_five as f32 / summary.total_words as f32 * 100.0) {
                Ok(())
            } else {
                Err("accuracy @5 lower threshold")?
            }
        }
        None => Ok(()),
    }
}
