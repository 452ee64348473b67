use std::convert::TryFrom;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use freqspell::{
    dictionary,
    frequency::WordFrequency,
    speller::{suggestion::Suggestion, Distance, Speller, SpellerConfig},
    tokenizer::{case_handling::CaseHandling, Tokenize},
};

trait OutputWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool);
    fn write_suggestions(&mut self, word: &str, suggestions: &[Suggestion]);
    fn finish(&mut self) -> anyhow::Result<()>;
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        println!(
            "Input: {}\t\t[{}]",
            &word,
            if is_correct { "CORRECT" } else { "INCORRECT" }
        );
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[Suggestion]) {
        for sugg in suggestions {
            println!("{}\t\t{:.8}\t{}", sugg.value, sugg.probability, sugg.count);
        }
        println!();
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SuggestionRequest {
    word: String,
    is_correct: bool,
    suggestions: Vec<Suggestion>,
}

#[derive(Default, Serialize)]
struct JsonWriter {
    suggest: Vec<SuggestionRequest>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        Self::default()
    }
}

impl OutputWriter for JsonWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        self.suggest.push(SuggestionRequest {
            word: word.to_owned(),
            is_correct,
            suggestions: vec![],
        });
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[Suggestion]) {
        if let Some(last) = self.suggest.last_mut() {
            last.suggestions = suggestions.to_vec();
        }
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

fn run(
    speller: &Speller,
    words: Vec<String>,
    writer: &mut dyn OutputWriter,
    is_always_suggesting: bool,
) -> anyhow::Result<()> {
    for word in words {
        let is_correct = speller.is_correct(&word)?;
        writer.write_correction(&word, is_correct);

        if is_always_suggesting || !is_correct {
            let suggestions = speller.suggest(&word)?;
            writer.write_suggestions(&word, &suggestions);
        }
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "freqspell",
    about = "Spelling correction from word frequency dictionaries"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Get suggestions for provided input
    Suggest(SuggestArgs),

    /// Print the words of the input missing from the dictionaries
    Unknown(UnknownArgs),

    /// Print input in word-separated tokenized form
    Tokenize(TokenizeArgs),

    /// Merge dictionaries into a single JSON or zip dictionary
    Export(ExportArgs),
}

#[derive(Debug, Parser)]
struct SuggestArgs {
    /// Dictionaries to load (.json, .zip, .gz, .txt, .tsv, .freq); later ones add to earlier ones
    #[arg(short = 'd', long = "dictionary", required = true)]
    dictionaries: Vec<PathBuf>,

    /// File of words to hide from the dictionaries, one per line
    #[arg(long)]
    exclude: Option<PathBuf>,

    /// Maximum edit distance (1 or 2)
    #[arg(long)]
    distance: Option<u8>,

    /// Treat differently cased words as different words
    #[arg(long)]
    case_sensitive: bool,

    /// Re-apply the input's capitalisation to suggestions
    #[arg(long)]
    recase: bool,

    /// Always show suggestions even if word is correct
    #[arg(short = 'S', long = "always-suggest")]
    always_suggest: bool,

    /// Maximum number of results (0 for all)
    #[arg(short = 'n', long)]
    nbest: Option<usize>,

    /// Uses supplied config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Words to be processed
    inputs: Vec<String>,
}

#[derive(Debug, Parser)]
struct UnknownArgs {
    /// Dictionaries to load
    #[arg(short = 'd', long = "dictionary", required = true)]
    dictionaries: Vec<PathBuf>,

    /// Treat differently cased words as different words
    #[arg(long)]
    case_sensitive: bool,

    /// Text to be checked
    inputs: Vec<String>,
}

#[derive(Debug, Parser)]
struct TokenizeArgs {
    /// Show words only
    #[arg(short = 'w', long = "words")]
    is_words_only: bool,

    /// Text to be tokenized
    inputs: Vec<String>,
}

#[derive(Debug, Parser)]
struct ExportArgs {
    /// Dictionaries to merge
    #[arg(short = 'd', long = "dictionary", required = true)]
    dictionaries: Vec<PathBuf>,

    /// Drop words seen this many times or fewer
    #[arg(short = 't', long)]
    threshold: Option<u64>,

    /// Treat differently cased words as different words
    #[arg(long)]
    case_sensitive: bool,

    /// Write a zip archive instead of plain JSON
    #[arg(long)]
    zip: bool,

    /// Output path; a .gz path is written as gzip JSON
    output: PathBuf,
}

fn read_stdin() -> anyhow::Result<String> {
    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading stdin")?;
    Ok(buffer)
}

fn read_text(inputs: Vec<String>) -> anyhow::Result<String> {
    if inputs.is_empty() {
        read_stdin()
    } else {
        Ok(inputs.join(" "))
    }
}

fn load_model(paths: &[PathBuf], case: CaseHandling) -> anyhow::Result<WordFrequency> {
    let mut model = WordFrequency::new(case);
    for path in paths {
        let source = dictionary::open(path)
            .with_context(|| format!("opening dictionary {}", path.display()))?;
        if let Some(metadata) = source.metadata() {
            info!("{}: {} ({})", path.display(), metadata.title, metadata.locale);
        }
        dictionary::load_into(&mut model, source.as_ref())?;
    }
    info!(
        "{} unique words, {} total",
        model.unique_words(),
        model.total_words()
    );
    Ok(model)
}

fn read_exclusions(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading exclusions {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn tokenize(args: TokenizeArgs) -> anyhow::Result<()> {
    let inputs = read_text(args.inputs)?;

    if args.is_words_only {
        for (index, token) in inputs.word_indices() {
            println!("{:>4}: \"{}\"", index, token);
        }
    } else {
        for (index, token) in inputs.word_bound_indices() {
            println!("{:>4}: \"{}\"", index, token);
        }
    }

    Ok(())
}

fn suggest(args: SuggestArgs) -> anyhow::Result<()> {
    // 1. default config
    let mut suggest_cfg = SpellerConfig::default();

    // 2. config from explicit config file
    if let Some(config_path) = &args.config {
        let config_file = std::fs::File::open(config_path)
            .with_context(|| format!("opening config {}", config_path.display()))?;
        suggest_cfg = serde_json::from_reader(config_file)?;
    }

    // 3. config from other command line stuff
    if args.case_sensitive {
        suggest_cfg.case_sensitive = true;
    }
    if args.recase {
        suggest_cfg.recase = true;
    }
    if let Some(v) = args.distance {
        suggest_cfg.distance = Distance::try_from(v)?;
    }
    if let Some(v) = args.nbest {
        if v == 0 {
            suggest_cfg.n_best = None;
        } else {
            suggest_cfg.n_best = Some(v);
        }
    }

    let case = CaseHandling::from_sensitivity(suggest_cfg.case_sensitive);
    let model = load_model(&args.dictionaries, case)?;
    let speller = Speller::new(model, suggest_cfg);

    if let Some(path) = &args.exclude {
        let hidden = speller.exclude(read_exclusions(path)?)?;
        info!("excluded {} words", hidden);
    }

    let mut writer: Box<dyn OutputWriter> = if args.json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    };

    let words = if args.inputs.is_empty() {
        read_stdin()?
            .trim()
            .split('\n')
            .map(|x| x.trim().to_string())
            .filter(|x| !x.is_empty())
            .collect()
    } else {
        args.inputs
    };

    run(&speller, words, &mut *writer, args.always_suggest)?;

    writer.finish()
}

fn unknown(args: UnknownArgs) -> anyhow::Result<()> {
    let case = CaseHandling::from_sensitivity(args.case_sensitive);
    let model = load_model(&args.dictionaries, case)?;
    let speller = Speller::new(
        model,
        SpellerConfig {
            case_sensitive: args.case_sensitive,
            ..Default::default()
        },
    );

    let text = read_text(args.inputs)?;
    let words = speller.split_words(&text);
    let mut unknown = speller
        .unknown(words.iter().map(|word| word.as_str()))?
        .into_iter()
        .collect::<Vec<_>>();
    unknown.sort();

    for word in unknown {
        println!("{}", word);
    }

    Ok(())
}

fn export(args: ExportArgs) -> anyhow::Result<()> {
    let case = CaseHandling::from_sensitivity(args.case_sensitive);
    let mut model = load_model(&args.dictionaries, case)?;

    if let Some(threshold) = args.threshold {
        let removed = model.remove_by_threshold(threshold);
        info!("removed {} words at or below {}", removed, threshold);
    }

    dictionary::export(&model, &args.output, args.zip)
        .with_context(|| format!("writing {}", args.output.display()))?;
    eprintln!(
        "Wrote {} words to {}",
        model.unique_words(),
        args.output.display()
    );

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();

    match args.command {
        None => Ok(()),
        Some(Command::Suggest(args)) => suggest(args),
        Some(Command::Unknown(args)) => unknown(args),
        Some(Command::Tokenize(args)) => tokenize(args),
        Some(Command::Export(args)) => export(args),
    }
}
