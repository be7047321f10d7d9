use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::CorpusConfig;
use crate::constants::schema::{MAJOR_GROUP_PREFIX_LEN, ONET_SOC_CODE_FIELD};
use crate::corpus::{CorpusCreator, CorpusKind};
use crate::source::{JobPostingFileConfig, JobPostingFileSource};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Base,
    Simple,
    TaggedDocument,
    TokenList,
    JobCategory,
}

impl From<KindArg> for CorpusKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Base => CorpusKind::Base,
            KindArg::Simple => CorpusKind::Simple,
            KindArg::TaggedDocument => CorpusKind::TaggedDocument,
            KindArg::TokenList => CorpusKind::TokenList,
            KindArg::JobCategory => CorpusKind::JobCategory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Filter, transform, and tag postings.
    Iterate,
    /// Transform every posting without filtering.
    Raw,
    /// Transform without filtering, then split into tokens.
    Tokenize,
    /// Emit placeholder labels.
    Label,
}

#[derive(Debug, Parser)]
#[command(
    name = "build_corpus",
    disable_help_subcommand = true,
    about = "Stream a training corpus from job-posting dumps",
    long_about = "Read JSON-lines job postings under a directory, optionally scoped to one quarter, and write one corpus unit per line to stdout.",
    after_help = "Set RUST_LOG=jobcorpus=debug to see per-file and per-pass progress on stderr."
)]
/// CLI for `build_corpus`.
///
/// Common usage:
/// - Doc2vec corpus for two major groups: `--kind tagged-document --major-group 11 --major-group 13`
/// - Persist the tag lookup: `--lookup-out lookup.json`
/// - Word lists without filtering: `--kind token-list --mode raw`
struct BuildCorpusCli {
    #[arg(long, value_name = "DIR", help = "Directory holding JSON-lines posting dumps")]
    root: PathBuf,
    #[arg(
        long,
        value_name = "QUARTER",
        value_parser = parse_quarter,
        help = "Only read files whose path under --root starts with this quarter (e.g. 2015Q1)"
    )]
    quarter: Option<String>,
    #[arg(long, value_enum, default_value = "simple", help = "Corpus shape to produce")]
    kind: KindArg,
    #[arg(long, value_enum, default_value = "iterate", help = "Consumption mode")]
    mode: ModeArg,
    #[arg(
        long = "field",
        value_name = "FIELD",
        help = "Document field to include, repeat as needed in order (defaults to the common schema fields)"
    )]
    fields: Vec<String>,
    #[arg(
        long = "major-group",
        value_name = "PREFIX",
        value_parser = parse_major_group,
        help = "O*NET major group to keep, repeat as needed"
    )]
    major_groups: Vec<String>,
    #[arg(
        long = "key-field",
        default_value = ONET_SOC_CODE_FIELD,
        help = "Field holding the SOC code used for filtering and tag lookup"
    )]
    key_field: String,
    #[arg(long, help = "Pass postings through without cleaning (base and simple kinds)")]
    raw: bool,
    #[arg(long, help = "Seed for --mode label (random when omitted)")]
    seed: Option<u64>,
    #[arg(
        long = "lookup-out",
        value_name = "PATH",
        help = "Write the tag lookup table as JSON after a tagged-document pass"
    )]
    lookup_out: Option<PathBuf>,
}

/// Run the `build_corpus` command line, writing corpus lines to stdout.
pub fn run_build_corpus<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run_build_corpus_to(args_iter, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Run the `build_corpus` command line against an arbitrary writer.
pub fn run_build_corpus_to<I, W>(args_iter: I, out: &mut W) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
    W: Write,
{
    let Some(cli) = parse_cli::<BuildCorpusCli, _>(
        std::iter::once("build_corpus".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    if cli.lookup_out.is_some()
        && (cli.mode != ModeArg::Iterate || !matches!(cli.kind, KindArg::TaggedDocument))
    {
        return Err("--lookup-out requires --kind tagged-document with --mode iterate".into());
    }

    let mut config = CorpusConfig::default()
        .with_raw(cli.raw)
        .with_key_field(cli.key_field);
    if !cli.fields.is_empty() {
        config = config.with_fields(cli.fields);
    }
    if !cli.major_groups.is_empty() {
        config = config.with_major_groups(cli.major_groups);
    }

    let mut file_config = JobPostingFileConfig::new("job_postings", &cli.root);
    if let Some(quarter) = cli.quarter {
        file_config = file_config.with_quarter(quarter);
    }
    let mut source = JobPostingFileSource::new(file_config);
    let mut creator = CorpusCreator::new(cli.kind.into(), config);

    let written = match cli.mode {
        ModeArg::Iterate => {
            creator.bind_source(source);
            debug!(
                metadata = %serde_json::to_string(&creator.metadata())?,
                "corpus metadata"
            );
            write_lines(out, creator.iter()?)?
        }
        ModeArg::Raw => write_lines(out, creator.raw_corpora(&mut source))?,
        ModeArg::Tokenize => write_lines(out, creator.tokenize_corpora(&mut source))?,
        ModeArg::Label => {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            write_lines(out, creator.label_corpora(&mut source, &mut rng))?
        }
    };

    if written == 0 {
        warn!(root = %cli.root.display(), "no corpus lines written");
    } else {
        info!(written, "corpus written");
    }

    if let Some(path) = cli.lookup_out {
        let file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(file, creator.lookup())?;
        info!(path = %path.display(), tags = creator.lookup().len(), "lookup table written");
    }
    Ok(())
}

fn write_lines<W, T, E>(
    out: &mut W,
    items: impl Iterator<Item = Result<T, E>>,
) -> Result<usize, Box<dyn Error>>
where
    W: Write,
    T: Serialize,
    E: Error + 'static,
{
    let mut written = 0usize;
    for item in items {
        serde_json::to_writer(&mut *out, &item?)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    Ok(written)
}

fn parse_quarter(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("--quarter must not be empty".to_string());
    }
    if trimmed.contains(['/', '\\']) {
        return Err(format!(
            "--quarter '{trimmed}' must not contain path separators"
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_major_group(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() != MAJOR_GROUP_PREFIX_LEN {
        return Err(format!(
            "--major-group '{trimmed}' must be exactly {MAJOR_GROUP_PREFIX_LEN} characters (e.g. 11)"
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
