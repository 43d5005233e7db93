//! Purpose: `udbridge` CLI entry point.
//! Role: Binary crate root; runs the pipeline with the built-in rule model and prints records.
//! Invariants: Records go to stdout as JSON lines or CoNLL-U blocks.
//! Invariants: Errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `ErrorKind::code`.
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use udbridge::api::{
    DEFAULT_MODE, Error, ErrorKind, PipelineOptions, RuleModel, SentenceView, TokenizerMode,
    process_with,
};

#[derive(Parser, Debug)]
#[command(
    name = "udbridge",
    version,
    about = "Tokenize, tag and parse text into flat sentence records"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze text with the built-in rule model.
    Parse(ParseArgs),
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Text to analyze; read from --input or stdin when omitted.
    text: Option<String>,
    /// Read input from a file instead of the command line.
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "text")]
    input: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    #[arg(long, value_enum, default_value_t = TokenizerArg::Normalized)]
    tokenizer: TokenizerArg,
    #[arg(long, default_value = DEFAULT_MODE)]
    tagger_mode: String,
    #[arg(long, default_value = DEFAULT_MODE)]
    parser_mode: String,
    /// Treat every non-blank line as a separate input.
    #[arg(long)]
    lines: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Conllu,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum TokenizerArg {
    Normalized,
    Ranges,
    Presegmented,
}

impl From<TokenizerArg> for TokenizerMode {
    fn from(arg: TokenizerArg) -> Self {
        match arg {
            TokenizerArg::Normalized => TokenizerMode::NormalizedSpaces,
            TokenizerArg::Ranges => TokenizerMode::Ranges,
            TokenizerArg::Presegmented => TokenizerMode::Presegmented,
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            err.kind().code()
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Parse(args) => parse(args),
    }
}

fn parse(args: ParseArgs) -> Result<(), Error> {
    let input = read_input(args.text, args.input)?;
    let options = PipelineOptions {
        tokenizer: args.tokenizer.into(),
        tagger_mode: args.tagger_mode,
        parser_mode: args.parser_mode,
    };
    let texts: Vec<&str> = if args.lines {
        input.lines().filter(|line| !line.trim().is_empty()).collect()
    } else {
        vec![input.trim_end_matches(['\r', '\n'])]
    };

    let model = RuleModel::new();
    let mut out = io::stdout().lock();
    for text in texts {
        let record = process_with(&model, text, &options)?;
        let view = SentenceView::from(&record);
        let rendered = match args.format {
            OutputFormat::Json => {
                let mut line = serde_json::to_string(&view).map_err(|err| {
                    Error::new(ErrorKind::UnknownFailure)
                        .with_message("failed to serialize record")
                        .with_source(err)
                })?;
                line.push('\n');
                line
            }
            OutputFormat::Conllu => view.to_conllu(),
        };
        out.write_all(rendered.as_bytes()).map_err(|err| {
            Error::new(ErrorKind::UnknownFailure)
                .with_message("failed to write output")
                .with_source(err)
        })?;
    }
    Ok(())
}

fn read_input(text: Option<String>, input: Option<PathBuf>) -> Result<String, Error> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = input {
        return fs::read_to_string(&path).map_err(|err| {
            Error::new(ErrorKind::InvalidArgument)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        });
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).map_err(|err| {
        Error::new(ErrorKind::InvalidArgument)
            .with_message("failed to read stdin")
            .with_source(err)
    })?;
    Ok(buf)
}

fn emit_error(err: &Error) {
    let body = json!({
        "error": {
            "kind": format!("{:?}", err.kind()),
            "code": err.kind().code(),
            "message": err.to_string(),
        }
    });
    eprintln!("{body}");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
