use clap::{Parser, ValueEnum};
use lexstream::{logging, ExpressionGrammar, Grammar, Lexer, LexerError, SourceMap, TokenStream};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to tokenize; reads stdin when omitted
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Do not print the trailing summary
    #[arg(long)]
    no_summary: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct TokenRecord<'a> {
    text: &'a str,
    #[serde(rename = "type")]
    token_type: u32,
    name: String,
    offset: usize,
    line: u32,
    column: u32,
}

#[derive(Serialize)]
struct Summary {
    tokens: usize,
    skipped_spans: usize,
    filtered_tokens: usize,
    input_bytes: usize,
}

#[derive(Serialize)]
struct Dump<'a> {
    grammar: &'static str,
    tokens: Vec<TokenRecord<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_global_logging() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let source = read_source(cli.file.as_ref())?;

    let mut lexer = Lexer::new(ExpressionGrammar::new()).map_err(|e| describe(&e, &source))?;
    lexer
        .set_input(source.clone())
        .map_err(|e| describe(&e, &source))?;

    let metrics = lexer.metrics();
    let summary = (!cli.no_summary).then(|| Summary {
        tokens: metrics.total_tokens,
        skipped_spans: metrics.skipped_spans,
        filtered_tokens: metrics.filtered_tokens,
        input_bytes: metrics.input_bytes,
    });

    let stream = lexer.stream();
    let records = token_records(&lexer, stream);

    match cli.format {
        Format::Text => print_text(&records, summary.as_ref()),
        Format::Json => {
            let dump = Dump {
                grammar: lexer.grammar().name(),
                tokens: records,
                summary,
            };
            let json = serde_json::to_string_pretty(&dump)
                .map_err(|e| format!("Error: failed to serialize tokens: {}", e))?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn read_source(file: Option<&PathBuf>) -> Result<String, String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Error: cannot read {}: {}", path.display(), e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Error: cannot read stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

fn token_records<'a>(lexer: &Lexer<ExpressionGrammar>, stream: &'a TokenStream) -> Vec<TokenRecord<'a>> {
    stream
        .tokens()
        .iter()
        .map(|token| {
            let location = stream.location_of(token);
            TokenRecord {
                text: token.text(),
                token_type: token.token_type().tag(),
                name: lexer.literal(token.token_type()),
                offset: token.offset(),
                line: location.line,
                column: location.column,
            }
        })
        .collect()
}

fn print_text(records: &[TokenRecord<'_>], summary: Option<&Summary>) {
    for record in records {
        println!(
            "{}:{}\t{}\t{:?}",
            record.line, record.column, record.name, record.text
        );
    }

    if let Some(summary) = summary {
        println!();
        println!(
            "{} tokens, {} skipped spans, {} filtered, {} bytes",
            summary.tokens, summary.skipped_spans, summary.filtered_tokens, summary.input_bytes
        );
    }
}

fn describe(error: &LexerError, source: &str) -> String {
    let location = error
        .offset()
        .map(|offset| {
            let position = SourceMap::new(source).position_at(source, offset);
            format!(" at {}", position)
        })
        .unwrap_or_default();

    format!("Error [{}]{}: {}", error.error_code().as_str(), location, error)
}
