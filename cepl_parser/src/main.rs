use cepl_parser::config::runtime::{parse_log_level, OutputFormat};
use cepl_parser::config::RuntimeConfig;
use cepl_parser::pipeline::{self, PipelineError, PipelineResult};
use cepl_parser::utils::SourceMap;
use cepl_parser::{logging, render_tree, AstNode, VariableTable};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

/// Parse a CEPL query and print its abstract syntax tree
#[derive(Parser)]
#[command(name = "cepl", version, about = "Complex Event Processing Language parser")]
struct Cli {
    /// Path to the query file
    file: PathBuf,

    /// Output format (defaults to the configured format, tree otherwise)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Print the significant token stream before the tree
    #[arg(long)]
    tokens: bool,

    /// Do not print the resolved variable table
    #[arg(long)]
    no_variables: bool,

    /// TOML file with runtime preferences
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum log level: error, warning, info or debug
    #[arg(long, value_parser = parse_level_arg)]
    log_level: Option<logging::LogLevel>,

    /// Emit log events as JSON lines on stderr
    #[arg(long)]
    structured_logs: bool,
}

fn parse_level_arg(value: &str) -> Result<logging::LogLevel, String> {
    parse_log_level(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    };

    if let Err(message) = logging::init_global_logging(config.logging.clone()) {
        eprintln!("Warning: {}", message);
    }

    match pipeline::process_file_with_config(&cli.file, &config) {
        Ok(result) => {
            if let Err(e) = print_result(&result, &config) {
                eprintln!("Error: failed to render output: {}", e);
                process::exit(1);
            }
        }
        Err(error) => {
            report_error(&cli.file, &error);
            process::exit(1);
        }
    }
}

/// File preferences first, command-line flags on top
fn load_config(cli: &Cli) -> Result<RuntimeConfig, String> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load(path).map_err(|e| e.to_string())?,
        None => RuntimeConfig::default(),
    };

    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.tokens {
        config.output.show_tokens = true;
    }
    if cli.no_variables {
        config.output.show_variables = false;
    }
    if let Some(level) = cli.log_level {
        config.logging.min_log_level = level;
    }
    if cli.structured_logs {
        config.logging.use_structured_logging = true;
    }

    Ok(config)
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    ast: &'a AstNode,
    variables: &'a VariableTable,
}

fn print_result(result: &PipelineResult, config: &RuntimeConfig) -> Result<(), serde_json::Error> {
    if config.output.show_tokens {
        println!("tokens:");
        for token in result.tokens.iter_significant() {
            println!("  {:>8}  {}", token.span.start.to_string(), token.value);
        }
        println!();
    }

    match config.output.format {
        OutputFormat::Tree => print!("{}", render_tree(&result.ast)),
        OutputFormat::Sexpr => println!("{}", result.ast),
        OutputFormat::Json => {
            let document = JsonDocument {
                ast: &result.ast,
                variables: &result.variables,
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
            return Ok(());
        }
    }

    if config.output.show_variables && !result.variables.is_empty() {
        println!();
        println!("variables:");
        for variable in result.variables.iter() {
            let properties: Vec<&str> = variable.properties.iter().map(String::as_str).collect();
            println!(
                "  #{} {}: {} [{}]",
                variable.id,
                variable.name,
                variable.relations.join(" | "),
                properties.join(", ")
            );
        }
    }

    Ok(())
}

fn report_error(path: &Path, error: &PipelineError) {
    let snippet = error.span().and_then(|span| {
        let source = std::fs::read_to_string(path).ok()?;
        let map = SourceMap::new(path.display().to_string(), source);
        Some(map.format_error(&span, &inner_message(error)))
    });

    match snippet {
        Some(rendered) => eprint!("{}", rendered),
        None => eprintln!("error: {}", error),
    }
    eprintln!("[{}] {} failed", error.error_code(), error.stage());
}

fn inner_message(error: &PipelineError) -> String {
    match error {
        PipelineError::FileProcessing(e) => e.to_string(),
        PipelineError::LexicalAnalysis(e) => e.to_string(),
        PipelineError::SyntaxAnalysis(e) => e.to_string(),
        PipelineError::VariableResolution(e) => e.to_string(),
    }
}
