//! rcse - highlight, prettify and inspect text with a declarative grammar

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rcse::settings::Settings;
use rcse::{ConfigModel, Highlighter, IdentifierExtractor, Prettifier, Result, SyntaxError};

#[derive(Parser, Debug)]
#[command(name = "rcse", version, about = "Configuration-driven syntax annotation")]
struct Cli {
    /// Grammar document (.json or .toml); defaults to the settings file entry
    #[arg(short, long, global = true)]
    grammar: Option<PathBuf>,

    /// Read text from this file instead of stdin
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the text as span markup
    Highlight {
        /// Prepend the generated stylesheet in a <style> block
        #[arg(long)]
        css: bool,
    },
    /// Print the text with operators re-spaced
    Prettify {
        #[arg(long)]
        max_line_length: Option<usize>,
    },
    /// Print the bare identifiers of the text, one per line
    Extract,
    /// Print the generated stylesheet
    Css,
    /// Print keyword groups as JSON
    Groups,
    /// Validate the grammar document
    Validate,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load();
    let grammar = cli.grammar.or_else(|| settings.grammar.clone()).ok_or_else(|| {
        SyntaxError::Document("no grammar given (use --grammar or set one in ~/.rcse.conf)".into())
    })?;
    let model = load_grammar(&grammar)?;

    match cli.command {
        Command::Highlight { css } => {
            let text = read_input(cli.input.as_deref())?;
            let highlighter = Highlighter::new(&model)?;
            if css || settings.generate_css {
                println!("<style>\n{}</style>", model.generate_css());
            }
            println!("{}", highlighter.highlight(text.as_str()));
        }
        Command::Prettify { max_line_length } => {
            let text = read_input(cli.input.as_deref())?;
            let mut prettifier = Prettifier::new(&model)?;
            prettifier.set_max_line_length(max_line_length.unwrap_or(settings.max_line_length));
            println!("{}", prettifier.prettify(text.as_str()));
        }
        Command::Extract => {
            let text = read_input(cli.input.as_deref())?;
            for identifier in IdentifierExtractor::new(&model).extract(text.as_str()) {
                println!("{}", identifier);
            }
        }
        Command::Css => print!("{}", model.generate_css()),
        Command::Groups => {
            println!("{}", serde_json::to_string_pretty(&model.keyword_groups())?);
        }
        Command::Validate => {
            let config = model.raw_config();
            println!(
                "{}: version {}, {} rules, {} types, {} keywords",
                grammar.display(),
                config.version,
                config.highlighting_rules.len(),
                config.types.len(),
                config
                    .highlighting_rules
                    .iter()
                    .map(|rule| rule.tokens().len())
                    .sum::<usize>(),
            );
        }
    }

    Ok(())
}

/// Load a grammar document, choosing the format by extension
fn load_grammar(path: &Path) -> Result<ConfigModel> {
    let contents = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigModel::from_toml(&contents),
        _ => ConfigModel::from_json(&contents),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
