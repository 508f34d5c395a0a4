use clap::{Parser, Subcommand};
use ruby_unparse::emit::DEFAULT_MAX_DEPTH;
use ruby_unparse::tracing_config::init_tracing;
use ruby_unparse::{
    JsonLoader, Kind, Loader, Options, Pipeline, Registry, UnparseError, UnparseResult,
};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use strum::IntoEnumIterator;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "unparse")]
#[command(about = "Render Ruby syntax trees back to Ruby source")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Ruby from .json tree documents
    Emit {
        /// Path to a tree document or a directory of them
        #[arg(required_unless_present = "stdin")]
        path: Option<PathBuf>,

        /// Read a tree document from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON with source mappings and tree metadata
        #[arg(long, requires = "stdin")]
        json: bool,

        /// Deepest tree accepted
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
    /// List every node kind with the emitter that renders it
    Kinds,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Emit {
            path,
            stdin,
            json,
            max_depth,
        } => {
            let options = Options {
                max_depth,
                include_mappings: json,
            };
            if stdin {
                emit_stdin(options, json)
            } else if let Some(path) = path {
                emit_path(&path, options)
            } else {
                eprintln!("Error: provide a file/directory or use --stdin");
                ExitCode::FAILURE
            }
        }
        Commands::Kinds => {
            list_kinds();
            ExitCode::SUCCESS
        }
    }
}

fn emit_stdin(options: Options, json_output: bool) -> ExitCode {
    let mut document = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut document) {
        eprintln!("Error: failed to read stdin: {}", e);
        return ExitCode::FAILURE;
    }

    match compile(&document, options) {
        Ok(result) if json_output => match serde_json::to_string(&result) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: failed to serialize result: {}", e);
                ExitCode::FAILURE
            }
        },
        Ok(result) => {
            print!("{}", result.code);
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e, &document, "<stdin>");
            ExitCode::FAILURE
        }
    }
}

fn emit_path(path: &Path, options: Options) -> ExitCode {
    if path.is_file() {
        match fs::read_to_string(path) {
            Ok(document) => match compile(&document, options) {
                Ok(result) => {
                    print!("{}", result.code);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    report(&e, &document, &path.display().to_string());
                    ExitCode::FAILURE
                }
            },
            Err(e) => {
                eprintln!("Error: failed to read {}: {}", path.display(), e);
                ExitCode::FAILURE
            }
        }
    } else if path.is_dir() {
        emit_directory(path, options)
    } else {
        eprintln!("Error: {} does not exist", path.display());
        ExitCode::FAILURE
    }
}

fn emit_directory(dir: &Path, options: Options) -> ExitCode {
    let start = Instant::now();
    let mut file_count = 0;
    let mut failures = 0;

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
    {
        file_count += 1;
        if !emit_file(entry.path(), options.clone()) {
            failures += 1;
        }
    }

    if file_count == 0 {
        eprintln!("No .json tree documents found in {}", dir.display());
        return ExitCode::FAILURE;
    }

    print_summary(file_count - failures, failures, start.elapsed());
    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Writes `<name>.rb` next to `<name>.json`. Returns whether it succeeded.
fn emit_file(path: &Path, options: Options) -> bool {
    let document = match fs::read_to_string(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: failed to read {}: {}", path.display(), e);
            return false;
        }
    };

    let result = match compile(&document, options) {
        Ok(result) => result,
        Err(e) => {
            report(&e, &document, &path.display().to_string());
            return false;
        }
    };

    let output = path.with_extension("rb");
    if let Err(e) = fs::write(&output, &result.code) {
        eprintln!("Error: failed to write {}: {}", output.display(), e);
        return false;
    }
    debug!(path = %output.display(), nodes = result.metadata.node_count, "wrote file");
    print_generated(&output.display().to_string());
    true
}

fn compile(document: &str, options: Options) -> Result<UnparseResult, UnparseError> {
    let document = JsonLoader::new().load(document)?;
    info!(source_bytes = document.source.len(), "loaded tree document");
    Ok(Pipeline::new(Registry::standard(), options).compile_document(&document)?)
}

fn list_kinds() {
    let registry = Registry::standard();
    for kind in Kind::iter() {
        let emitter = registry.get(kind).map_or("-", |emitter| emitter.name());
        println!("{:<8} {}", kind.as_str(), emitter);
    }
}

fn report(error: &UnparseError, document: &str, filename: &str) {
    let rendered = if io::stderr().is_terminal() {
        error.render_color(document, filename)
    } else {
        error.render(document, filename)
    };
    eprint!("{}", rendered);
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_summary(count: usize, failures: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if count == 1 { "file" } else { "files" };
    let failed = if failures > 0 {
        format!(", {} failed", failures)
    } else {
        String::new()
    };

    if is_tty {
        eprintln!(
            "\n\x1b[1m✨ Generated {} {}{} in {}\x1b[0m",
            count, files_word, failed, time_str
        );
    } else {
        eprintln!("\n✨ Generated {} {}{} in {}", count, files_word, failed, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
