//! Binary to generate/update .expected.rb and .expected.err fixture files
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- basic   # Update only fixtures matching "basic"

use ruby_unparse::{JsonLoader, Loader, Pipeline, UnparseError};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixture_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|s| s == "json"))
    {
        let path = entry.path();
        let path_str = path.to_string_lossy();

        if let Some(ref f) = filter {
            if !path_str.contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

fn unparse(document: &str) -> Result<String, UnparseError> {
    let document = JsonLoader::new().load(document)?;
    Ok(Pipeline::standard().compile_document(&document)?.code)
}

fn process_file(path: &Path) {
    let document = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return;
        }
    };

    let is_error_test = path.to_string_lossy().contains("/errors/");
    let expected_rb = path.with_extension("expected.rb");
    let expected_err = path.with_extension("expected.err");

    match unparse(&document) {
        Ok(code) if !is_error_test => {
            write(&expected_rb, &code);
            if expected_err.exists() {
                let _ = fs::remove_file(&expected_err);
            }
        }
        Ok(_) => {
            eprintln!("ERROR: {:?} is in errors/ but unparsed cleanly", path);
        }
        Err(e) if is_error_test => {
            let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");
            write(&expected_err, &e.render(&document, filename));
        }
        Err(e) => {
            eprintln!(
                "ERROR: {:?} failed to unparse but is not in errors/: {}",
                path, e
            );
        }
    }
}

fn write(path: &Path, contents: &str) {
    if let Err(e) = fs::write(path, contents) {
        eprintln!("Failed to write {:?}: {}", path, e);
    } else {
        println!("  wrote {}", path.display());
    }
}
