//! Fixture runner: unparses every tree document under tests/fixtures and
//! compares against its .expected.rb (or .expected.err for errors/)
//!
//! Run with: cargo test --test expected_tests
//! Regenerate with: cargo run --bin accept_expected

use libtest_mimic::{Arguments, Failed, Trial};
use ruby_unparse::{JsonLoader, Loader, Pipeline, UnparseError};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Collect all .json fixture documents
fn collect_fixtures() -> Vec<PathBuf> {
    let pattern = fixture_dir().join("**").join("*.json");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(Result::ok)
        .collect();
    files.sort();
    files
}

fn unparse(document: &str) -> Result<String, UnparseError> {
    let document = JsonLoader::new().load(document)?;
    Ok(Pipeline::standard().compile_document(&document)?.code)
}

fn mismatch(path: &Path, expected: &str, actual: &str) -> Failed {
    format!(
        "Output mismatch: {}\n--- expected ---\n{}\n--- actual ---\n{}",
        path.display(),
        expected,
        actual
    )
    .into()
}

fn check_output(path: &Path) -> Result<(), Failed> {
    let expected_rb = path.with_extension("expected.rb");
    let expected = fs::read_to_string(&expected_rb)
        .map_err(|e| format!("Missing expected file {}: {}", expected_rb.display(), e))?;
    let document = fs::read_to_string(path)?;

    match unparse(&document) {
        Ok(code) if code.trim() == expected.trim() => Ok(()),
        Ok(code) => Err(mismatch(path, expected.trim(), code.trim())),
        Err(e) => Err(format!("Unparse error for {}: {}", path.display(), e).into()),
    }
}

fn check_error(path: &Path) -> Result<(), Failed> {
    let expected_err = path.with_extension("expected.err");
    let expected = fs::read_to_string(&expected_err)
        .map_err(|e| format!("Missing expected file {}: {}", expected_err.display(), e))?;
    let document = fs::read_to_string(path)?;
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");

    match unparse(&document) {
        Ok(code) => Err(format!(
            "Expected an error for {}, but it unparsed to:\n{}",
            path.display(),
            code
        )
        .into()),
        Err(e) => {
            let actual = e.render(&document, filename);
            if actual == expected {
                Ok(())
            } else {
                Err(mismatch(path, &expected, &actual))
            }
        }
    }
}

fn main() {
    let args = Arguments::from_args();
    let root = fixture_dir();

    let trials = collect_fixtures()
        .into_iter()
        .map(|path| {
            let name = path
                .strip_prefix(&root)
                .unwrap_or(&path)
                .with_extension("")
                .to_string_lossy()
                .into_owned();
            let is_error_test = path.to_string_lossy().contains("/errors/");
            Trial::test(name, move || {
                if is_error_test {
                    check_error(&path)
                } else {
                    check_output(&path)
                }
            })
        })
        .collect();

    libtest_mimic::run(&args, trials).exit();
}
