//! Golden-file test harness for declassify.
//!
//! Discovers `.input.js` files under `tests/fixtures/`, runs the pipeline
//! (parse → lower → print), and compares output against the corresponding
//! `.expected.js` file. Fixture mode comes from the filename: `.loose.`
//! selects loose lowering, everything else runs spec mode.
//!
//! Both sides of the comparison are normalized through the same parser and
//! printer, so expected files only have to match structurally, not
//! byte-for-byte.
//!
//! Set `DCF_UPDATE_FIXTURES=1` to overwrite expected files with actual
//! output.

use std::path::{Path, PathBuf};

use anyhow::Result;
use dcf_lower::{lower_module, Mode};
use dcf_support::{emit_module, parse_module};
use swc_ecma_visit::{Visit, VisitWith};

fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/dcf_test/, so go up two levels to the
    // workspace root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
}

fn collect_input_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if !dir.exists() {
        return files;
    }
    for entry in walkdir(dir) {
        if entry
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".input.js"))
        {
            files.push(entry);
        }
    }
    files.sort();
    files
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut result = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                result.extend(walkdir(&path));
            } else {
                result.push(path);
            }
        }
    }
    result
}

fn mode_for(path: &Path) -> Mode {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.contains(".loose.") {
        Mode::Loose
    } else {
        Mode::Spec
    }
}

fn run_pipeline(source: &str, filename: &str, mode: Mode) -> Result<String> {
    let parsed = parse_module(source, filename, None)?;
    let mut module = parsed.module;
    lower_module(&mut module, mode, &parsed.source_map)?;

    // Lowered output must be free of private-name syntax.
    let mut check = PrivateNameCheck::default();
    module.visit_with(&mut check);
    anyhow::ensure!(
        !check.found,
        "{filename}: lowered module still contains a private name"
    );

    emit_module(&module, parsed.source_map)
}

/// Reprint through the same parser/printer so formatting differences
/// between hand-written expectations and generated output cancel out.
fn normalize(source: &str, filename: &str) -> Result<String> {
    let parsed = parse_module(source, filename, None)?;
    emit_module(&parsed.module, parsed.source_map)
}

#[derive(Default)]
struct PrivateNameCheck {
    found: bool,
}

impl Visit for PrivateNameCheck {
    fn visit_private_name(&mut self, _: &swc_ecma_ast::PrivateName) {
        self.found = true;
    }
}

#[test]
fn golden_file_tests() {
    let fixtures = fixtures_dir();
    let input_files = collect_input_files(&fixtures);

    assert!(
        !input_files.is_empty(),
        "No test fixtures found in {}",
        fixtures.display()
    );

    let update_mode = std::env::var("DCF_UPDATE_FIXTURES").is_ok();
    let mut failures = Vec::new();

    for input_path in &input_files {
        let expected_path = input_path
            .to_str()
            .unwrap()
            .replace(".input.js", ".expected.js");
        let expected_path = PathBuf::from(&expected_path);

        let test_name = input_path
            .strip_prefix(&fixtures)
            .unwrap()
            .display()
            .to_string();

        let source = match std::fs::read_to_string(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read input: {e}"));
                continue;
            }
        };

        let filename = input_path.display().to_string();
        let actual = match run_pipeline(&source, &filename, mode_for(input_path)) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: pipeline failed: {e}"));
                continue;
            }
        };

        if update_mode {
            if let Err(e) = std::fs::write(&expected_path, &actual) {
                failures.push(format!("{test_name}: failed to write expected: {e}"));
            }
            continue;
        }

        if !expected_path.exists() {
            failures.push(format!(
                "{test_name}: missing expected file: {}",
                expected_path.display()
            ));
            continue;
        }

        let expected = match std::fs::read_to_string(&expected_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read expected: {e}"));
                continue;
            }
        };

        let expected_norm = match normalize(&expected, &format!("{test_name}.expected")) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: expected file does not parse: {e}"));
                continue;
            }
        };
        let actual_norm = match normalize(&actual, &format!("{test_name}.actual")) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: output does not parse: {e}"));
                continue;
            }
        };

        if actual_norm.trim() != expected_norm.trim() {
            failures.push(format!(
                "{test_name}: output mismatch\n--- expected ---\n{}\n--- actual ---\n{}",
                expected_norm.trim(),
                actual_norm.trim()
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} golden test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

#[test]
fn roundtrip_tests() {
    let fixtures = fixtures_dir();
    let input_files = collect_input_files(&fixtures);

    let mut failures = Vec::new();

    for input_path in &input_files {
        let test_name = input_path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let source = match std::fs::read_to_string(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read: {e}"));
                continue;
            }
        };

        let filename = input_path.display().to_string();
        let output = match run_pipeline(&source, &filename, mode_for(input_path)) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: pipeline failed: {e}"));
                continue;
            }
        };

        // Lowered output must be standard ECMAScript.
        if let Err(e) = parse_module(&output, &format!("{test_name}.output"), None) {
            failures.push(format!(
                "{test_name}: output is not valid JavaScript: {e}\n--- output ---\n{}",
                output.trim()
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} roundtrip test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}
