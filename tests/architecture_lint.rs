//! Architecture enforcement tests.
//!
//! The crate is layered: `core` holds lattice values, networks, config and
//! verification; `engine` builds operators on top of it. These tests keep
//! the layering from eroding.
//!
//! # Test Categories
//!
//! 1. **Layering** - `core` must not import from `engine`
//! 2. **Logging** - library code logs through `tracing`, never prints
//! 3. **Error handling** - no `unwrap()` outside test modules in `engine`

use std::fs;
use std::path::{Path, PathBuf};

/// All `.rs` files under a directory, recursively.
fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|e| e == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Source text before the first `#[cfg(test)]`.
fn non_test_source(path: &Path) -> String {
    let content = fs::read_to_string(path).unwrap();
    match content.find("#[cfg(test)]") {
        Some(idx) => content[..idx].to_string(),
        None => content,
    }
}

/// Lines that are code, not comments or doc comments.
fn code_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(i, line)| (i + 1, line))
}

fn src() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

#[test]
fn core_does_not_depend_on_engine() {
    let mut violations = Vec::new();
    for file in rust_files(&src().join("core")) {
        let source = fs::read_to_string(&file).unwrap();
        for (line_no, line) in code_lines(&source) {
            if line.contains("crate::engine") || line.contains("rolework::engine") {
                violations.push(format!("{}:{}: {}", file.display(), line_no, line.trim()));
            }
        }
    }
    assert!(
        violations.is_empty(),
        "core must not import engine:\n{}",
        violations.join("\n")
    );
}

#[test]
fn library_never_prints() {
    let mut violations = Vec::new();
    for file in rust_files(&src()) {
        let source = non_test_source(&file);
        for (line_no, line) in code_lines(&source) {
            if ["println!", "eprintln!", "print!(", "eprint!("]
                .iter()
                .any(|m| line.contains(m))
            {
                violations.push(format!("{}:{}: {}", file.display(), line_no, line.trim()));
            }
        }
    }
    assert!(
        violations.is_empty(),
        "use tracing instead of printing:\n{}",
        violations.join("\n")
    );
}

#[test]
fn engine_propagates_errors() {
    let mut violations = Vec::new();
    for file in rust_files(&src().join("engine")) {
        let source = non_test_source(&file);
        for (line_no, line) in code_lines(&source) {
            if line.contains(".unwrap()") || line.contains(".expect(") {
                violations.push(format!("{}:{}: {}", file.display(), line_no, line.trim()));
            }
        }
    }
    assert!(
        violations.is_empty(),
        "engine code must not unwrap:\n{}",
        violations.join("\n")
    );
}
