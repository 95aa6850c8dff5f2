//! Hygiene: enforces coding standards at test time.
//!
//! Scans the overlay crate's production sources (everything under `src/`
//! except `*_test.rs`) for constructs that crash the host page or swallow
//! errors. Every budget is zero. Raising one requires removing an existing
//! occurrence first.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

/// Panics abort the wasm instance and take the whole editor down.
const PANICS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or handle the None/Err" },
    Budget { pattern: ".expect(", max: 0, why: "propagate or handle the None/Err" },
    Budget { pattern: "panic!(", max: 0, why: "return a policy outcome instead" },
    Budget { pattern: "unreachable!(", max: 0, why: "make the match exhaustive" },
    Budget { pattern: "todo!(", max: 0, why: "implement the stub" },
    Budget { pattern: "unimplemented!(", max: 0, why: "implement the stub" },
];

/// Silent loss: discarding an error without looking at it.
const SILENT: &[Budget] = &[
    Budget { pattern: "let _ =", max: 0, why: "inspect or log the value" },
    Budget { pattern: ".ok()", max: 0, why: "match on the error and log it" },
];

/// Output goes through the `log` facade; dead code is deleted, not hidden.
const STYLE: &[Budget] = &[
    Budget { pattern: "println!(", max: 0, why: "use log::debug!/info!" },
    Budget { pattern: "eprintln!(", max: 0, why: "use log::warn!" },
    Budget { pattern: "dbg!(", max: 0, why: "remove debugging output" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete the dead code" },
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Every line matching `pattern`, as `path:line`.
fn occurrences(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(n, _)| format!("{}:{}", file.path, n + 1))
        })
        .collect()
}

fn check(budgets: &[Budget]) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the overlay crate root");

    let failures: Vec<String> = budgets
        .iter()
        .filter_map(|b| {
            let hits = occurrences(&files, b.pattern);
            (hits.len() > b.max).then(|| {
                format!("`{}` budget exceeded: found {}, max {} ({}).\n  {}", b.pattern, hits.len(), b.max, b.why, hits.join("\n  "))
            })
        })
        .collect();
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn panic_budgets() {
    check(PANICS);
}

#[test]
fn silent_discard_budgets() {
    check(SILENT);
}

#[test]
fn style_budgets() {
    check(STYLE);
}
