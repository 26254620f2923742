//! Hygiene: source-level checks on the floorplan crate.
//!
//! Each rule scans the production sources under `src/` (test files excluded)
//! for one antipattern and holds it to a budget. Budgets only go down.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct Rule {
    name: &'static str,
    pattern: &'static str,
    max: usize,
}

const RULES: &[Rule] = &[
    // Panics.
    Rule { name: "unwrap", pattern: ".unwrap()", max: 0 },
    Rule { name: "expect", pattern: ".expect(", max: 0 },
    Rule { name: "panic", pattern: "panic!(", max: 0 },
    Rule { name: "unreachable", pattern: "unreachable!(", max: 0 },
    Rule { name: "todo", pattern: "todo!(", max: 0 },
    Rule { name: "unimplemented", pattern: "unimplemented!(", max: 0 },
    // Errors dropped without a look.
    Rule { name: "silent discard", pattern: "let _ =", max: 0 },
    Rule { name: "dot ok", pattern: ".ok()", max: 0 },
    // Structure.
    Rule { name: "allow dead code", pattern: "#[allow(dead_code)]", max: 0 },
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

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|file| (file.path.clone(), file.content.lines().filter(|line| line.contains(pattern)).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("lib.rs")), "run from the crate root");
}

#[test]
fn antipattern_budgets() {
    let files = source_files();
    let mut report = Vec::new();
    for rule in RULES {
        let found = hits(&files, rule.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > rule.max {
            report.push(format!("{} budget exceeded: found {count}, max {}", rule.name, rule.max));
            report.extend(found.iter().map(|(path, c)| format!("  {path}: {c}")));
        }
    }
    assert!(report.is_empty(), "\n{}", report.join("\n"));
}
