//! Hygiene — enforces coding standards at test time
//!
//! These tests scan the signpad source tree for antipatterns that violate
//! project standards. Each has a budget (ideally zero). If you must add one,
//! you have to fix an existing one first — the budget never grows.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

// Panics — these crash the process.
const MAX_UNWRAP: usize = 0;
const MAX_EXPECT: usize = 0;
const MAX_PANIC: usize = 0;
const MAX_UNREACHABLE: usize = 0;
const MAX_TODO: usize = 0;
const MAX_UNIMPLEMENTED: usize = 0;

// Silent loss — discards errors without inspecting.
const MAX_SILENT_DISCARD: usize = 0;
const MAX_DOT_OK: usize = 0;

// Style / structure.
const MAX_ALLOW_DEAD_CODE: usize = 0;
const MAX_PRINTLN: usize = 0;

// Pixel code: numeric `as` casts in the rasterizer and codec. The two left
// are the f64 -> f32 sample conversion in `raster::to_f32`.
const MAX_PIXEL_CASTS: usize = 2;
const PIXEL_FILES: [&str; 2] = ["raster.rs", "snapshot.rs"];
const PRIMITIVES: [&str; 10] = ["f32", "f64", "u8", "u16", "u32", "u64", "usize", "i32", "i64", "isize"];

// Browser APIs stay behind the `web` binding so the core builds natively.
const BROWSER_CRATES: [&str; 3] = ["web_sys", "wasm_bindgen", "js_sys"];
const BROWSER_BINDING: &str = "web.rs";

struct SourceFile {
    path: String,
    content: String,
}

impl SourceFile {
    fn name(&self) -> &str {
        Path::new(&self.path).file_name().and_then(|n| n.to_str()).unwrap_or_default()
    }

    /// Non-comment lines.
    fn code_lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines().filter(|line| !line.trim_start().starts_with("//"))
    }
}

/// Collect production `.rs` files from `src/`, excluding test files.
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

type Hits = Vec<(String, usize)>;

fn count_with(files: &[SourceFile], per_line: impl Fn(&str) -> usize) -> Hits {
    files
        .iter()
        .filter_map(|file| {
            let count: usize = file.code_lines().map(&per_line).sum();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn count_in_source(files: &[SourceFile], pattern: &str) -> Hits {
    count_with(files, |line| usize::from(line.contains(pattern)))
}

fn numeric_casts(line: &str) -> usize {
    PRIMITIVES
        .iter()
        .map(|ty| {
            let cast = format!(" as {ty}");
            line.match_indices(&cast)
                .filter(|(at, _)| {
                    let next = line[at + cast.len()..].chars().next();
                    !next.is_some_and(|c| c.is_alphanumeric() || c == '_')
                })
                .count()
        })
        .sum()
}

fn format_hits(hits: &[(String, usize)]) -> String {
    hits.iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn assert_budget(label: &str, hits: &Hits, max: usize) {
    let count: usize = hits.iter().map(|(_, c)| c).sum();
    assert!(count <= max, "{label} budget exceeded: found {count}, max {max}.\n{}", format_hits(hits));
}

// =============================================================
// Panics
// =============================================================

#[test]
fn unwrap_budget() {
    assert_budget(".unwrap()", &count_in_source(&source_files(), ".unwrap()"), MAX_UNWRAP);
}

#[test]
fn expect_budget() {
    assert_budget(".expect()", &count_in_source(&source_files(), ".expect("), MAX_EXPECT);
}

#[test]
fn panic_budget() {
    assert_budget("panic!()", &count_in_source(&source_files(), "panic!("), MAX_PANIC);
}

#[test]
fn unreachable_budget() {
    assert_budget("unreachable!()", &count_in_source(&source_files(), "unreachable!("), MAX_UNREACHABLE);
}

#[test]
fn todo_budget() {
    assert_budget("todo!()", &count_in_source(&source_files(), "todo!("), MAX_TODO);
}

#[test]
fn unimplemented_budget() {
    assert_budget("unimplemented!()", &count_in_source(&source_files(), "unimplemented!("), MAX_UNIMPLEMENTED);
}

// =============================================================
// Silent loss
// =============================================================

#[test]
fn silent_discard_budget() {
    assert_budget("let _ =", &count_in_source(&source_files(), "let _ ="), MAX_SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    assert_budget(".ok()", &count_in_source(&source_files(), ".ok()"), MAX_DOT_OK);
}

// =============================================================
// Style / structure
// =============================================================

#[test]
fn allow_dead_code_budget() {
    assert_budget("#[allow(dead_code)]", &count_in_source(&source_files(), "#[allow(dead_code)]"), MAX_ALLOW_DEAD_CODE);
}

#[test]
fn println_budget() {
    // Also catches eprintln!. Use tracing.
    assert_budget("println!", &count_in_source(&source_files(), "println!("), MAX_PRINTLN);
}

// =============================================================
// Pixel code
// =============================================================

#[test]
fn pixel_cast_budget() {
    let files: Vec<SourceFile> = source_files().into_iter().filter(|f| PIXEL_FILES.contains(&f.name())).collect();
    assert_eq!(files.len(), PIXEL_FILES.len(), "pixel modules missing from src/");
    assert_budget("numeric `as` cast", &count_with(&files, numeric_casts), MAX_PIXEL_CASTS);
}

#[test]
fn cast_counter_skips_longer_identifiers() {
    assert_eq!(numeric_casts("let x = y as f32;"), 1);
    assert_eq!(numeric_casts("(p.x as f32, p.y as f32)"), 2);
    assert_eq!(numeric_casts("use a::STANDARD as B64;"), 0);
    assert_eq!(numeric_casts("let n = m as u8_alias;"), 0);
}

#[test]
fn browser_apis_stay_in_binding() {
    let files: Vec<SourceFile> = source_files().into_iter().filter(|f| f.name() != BROWSER_BINDING).collect();
    let hits = count_with(&files, |line| BROWSER_CRATES.iter().filter(|krate| line.contains(*krate)).count());
    assert_budget("browser API outside web.rs", &hits, 0);
}
