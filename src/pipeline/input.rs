//! Input resolution: turn user-supplied file patterns into document paths.
//!
//! Patterns support `*`, `?`, `[...]`, `{a,b}` and recursive `**`, plus a
//! leading `~` for the home directory. The literal directory prefix of a
//! pattern is walked, the rest is matched against paths below it, so
//! `PDF/**/*.pdf` yields `PDF/2024/April.pdf` rather than an absolute or
//! `./`-prefixed path. Output grouping depends on that shape.

use crate::error::Pdf2CsvError;
use globwalk::GlobWalkerBuilder;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Expand a leading `~` in `pattern` to `home`.
///
/// Patterns are returned unchanged when `home` is `None` or the pattern does
/// not start with `~` / `~/`.
pub fn expand_user(pattern: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return pattern.to_string();
    };
    if pattern == "~" {
        return home.to_string_lossy().into_owned();
    }
    match pattern.strip_prefix("~/") {
        Some(rest) => home.join(rest).to_string_lossy().into_owned(),
        None => pattern.to_string(),
    }
}

/// Regular files matched by any of `patterns`, sorted and deduplicated.
///
/// # Errors
/// [`Pdf2CsvError::InvalidPattern`] for a malformed pattern,
/// [`Pdf2CsvError::StatFailed`] if a matched path cannot be stat-ed.
pub fn patterns_to_paths(
    patterns: &[String],
    home: Option<&Path>,
) -> Result<Vec<PathBuf>, Pdf2CsvError> {
    debug!("patterns={}", patterns.len());
    let mut paths = Vec::new();
    for (i, raw) in patterns.iter().enumerate() {
        let pattern = expand_user(raw, home);
        let matches = glob_files(&pattern)?;
        debug!("patterns[{}]={:?} {} matches", i, pattern, matches.len());
        for path in matches {
            if is_regular_file(&path)? {
                paths.push(path);
            }
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>, Pdf2CsvError> {
    let (base, rest) = split_pattern(pattern);
    let base = clean_path(&base);
    let Some(rest) = rest else {
        // No wildcards: the pattern names one path, which may not exist.
        return Ok(if base.exists() { vec![base] } else { Vec::new() });
    };

    let root = if base.as_os_str().is_empty() {
        Path::new(".")
    } else {
        base.as_path()
    };
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    // globwalk strips its own normalised root from every walked path, so it
    // is handed the canonical root and matches are re-rooted onto `base`.
    let canonical = std::fs::canonicalize(root).map_err(|source| Pdf2CsvError::StatFailed {
        path: root.to_path_buf(),
        source,
    })?;

    // A leading `/` anchors the gitignore-style glob at the root.
    let anchored = format!("/{rest}");
    let walker = GlobWalkerBuilder::from_patterns(&canonical, &[anchored.as_str()])
        .follow_links(true)
        .build()
        .map_err(|e| Pdf2CsvError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(e, root))?;
        let below = entry.path().strip_prefix(&canonical).unwrap_or(entry.path());
        paths.push(base.join(below));
    }
    Ok(paths)
}

fn walk_error(e: globwalk::WalkError, root: &Path) -> Pdf2CsvError {
    let path = e.path().unwrap_or(root).to_path_buf();
    let detail = e.to_string();
    let source = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(detail));
    Pdf2CsvError::StatFailed { path, source }
}

/// Lexically clean `path`: drop `.` components, fold `name/..` pairs and
/// repeated separators. A path that cleans to nothing becomes empty.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    parts.iter().collect()
}

/// Split `pattern` into its literal directory prefix and the wildcard remainder.
///
/// `None` for the remainder means the pattern has no wildcards.
fn split_pattern(pattern: &str) -> (PathBuf, Option<String>) {
    let segments: Vec<&str> = pattern.split('/').collect();
    match segments.iter().position(|s| has_wildcard(s)) {
        None => (PathBuf::from(pattern), None),
        Some(i) => {
            let base = segments[..i].join("/");
            let base = if base.is_empty() && pattern.starts_with('/') {
                "/".to_string()
            } else {
                base
            };
            (PathBuf::from(base), Some(segments[i..].join("/")))
        }
    }
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

fn is_regular_file(path: &Path) -> Result<bool, Pdf2CsvError> {
    std::fs::metadata(path)
        .map(|m| m.is_file())
        .map_err(|source| Pdf2CsvError::StatFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// Size of `path` in megabytes.
pub fn file_size_mb(path: &Path) -> Result<f64, Pdf2CsvError> {
    std::fs::metadata(path)
        .map(|m| m.len() as f64 / 1024.0 / 1024.0)
        .map_err(|source| Pdf2CsvError::StatFailed {
            path: path.to_path_buf(),
            source,
        })
}
