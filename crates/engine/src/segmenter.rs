// crates/engine/src/segmenter.rs
//! Splits a multi-file trace into per-file row groups.

use echidna_coverage_shared_kernel::SourcePath;
use log::{debug, warn};
use std::collections::HashMap;

use crate::config::ScanOptions;

/// Rows belonging to one source file, in trace order.
#[derive(Debug, Clone)]
pub struct FileSegment<'a> {
    pub path: SourcePath,
    pub rows: Vec<&'a str>,
}

/// Why a file was left out of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Vendored,
    TestOrScript,
    InterfaceDirectory,
    InterfaceName,
    UserExcluded,
    FuzzingDirectory,
    NotLogical,
}

/// Returns the first exclusion rule matching `path`, if any.
///
/// Rules look at the full marker path, so vendored code is recognised even when
/// the two-segment key would not reveal it.
pub fn exclusion_for(path: &SourcePath, options: &ScanOptions) -> Option<Exclusion> {
    let file_name = path.file_name();
    let lower_dirs: Vec<String> = path.directories().map(str::to_ascii_lowercase).collect();

    if is_vendored(&lower_dirs, options) {
        return Some(Exclusion::Vendored);
    }

    if options
        .test_suffixes
        .iter()
        .any(|suffix| file_name.ends_with(suffix.as_str()))
    {
        return Some(Exclusion::TestOrScript);
    }

    if lower_dirs
        .iter()
        .any(|dir| options.interface_dirs.iter().any(|i| dir == &i.to_ascii_lowercase()))
    {
        return Some(Exclusion::InterfaceDirectory);
    }

    if options.detect_interface_names && looks_like_interface(file_name, &options.source_extension)
    {
        return Some(Exclusion::InterfaceName);
    }

    if is_user_excluded(file_name, &options.exclude, &options.source_extension) {
        return Some(Exclusion::UserExcluded);
    }

    if options.source_only
        && lower_dirs
            .iter()
            .any(|dir| options.fuzzing_dirs.iter().any(|f| dir == &f.to_ascii_lowercase()))
    {
        return Some(Exclusion::FuzzingDirectory);
    }

    if options.is_logical() {
        let in_logical_dir = path.directories().any(|dir| dir == options.logical_dir);
        if !in_logical_dir || !file_name.starts_with(options.logical_prefix.as_str()) {
            return Some(Exclusion::NotLogical);
        }
    }

    None
}

/// `lib/forge-std/...`, `node_modules/@openzeppelin/...`: only the directory
/// right below a vendor root is compared, so a checkout such as
/// `/home/dev/forge-playground` is not mistaken for a dependency.
fn is_vendored(lower_dirs: &[String], options: &ScanOptions) -> bool {
    lower_dirs.windows(2).any(|pair| {
        let root = &pair[0];
        let package = pair[1].trim_start_matches('@');
        options
            .vendor_roots
            .iter()
            .any(|r| r.eq_ignore_ascii_case(root))
            && options.vendored_packages.iter().any(|name| {
                let name = name.to_ascii_lowercase();
                package == name || package.starts_with(&format!("{name}-"))
            })
    })
}

/// `IERC20.sol`: an uppercase letter followed by another uppercase letter.
fn looks_like_interface(file_name: &str, extension: &str) -> bool {
    let Some(stem) = file_name
        .strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))
    else {
        return false;
    };
    let mut chars = stem.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(a), Some(b)) if a.is_ascii_uppercase() && b.is_ascii_uppercase()
    )
}

fn is_user_excluded(file_name: &str, exclude: &[String], extension: &str) -> bool {
    let dotted = format!(".{extension}");
    let normalize = |name: &str| {
        if name.ends_with(&dotted) {
            name.to_string()
        } else {
            format!("{name}{dotted}")
        }
    };
    let file_name = normalize(file_name);
    exclude.iter().any(|name| normalize(name.trim()) == file_name)
}

/// Groups trace rows by the path marker that precedes them.
///
/// Rows before the first marker and rows of excluded files are dropped. A path
/// that appears twice keeps its first position and accumulates rows.
pub fn segment_trace<'a>(trace: &'a str, options: &ScanOptions) -> Vec<FileSegment<'a>> {
    let mut segments: Vec<FileSegment<'a>> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut current: Option<usize> = None;

    for row in trace.lines() {
        if let Some(path) = SourcePath::from_marker(row) {
            if let Some(rule) = exclusion_for(&path, options) {
                debug!("excluding {} ({rule:?})", path.full());
                current = None;
                continue;
            }
            let key = path.key().to_string();
            current = Some(*index_by_key.entry(key).or_insert_with(|| {
                segments.push(FileSegment {
                    path: path.clone(),
                    rows: Vec::new(),
                });
                segments.len() - 1
            }));
            if let Some(idx) = current
                && segments[idx].path.full() != path.full()
            {
                warn!(
                    "{} and {} share the key {}; merging their rows",
                    segments[idx].path.full(),
                    path.full(),
                    path.key()
                );
            }
            continue;
        }

        if let Some(idx) = current {
            segments[idx].rows.push(row);
        }
    }

    segments
}
