use super::CliError;
use anyhow::Context;
use fitsdiff_core::{DiffReport, FitsDiffError};
use globset::GlobBuilder;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const GLOB_METACHARACTERS: &[char] = &['*', '?', '['];

/// Turns the two command-line inputs into concrete file pairs.
///
/// Either side may be a plain file, a directory, or a pattern over the final
/// path component. Directories are paired by file name; two patterns must
/// expand to the same number of files and are paired in sorted order.
pub(super) fn resolve_input_pairs(
    first: &str,
    second: &str,
) -> Result<Vec<(PathBuf, PathBuf)>, CliError> {
    let first_path = Path::new(first);
    let second_path = Path::new(second);

    match (first_path.is_dir(), second_path.is_dir()) {
        (true, true) => {
            let names = list_directory_files(first_path)?;
            if names.is_empty() {
                return Err(no_matching_input(first));
            }
            Ok(names
                .into_iter()
                .map(|name| (first_path.join(&name), second_path.join(&name)))
                .collect())
        }
        (true, false) => expand_pattern(second)?
            .into_iter()
            .map(|path| {
                let name = pairable_file_name(&path)?.to_os_string();
                Ok((first_path.join(name), path))
            })
            .collect(),
        (false, true) => expand_pattern(first)?
            .into_iter()
            .map(|path| {
                let name = pairable_file_name(&path)?.to_os_string();
                Ok((path, second_path.join(name)))
            })
            .collect(),
        (false, false) => {
            let firsts = expand_pattern(first)?;
            let seconds = expand_pattern(second)?;
            if firsts.len() != seconds.len() {
                return Err(CliError::Usage(format!(
                    "'{first}' matches {} files but '{second}' matches {}",
                    firsts.len(),
                    seconds.len()
                )));
            }
            Ok(firsts.into_iter().zip(seconds).collect())
        }
    }
}

pub(super) fn expand_pattern(request: &str) -> Result<Vec<PathBuf>, CliError> {
    if !request.contains(GLOB_METACHARACTERS) {
        return Ok(vec![PathBuf::from(request)]);
    }

    let path = Path::new(request);
    let Some(file_pattern) = path.file_name().and_then(|name| name.to_str()) else {
        return Err(CliError::Usage(format!("invalid file pattern '{request}'")));
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let matcher = GlobBuilder::new(file_pattern)
        .literal_separator(true)
        .build()
        .map_err(|error| CliError::Usage(format!("invalid file pattern '{request}': {error}")))?
        .compile_matcher();

    let mut matches = Vec::new();
    for entry in
        fs::read_dir(&parent).with_context(|| format!("failed to list '{}'", parent.display()))?
    {
        let entry = entry.with_context(|| format!("failed to list '{}'", parent.display()))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if matcher.is_match(name) {
                matches.push(entry.path());
            }
        }
    }
    matches.sort();
    if matches.is_empty() {
        return Err(no_matching_input(request));
    }
    Ok(matches)
}

fn list_directory_files(dir: &Path) -> Result<Vec<String>, CliError> {
    let mut names = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to list '{}'", dir.display()))?
    {
        let entry = entry.with_context(|| format!("failed to list '{}'", dir.display()))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn pairable_file_name(path: &Path) -> Result<&std::ffi::OsStr, CliError> {
    path.file_name()
        .ok_or_else(|| CliError::Usage(format!("cannot pair '{}' by file name", path.display())))
}

fn no_matching_input(request: &str) -> CliError {
    CliError::Diff(FitsDiffError::Read {
        path: PathBuf::from(request),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no input files match"),
    })
}

pub(super) fn write_text_output(target: Option<&Path>, rendered: &str) -> Result<(), CliError> {
    let Some(path) = target else {
        print!("{rendered}");
        return Ok(());
    };
    ensure_parent_directory(path)?;
    fs::write(path, rendered).with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    identical: bool,
    runs: &'a [DiffReport],
}

pub(super) fn write_json_report(
    path: &Path,
    identical: bool,
    runs: &[DiffReport],
) -> Result<(), CliError> {
    let body = serde_json::to_string_pretty(&JsonReport { identical, runs })
        .with_context(|| format!("failed to encode '{}'", path.display()))?;
    ensure_parent_directory(path)?;
    fs::write(path, body).with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

fn ensure_parent_directory(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    Ok(())
}
