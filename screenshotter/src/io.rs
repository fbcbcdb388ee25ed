use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::viewport::Viewport;

/// Read every URL from `path`, one per line. The whole file is read before
/// anything is returned so batching never starts on a partial list.
pub fn read_urls<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| Error::Input {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_urls(&contents))
}

pub fn parse_urls(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove slashes and a leading scheme from URLs so they are suitable for filenames.
pub fn escape_url_for_directory(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .map(|rest| rest.strip_prefix("www.").unwrap_or(rest))
        .unwrap_or(url);

    without_scheme.replace('/', "-").trim_end_matches('-').to_string()
}

pub fn screenshot_file_name(url: &str, viewport: &Viewport) -> String {
    format!(
        "{}-{}x{}.png",
        escape_url_for_directory(url),
        viewport.width,
        viewport.height
    )
}

/// `YYYYMMDD-HHMMSS`, zero padded.
pub fn date_stamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// Create the directory a run writes into, including parents. With `dated`
/// set, a timestamped subdirectory of `root` is used so runs never mix.
pub fn create_output_dir<P: AsRef<Path>>(root: P, dated: bool) -> Result<PathBuf> {
    let root = root.as_ref();
    let dir = if dated {
        root.join(date_stamp(&Local::now()))
    } else {
        root.to_path_buf()
    };

    fs::create_dir_all(&dir).map_err(|source| Error::Output {
        path: dir.clone(),
        source,
    })?;

    Ok(dir)
}
