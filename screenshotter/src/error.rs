use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single URL capture across its viewports.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("browser exited with {status} for viewport {viewport}: {stderr}")]
    Exit {
        viewport: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("viewport {viewport} did not finish within {timeout:?}")]
    Timeout { viewport: String, timeout: Duration },

    #[error("browser reported success but {} was not written", .path.display())]
    MissingOutput { path: PathBuf },

    #[error("failed to load {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to move screenshot into place at {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("crop of {} did not finish: {source}", .path.display())]
    Task {
        path: PathBuf,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("failed to crop {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read URL list {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to prepare output directory {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("capture failed for {url}: {source}")]
    Capture {
        url: String,
        #[source]
        source: CaptureError,
    },

    #[error("scan of {url} failed: {message}")]
    Scan { url: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
