pub mod batch;
pub mod capture;
pub mod chrome;
pub mod config;
pub mod error;
pub mod io;
pub mod job;
pub mod scan;
pub mod viewport;

// Re-export key types and functions for easier access
pub use crate::batch::{chunk_urls, BatchRunner, LogProgress, Progress, RunSummary};
pub use crate::capture::{Capturer, ChromeCapturer};
pub use crate::config::Config;
pub use crate::error::{CaptureError, Error, Result};
pub use crate::io::{escape_url_for_directory, read_urls, screenshot_file_name};
pub use crate::job::{process_file, JobReport};
pub use crate::scan::scan_url;
pub use crate::viewport::{default_viewports, Viewport};

#[cfg(test)]
mod tests;
