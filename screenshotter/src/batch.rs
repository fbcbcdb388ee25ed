//! Fixed-size batching of capture work.
//!
//! URLs are split into consecutive chunks. Every URL in a chunk is captured
//! concurrently and the chunk must settle completely before the next one
//! starts, which bounds how many browsers run at once. The first failure
//! stops the job once its chunk has settled.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use log::info;

use crate::capture::Capturer;
use crate::error::{Error, Result};
use crate::viewport::Viewport;

pub const DEFAULT_BATCH_SIZE: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub urls: usize,
    pub batches: usize,
    pub files: Vec<PathBuf>,
}

/// Receives batch-level progress from [`BatchRunner::run`].
pub trait Progress {
    /// Called before a batch starts. `index` is 1-based.
    fn batch_started(&mut self, index: usize, total: usize, urls: &[String]);

    fn url_captured(&mut self, _url: &str, _files: &[PathBuf]) {}

    fn finished(&mut self, _summary: &RunSummary) {}
}

/// Progress reported through the `log` facade.
#[derive(Debug, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn batch_started(&mut self, index: usize, total: usize, urls: &[String]) {
        info!("Processing batch {} of {} ({} URLs)", index, total, urls.len());
    }

    fn url_captured(&mut self, url: &str, files: &[PathBuf]) {
        info!("Captured {} ({} files)", url, files.len());
    }

    fn finished(&mut self, summary: &RunSummary) {
        info!(
            "Captured {} files for {} URLs in {} batches",
            summary.files.len(),
            summary.urls,
            summary.batches
        );
    }
}

/// Split `urls` into consecutive chunks of at most `batch_size`, preserving order.
pub fn chunk_urls(urls: &[String], batch_size: usize) -> Result<Vec<&[String]>> {
    if batch_size == 0 {
        return Err(Error::Config("batch size must be at least 1".to_string()));
    }
    Ok(urls.chunks(batch_size).collect())
}

pub struct BatchRunner<C> {
    capturer: C,
    viewports: Vec<Viewport>,
    batch_size: usize,
}

impl<C: Capturer> BatchRunner<C> {
    pub fn new(capturer: C, viewports: Vec<Viewport>, batch_size: usize) -> BatchRunner<C> {
        BatchRunner {
            capturer,
            viewports,
            batch_size,
        }
    }

    #[cfg(test)]
    pub(crate) fn capturer(&self) -> &C {
        &self.capturer
    }

    pub async fn run(
        &self,
        urls: &[String],
        output_dir: &Path,
        progress: &mut dyn Progress,
    ) -> Result<RunSummary> {
        let chunks = chunk_urls(urls, self.batch_size)?;
        let mut summary = RunSummary {
            urls: urls.len(),
            batches: chunks.len(),
            files: Vec::new(),
        };

        if urls.is_empty() {
            progress.finished(&summary);
            return Ok(summary);
        }

        let total = chunks.len();
        for (i, chunk) in chunks.into_iter().enumerate() {
            progress.batch_started(i + 1, total, chunk);

            let captures = chunk
                .iter()
                .map(|url| self.capturer.capture(url, &self.viewports, output_dir));
            // in-flight siblings are never cancelled; the whole chunk settles first
            let results = join_all(captures).await;

            for (url, result) in chunk.iter().zip(results) {
                match result {
                    Ok(files) => {
                        progress.url_captured(url, &files);
                        summary.files.extend(files);
                    }
                    Err(source) => {
                        return Err(Error::Capture {
                            url: url.clone(),
                            source,
                        })
                    }
                }
            }
        }

        progress.finished(&summary);
        Ok(summary)
    }
}
