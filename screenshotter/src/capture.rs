//! Turning one URL into one PNG per viewport.
//!
//! [`Capturer`] is the seam the batch runner drives. [`ChromeCapturer`] is the
//! production implementation: it checks that the page loads, runs a headless
//! Chromium once per viewport and optionally crops the blank area below the
//! page content.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use image::{GenericImageView, RgbaImage};
use log::{debug, info};
use reqwest::Client;

use crate::chrome::create_chrome_command;
use crate::error::CaptureError;
use crate::io::screenshot_file_name;
use crate::viewport::Viewport;

#[async_trait]
pub trait Capturer: Send + Sync {
    /// Capture `url` at every viewport into `output_dir`, returning the files
    /// written. The whole set succeeds or fails as one unit.
    async fn capture(
        &self,
        url: &str,
        viewports: &[Viewport],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, CaptureError>;
}

#[derive(Debug, Clone)]
pub struct ChromeCapturer {
    pub program: String,
    pub delay: Duration,
    pub timeout: Duration,
    pub crop: bool,
    pub extra_args: Vec<String>,
    /// Fetch the page before launching the browser. Chromium screenshots its
    /// own error page and exits 0 when a load fails, so this is the only
    /// place a navigation failure shows up.
    pub preflight: bool,
    pub client: Client,
}

impl ChromeCapturer {
    async fn check_page_loads(&self, url: &str) -> Result<(), CaptureError> {
        self.client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map(|_| ())
            .map_err(|source| CaptureError::Navigation {
                url: url.to_string(),
                source,
            })
    }

    async fn capture_viewport(
        &self,
        url: &str,
        viewport: &Viewport,
        output_dir: &Path,
    ) -> Result<PathBuf, CaptureError> {
        let path = output_dir.join(screenshot_file_name(url, viewport));

        // Every run writes its own file and renames it into place, so two
        // URLs with the same slug in one batch never touch a half-written PNG.
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{}.", screenshot_file_name(url, viewport)))
            .suffix(".png")
            .tempfile_in(output_dir)
            .map_err(|source| CaptureError::Persist {
                path: path.clone(),
                source,
            })?
            .into_temp_path();

        let mut chrome = create_chrome_command(&self.program);
        chrome
            .args(&self.extra_args)
            .window(viewport)
            .settle(self.delay)
            .screenshot(&staging, url);
        let mut cmd = chrome.cmd();
        debug!("Running {:?}", cmd.as_std());

        let child = cmd.spawn().map_err(|source| CaptureError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CaptureError::Timeout {
                viewport: viewport.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|source| CaptureError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CaptureError::Exit {
                viewport: viewport.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // the staging file exists from the start, empty until the browser writes it
        let written = std::fs::metadata(&staging)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(CaptureError::MissingOutput { path });
        }

        if self.crop {
            let file = staging.to_path_buf();
            // decoding a 2000px tall PNG is too slow to do on the runtime thread
            tokio::task::spawn_blocking(move || crop_file_to_content(&file))
                .await
                .map_err(|source| CaptureError::Task {
                    path: path.clone(),
                    source,
                })??;
        }

        staging
            .persist(&path)
            .map_err(|e| CaptureError::Persist {
                path: path.clone(),
                source: e.error,
            })?;

        Ok(path)
    }
}

impl Default for ChromeCapturer {
    fn default() -> Self {
        ChromeCapturer {
            program: crate::chrome::DEFAULT_CHROME.to_string(),
            delay: Duration::from_millis(2000),
            timeout: Duration::from_secs(60),
            crop: true,
            extra_args: Vec::new(),
            preflight: true,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Capturer for ChromeCapturer {
    async fn capture(
        &self,
        url: &str,
        viewports: &[Viewport],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, CaptureError> {
        if self.preflight {
            self.check_page_loads(url).await?;
        }

        let mut files = Vec::with_capacity(viewports.len());
        for viewport in viewports {
            let file = self.capture_viewport(url, viewport, output_dir).await?;
            info!("Screenshot for {} ({})", url, viewport);
            files.push(file);
        }
        Ok(files)
    }
}

/// Rows to keep once the uniform band at the bottom of the image is removed.
/// The band is every trailing row whose pixels all match the colour of the
/// bottom-left pixel. At least one row is always kept.
pub fn content_height(image: &RgbaImage) -> u32 {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return height;
    }

    let background = *image.get_pixel(0, height - 1);
    let mut keep = height;
    while keep > 1 {
        let row = keep - 1;
        if (0..width).all(|x| *image.get_pixel(x, row) == background) {
            keep -= 1;
        } else {
            break;
        }
    }
    keep
}

pub fn crop_file_to_content(path: &Path) -> Result<(), CaptureError> {
    let to_error = |source| CaptureError::Image {
        path: path.to_path_buf(),
        source,
    };

    let image = image::open(path).map_err(to_error)?.to_rgba8();
    let keep = content_height(&image);
    if keep == image.height() {
        return Ok(());
    }

    debug!(
        "Cropping {} from {} to {} rows",
        path.display(),
        image.height(),
        keep
    );
    let cropped = image.view(0, 0, image.width(), keep).to_image();
    cropped.save(path).map_err(to_error)
}
