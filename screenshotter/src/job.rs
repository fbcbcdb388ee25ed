use std::path::{Path, PathBuf};

use log::info;

use crate::batch::{BatchRunner, Progress, RunSummary};
use crate::capture::Capturer;
use crate::config::Config;
use crate::error::Result;
use crate::io::{create_output_dir, read_urls};

#[derive(Debug)]
pub struct JobReport {
    pub output_dir: PathBuf,
    pub summary: RunSummary,
}

/// Capture every URL listed in `file` using the settings in `config`.
///
/// The URL file is read to the end before the output directory is created
/// or any capture starts, so an unreadable file never leaves an empty run
/// directory behind.
pub async fn process_file<C: Capturer>(
    file: &Path,
    config: &Config,
    capturer: C,
    progress: &mut dyn Progress,
) -> Result<JobReport> {
    config.validate()?;

    info!("Processing screenshots for all URLs in the '{}' file.", file.display());
    let urls = read_urls(file)?;
    info!("Finished reading the '{}' file: {} URLs.", file.display(), urls.len());

    let output_dir = create_output_dir(&config.output, config.date_dir)?;

    let runner = BatchRunner::new(capturer, config.viewports.clone(), config.batch_size);
    let summary = runner.run(&urls, &output_dir, progress).await?;

    info!("Screenshots saved to the '{}' directory.", output_dir.display());
    Ok(JobReport {
        output_dir,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::LogProgress;
    use crate::error::{CaptureError, Error};
    use crate::viewport::Viewport;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TouchCapturer {
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    impl TouchCapturer {
        fn new(fail_on: Option<&'static str>) -> TouchCapturer {
            TouchCapturer {
                calls: AtomicUsize::new(0),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl Capturer for TouchCapturer {
        async fn capture(
            &self,
            url: &str,
            viewports: &[Viewport],
            output_dir: &Path,
        ) -> std::result::Result<Vec<PathBuf>, CaptureError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(url) {
                return Err(CaptureError::MissingOutput {
                    path: output_dir.join("x.png"),
                });
            }
            let files: Vec<PathBuf> = viewports
                .iter()
                .map(|v| output_dir.join(crate::io::screenshot_file_name(url, v)))
                .collect();
            for file in &files {
                std::fs::write(file, b"png").unwrap();
            }
            Ok(files)
        }
    }

    fn url_file(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("urls");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn config_in(dir: &Path) -> Config {
        Config {
            output: dir.join("screenshots"),
            batch_size: 2,
            date_dir: false,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_process_file_writes_every_viewport() {
        let tmp = tempfile::tempdir().unwrap();
        let file = url_file(tmp.path(), "http://a.com\n\nhttp://b.com\nhttp://c.com\n");
        let config = config_in(tmp.path());

        let report = process_file(&file, &config, TouchCapturer::new(None), &mut LogProgress)
            .await
            .unwrap();

        assert_eq!(report.output_dir, tmp.path().join("screenshots"));
        assert_eq!(report.summary.batches, 2);
        assert_eq!(std::fs::read_dir(&report.output_dir).unwrap().count(), 12);
        assert!(report.output_dir.join("c.com-768x2000.png").exists());
    }

    #[tokio::test]
    async fn test_process_file_uses_dated_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = url_file(tmp.path(), "http://a.com\n");
        let config = Config {
            date_dir: true,
            ..config_in(tmp.path())
        };

        let report = process_file(&file, &config, TouchCapturer::new(None), &mut LogProgress)
            .await
            .unwrap();

        assert_eq!(report.output_dir.parent(), Some(tmp.path().join("screenshots").as_path()));
        assert_eq!(report.summary.files.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_file_aborts_before_output() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let capturer = TouchCapturer::new(None);

        let err = process_file(&tmp.path().join("nope"), &config, capturer, &mut LogProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Input { .. }));
        assert!(!tmp.path().join("screenshots").exists());
    }

    #[tokio::test]
    async fn test_capture_failure_is_reported_with_url() {
        let tmp = tempfile::tempdir().unwrap();
        let file = url_file(tmp.path(), "http://a.com\nhttp://b.com\nhttp://c.com\n");
        let config = config_in(tmp.path());

        let err = process_file(&file, &config, TouchCapturer::new(Some("http://b.com")), &mut LogProgress)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("http://b.com"));
        assert!(!tmp.path().join("screenshots/c.com-320x2000.png").exists());
        assert!(tmp.path().join("screenshots/a.com-320x2000.png").exists());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let file = url_file(tmp.path(), "http://a.com\n");
        let config = Config {
            batch_size: 0,
            ..config_in(tmp.path())
        };

        let err = process_file(&file, &config, TouchCapturer::new(None), &mut LogProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
