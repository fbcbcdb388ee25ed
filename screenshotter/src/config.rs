use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::capture::ChromeCapturer;
use crate::chrome::DEFAULT_CHROME;
use crate::error::{Error, Result};
use crate::viewport::{default_viewports, Viewport};

pub const DEFAULT_OUTPUT: &str = "screenshots";

/// Settings for one `process` run. Values come from the defaults, then an
/// optional JSON file, then command line flags.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub viewports: Vec<Viewport>,
    pub batch_size: usize,
    pub output: PathBuf,
    /// Time the page gets to render after load, in milliseconds.
    pub delay_ms: u64,
    /// Upper bound for a single browser run, in seconds.
    pub timeout_secs: u64,
    pub crop: bool,
    pub chrome: String,
    pub chrome_args: Vec<String>,
    /// Fetch each page once before screenshotting so failed loads are errors.
    pub preflight: bool,
    /// Write into a timestamped subdirectory of `output`.
    pub date_dir: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            viewports: default_viewports(),
            batch_size: DEFAULT_BATCH_SIZE,
            output: PathBuf::from(DEFAULT_OUTPUT),
            delay_ms: 2000,
            timeout_secs: 60,
            crop: true,
            chrome: DEFAULT_CHROME.to_string(),
            chrome_args: Vec::new(),
            preflight: true,
            date_dir: true,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::Config(format!("cannot open {}: {}", path.display(), e)))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".to_string()));
        }
        if self.viewports.is_empty() {
            return Err(Error::Config("at least one viewport is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }

    pub fn capturer(&self) -> ChromeCapturer {
        ChromeCapturer {
            program: self.chrome.clone(),
            delay: Duration::from_millis(self.delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            crop: self.crop,
            extra_args: self.chrome_args.clone(),
            preflight: self.preflight,
            ..ChromeCapturer::default()
        }
    }
}
