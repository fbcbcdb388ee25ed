use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::viewport::Viewport;

pub const DEFAULT_CHROME: &str = "chromium";

#[derive(Debug)]
pub struct Chrome {
    cmd: Command,
}

impl Chrome {
    pub fn cmd(self) -> Command {
        self.cmd
    }

    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Chrome {
        self.cmd.arg(arg);
        self
    }

    pub fn args<Iter, Str>(&mut self, args: Iter) -> &mut Chrome
    where
        Iter: IntoIterator<Item = Str>,
        Str: AsRef<OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn window(&mut self, viewport: &Viewport) -> &mut Chrome {
        self.arg(format!("--window-size={}", viewport.window_size()))
    }

    /// Let the page run this long after load before the screenshot is taken.
    pub fn settle(&mut self, delay: Duration) -> &mut Chrome {
        self.arg(format!("--virtual-time-budget={}", delay.as_millis()))
    }

    pub fn screenshot(&mut self, file: &Path, url: &str) -> &mut Chrome {
        let mut flag = std::ffi::OsString::from("--screenshot=");
        flag.push(file);
        self.arg(flag);
        self.arg(url)
    }
}

pub fn create_chrome_command<S: AsRef<OsStr>>(program: S) -> Chrome {
    let mut cmd = Command::new(program);
    cmd.args([
        "--headless",
        "--disable-gpu",
        "--hide-scrollbars",
        "--no-first-run",
        "--no-default-browser-check",
    ]);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::piped());
    // a timed out capture must not leave a browser behind
    cmd.kill_on_drop(true);
    Chrome { cmd }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(chrome: Chrome) -> Vec<String> {
        chrome
            .cmd()
            .as_std()
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_screenshot_command_line() {
        let mut chrome = create_chrome_command("chromium");
        chrome
            .window(&Viewport::new(768, 2000))
            .settle(Duration::from_secs(2))
            .screenshot(Path::new("/tmp/out/a.com-768x2000.png"), "http://a.com");

        let args = args_of(chrome);
        assert_eq!(args[0], "--headless");
        assert!(args.contains(&"--window-size=768,2000".to_string()));
        assert!(args.contains(&"--virtual-time-budget=2000".to_string()));
        assert!(args.contains(&"--screenshot=/tmp/out/a.com-768x2000.png".to_string()));
        assert_eq!(args.last().unwrap(), "http://a.com");
    }
}
