use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Height given to every default viewport. The capture is cropped to the
/// page content afterwards, so this is an upper bound rather than a size.
pub const DEFAULT_HEIGHT: u32 = 2000;

pub const DEFAULT_WIDTHS: [u32; 4] = [320, 768, 1024, 1280];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Viewport {
        Viewport {
            name: format!("{}x{}", width, height),
            width,
            height,
        }
    }

    /// Parse a `WIDTHxHEIGHT` string such as `1024x2000`.
    pub fn parse(spec: &str) -> Result<Viewport, String> {
        let spec = spec.trim();
        let (width, height) = spec
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("viewport '{}' is not in WIDTHxHEIGHT form", spec))?;

        let width = parse_dimension(width, spec)?;
        let height = parse_dimension(height, spec)?;
        Ok(Viewport::new(width, height))
    }

    /// `--window-size` argument for the browser.
    pub fn window_size(&self) -> String {
        format!("{},{}", self.width, self.height)
    }
}

fn parse_dimension(value: &str, spec: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(format!("viewport '{}' has a zero dimension", spec)),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("viewport '{}' has a non-numeric dimension", spec)),
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Viewport::parse(s)
    }
}

// Config files spell viewports the same way the command line does.
impl Serialize for Viewport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Viewport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        Viewport::parse(&spec).map_err(serde::de::Error::custom)
    }
}

/// The catalog applied to every URL, in capture order.
pub fn default_viewports() -> Vec<Viewport> {
    DEFAULT_WIDTHS
        .iter()
        .map(|&width| Viewport::new(width, DEFAULT_HEIGHT))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let viewports = default_viewports();
        let widths: Vec<u32> = viewports.iter().map(|v| v.width).collect();
        assert_eq!(widths, vec![320, 768, 1024, 1280]);
        assert!(viewports.iter().all(|v| v.height == 2000));
        assert_eq!(viewports[0].name, "320x2000");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Viewport::parse("1024x2000").unwrap(), Viewport::new(1024, 2000));
        assert_eq!(Viewport::parse(" 800X600 ").unwrap(), Viewport::new(800, 600));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Viewport::parse("1024").is_err());
        assert!(Viewport::parse("0x2000").is_err());
        assert!(Viewport::parse("1024x0").is_err());
        assert!(Viewport::parse("widexhigh").is_err());
    }

    #[test]
    fn test_display_and_window_size() {
        let viewport = Viewport::new(768, 2000);
        assert_eq!(viewport.to_string(), "768x2000");
        assert_eq!(viewport.window_size(), "768,2000");
    }

    #[test]
    fn test_serde_uses_dimension_string() {
        let viewports: Vec<Viewport> = serde_json::from_str(r#"["320x480", "1280x2000"]"#).unwrap();
        assert_eq!(viewports, vec![Viewport::new(320, 480), Viewport::new(1280, 2000)]);
        assert_eq!(serde_json::to_string(&viewports[0]).unwrap(), r#""320x480""#);
        assert!(serde_json::from_str::<Viewport>(r#""0x1""#).is_err());
    }
}
