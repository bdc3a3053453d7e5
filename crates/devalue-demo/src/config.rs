//! Application configuration for the demo.

use std::path::PathBuf;

use clap::Parser;
use devalue_core::Viewport;

/// Default viewport width.
const DEFAULT_WIDTH: u32 = 800;
/// Default viewport height.
const DEFAULT_HEIGHT: u32 = 600;
/// Default window title.
const DEFAULT_TITLE: &str = "Image Devalue";
/// Image loaded when none is given.
const DEFAULT_IMAGE: &str = "test_image.jpg";

#[derive(Parser, Debug, Default)]
#[command(name = "devalue")]
#[command(about = "Reduce the brightness of an image and export the result as PNG")]
pub struct Cli {
    /// Image to load (PNG, JPEG, BMP, TIFF, WebP, ...)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write the processed image to this PNG file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Effect to apply, by display name (see --list)
    #[arg(short, long)]
    pub effect: Option<String>,

    /// Set a parameter by uniform key, e.g. --set Intensity=0.5
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, f32)>,

    /// Load effect and values from a JSON preset
    #[arg(long, value_name = "FILE")]
    pub preset: Option<PathBuf>,

    /// Save the final effect and values as a JSON preset
    #[arg(long, value_name = "FILE")]
    pub save_preset: Option<PathBuf>,

    /// Viewport size used for the preview fit, e.g. 1024x768
    #[arg(long, value_name = "WxH", value_parser = parse_viewport)]
    pub viewport: Option<Viewport>,

    /// Preview on the GPU (falls back to CPU if unavailable)
    #[arg(long)]
    pub gpu: bool,

    /// List effects and their parameters, then exit
    #[arg(long)]
    pub list: bool,
}

/// Runtime configuration for the demo application.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Image loaded at startup.
    pub image: PathBuf,
    /// Display area the preview is fitted into.
    pub viewport: Viewport,
    pub title: String,
    /// Whether to try the GPU preview backend.
    pub gpu: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            image: PathBuf::from(DEFAULT_IMAGE),
            viewport: Viewport::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            title: DEFAULT_TITLE.to_string(),
            gpu: false,
        }
    }
}

impl DemoConfig {
    /// Defaults overridden by `DEVALUE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let viewport = match lookup("DEVALUE_VIEWPORT") {
            Some(raw) => parse_viewport(&raw).unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "ignoring DEVALUE_VIEWPORT");
                defaults.viewport
            }),
            None => defaults.viewport,
        };

        Self {
            image: lookup("DEVALUE_IMAGE")
                .map(PathBuf::from)
                .unwrap_or(defaults.image),
            viewport,
            title: defaults.title,
            gpu: lookup("DEVALUE_GPU").is_some_and(|raw| {
                parse_flag(&raw).unwrap_or_else(|e| {
                    tracing::warn!(value = %raw, error = %e, "ignoring DEVALUE_GPU");
                    defaults.gpu
                })
            }),
        }
    }

    /// Apply command-line overrides.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(input) = &cli.input {
            self.image = input.clone();
        }
        if let Some(viewport) = cli.viewport {
            self.viewport = viewport;
        }
        self.gpu |= cli.gpu;
        self
    }
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width = w
        .trim()
        .parse()
        .map_err(|e| format!("invalid width {w:?}: {e}"))?;
    let height = h
        .trim()
        .parse()
        .map_err(|e| format!("invalid height {h:?}: {e}"))?;
    Ok(Viewport::new(width, height))
}

/// Parse a boolean switch such as `1`, `true`, `yes`, `on` or their
/// negatives. Case-insensitive; an empty value is false.
pub fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}

/// Parse `KEY=VALUE` with a float value.
pub fn parse_assignment(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in {s:?}"));
    }
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {key}: {e}"))?;
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.viewport, Viewport::new(800, 600));
        assert_eq!(config.title, "Image Devalue");
        assert_eq!(config.image, PathBuf::from("test_image.jpg"));
        assert!(!config.gpu);
    }

    #[test]
    fn test_parse_viewport() {
        assert_eq!(parse_viewport("1024x768"), Ok(Viewport::new(1024, 768)));
        assert_eq!(parse_viewport("640X480"), Ok(Viewport::new(640, 480)));
        assert!(parse_viewport("1024").is_err());
        assert!(parse_viewport("axb").is_err());
        assert!(parse_viewport("-1x10").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("Intensity=0.25"),
            Ok(("Intensity".to_string(), 0.25))
        );
        assert_eq!(
            parse_assignment(" Gamma = 2.2 "),
            Ok(("Gamma".to_string(), 2.2))
        );
        assert!(parse_assignment("Intensity").is_err());
        assert!(parse_assignment("=0.5").is_err());
        assert!(parse_assignment("Intensity=high").is_err());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = DemoConfig::from_lookup(|key| match key {
            "DEVALUE_IMAGE" => Some("photo.png".to_string()),
            "DEVALUE_VIEWPORT" => Some("320x200".to_string()),
            "DEVALUE_GPU" => Some("1".to_string()),
            _ => None,
        });
        assert_eq!(config.image, PathBuf::from("photo.png"));
        assert_eq!(config.viewport, Viewport::new(320, 200));
        assert!(config.gpu);
    }

    #[test]
    fn test_gpu_env_is_parsed_as_boolean() {
        let gpu_for = |value: &'static str| {
            DemoConfig::from_lookup(|key| (key == "DEVALUE_GPU").then(|| value.to_string())).gpu
        };
        assert!(gpu_for("1"));
        assert!(gpu_for("true"));
        assert!(gpu_for("ON"));
        assert!(!gpu_for("0"));
        assert!(!gpu_for("false"));
        assert!(!gpu_for("no"));
        assert!(!gpu_for(""));
        assert!(!gpu_for("maybe"));
        assert!(!DemoConfig::from_lookup(|_| None).gpu);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" Yes "), Ok(true));
        assert_eq!(parse_flag("off"), Ok(false));
        assert!(parse_flag("2").is_err());
    }

    #[test]
    fn test_bad_env_viewport_keeps_default() {
        let config = DemoConfig::from_lookup(|key| {
            (key == "DEVALUE_VIEWPORT").then(|| "huge".to_string())
        });
        assert_eq!(config.viewport, Viewport::new(800, 600));
    }

    #[test]
    fn test_cli_overrides_env() {
        let cli = Cli::parse_from([
            "devalue",
            "--input",
            "cli.png",
            "--viewport",
            "100x50",
            "--set",
            "Intensity=0.5",
            "-s",
            "TargetValue=0.1",
        ]);
        let config = DemoConfig::from_lookup(|key| {
            (key == "DEVALUE_IMAGE").then(|| "env.png".to_string())
        })
        .with_cli(&cli);

        assert_eq!(config.image, PathBuf::from("cli.png"));
        assert_eq!(config.viewport, Viewport::new(100, 50));
        assert_eq!(cli.set.len(), 2);
        assert_eq!(cli.set[1], ("TargetValue".to_string(), 0.1));
    }
}
