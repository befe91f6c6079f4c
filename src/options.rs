//! Configuration surface: raw user options and their normalized form.
//!
//! `RawOptions` is what callers deserialize from application configuration
//! (TOML, JSON, ...). `normalize` validates it once per session and produces
//! an immutable [`RenderOptions`] value shared read-only by every render call
//! in that session.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Output format requested from the render engine.
///
/// Defaults to the vector form; `ppi` only applies to raster output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    /// MIME type used when embedding the rendered image as a `data:` URI.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Png => "image/png",
        }
    }

    /// Case-insensitive parse of the user-facing format string. Unrecognized
    /// values keep the default rather than failing the session.
    fn from_user(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("png") => OutputFormat::Png,
            Some(v) if v.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::default(),
        }
    }
}

/// A single font, either resolved by the engine from installed system fonts
/// or loaded from a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    System(String),
    File(PathBuf),
}

/// Validated font configuration pushed to the render engine once per session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontConfig {
    pub body_font: Option<FontSource>,
    pub math_font: Option<FontSource>,
    /// Derived: true when any slot names a system font, so the engine knows
    /// to consult the host font database at all.
    pub include_system_fonts: bool,
}

impl FontConfig {
    /// Whether any font source is configured and the session-scoped push to
    /// the engine is warranted.
    pub fn is_configured(&self) -> bool {
        self.body_font.is_some() || self.math_font.is_some()
    }
}

/// Normalized, immutable per-session render options.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Raster resolution in pixels per inch. `None` defers to the engine
    /// default (1200 for the reference engine). Ignored for SVG output but
    /// validated regardless.
    pub ppi: Option<f32>,
    pub fonts: FontConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            ppi: None,
            fonts: FontConfig::default(),
        }
    }
}

/// Errors raised while validating user configuration. These are fatal to
/// session construction; everything else in the option surface degrades to
/// defaults instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("font slot `{slot}` specifies both a system font and a font file")]
    ConflictingFontSources { slot: &'static str },
}

/// One user-facing font slot. `system` and `file` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFontSlot {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
}

/// User-facing font configuration, one optional slot per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFontConfig {
    #[serde(default)]
    pub body_font: Option<RawFontSlot>,
    #[serde(default)]
    pub math_font: Option<RawFontSlot>,
}

/// Raw options as deserialized from application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOptions {
    /// `"svg"` (default) or `"png"`, case-insensitive. Unrecognized values
    /// fall back to the default.
    #[serde(default)]
    pub format: Option<String>,
    /// Raster resolution. Anything that is not a positive finite number
    /// silently defers to the engine default.
    #[serde(default)]
    pub ppi: Option<f64>,
    #[serde(default)]
    pub fonts: RawFontConfig,
}

impl RawOptions {
    /// Validate and canonicalize into [`RenderOptions`].
    ///
    /// The only hard failure is a font slot carrying both a system name and
    /// a file path. Normalization is idempotent: the same input always yields
    /// the same output.
    pub fn normalize(&self) -> Result<RenderOptions, ConfigError> {
        let format = OutputFormat::from_user(self.format.as_deref());

        let ppi = self
            .ppi
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| p as f32);

        let body_font = normalize_slot(self.fonts.body_font.as_ref(), "body_font")?;
        let math_font = normalize_slot(self.fonts.math_font.as_ref(), "math_font")?;
        let include_system_fonts = matches!(body_font, Some(FontSource::System(_)))
            || matches!(math_font, Some(FontSource::System(_)));

        Ok(RenderOptions {
            format,
            ppi,
            fonts: FontConfig {
                body_font,
                math_font,
                include_system_fonts,
            },
        })
    }
}

fn normalize_slot(
    slot: Option<&RawFontSlot>,
    name: &'static str,
) -> Result<Option<FontSource>, ConfigError> {
    let Some(slot) = slot else {
        return Ok(None);
    };

    match (&slot.system, &slot.file) {
        (Some(_), Some(_)) => Err(ConfigError::ConflictingFontSources { slot: name }),
        (Some(system), None) => Ok(Some(FontSource::System(system.clone()))),
        (None, Some(file)) => Ok(Some(FontSource::File(PathBuf::from(expand_tilde(file))))),
        (None, None) => Ok(None),
    }
}

/// Expands a leading `~` to the current user's home directory. Paths without
/// a tilde prefix pass through untouched.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return format!("{home}/{rest}");
        }
    } else if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return home;
        }
    }
    path.to_string()
}
