//! Configuration types for PDF-to-poster conversion.
//!
//! All conversion behaviour is controlled through [`PosterConfig`], built via
//! its [`PosterConfigBuilder`]. String-shaped options (columns, output
//! formats) are parsed into typed values here, and the background colour in
//! [`crate::color`], so a bad value is rejected before the first document is
//! opened rather than halfway through a batch.

use crate::error::PosterError;
use crate::pipeline::compose::LayoutParams;
use crate::progress::ProgressCallback;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for a PDF-to-poster conversion.
///
/// Built via [`PosterConfig::builder()`] or using [`PosterConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_poster::{ColumnSpec, OutputFormat, PosterConfig};
///
/// let config = PosterConfig::builder()
///     .dpi(150)
///     .columns(ColumnSpec::Fixed(3))
///     .formats(vec![OutputFormat::Png, OutputFormat::Jpeg])
///     .build()
///     .unwrap();
/// assert_eq!(config.formats.len(), 2);
/// ```
#[derive(Clone)]
pub struct PosterConfig {
    /// Rendering DPI. The PDF scale factor is `dpi / 72`. Default: 300.
    ///
    /// 300 DPI is print quality and produces very large posters for long
    /// documents; 150 is plenty for on-screen viewing.
    pub dpi: u32,

    /// Grid column specification. Default: [`ColumnSpec::Auto`].
    pub columns: ColumnSpec,

    /// Outer margin around the whole poster, in pixels. Default: 16.
    pub margin: u32,

    /// Gap between neighbouring cells, in pixels. Default: 8.
    pub spacing: u32,

    /// Poster background colour. Default: white.
    pub background: Rgb<u8>,

    /// Output formats, deduplicated, in the order they are written. Default: PNG.
    pub formats: Vec<OutputFormat>,

    /// Appended to the document stem before the extension. Default: `_poster`.
    pub suffix: String,

    /// Downscale the poster to this width if it is wider. `0` disables. Default: 0.
    pub max_width: u32,

    /// JPEG quality, 0–100. Ignored for PNG. Default: 95.
    pub quality: u8,

    /// Per-document progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            columns: ColumnSpec::Auto,
            margin: 16,
            spacing: 8,
            background: Rgb([255, 255, 255]),
            formats: vec![OutputFormat::Png],
            suffix: "_poster".to_string(),
            max_width: 0,
            quality: 95,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PosterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterConfig")
            .field("dpi", &self.dpi)
            .field("columns", &self.columns)
            .field("margin", &self.margin)
            .field("spacing", &self.spacing)
            .field("background", &self.background.0)
            .field("formats", &self.formats)
            .field("suffix", &self.suffix)
            .field("max_width", &self.max_width)
            .field("quality", &self.quality)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl PosterConfig {
    /// Create a new builder for `PosterConfig`.
    pub fn builder() -> PosterConfigBuilder {
        PosterConfigBuilder {
            config: Self::default(),
        }
    }

    /// PDF rendering scale: PDF user space is 72 points per inch.
    pub fn scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }

    /// The layout parameters handed to the composer.
    pub fn layout(&self) -> LayoutParams {
        LayoutParams {
            margin: self.margin,
            spacing: self.spacing,
            background: self.background,
        }
    }
}

/// Builder for [`PosterConfig`].
#[derive(Debug)]
pub struct PosterConfigBuilder {
    config: PosterConfig,
}

impl PosterConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn columns(mut self, columns: ColumnSpec) -> Self {
        self.config.columns = columns;
        self
    }

    pub fn margin(mut self, px: u32) -> Self {
        self.config.margin = px;
        self
    }

    pub fn spacing(mut self, px: u32) -> Self {
        self.config.spacing = px;
        self
    }

    pub fn background(mut self, color: Rgb<u8>) -> Self {
        self.config.background = color;
        self
    }

    /// Set the output formats. Duplicates are dropped, first occurrence wins.
    pub fn formats(mut self, formats: Vec<OutputFormat>) -> Self {
        let mut deduped: Vec<OutputFormat> = Vec::with_capacity(formats.len());
        for f in formats {
            if !deduped.contains(&f) {
                deduped.push(f);
            }
        }
        self.config.formats = deduped;
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.suffix = suffix.into();
        self
    }

    pub fn max_width(mut self, px: u32) -> Self {
        self.config.max_width = px;
        self
    }

    pub fn quality(mut self, q: u8) -> Self {
        self.config.quality = q;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PosterConfig, PosterError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(PosterError::InvalidConfig("DPI must be ≥ 1, got 0".into()));
        }
        if c.quality > 100 {
            return Err(PosterError::InvalidConfig(format!(
                "JPEG quality must be 0–100, got {}",
                c.quality
            )));
        }
        if c.formats.is_empty() {
            return Err(PosterError::InvalidConfig(
                "At least one output format is required".into(),
            ));
        }
        if c.suffix.contains(['/', '\\']) {
            return Err(PosterError::InvalidConfig(format!(
                "Suffix must not contain path separators, got '{}'",
                c.suffix
            )));
        }
        if let ColumnSpec::Fixed(0) = c.columns {
            return Err(PosterError::InvalidConfig(
                "Column count must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How many columns the poster grid has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnSpec {
    /// Near-square grid: `ceil(sqrt(pages))` columns. (default)
    #[default]
    Auto,
    /// Exactly this many columns. `Fixed(1)` stacks pages vertically.
    Fixed(u32),
}

impl FromStr for ColumnSpec {
    type Err = PosterError;

    /// Parses `auto` (any case) or an integer. Integers below 1 become 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(ColumnSpec::Auto);
        }
        let n: i64 = s.parse().map_err(|_| {
            PosterError::InvalidConfig(format!(
                "Columns must be 'auto' or an integer, got '{s}'"
            ))
        })?;
        let n = u32::try_from(n.max(1)).map_err(|_| {
            PosterError::InvalidConfig(format!("Column count {n} is too large"))
        })?;
        Ok(ColumnSpec::Fixed(n))
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSpec::Auto => f.write_str("auto"),
            ColumnSpec::Fixed(n) => write!(f, "{n}"),
        }
    }
}

/// Raster format a poster is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Lossless PNG.
    Png,
    /// Lossy JPEG without chroma subsampling.
    Jpeg,
}

impl OutputFormat {
    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => ".png",
            OutputFormat::Jpeg => ".jpg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PNG" => Ok(OutputFormat::Png),
            "JPEG" | "JPG" => Ok(OutputFormat::Jpeg),
            other => Err(PosterError::InvalidConfig(format!(
                "Unsupported format '{other}'. Supported: PNG, JPEG."
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("PNG"),
            OutputFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// Parse a comma-separated format list such as `"PNG,jpg"`.
///
/// Unknown tokens are skipped and returned alongside the formats so the
/// caller can warn about them. Duplicates are dropped. An empty result falls
/// back to PNG.
pub fn parse_format_list(list: &str) -> (Vec<OutputFormat>, Vec<String>) {
    let mut formats: Vec<OutputFormat> = Vec::new();
    let mut ignored = Vec::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<OutputFormat>() {
            Ok(f) if !formats.contains(&f) => formats.push(f),
            Ok(_) => {}
            Err(_) => ignored.push(token.to_string()),
        }
    }
    if formats.is_empty() {
        formats.push(OutputFormat::Png);
    }
    (formats, ignored)
}

/// Resolve the three ways of choosing output formats.
///
/// An explicit list wins, then `both`, then the single legacy format. The
/// second element lists tokens of the explicit list that were ignored.
pub fn resolve_formats(
    list: Option<&str>,
    both: bool,
    single: OutputFormat,
) -> (Vec<OutputFormat>, Vec<String>) {
    match list {
        Some(l) if !l.trim().is_empty() => parse_format_list(l),
        _ if both => (vec![OutputFormat::Png, OutputFormat::Jpeg], Vec::new()),
        _ => (vec![single], Vec::new()),
    }
}
