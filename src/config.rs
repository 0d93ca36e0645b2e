use std::path::Path;

use crate::assets::decode::ImageDecoder;
use crate::export::{DEFAULT_EXPORT_PREFIX, ExportCoordinator, FOUR_K_WIDTH, TWO_K_WIDTH};
use crate::fonts::{DEFAULT_FALLBACK_ADVANCE_EM, FontBook};
use crate::foundation::error::{SlideError, SlideResult};
use crate::preview::PreviewRenderer;
use crate::project::{DEFAULT_CALIBRATION_WIDTH, Project};
use crate::render::backend::{RenderOpts, ShadowStyle};

/// Environment variable overriding [`StudioConfig::preview_width`].
pub const ENV_PREVIEW_WIDTH: &str = "SLIDECRAFT_PREVIEW_WIDTH";
/// Environment variable overriding [`StudioConfig::export_prefix`].
pub const ENV_EXPORT_PREFIX: &str = "SLIDECRAFT_EXPORT_PREFIX";

/// Engine-wide settings. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Preview width in pixels; new text layers are calibrated against it.
    pub preview_width: u32,
    /// Width of a 2K export.
    pub two_k_width: u32,
    /// Width of a 4K export.
    pub four_k_width: u32,
    /// Export file name prefix.
    pub export_prefix: String,
    /// Per-character advance (fraction of font size) when no font face is usable.
    pub fallback_advance_em: f64,
    /// Load an installed sans-serif face to draw text when no registered family can.
    pub system_font_fallback: bool,
    /// Text drop shadow.
    pub shadow: ShadowStyle,
    /// Base images are downsized to fit this square.
    pub base_max_edge: u32,
    /// Sticker images are downsized to fit this square.
    pub sticker_max_edge: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            preview_width: DEFAULT_CALIBRATION_WIDTH as u32,
            two_k_width: TWO_K_WIDTH,
            four_k_width: FOUR_K_WIDTH,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_owned(),
            fallback_advance_em: DEFAULT_FALLBACK_ADVANCE_EM,
            system_font_fallback: true,
            shadow: ShadowStyle::default(),
            base_max_edge: 2048,
            sticker_max_edge: 1024,
        }
    }
}

impl StudioConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> SlideResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| SlideError::serde(format!("config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> SlideResult<Self> {
        use anyhow::Context as _;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply `SLIDECRAFT_*` environment overrides. Unparsable values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|k| std::env::var(k).ok())
    }

    pub(crate) fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(w) = var(ENV_PREVIEW_WIDTH)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            self.preview_width = w;
        }
        if let Some(prefix) = var(ENV_EXPORT_PREFIX).filter(|p| !p.trim().is_empty()) {
            self.export_prefix = prefix.trim().to_owned();
        }
        self
    }

    /// Check every field.
    pub fn validate(&self) -> SlideResult<()> {
        let positive = [
            ("preview_width", self.preview_width),
            ("two_k_width", self.two_k_width),
            ("four_k_width", self.four_k_width),
            ("base_max_edge", self.base_max_edge),
            ("sticker_max_edge", self.sticker_max_edge),
        ];
        for (name, v) in positive {
            if v == 0 {
                return Err(SlideError::validation(format!("{name} must be > 0")));
            }
        }
        if self.export_prefix.trim().is_empty() || self.export_prefix.contains(['/', '\\']) {
            return Err(SlideError::validation(
                "export_prefix must be a non-empty file name fragment",
            ));
        }
        if !self.fallback_advance_em.is_finite() || self.fallback_advance_em <= 0.0 {
            return Err(SlideError::validation("fallback_advance_em must be > 0"));
        }
        let s = &self.shadow;
        if !s.blur.is_finite() || s.blur < 0.0 || !s.offset_y.is_finite() {
            return Err(SlideError::validation(
                "shadow blur must be >= 0 and offset finite",
            ));
        }
        Ok(())
    }

    /// Upload decoder with the configured limits.
    pub fn decoder(&self) -> ImageDecoder {
        ImageDecoder::new(self.base_max_edge, self.sticker_max_edge)
    }

    /// Compositor options with the configured shadow.
    pub fn render_opts(&self) -> RenderOpts {
        RenderOpts::default().with_shadow(self.shadow)
    }

    /// Font book with the configured fallback advance and, when enabled, the system face.
    pub fn font_book(&self) -> FontBook {
        let mut book = FontBook::new().with_fallback_advance_em(self.fallback_advance_em);
        if self.system_font_fallback {
            book.load_system_fallback();
        }
        book
    }

    /// Empty project calibrated to the preview width.
    pub fn project(&self) -> SlideResult<Project> {
        Project::new(f64::from(self.preview_width))
    }

    /// Preview renderer at the preview width.
    pub fn preview(&self) -> SlideResult<PreviewRenderer> {
        Ok(PreviewRenderer::new(self.preview_width)?.with_render_opts(self.render_opts()))
    }

    /// Export coordinator with the configured prefix, widths and shadow.
    pub fn exporter(&self) -> ExportCoordinator {
        ExportCoordinator::default()
            .with_prefix(self.export_prefix.clone())
            .with_preset_widths(self.two_k_width, self.four_k_width)
            .with_render_opts(self.render_opts())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
