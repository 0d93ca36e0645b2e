//! JSON project manifests consumed by the `slidecraft` binary.
//!
//! A manifest names base images, stickers and fonts by paths relative to its own directory
//! and lists the text layers of each slot. Layer fields that are left out take the defaults
//! of a freshly added layer.

use std::path::{Path, PathBuf};

use crate::assets::decode::{ImageAcquirer, UploadKind};
use crate::config::StudioConfig;
use crate::fonts::FontBook;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{SlideError, SlideResult};
use crate::grade::ColorGrade;
use crate::layers::sticker::StickerField;
use crate::layers::text::TextField;
use crate::project::Project;

/// Top-level manifest document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectManifest {
    /// Width reference pixels were calibrated against; defaults to the configured preview width.
    pub calibration_width: Option<f64>,
    /// Font files to register.
    pub fonts: Vec<FontManifest>,
    /// Family used when a layer's family is unavailable; defaults to the first font that loads.
    /// Must name one of `fonts`.
    pub default_font: Option<String>,
    /// Project-wide color grade.
    pub grade: ColorGrade,
    /// Global stickers in paint order.
    pub stickers: Vec<StickerManifest>,
    /// Photo slots in order.
    pub slots: Vec<SlotManifest>,
}

/// One font file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontManifest {
    /// Family name layers refer to.
    pub family: String,
    /// Relative path of the font file.
    pub path: String,
}

/// One sticker.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StickerManifest {
    /// Relative path of the image (raster or SVG).
    pub path: String,
    /// Width as a percentage of the slot width.
    #[serde(default)]
    pub scale: Option<f64>,
    /// Center x percentage.
    #[serde(default)]
    pub x: Option<f64>,
    /// Center y percentage.
    #[serde(default)]
    pub y: Option<f64>,
}

/// One photo slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotManifest {
    /// Relative path of the base image.
    pub image: String,
    /// Text layers in paint order.
    #[serde(default)]
    pub layers: Vec<LayerManifest>,
    /// Bake the layers after loading. An unbaked slot is refused by export.
    #[serde(default = "default_true")]
    pub baked: bool,
}

fn default_true() -> bool {
    true
}

/// Text layer fields; anything omitted keeps the new-layer default.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct LayerManifest {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<u16>,
    pub color: Option<Rgba8>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    pub max_width: Option<f64>,
    pub visible: Option<bool>,
}

impl LayerManifest {
    fn fields(&self) -> Vec<TextField> {
        let mut out = Vec::new();
        if let Some(v) = &self.content {
            out.push(TextField::Content(v.clone()));
        }
        if let Some(v) = self.x {
            out.push(TextField::X(v));
        }
        if let Some(v) = self.y {
            out.push(TextField::Y(v));
        }
        if let Some(v) = self.rotation {
            out.push(TextField::Rotation(v));
        }
        if let Some(v) = self.font_size {
            out.push(TextField::FontSize(v));
        }
        if let Some(v) = &self.font_family {
            out.push(TextField::FontFamily(v.clone()));
        }
        if let Some(v) = self.font_weight {
            out.push(TextField::FontWeight(v));
        }
        if let Some(v) = self.color {
            out.push(TextField::Color(v));
        }
        if let Some(v) = self.letter_spacing {
            out.push(TextField::LetterSpacing(v));
        }
        if let Some(v) = self.line_height {
            out.push(TextField::LineHeight(v));
        }
        if let Some(v) = self.max_width {
            out.push(TextField::MaxWidth(v));
        }
        if let Some(v) = self.visible {
            out.push(TextField::Visible(v));
        }
        out
    }
}

/// A project and the fonts it was loaded with.
#[derive(Debug)]
pub struct LoadedProject {
    /// Editable project state.
    pub project: Project,
    /// Registered fonts.
    pub fonts: FontBook,
}

impl ProjectManifest {
    /// Parse a manifest from JSON.
    pub fn from_json_str(s: &str) -> SlideResult<Self> {
        serde_json::from_str(s).map_err(|e| SlideError::serde(format!("manifest JSON: {e}")))
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> SlideResult<Self> {
        use anyhow::Context as _;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read manifest '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Decode every asset under `root` and build the project.
    ///
    /// A base image that fails to load leaves its slot in the failed state so the other slots
    /// still export. Font files that fail to load fall back like any unavailable font, and so
    /// does a `default_font` whose file failed. A `default_font` missing from `fonts` is an error.
    #[tracing::instrument(skip(self, cfg, acquirer), fields(slots = self.slots.len()))]
    pub fn build(
        &self,
        root: &Path,
        cfg: &StudioConfig,
        acquirer: &dyn ImageAcquirer,
    ) -> SlideResult<LoadedProject> {
        let mut fonts = cfg.font_book();
        for font in &self.fonts {
            fonts.mark_pending(&font.family);
        }
        for font in &self.fonts {
            let loaded = resolve(root, &font.path).and_then(|p| read_bytes(&p)).and_then(
                |bytes| fonts.register(&font.family, bytes),
            );
            if let Err(err) = loaded {
                tracing::warn!(family = %font.family, %err, "font not loaded");
                fonts.fail(&font.family);
            }
        }
        if let Some(family) = &self.default_font {
            let key = family.trim().to_lowercase();
            if !self
                .fonts
                .iter()
                .any(|f| f.family.trim().to_lowercase() == key)
            {
                return Err(SlideError::validation(format!(
                    "default font family '{family}' is not listed in fonts"
                )));
            }
            if let Err(err) = fonts.set_default_family(family) {
                tracing::warn!(
                    family = %family,
                    %err,
                    "default font unavailable; keeping fallback"
                );
            }
        }

        let calibration = self
            .calibration_width
            .unwrap_or(f64::from(cfg.preview_width));
        let mut project = Project::new(calibration)?;
        project.set_grade(self.grade)?;

        for sticker in &self.stickers {
            let decoded = resolve(root, &sticker.path)
                .and_then(|p| read_bytes(&p))
                .and_then(|bytes| acquirer.acquire(&bytes, UploadKind::Sticker));
            let id = match decoded {
                Ok(img) => project.add_sticker(img.into_sticker()),
                Err(err) => {
                    let id = project.reserve_sticker();
                    project.fail_sticker_image(id, err.to_string())?;
                    id
                }
            };
            if let Some(scale) = sticker.scale {
                project.update_sticker(id, StickerField::Scale(scale))?;
            }
            if sticker.x.is_some() || sticker.y.is_some() {
                project.update_sticker(
                    id,
                    StickerField::Position {
                        x: sticker.x.unwrap_or(50.0),
                        y: sticker.y.unwrap_or(50.0),
                    },
                )?;
            }
        }

        for (index, slot) in self.slots.iter().enumerate() {
            let decoded = resolve(root, &slot.image)
                .and_then(|p| read_bytes(&p))
                .and_then(|bytes| acquirer.acquire(&bytes, UploadKind::BaseImage))
                .and_then(|img| img.into_raster());
            match decoded {
                Ok(img) => {
                    project.add_slot(img);
                }
                Err(err) => {
                    let id = project.reserve_slot();
                    project.fail_slot_image(id, err.to_string())?;
                }
            }
            for layer in &slot.layers {
                let id = project.add_text_layer(index)?;
                for field in layer.fields() {
                    project.update_text_layer(index, id, field)?;
                }
            }
            if slot.baked {
                project.bake(index)?;
            }
        }

        Ok(LoadedProject { project, fonts })
    }
}

fn resolve(root: &Path, rel: &str) -> SlideResult<PathBuf> {
    Ok(root.join(normalize_rel_path(rel)?))
}

fn read_bytes(path: &Path) -> SlideResult<Vec<u8>> {
    use anyhow::Context as _;

    Ok(std::fs::read(path).with_context(|| format!("read asset '{}'", path.display()))?)
}

/// Normalize a manifest-relative path: forward slashes, no `.` segments, never absolute or
/// escaping the manifest directory.
pub(crate) fn normalize_rel_path(source: &str) -> SlideResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SlideError::validation("manifest paths must be relative"));
    }
    if s.is_empty() {
        return Err(SlideError::validation("manifest path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SlideError::validation("manifest paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SlideError::validation(
            "manifest path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../tests/unit/manifest.rs"]
mod tests;
