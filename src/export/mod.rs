//! Export of committed layers at full resolution.
//!
//! Export renders exactly what was baked. A slot whose draft differs from its committed
//! snapshot is refused with [`SlideError::Dirty`], and a slot whose committed layers name a
//! font that is still registering is refused with [`SlideError::FontsPending`]. Neither case
//! produces pixels.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::fonts::FontBook;
use crate::foundation::error::{SlideError, SlideResult};
use crate::project::{LayerSet, Project};
use crate::render::backend::{FrameRGBA, RenderOpts};
use crate::render::pipeline::render_slot;

/// Nominal width of a 2K export.
pub const TWO_K_WIDTH: u32 = 2048;
/// Nominal width of a 4K export.
pub const FOUR_K_WIDTH: u32 = 4096;
/// File name prefix used when none is configured.
pub const DEFAULT_EXPORT_PREFIX: &str = "slide";

/// Requested output width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 2K preset.
    TwoK,
    /// 4K preset.
    FourK,
    /// Any other positive width in pixels.
    Custom(u32),
}

impl Resolution {
    /// Short tag used in file names: `2k`, `4k` or `{width}w`.
    pub fn tag(self) -> String {
        match self {
            Self::TwoK => "2k".to_owned(),
            Self::FourK => "4k".to_owned(),
            Self::Custom(w) => format!("{w}w"),
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for Resolution {
    type Err = SlideError;

    /// Accepts `2k`, `4k` or a plain pixel width.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("2k") {
            return Ok(Self::TwoK);
        }
        if s.eq_ignore_ascii_case("4k") {
            return Ok(Self::FourK);
        }
        match s.parse::<u32>() {
            Ok(w) if w > 0 => Ok(Self::Custom(w)),
            _ => Err(SlideError::validation(format!(
                "resolution must be '2k', '4k' or a positive width, got '{s}'"
            ))),
        }
    }
}

/// One exported slot.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    /// Index of the slot at export time.
    pub slot_index: usize,
    /// Requested resolution.
    pub resolution: Resolution,
    /// Deterministic file name, e.g. `slide-1-4k.png`.
    pub file_name: String,
    /// Output pixels (premultiplied).
    pub frame: FrameRGBA,
}

impl ExportedImage {
    /// PNG bytes (straight alpha).
    pub fn encode_png(&self) -> SlideResult<Vec<u8>> {
        self.frame.encode_png()
    }

    /// Write the PNG into `dir` (created if missing) and return the file path.
    pub fn write_to_dir(&self, dir: &Path) -> SlideResult<PathBuf> {
        use anyhow::Context as _;

        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        let png = self.encode_png()?;
        std::fs::write(&path, png).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(path)
    }
}

/// Result of exporting one slot during a multi-slot export.
#[derive(Debug)]
pub struct SlotExportOutcome {
    /// Slot index.
    pub slot_index: usize,
    /// Requested resolution.
    pub resolution: Resolution,
    /// The image, or why this slot could not be exported.
    pub result: SlideResult<ExportedImage>,
}

/// Drives the compositor over committed layers at export resolution.
#[derive(Clone, Debug)]
pub struct ExportCoordinator {
    prefix: String,
    two_k_width: u32,
    four_k_width: u32,
    opts: RenderOpts,
}

impl Default for ExportCoordinator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_EXPORT_PREFIX.to_owned(),
            two_k_width: TWO_K_WIDTH,
            four_k_width: FOUR_K_WIDTH,
            opts: RenderOpts::default(),
        }
    }
}

impl ExportCoordinator {
    /// Return a coordinator with a different file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Return a coordinator with different 2K/4K widths.
    pub fn with_preset_widths(mut self, two_k: u32, four_k: u32) -> Self {
        self.two_k_width = two_k;
        self.four_k_width = four_k;
        self
    }

    /// Return a coordinator with different compositor options.
    pub fn with_render_opts(mut self, opts: RenderOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Pixel width for `res`.
    pub fn width_of(&self, res: Resolution) -> u32 {
        match res {
            Resolution::TwoK => self.two_k_width,
            Resolution::FourK => self.four_k_width,
            Resolution::Custom(w) => w,
        }
    }

    /// `{prefix}-{slot_index + 1}-{tag}.png`
    pub fn file_name(&self, slot_index: usize, res: Resolution) -> String {
        format!("{}-{}-{}.png", self.prefix, slot_index + 1, res.tag())
    }

    /// Export one slot's committed layers.
    #[tracing::instrument(skip(self, project, fonts), fields(tag = %res))]
    pub fn export_slot(
        &self,
        project: &Project,
        slot_index: usize,
        res: Resolution,
        fonts: &mut FontBook,
    ) -> SlideResult<ExportedImage> {
        let slot = project.slot(slot_index)?;
        if slot.is_dirty() {
            return Err(SlideError::Dirty { slot_index });
        }

        let snap = project.snapshot(slot_index, LayerSet::Committed)?;
        let pending = fonts.pending_among(snap.font_families());
        if !pending.is_empty() {
            return Err(SlideError::fonts_pending(format!(
                "slot {slot_index} uses {}",
                pending.join(", ")
            )));
        }

        let rendered = render_slot(&snap.input(self.width_of(res)), fonts, &self.opts)?;
        tracing::debug!(
            width = rendered.frame.width,
            height = rendered.frame.height,
            "slot exported"
        );
        Ok(ExportedImage {
            slot_index,
            resolution: res,
            file_name: self.file_name(slot_index, res),
            frame: rendered.frame,
        })
    }

    /// Export every slot independently; one slot failing does not stop the others.
    pub fn export_all(
        &self,
        project: &Project,
        res: Resolution,
        fonts: &mut FontBook,
    ) -> Vec<SlotExportOutcome> {
        (0..project.slot_count())
            .map(|slot_index| {
                let result = self.export_slot(project, slot_index, res, fonts);
                if let Err(err) = &result {
                    tracing::warn!(slot_index, tag = %res, %err, "slot export failed");
                }
                SlotExportOutcome {
                    slot_index,
                    resolution: res,
                    result,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/export.rs"]
mod tests;
