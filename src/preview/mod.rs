//! Live preview of draft layers and pointer interaction.

pub(crate) mod drag;

use crate::fonts::FontBook;
use crate::foundation::core::{LayerId, Point, Rect};
use crate::foundation::error::{SlideError, SlideResult};
use crate::layout::block::place_text;
use crate::project::{LayerSet, Project};
use crate::render::backend::RenderOpts;
use crate::render::pipeline::{RenderedSlot, render_slot};
use crate::transform::scale::ScaleContext;

pub use drag::DragController;

/// Renders draft layers at the on-screen width. There is no dirty guard.
#[derive(Clone, Debug)]
pub struct PreviewRenderer {
    display_width: u32,
    opts: RenderOpts,
}

impl PreviewRenderer {
    /// Preview at `display_width` pixels.
    pub fn new(display_width: u32) -> SlideResult<Self> {
        if display_width == 0 {
            return Err(SlideError::validation("preview width must be > 0"));
        }
        Ok(Self {
            display_width,
            opts: RenderOpts::default(),
        })
    }

    /// Return a renderer with different compositor options.
    pub fn with_render_opts(mut self, opts: RenderOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Current display width.
    pub fn display_width(&self) -> u32 {
        self.display_width
    }

    /// Follow a viewport resize. Layers keep their own calibration width, so nothing drifts.
    pub fn set_display_width(&mut self, display_width: u32) -> SlideResult<()> {
        if display_width == 0 {
            return Err(SlideError::validation("preview width must be > 0"));
        }
        self.display_width = display_width;
        Ok(())
    }

    /// Render a slot's draft layers.
    #[tracing::instrument(skip(self, project, fonts), fields(width = self.display_width))]
    pub fn render(
        &self,
        project: &Project,
        slot_index: usize,
        fonts: &mut FontBook,
    ) -> SlideResult<RenderedSlot> {
        let snap = project.snapshot(slot_index, LayerSet::Draft)?;
        render_slot(&snap.input(self.display_width), fonts, &self.opts)
    }

    /// Topmost visible draft text layer under `pointer`.
    ///
    /// `bounds` is the slot's on-screen box; `pointer` uses the same coordinates.
    pub fn layer_at(
        &self,
        project: &Project,
        slot_index: usize,
        pointer: Point,
        bounds: Rect,
        fonts: &mut FontBook,
    ) -> SlideResult<Option<LayerId>> {
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(SlideError::validation("slot bounds must have positive size"));
        }
        let ctx = ScaleContext {
            width: bounds.width(),
            height: bounds.height(),
        };
        let local = pointer - bounds.origin().to_vec2();
        let slot = project.slot(slot_index)?;
        for layer in slot.draft().iter().rev().filter(|l| l.visible) {
            let placement = place_text(layer, &ctx, self.opts.shadow().geometry(), fonts)?;
            if placement.contains(local) {
                return Ok(Some(layer.id));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/renderer.rs"]
mod tests;
