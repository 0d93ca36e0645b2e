//! The project: ordered photo slots with draft/committed text layers, global stickers and the
//! color grade.
//!
//! Layer collections are shared `Arc<Vec<_>>` values that are replaced copy-on-write, so a
//! [`SlotSnapshot`] taken for a render never observes a later edit. Committed layers are only
//! ever written by [`Project::bake`].

pub(crate) mod slot;

use std::sync::Arc;

use crate::assets::store::{AssetState, PreparedImage, StickerImage};
use crate::foundation::core::{LayerId, SlotId, StickerId};
use crate::foundation::error::{SlideError, SlideResult};
use crate::grade::{ColorGrade, GradePreset};
use crate::layers::sticker::{StickerField, StickerLayer};
use crate::layers::text::{TextField, TextLayer};

pub use slot::{BakeState, LayerSet, PhotoSlot, SlotSnapshot};

/// Preview width the editor calibrates reference pixels against.
pub const DEFAULT_CALIBRATION_WIDTH: f64 = 600.0;

/// All editable state of one multi-slide design.
#[derive(Clone, Debug)]
pub struct Project {
    slots: Vec<PhotoSlot>,
    stickers: Arc<Vec<StickerLayer>>,
    grade: ColorGrade,
    calibration_width: f64,
    next_id: u64,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            stickers: Arc::new(Vec::new()),
            grade: ColorGrade::default(),
            calibration_width: DEFAULT_CALIBRATION_WIDTH,
            next_id: 1,
        }
    }
}

impl Project {
    /// Empty project whose new text layers are calibrated against `calibration_width`.
    pub fn new(calibration_width: f64) -> SlideResult<Self> {
        let mut out = Self::default();
        out.set_calibration_width(calibration_width)?;
        Ok(out)
    }

    /// Width stamped onto text layers created from now on.
    pub fn calibration_width(&self) -> f64 {
        self.calibration_width
    }

    /// Change the calibration width for future layers. Existing layers keep theirs.
    pub fn set_calibration_width(&mut self, width: f64) -> SlideResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(SlideError::validation(format!(
                "calibration width must be > 0, got {width}"
            )));
        }
        self.calibration_width = width;
        Ok(())
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ---- slots ----

    /// Append a slot with a decoded base image.
    pub fn add_slot(&mut self, base: PreparedImage) -> SlotId {
        self.push_slot(AssetState::Ready(base))
    }

    /// Append a slot whose base image is still being acquired.
    pub fn reserve_slot(&mut self) -> SlotId {
        self.push_slot(AssetState::Pending)
    }

    fn push_slot(&mut self, base: AssetState<PreparedImage>) -> SlotId {
        let id = SlotId(self.next_id());
        self.slots.push(PhotoSlot::new(id, base));
        tracing::debug!(slot = id.0, index = self.slots.len() - 1, "slot added");
        id
    }

    /// Finish acquiring a reserved slot's base image.
    pub fn resolve_slot_image(&mut self, id: SlotId, base: PreparedImage) -> SlideResult<()> {
        let idx = self.require_slot_id(id)?;
        self.slots[idx].base = AssetState::Ready(base);
        Ok(())
    }

    /// Record that acquiring a slot's base image failed. Other slots are unaffected.
    pub fn fail_slot_image(&mut self, id: SlotId, reason: impl Into<String>) -> SlideResult<()> {
        let idx = self.require_slot_id(id)?;
        let reason = reason.into();
        tracing::warn!(slot = id.0, %reason, "base image failed to load");
        self.slots[idx].base = AssetState::Failed(reason);
        Ok(())
    }

    /// Remove the slot at `index` together with both of its layer collections.
    ///
    /// Higher slots shift down by one and keep their layers.
    pub fn remove_slot(&mut self, index: usize) -> SlideResult<PhotoSlot> {
        self.require_index(index)?;
        let removed = self.slots.remove(index);
        tracing::debug!(slot = removed.id.0, index, "slot removed");
        Ok(removed)
    }

    /// All slots in order.
    pub fn slots(&self) -> &[PhotoSlot] {
        &self.slots
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot at `index`.
    pub fn slot(&self, index: usize) -> SlideResult<&PhotoSlot> {
        self.require_index(index)?;
        Ok(&self.slots[index])
    }

    /// Current index of the slot with `id`.
    pub fn index_of(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    fn require_index(&self, index: usize) -> SlideResult<()> {
        if index >= self.slots.len() {
            return Err(SlideError::validation(format!(
                "slot index {index} out of range (have {})",
                self.slots.len()
            )));
        }
        Ok(())
    }

    fn require_slot_id(&self, id: SlotId) -> SlideResult<usize> {
        self.index_of(id)
            .ok_or_else(|| SlideError::validation(format!("unknown slot id {}", id.0)))
    }

    /// Capture one slot for rendering.
    pub fn snapshot(&self, index: usize, set: LayerSet) -> SlideResult<SlotSnapshot> {
        let slot = self.slot(index)?;
        SlotSnapshot::capture(index, slot, set, self.grade, Arc::clone(&self.stickers))
    }

    // ---- text layers (draft only) ----

    /// Add a default text layer to a slot's draft and return its id.
    pub fn add_text_layer(&mut self, slot: usize) -> SlideResult<LayerId> {
        self.require_index(slot)?;
        let id = LayerId(self.next_id());
        let layer = TextLayer::new(id, self.calibration_width);
        Arc::make_mut(&mut self.slots[slot].draft).push(layer);
        tracing::debug!(slot, layer = id.0, "text layer added");
        Ok(id)
    }

    /// Replace one field of a draft layer. On error the draft is unchanged.
    pub fn update_text_layer(
        &mut self,
        slot: usize,
        layer: LayerId,
        field: TextField,
    ) -> SlideResult<()> {
        let pos = self.layer_pos(slot, layer)?;
        let mut updated = self.slots[slot].draft[pos].clone();
        updated.apply(field)?;
        Arc::make_mut(&mut self.slots[slot].draft)[pos] = updated;
        Ok(())
    }

    /// Remove a draft layer and return it.
    pub fn remove_text_layer(&mut self, slot: usize, layer: LayerId) -> SlideResult<TextLayer> {
        let pos = self.layer_pos(slot, layer)?;
        let removed = Arc::make_mut(&mut self.slots[slot].draft).remove(pos);
        tracing::debug!(slot, layer = layer.0, "text layer removed");
        Ok(removed)
    }

    /// Move a draft layer to `to` in paint order (clamped to the last position).
    pub fn move_text_layer(&mut self, slot: usize, layer: LayerId, to: usize) -> SlideResult<()> {
        let pos = self.layer_pos(slot, layer)?;
        let draft = Arc::make_mut(&mut self.slots[slot].draft);
        let item = draft.remove(pos);
        let to = to.min(draft.len());
        draft.insert(to, item);
        Ok(())
    }

    /// Detached copy of a draft layer, suitable for [`Project::paste_text_layer`].
    pub fn copy_text_layer(&self, slot: usize, layer: LayerId) -> SlideResult<TextLayer> {
        let pos = self.layer_pos(slot, layer)?;
        Ok(self.slots[slot].draft[pos].clone())
    }

    /// Insert a copied layer into any slot's draft with a fresh id, nudged by `+2/+2`.
    pub fn paste_text_layer(&mut self, slot: usize, copied: &TextLayer) -> SlideResult<LayerId> {
        self.require_index(slot)?;
        copied.validate()?;
        let id = LayerId(self.next_id());
        Arc::make_mut(&mut self.slots[slot].draft).push(copied.pasted_as(id));
        tracing::debug!(slot, layer = id.0, "text layer pasted");
        Ok(id)
    }

    fn layer_pos(&self, slot: usize, layer: LayerId) -> SlideResult<usize> {
        self.require_index(slot)?;
        self.slots[slot]
            .draft
            .iter()
            .position(|l| l.id == layer)
            .ok_or_else(|| {
                SlideError::validation(format!("slot {slot} has no text layer {}", layer.0))
            })
    }

    // ---- bake ----

    /// Commit a slot's draft layers. Baking a clean slot is a no-op.
    #[tracing::instrument(skip(self))]
    pub fn bake(&mut self, slot: usize) -> SlideResult<()> {
        self.require_index(slot)?;
        let s = &mut self.slots[slot];
        s.committed = Arc::clone(&s.draft);
        tracing::debug!(layers = s.committed.len(), "slot baked");
        Ok(())
    }

    /// Derived bake state of a slot.
    pub fn bake_state(&self, slot: usize) -> SlideResult<BakeState> {
        Ok(self.slot(slot)?.bake_state())
    }

    // ---- stickers ----

    /// Add a sticker with default geometry and return its id.
    pub fn add_sticker(&mut self, image: StickerImage) -> StickerId {
        self.push_sticker(AssetState::Ready(image))
    }

    /// Add a sticker whose image is still being acquired.
    pub fn reserve_sticker(&mut self) -> StickerId {
        self.push_sticker(AssetState::Pending)
    }

    fn push_sticker(&mut self, image: AssetState<StickerImage>) -> StickerId {
        let id = StickerId(self.next_id());
        Arc::make_mut(&mut self.stickers).push(StickerLayer::new(id, image));
        tracing::debug!(sticker = id.0, "sticker added");
        id
    }

    /// Finish acquiring a reserved sticker.
    pub fn resolve_sticker_image(&mut self, id: StickerId, image: StickerImage) -> SlideResult<()> {
        let pos = self.sticker_pos(id)?;
        Arc::make_mut(&mut self.stickers)[pos].image = AssetState::Ready(image);
        Ok(())
    }

    /// Record that acquiring a sticker failed.
    pub fn fail_sticker_image(&mut self, id: StickerId, reason: impl Into<String>) -> SlideResult<()> {
        let pos = self.sticker_pos(id)?;
        let reason = reason.into();
        tracing::warn!(sticker = id.0, %reason, "sticker failed to load");
        Arc::make_mut(&mut self.stickers)[pos].image = AssetState::Failed(reason);
        Ok(())
    }

    /// Remove a sticker and return it.
    pub fn remove_sticker(&mut self, id: StickerId) -> SlideResult<StickerLayer> {
        let pos = self.sticker_pos(id)?;
        Ok(Arc::make_mut(&mut self.stickers).remove(pos))
    }

    /// Replace one field of a sticker. On error the sticker is unchanged.
    pub fn update_sticker(&mut self, id: StickerId, field: StickerField) -> SlideResult<()> {
        let pos = self.sticker_pos(id)?;
        let mut updated = self.stickers[pos].clone();
        updated.apply(field)?;
        Arc::make_mut(&mut self.stickers)[pos] = updated;
        Ok(())
    }

    /// Stickers in paint order.
    pub fn stickers(&self) -> &[StickerLayer] {
        &self.stickers
    }

    fn sticker_pos(&self, id: StickerId) -> SlideResult<usize> {
        self.stickers
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SlideError::validation(format!("unknown sticker id {}", id.0)))
    }

    // ---- grade ----

    /// Project-wide color grade.
    pub fn grade(&self) -> ColorGrade {
        self.grade
    }

    /// Replace the whole grade after validating it.
    pub fn set_grade(&mut self, grade: ColorGrade) -> SlideResult<()> {
        self.grade = ColorGrade::new(grade.preset, grade.sharpness)?;
        Ok(())
    }

    /// Select a preset, keeping the sharpness.
    pub fn set_grade_preset(&mut self, preset: GradePreset) {
        self.grade.preset = preset;
    }

    /// Set sharpness in `[0, 200]`, keeping the preset.
    pub fn set_sharpness(&mut self, sharpness: f64) -> SlideResult<()> {
        self.grade = ColorGrade::new(self.grade.preset, sharpness)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/store.rs"]
mod tests;
