use std::sync::Arc;

use crate::assets::store::{AssetState, PreparedImage};
use crate::foundation::core::SlotId;
use crate::foundation::error::SlideResult;
use crate::grade::ColorGrade;
use crate::layers::sticker::StickerLayer;
use crate::layers::text::TextLayer;
use crate::render::pipeline::RenderInput;

/// Whether a slot's draft layers match its committed snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BakeState {
    /// Draft and committed are equal; the slot can be exported.
    Clean,
    /// Draft differs from committed; bake before exporting.
    Dirty,
}

/// Which of a slot's two layer collections to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerSet {
    /// Layers being edited (preview).
    Draft,
    /// Layers captured at the last bake (export).
    Committed,
}

/// One photo in the project with its draft and committed text layers.
#[derive(Clone, Debug)]
pub struct PhotoSlot {
    pub(crate) id: SlotId,
    pub(crate) base: AssetState<PreparedImage>,
    pub(crate) draft: Arc<Vec<TextLayer>>,
    pub(crate) committed: Arc<Vec<TextLayer>>,
}

impl PhotoSlot {
    pub(crate) fn new(id: SlotId, base: AssetState<PreparedImage>) -> Self {
        Self {
            id,
            base,
            draft: Arc::new(Vec::new()),
            committed: Arc::new(Vec::new()),
        }
    }

    /// Stable id; unlike the index it never changes while the slot is alive.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Base image state.
    pub fn base(&self) -> &AssetState<PreparedImage> {
        &self.base
    }

    /// Draft text layers in paint order.
    pub fn draft(&self) -> &[TextLayer] {
        &self.draft
    }

    /// Committed text layers in paint order.
    pub fn committed(&self) -> &[TextLayer] {
        &self.committed
    }

    /// Layers of one collection.
    pub fn layers(&self, set: LayerSet) -> &[TextLayer] {
        match set {
            LayerSet::Draft => &self.draft,
            LayerSet::Committed => &self.committed,
        }
    }

    /// Compare draft and committed by value and order.
    pub fn bake_state(&self) -> BakeState {
        if Arc::ptr_eq(&self.draft, &self.committed) || self.draft == self.committed {
            BakeState::Clean
        } else {
            BakeState::Dirty
        }
    }

    /// Return `true` when the slot has unbaked changes.
    pub fn is_dirty(&self) -> bool {
        self.bake_state() == BakeState::Dirty
    }
}

/// Immutable view of everything needed to render one slot.
///
/// Holding a snapshot does not block edits: the project replaces its collections instead of
/// writing into them.
#[derive(Clone, Debug)]
pub struct SlotSnapshot {
    /// Index of the slot when the snapshot was taken.
    pub slot_index: usize,
    /// Slot id.
    pub slot_id: SlotId,
    /// Which collection `texts` came from.
    pub set: LayerSet,
    /// Base photo.
    pub base: PreparedImage,
    /// Project grade.
    pub grade: ColorGrade,
    /// Global stickers.
    pub stickers: Arc<Vec<StickerLayer>>,
    /// Text layers of `set`.
    pub texts: Arc<Vec<TextLayer>>,
}

impl SlotSnapshot {
    pub(crate) fn capture(
        slot_index: usize,
        slot: &PhotoSlot,
        set: LayerSet,
        grade: ColorGrade,
        stickers: Arc<Vec<StickerLayer>>,
    ) -> SlideResult<Self> {
        let base = slot
            .base
            .ready(&format!("base image of slot {slot_index}"))?
            .clone();
        let texts = match set {
            LayerSet::Draft => Arc::clone(&slot.draft),
            LayerSet::Committed => Arc::clone(&slot.committed),
        };
        Ok(Self {
            slot_index,
            slot_id: slot.id,
            set,
            base,
            grade,
            stickers,
            texts,
        })
    }

    /// Pipeline input for rendering this snapshot at `target_width`.
    pub fn input(&self, target_width: u32) -> RenderInput<'_> {
        RenderInput {
            base: &self.base,
            grade: &self.grade,
            stickers: &self.stickers,
            texts: &self.texts,
            target_width,
        }
    }

    /// Font family of every visible text layer in the snapshot, in paint order.
    pub fn font_families(&self) -> impl Iterator<Item = &str> {
        self.texts
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.font_family.as_str())
    }
}
