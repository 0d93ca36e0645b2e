use std::collections::HashMap;

use crate::foundation::core::{LayerId, Point, Rect, SlotId};
use crate::foundation::error::{SlideError, SlideResult};
use crate::layers::text::TextField;
use crate::project::Project;
use crate::transform::pointer::pointer_to_percent;

/// Tracks at most one text-layer drag per slot.
///
/// Drags are keyed by [`SlotId`], so removing a lower slot does not retarget a drag in progress.
/// Drags on slots that no longer exist are dropped on the next pointer down or up.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    active: HashMap<SlotId, LayerId>,
}

impl DragController {
    /// No drags in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `layer` in the slot at `slot_index`.
    ///
    /// Fails if that slot already has a drag in progress or has no such draft layer.
    pub fn pointer_down(
        &mut self,
        project: &Project,
        slot_index: usize,
        layer: LayerId,
    ) -> SlideResult<()> {
        self.evict_removed(project);
        let slot = project.slot(slot_index)?;
        if let Some(current) = self.active.get(&slot.id()) {
            return Err(SlideError::validation(format!(
                "slot {slot_index} is already dragging layer {}",
                current.0
            )));
        }
        if !slot.draft().iter().any(|l| l.id == layer) {
            return Err(SlideError::validation(format!(
                "slot {slot_index} has no text layer {}",
                layer.0
            )));
        }
        self.active.insert(slot.id(), layer);
        tracing::debug!(slot_index, layer = layer.0, "drag started");
        Ok(())
    }

    /// Move the dragged layer of `slot_index` under `pointer`.
    ///
    /// Returns the new `(x, y)` percentages, or `None` when the slot has no drag in progress.
    pub fn pointer_move(
        &mut self,
        project: &mut Project,
        slot_index: usize,
        pointer: Point,
        bounds: Rect,
    ) -> SlideResult<Option<(f64, f64)>> {
        let slot_id = project.slot(slot_index)?.id();
        let Some(&layer) = self.active.get(&slot_id) else {
            return Ok(None);
        };
        let (x, y) = pointer_to_percent(pointer, bounds)?;
        if let Err(err) = project.update_text_layer(slot_index, layer, TextField::Position { x, y })
        {
            // The layer went away mid-drag.
            self.active.remove(&slot_id);
            return Err(err);
        }
        Ok(Some((x, y)))
    }

    /// End the drag in `slot_index`, returning the layer that was being dragged.
    pub fn pointer_up(
        &mut self,
        project: &Project,
        slot_index: usize,
    ) -> SlideResult<Option<LayerId>> {
        self.evict_removed(project);
        let slot_id = project.slot(slot_index)?.id();
        let ended = self.active.remove(&slot_id);
        if let Some(layer) = ended {
            tracing::debug!(slot_index, layer = layer.0, "drag ended");
        }
        Ok(ended)
    }

    /// Drop the drag of a slot that is being removed.
    pub fn forget_slot(&mut self, slot_id: SlotId) -> Option<LayerId> {
        self.active.remove(&slot_id)
    }

    /// Number of drags in progress.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn evict_removed(&mut self, project: &Project) {
        self.active.retain(|slot_id, layer| {
            let alive = project.index_of(*slot_id).is_some();
            if !alive {
                tracing::debug!(slot = slot_id.0, layer = layer.0, "drag dropped with its slot");
            }
            alive
        });
    }

    /// Layer being dragged in the slot with `slot_id`.
    pub fn dragging(&self, slot_id: SlotId) -> Option<LayerId> {
        self.active.get(&slot_id).copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/drag.rs"]
mod tests;
