//! Slidecraft composes multi-slide photo designs: a base photo per slot, global stickers, and
//! per-slot text layers, rendered on the CPU and exported as PNG.
//!
//! Text geometry is stored resolution-independently (percentages plus reference pixels), so the
//! same layers render identically in a small preview and in a 4K export. The public API is
//! organized around a few types:
//!
//! - Edit a [`Project`]: slots, draft text layers, stickers and the [`ColorGrade`]
//! - [`Project::bake`] a slot to commit its draft layers
//! - Preview drafts with [`PreviewRenderer`] and [`DragController`]
//! - Export committed layers with [`ExportCoordinator`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod fonts;
pub(crate) mod grade;
pub(crate) mod layers;
pub(crate) mod layout;
pub(crate) mod manifest;
pub(crate) mod preview;
pub(crate) mod project;
pub(crate) mod render;
pub(crate) mod transform;

pub use crate::foundation::core::{
    Affine, LayerId, Point, Rect, Rgba8, Size, SlotId, StickerId, Vec2,
};
pub use crate::foundation::error::{SlideError, SlideResult};

pub use crate::assets::decode::{
    DecodedImage, DecodedPixels, ImageAcquirer, ImageDecoder, UploadKind, decode_image,
    parse_svg,
};
pub use crate::assets::store::{AssetState, PreparedImage, PreparedSvg, StickerImage};
pub use crate::config::{ENV_EXPORT_PREFIX, ENV_PREVIEW_WIDTH, StudioConfig};
pub use crate::export::{
    DEFAULT_EXPORT_PREFIX, ExportCoordinator, ExportedImage, FOUR_K_WIDTH, Resolution,
    SlotExportOutcome, TWO_K_WIDTH,
};
pub use crate::fonts::{DEFAULT_FALLBACK_ADVANCE_EM, FontBook, FontRequest, FontStatus};
pub use crate::grade::{
    ColorGrade, ColorMatrix, FilterOp, GradePreset, NEUTRAL_SHARPNESS, SHARPNESS_RANGE,
};
pub use crate::layers::sticker::{
    DEFAULT_STICKER_SCALE, STICKER_SCALE_RANGE, StickerField, StickerLayer,
};
pub use crate::layers::text::{
    DEFAULT_FONT_FAMILY, DEFAULT_TEXT_CONTENT, FONT_WEIGHT_CHOICES, LINE_HEIGHT_RANGE, TextField,
    TextLayer,
};
pub use crate::layout::block::{PlacedLine, TextPlacement, line_offsets, place_text};
pub use crate::layout::wrap::wrap_text;
pub use crate::manifest::{
    FontManifest, LayerManifest, LoadedProject, ProjectManifest, SlotManifest, StickerManifest,
};
pub use crate::preview::{DragController, PreviewRenderer};
pub use crate::project::{
    BakeState, DEFAULT_CALIBRATION_WIDTH, LayerSet, PhotoSlot, Project, SlotSnapshot,
};
pub use crate::render::backend::{FrameRGBA, RenderOpts, ShadowStyle};
pub use crate::render::pipeline::{
    RenderInput, RenderedSlot, StickerPlacement, output_size, render_slot,
};
pub use crate::transform::affine::{device_offset, layer_transform};
pub use crate::transform::pointer::{percent_to_pointer, pointer_to_percent};
pub use crate::transform::scale::{ScaleContext, ScaledText, ShadowGeometry};
