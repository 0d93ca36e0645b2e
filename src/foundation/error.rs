/// Convenience result type used across slidecraft.
pub type SlideResult<T> = Result<T, SlideError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// Invalid layer values, unknown ids or out-of-range percentages.
    #[error("validation error: {0}")]
    Validation(String),

    /// Decode failures and failed uploads.
    #[error("asset error: {0}")]
    Asset(String),

    /// An asset that is still being acquired was needed by a render.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// Export was requested while the slot's draft differs from its committed snapshot.
    #[error("slot {slot_index} has unbaked changes; bake before exporting")]
    Dirty {
        /// Index of the offending slot at the time of the request.
        slot_index: usize,
    },

    /// Export was requested while a referenced font family is still registering.
    #[error("fonts still loading: {0}")]
    FontsPending(String),

    /// A visible text layer has no font face that can draw it.
    #[error("no font face can draw text in family '{0}'")]
    NoFontFace(String),

    /// Surface allocation or size errors during rasterization.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlideError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`SlideError::MissingAsset`] value.
    pub fn missing_asset(msg: impl Into<String>) -> Self {
        Self::MissingAsset(msg.into())
    }

    /// Build a [`SlideError::FontsPending`] value.
    pub fn fonts_pending(msg: impl Into<String>) -> Self {
        Self::FontsPending(msg.into())
    }

    /// Build a [`SlideError::NoFontFace`] value.
    pub fn no_font_face(family: impl Into<String>) -> Self {
        Self::NoFontFace(family.into())
    }

    /// Build a [`SlideError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SlideError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors the user can resolve by baking the slot.
    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::Dirty { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
