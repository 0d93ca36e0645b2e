pub(crate) mod sticker;
pub(crate) mod text;
