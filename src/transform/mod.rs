pub(crate) mod affine;
pub(crate) mod pointer;
pub(crate) mod scale;
