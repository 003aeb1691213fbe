pub(crate) mod font;
pub(crate) mod render;
pub(crate) mod wrap;
