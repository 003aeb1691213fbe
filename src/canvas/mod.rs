pub(crate) mod base;
pub(crate) mod binding;
pub(crate) mod draw;
pub(crate) mod shadow;
