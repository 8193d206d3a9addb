pub(crate) mod opts;
pub(crate) mod render;
