pub(crate) mod item;
pub(crate) mod png;
pub(crate) mod wav;
