pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod shape;
pub(crate) mod store;
