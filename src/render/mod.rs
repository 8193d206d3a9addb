pub(crate) mod canvas;
pub(crate) mod digit_font;
pub(crate) mod paletted;
