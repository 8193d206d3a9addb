pub(crate) mod sound;
pub(crate) mod synth;
