//! captchakit renders randomized captcha content: true-color text images, indexed-color
//! dot-matrix digit images and spoken-digit audio.
//!
//! Every render is a single pass over a freshly allocated buffer:
//!
//! - Prepare an [`AssetStore`] once (fonts and digit sound sets), then share it freely
//! - Render with [`render_char_captcha`], [`render_digit_captcha`] or [`render_audio_captcha`]
//! - Serialize the result through the [`Item`] trait (PNG / WAV bytes or a data URI)
//!
//! All randomness comes from the operating system generator via [`RandomSource`]; output is
//! never reproducible from a seed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod encode;
mod foundation;
mod pipeline;
mod render;

pub use crate::foundation::core::{Point, Rgba8};
pub use crate::foundation::error::{CaptchaError, CaptchaResult};
pub use crate::foundation::random::{RandomSource, TXT_ALPHABET, TXT_NUMBERS, random_text};

pub use crate::assets::color::{ColorPalette, MAX_DOT_COUNT, deep_color, light_color};
pub use crate::assets::decode::decode_wav_pcm_u8;
pub use crate::assets::store::{
    AssetProvider, AssetStore, AssetStoreBuilder, DEFAULT_LANGUAGE, DIGIT_COUNT, DigitSoundSet,
    FontAsset, FsAssetProvider, normalize_rel_path,
};

pub use crate::audio::sound::{
    SAMPLE_RATE, SILENCE, Sound, beep, change_speed, ending_beep, mix_sound, set_level,
};
pub use crate::audio::synth::{AudioCaptcha, background_sound, randomized_digit_sound, white_noise};

pub use crate::encode::item::{Item, MIME_TYPE_AUDIO, MIME_TYPE_IMAGE};
pub use crate::encode::wav::{WAV_HEADER_LEN, encoded_len as wav_encoded_len};

pub use crate::render::canvas::Canvas;
pub use crate::render::digit_font::{DIGIT_FONT_HEIGHT, DIGIT_FONT_WIDTH};
pub use crate::render::paletted::{
    BACKGROUND_INDEX, DigitLayout, PRIMARY_INDEX, PalettedCanvas, calculate_sizes,
};

pub use crate::pipeline::opts::{
    AudioCaptchaOpts, CharCaptchaOpts, DigitCaptchaOpts, Effect, EffectSet,
};
pub use crate::pipeline::render::{
    render_audio_captcha, render_char_captcha, render_digit_captcha,
};
