use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{assets::store::DEFAULT_LANGUAGE, foundation::core::Rgba8};

/// Optional visual effect applied before text is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Thick light sine band.
    HollowLine,
    /// Thin straight segments between opposite thirds.
    SlimLine,
    /// Single deep-colored sine wave.
    SineLine,
    /// Scattered light-colored noise characters.
    Noise,
}

impl Effect {
    /// Every effect in drawing order.
    pub const ALL: [Effect; 4] = [
        Effect::HollowLine,
        Effect::SlimLine,
        Effect::SineLine,
        Effect::Noise,
    ];

    fn bit(self) -> u8 {
        match self {
            Effect::HollowLine => 1 << 0,
            Effect::SlimLine => 1 << 1,
            Effect::SineLine => 1 << 2,
            Effect::Noise => 1 << 3,
        }
    }
}

/// Set of enabled [`Effect`]s. Serialized as a list of snake_case names.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EffectSet(u8);

impl EffectSet {
    /// No effects.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every effect.
    pub fn all() -> Self {
        Effect::ALL.into_iter().collect()
    }

    /// True when `effect` is enabled.
    pub fn contains(self, effect: Effect) -> bool {
        self.0 & effect.bit() != 0
    }

    /// Enable `effect`.
    pub fn insert(&mut self, effect: Effect) {
        self.0 |= effect.bit();
    }

    /// Disable `effect`.
    pub fn remove(&mut self, effect: Effect) {
        self.0 &= !effect.bit();
    }

    /// Copy with `effect` enabled.
    pub fn with(mut self, effect: Effect) -> Self {
        self.insert(effect);
        self
    }

    /// True when nothing is enabled.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Enabled effects in drawing order.
    pub fn iter(self) -> impl Iterator<Item = Effect> {
        Effect::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

impl FromIterator<Effect> for EffectSet {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        let mut set = Self::empty();
        for e in iter {
            set.insert(e);
        }
        set
    }
}

impl fmt::Debug for EffectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for EffectSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for EffectSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let effects = Vec::<Effect>::deserialize(deserializer)?;
        Ok(effects.into_iter().collect())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Options for a true-color text captcha.
pub struct CharCaptchaOpts {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of noise characters (used when [`Effect::Noise`] is enabled).
    pub noise_count: usize,
    /// Enabled effects.
    pub effects: EffectSet,
    /// Background override; a random light color when `None`.
    pub bg_color: Option<Rgba8>,
    /// Font names to draw with; empty selects every loaded font.
    pub fonts: Vec<String>,
}

impl Default for CharCaptchaOpts {
    fn default() -> Self {
        Self {
            width: 240,
            height: 80,
            noise_count: 20,
            effects: EffectSet::empty()
                .with(Effect::SlimLine)
                .with(Effect::Noise),
            bg_color: None,
            fonts: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Options for an indexed-color dot-matrix digit captcha.
pub struct DigitCaptchaOpts {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of background circles; also the palette size minus one.
    pub dot_count: usize,
    /// Largest per-row horizontal skew step, in pixels.
    pub max_skew: f64,
}

impl Default for DigitCaptchaOpts {
    fn default() -> Self {
        Self {
            width: 240,
            height: 80,
            dot_count: 80,
            max_skew: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Options for a spoken-digit audio captcha.
pub struct AudioCaptchaOpts {
    /// Language of the digit sounds; unknown languages fall back to the store default.
    pub language: String,
}

impl Default for AudioCaptchaOpts {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/opts.rs"]
mod tests;
