use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode,
    audio::sound::Sound,
    foundation::error::{CaptchaError, CaptchaResult},
};

/// Language used when a requested language has no sound set.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Number of digit sounds in a complete set.
pub const DIGIT_COUNT: usize = 10;

#[derive(Clone)]
/// TrueType/OpenType font ready for glyph rendering.
pub struct FontAsset {
    name: String,
    family: String,
    bytes: Arc<Vec<u8>>,
    data: vello_cpu::peniko::FontData,
}

impl fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontAsset")
            .field("name", &self.name)
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontAsset {
    /// Validate `bytes` as a font and wrap them under `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> CaptchaResult<Self> {
        let name = name.into();
        let bytes = Arc::new(bytes);
        let family = decode::font_family_name(&bytes)
            .with_context(|| format!("font '{name}' contains no usable face"))?;
        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(bytes.clone()), 0);
        Ok(Self {
            name,
            family,
            bytes,
            data,
        })
    }

    /// Name the font was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primary family name read from the font tables.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font file bytes, shared with the render and shaping blobs.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    pub(crate) fn render_data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Spoken digits 0 through 9 for one language.
pub struct DigitSoundSet {
    digits: Arc<[Sound]>,
}

impl DigitSoundSet {
    /// Build a set from exactly ten sounds ordered by digit.
    pub fn new(digits: Vec<Sound>) -> CaptchaResult<Self> {
        if digits.len() != DIGIT_COUNT {
            return Err(CaptchaError::configuration(format!(
                "a digit sound set needs {DIGIT_COUNT} sounds, got {}",
                digits.len()
            )));
        }
        if let Some(d) = digits.iter().position(Sound::is_empty) {
            return Err(CaptchaError::configuration(format!("sound for digit {d} is empty")));
        }
        Ok(Self {
            digits: digits.into(),
        })
    }

    /// Sound for `digit` (0..=9).
    pub fn get(&self, digit: u8) -> CaptchaResult<&Sound> {
        self.digits.get(usize::from(digit)).ok_or_else(|| {
            CaptchaError::configuration(format!("digit {digit} is outside 0..=9"))
        })
    }

    /// All sounds ordered by digit.
    pub fn sounds(&self) -> &[Sound] {
        &self.digits
    }
}

/// Source of fonts and digit sound sets.
///
/// Providers are consulted only while an [`AssetStore`] is being prepared; renders read the
/// store afterwards.
pub trait AssetProvider: Send + Sync {
    /// Load the font registered as `name`. Missing fonts are [`CaptchaError::AssetLookup`].
    fn load_font(&self, name: &str) -> CaptchaResult<FontAsset>;

    /// Load the digit sounds for `language`. Missing sets are [`CaptchaError::AssetLookup`].
    fn load_sound_set(&self, language: &str) -> CaptchaResult<DigitSoundSet>;
}

#[derive(Clone, Debug)]
/// Provider reading `<root>/fonts/<name>` and `<root>/sounds/<language>/<digit>.wav`.
pub struct FsAssetProvider {
    root: PathBuf,
}

impl FsAssetProvider {
    /// Provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetProvider for FsAssetProvider {
    fn load_font(&self, name: &str) -> CaptchaResult<FontAsset> {
        let rel = normalize_rel_path(name)?;
        let path = self.root.join("fonts").join(Path::new(&rel));
        if !path.is_file() {
            return Err(CaptchaError::asset_lookup(format!(
                "font '{name}' not found at '{}'",
                path.display()
            )));
        }
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read font bytes from '{}'", path.display()))?;
        FontAsset::from_bytes(rel, bytes)
    }

    fn load_sound_set(&self, language: &str) -> CaptchaResult<DigitSoundSet> {
        let dir = self.root.join("sounds").join(validate_language(language)?);
        if !dir.is_dir() {
            return Err(CaptchaError::asset_lookup(format!(
                "no sound set for language '{language}' at '{}'",
                dir.display()
            )));
        }

        let mut digits = Vec::with_capacity(DIGIT_COUNT);
        for d in 0..DIGIT_COUNT {
            let path = dir.join(format!("{d}.wav"));
            if !path.is_file() {
                return Err(CaptchaError::asset_lookup(format!(
                    "sound set '{language}' is missing digit {d} ('{}')",
                    path.display()
                )));
            }
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read sound bytes from '{}'", path.display()))?;
            digits.push(decode::decode_wav_pcm_u8(&bytes).with_context(|| {
                format!("decode sound '{}'", path.display())
            })?);
        }
        DigitSoundSet::new(digits)
    }
}

struct StoreInner {
    fonts: BTreeMap<String, FontAsset>,
    sound_sets: HashMap<String, DigitSoundSet>,
    default_language: String,
}

/// Immutable snapshot of fonts and digit sound sets shared by concurrent renders.
///
/// Cloning shares the snapshot. Nothing can be added after [`AssetStoreBuilder::build`].
#[derive(Clone)]
pub struct AssetStore {
    inner: Arc<StoreInner>,
}

impl fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetStore")
            .field("fonts", &self.inner.fonts.keys().collect::<Vec<_>>())
            .field("sound_sets", &self.inner.sound_sets.keys().collect::<Vec<_>>())
            .field("default_language", &self.inner.default_language)
            .finish()
    }
}

impl AssetStore {
    /// Start an in-memory store.
    pub fn builder() -> AssetStoreBuilder {
        AssetStoreBuilder::default()
    }

    /// Load the named fonts and sound sets from `provider` once.
    ///
    /// Any missing asset aborts preparation; nothing is substituted for an explicit request.
    #[tracing::instrument(skip(provider))]
    pub fn prepare(
        provider: &dyn AssetProvider,
        font_names: &[&str],
        languages: &[&str],
    ) -> CaptchaResult<Self> {
        let mut builder = Self::builder();
        for name in font_names {
            builder = builder.font(provider.load_font(name)?);
        }
        for lang in languages {
            builder = builder.sound_set(*lang, provider.load_sound_set(lang)?);
        }
        Ok(builder.build())
    }

    /// Font registered as `name`.
    pub fn font(&self, name: &str) -> CaptchaResult<&FontAsset> {
        self.inner
            .fonts
            .get(name)
            .ok_or_else(|| CaptchaError::asset_lookup(format!("unknown font '{name}'")))
    }

    /// Resolve a font selection. An empty `names` selects every loaded font.
    pub fn fonts<S: AsRef<str>>(&self, names: &[S]) -> CaptchaResult<Vec<FontAsset>> {
        if names.is_empty() {
            if self.inner.fonts.is_empty() {
                return Err(CaptchaError::asset_lookup("asset store holds no fonts"));
            }
            tracing::debug!(count = self.inner.fonts.len(), "using every loaded font");
            return Ok(self.inner.fonts.values().cloned().collect());
        }
        names
            .iter()
            .map(|n| self.font(n.as_ref()).cloned())
            .collect()
    }

    /// Sound set for exactly `language`, with no fallback.
    pub fn sound_set(&self, language: &str) -> CaptchaResult<&DigitSoundSet> {
        self.inner.sound_sets.get(language).ok_or_else(|| {
            CaptchaError::asset_lookup(format!("no sound set for language '{language}'"))
        })
    }

    /// Sound set for `language`, falling back to the default language when it has none.
    pub fn digit_sounds(&self, language: &str) -> CaptchaResult<&DigitSoundSet> {
        if let Some(set) = self.inner.sound_sets.get(language) {
            return Ok(set);
        }
        tracing::debug!(
            requested = language,
            fallback = %self.inner.default_language,
            "no sound set for language, using default"
        );
        self.sound_set(&self.inner.default_language)
    }

    /// Language used by [`AssetStore::digit_sounds`] fallback.
    pub fn default_language(&self) -> &str {
        &self.inner.default_language
    }
}

/// Collects assets for an [`AssetStore`].
pub struct AssetStoreBuilder {
    fonts: BTreeMap<String, FontAsset>,
    sound_sets: HashMap<String, DigitSoundSet>,
    default_language: String,
}

impl Default for AssetStoreBuilder {
    fn default() -> Self {
        Self {
            fonts: BTreeMap::new(),
            sound_sets: HashMap::new(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AssetStoreBuilder {
    /// Add a font under its own name, replacing any font with the same name.
    pub fn font(mut self, font: FontAsset) -> Self {
        self.fonts.insert(font.name().to_string(), font);
        self
    }

    /// Add the digit sounds for `language`.
    pub fn sound_set(mut self, language: impl Into<String>, set: DigitSoundSet) -> Self {
        self.sound_sets.insert(language.into(), set);
        self
    }

    /// Override the fallback language (default `"en"`).
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Freeze into a shareable store.
    pub fn build(self) -> AssetStore {
        AssetStore {
            inner: Arc::new(StoreInner {
                fonts: self.fonts,
                sound_sets: self.sound_sets,
                default_language: self.default_language,
            }),
        }
    }
}

/// Normalize a font name into a provider-relative path.
///
/// Backslashes become `/`, empty and `.` segments are dropped. Absolute paths and `..`
/// segments are rejected so a lookup never leaves the provider root.
pub fn normalize_rel_path(source: &str) -> CaptchaResult<String> {
    let unified = source.replace('\\', "/");
    if unified.starts_with('/') {
        return Err(CaptchaError::configuration(format!("asset path '{source}' must be relative")));
    }

    let segments = unified
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .map(|seg| match seg {
            ".." => Err(CaptchaError::configuration(format!(
                "asset path '{source}' escapes its root"
            ))),
            _ => Ok(seg),
        })
        .collect::<CaptchaResult<Vec<_>>>()?;

    if segments.is_empty() {
        return Err(CaptchaError::configuration(format!("asset path '{source}' names no file")));
    }
    Ok(segments.join("/"))
}

fn validate_language(language: &str) -> CaptchaResult<&str> {
    let ok = !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(CaptchaError::configuration(format!("invalid language code '{language}'")));
    }
    Ok(language)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
