//! Cryptographically secure randomness for every render.
//!
//! All random decisions in the engine (positions, colors, sizes, audio jitter) are drawn from a
//! [`RandomSource`]. The only production backing is the operating system generator; there is no
//! seeding hook, and an entropy failure surfaces as
//! [`CaptchaError::RandomnessUnavailable`] instead of degrading to a weaker generator.

use std::{fmt, sync::Arc};

use rand_core::{OsRng, RngCore};

use crate::foundation::error::{CaptchaError, CaptchaResult};

/// Backing entropy for a [`RandomSource`].
pub(crate) trait EntropySource: Send + Sync {
    fn try_fill(&self, dest: &mut [u8]) -> CaptchaResult<()>;
}

#[derive(Clone, Copy, Debug, Default)]
struct OsEntropy;

#[cfg(test)]
struct FailingEntropy;

#[cfg(test)]
impl EntropySource for FailingEntropy {
    fn try_fill(&self, _dest: &mut [u8]) -> CaptchaResult<()> {
        Err(CaptchaError::randomness("entropy pool unavailable"))
    }
}

impl EntropySource for OsEntropy {
    fn try_fill(&self, dest: &mut [u8]) -> CaptchaResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CaptchaError::randomness(format!("os entropy source failed: {e}")))
    }
}

/// Handle to the process-wide secure random generator.
///
/// Cloning is cheap and clones share the same backing source. The handle is `Send + Sync`, so
/// concurrent renders may each hold one.
#[derive(Clone)]
pub struct RandomSource {
    entropy: Arc<dyn EntropySource>,
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::os()
    }
}

impl RandomSource {
    /// Random source backed by the operating system generator.
    pub fn os() -> Self {
        Self {
            entropy: Arc::new(OsEntropy),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_entropy(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Source whose every draw fails, for exercising abort paths.
    #[cfg(test)]
    pub(crate) fn failing() -> Self {
        Self::with_entropy(Arc::new(FailingEntropy))
    }

    /// Fill `dest` with random bytes.
    pub fn fill(&self, dest: &mut [u8]) -> CaptchaResult<()> {
        self.entropy.try_fill(dest)
    }

    /// `n` random bytes.
    pub fn bytes(&self, n: usize) -> CaptchaResult<Vec<u8>> {
        let mut out = vec![0u8; n];
        self.fill(&mut out)?;
        Ok(out)
    }

    /// Uniform 64-bit word.
    pub fn next_u64(&self) -> CaptchaResult<u64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Uniform integer in `[0, n)`.
    ///
    /// An empty range (`n == 0`) collapses to `0`.
    pub fn below(&self, n: u64) -> CaptchaResult<u64> {
        if n <= 1 {
            return Ok(0);
        }
        // Rejection sampling keeps the distribution unbiased for any `n`.
        let zone = (u64::MAX / n) * n;
        loop {
            let v = self.next_u64()?;
            if v < zone {
                return Ok(v % n);
            }
        }
    }

    /// Uniform integer in `[0, n)` for signed callers; `n <= 0` collapses to `0`.
    pub fn below_i32(&self, n: i32) -> CaptchaResult<i32> {
        if n <= 0 {
            return Ok(0);
        }
        Ok(self.below(n as u64)? as i32)
    }

    /// Uniform integer in `[lo, hi]`; an inverted range collapses to `lo`.
    pub fn int_range(&self, lo: i64, hi: i64) -> CaptchaResult<i64> {
        if hi <= lo {
            return Ok(lo);
        }
        let span = (hi - lo) as u64 + 1;
        Ok(lo + self.below(span)? as i64)
    }

    /// [`RandomSource::int_range`] for `i32` coordinates.
    pub fn int_range_i32(&self, lo: i32, hi: i32) -> CaptchaResult<i32> {
        Ok(self.int_range(i64::from(lo), i64::from(hi))? as i32)
    }

    /// Uniform float in `[lo, hi)`.
    pub fn float_range(&self, lo: f64, hi: f64) -> CaptchaResult<f64> {
        // 53 random mantissa bits give every representable step in [0, 1).
        let unit = (self.next_u64()? >> 11) as f64 / (1u64 << 53) as f64;
        Ok(lo + unit * (hi - lo))
    }

    /// Uniformly chosen element of `items`.
    pub fn choose<'a, T>(&self, items: &'a [T]) -> CaptchaResult<&'a T> {
        if items.is_empty() {
            return Err(CaptchaError::configuration("cannot choose from an empty set"));
        }
        let idx = self.below(items.len() as u64)? as usize;
        Ok(&items[idx])
    }
}

/// Digits used for noise and generated content.
pub const TXT_NUMBERS: &str = "012346789";
/// Letters used for noise and generated content.
pub const TXT_ALPHABET: &str = "ABCDEFGHJKMNOQRSTUVXYZabcdefghjkmnoqrstuvxyz";

/// `len` characters drawn uniformly (with repetition) from `source`.
pub fn random_text(rng: &RandomSource, len: usize, source: &str) -> CaptchaResult<String> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        out.push(*rng.choose(&chars)?);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
