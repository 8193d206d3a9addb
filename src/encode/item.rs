use std::io::Write;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::foundation::error::CaptchaResult;

/// MIME type of every image item.
pub const MIME_TYPE_IMAGE: &str = "image/png";
/// MIME type of every audio item.
pub const MIME_TYPE_AUDIO: &str = "audio/wav";

/// A finished captcha buffer that can be serialized into its container.
///
/// Encoding is repeatable and never consumes randomness; the random decisions were all made
/// while the buffer was drawn.
pub trait Item {
    /// MIME type of [`Item::encode`] output.
    fn mime_type(&self) -> &'static str;

    /// Serialize into the container format (PNG or WAV).
    fn encode(&self) -> CaptchaResult<Vec<u8>>;

    /// Write the encoded container to `w`, returning the number of bytes written.
    fn write_to(&self, w: &mut dyn Write) -> CaptchaResult<u64> {
        let bytes = self.encode()?;
        w.write_all(&bytes).context("write encoded captcha")?;
        Ok(bytes.len() as u64)
    }

    /// `data:<mime>;base64,<payload>` form of [`Item::encode`].
    fn to_data_uri(&self) -> CaptchaResult<String> {
        let bytes = self.encode()?;
        Ok(data_uri(self.mime_type(), &bytes))
    }
}

pub(crate) fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
