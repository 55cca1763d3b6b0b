//! Text decoding/encoding for export and book files.
//!
//! Exports from some locales carry stray invalid bytes. Decoding skips every
//! malformed sequence instead of substituting U+FFFD, and line endings are
//! folded to `\n` the way a universal-newline reader would.

use encoding_rs::{DecoderResult, Encoding, UTF_8};
use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCodec {
    encoding: &'static Encoding,
}

impl Default for TextCodec {
    fn default() -> Self {
        Self { encoding: UTF_8 }
    }
}

impl TextCodec {
    /// Resolve a WHATWG label such as `utf8`, `latin1` or `windows-1252`.
    pub fn for_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self { encoding })
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode `bytes`, dropping malformed sequences. A leading BOM is kept as
    /// U+FEFF so the parser sees it.
    pub fn decode_skipping_errors(&self, bytes: &[u8]) -> String {
        let mut decoder = self.encoding.new_decoder_without_bom_handling();
        let mut out = String::with_capacity(
            decoder
                .max_utf8_buffer_length_without_replacement(bytes.len())
                .unwrap_or(bytes.len()),
        );
        let mut input = bytes;
        loop {
            let (result, read) =
                decoder.decode_to_string_without_replacement(input, &mut out, true);
            input = &input[read..];
            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::Malformed(_, _) => {}
                DecoderResult::OutputFull => {
                    let extra = decoder
                        .max_utf8_buffer_length_without_replacement(input.len())
                        .unwrap_or(input.len() * 3);
                    out.reserve(extra.max(16));
                }
            }
        }
        normalize_newlines(&out)
    }

    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        let (bytes, _, _) = self.encoding.encode(text);
        bytes
    }

    pub fn read_file(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Ok(self.decode_skipping_errors(&bytes))
    }
}

/// Fold `\r\n` and lone `\r` into `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_utf8_bytes_are_dropped_not_replaced() {
        let codec = TextCodec::default();
        let text = codec.decode_skipping_errors(b"caf\xff\xfee ok");
        assert_eq!(text, "cafe ok");
        assert!(!text.contains('\u{fffd}'));
    }

    #[test]
    fn bom_survives_decoding() {
        let codec = TextCodec::for_label("utf8").expect("label");
        let text = codec.decode_skipping_errors("\u{feff}Title\r\nline".as_bytes());
        assert_eq!(text, "\u{feff}Title\nline");
    }

    #[test]
    fn latin1_label_decodes_high_bytes() {
        let codec = TextCodec::for_label("latin1").expect("label");
        assert_eq!(codec.name(), "windows-1252");
        assert_eq!(codec.decode_skipping_errors(b"Caf\xe9"), "Café");
        assert_eq!(codec.encode("Café").as_ref(), b"Caf\xe9");
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = TextCodec::for_label("klingon-8").expect_err("unknown label");
        assert!(matches!(err, Error::UnknownEncoding(ref l) if l == "klingon-8"));
    }

    #[test]
    fn lone_carriage_returns_become_newlines() {
        assert_eq!(normalize_newlines("a\rb\r\nc\n"), "a\nb\nc\n");
    }
}
