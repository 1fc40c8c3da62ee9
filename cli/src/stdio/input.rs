//! Reads the handshake the host writes to stdin.
//!
//! The XML usually arrives as UTF-8, but some hosts prefix a BOM or send UTF-16.
//! The text is decoded before parsing so the XML layer only ever sees `&str`.

use std::io::Read;
use std::path::Path;

use encoding_rs::Encoding;

pub const ENCODING_ENV: &str = "MODINPUT_STDIN_ENCODING";

/// From `path` when given, otherwise all of stdin.
pub fn read_handshake(path: Option<&Path>) -> Result<String, std::io::Error> {
    let bytes = match path {
        Some(p) => std::fs::read(p)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    let forced = std::env::var(ENCODING_ENV).ok();
    Ok(decode_handshake_bytes(&bytes, forced.as_deref()))
}

/// Order: forced label, BOM, UTF-16 without BOM, UTF-8, lossy UTF-8.
pub fn decode_handshake_bytes(bytes: &[u8], forced_label: Option<&str>) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    if let Some(enc) = forced_label.and_then(|l| Encoding::for_label(l.trim().as_bytes())) {
        tracing::debug!(
            target: "modinput.stdin",
            encoding = enc.name(),
            bytes = bytes.len(),
            "using forced encoding"
        );
        let (text, _, _) = enc.decode(bytes);
        return text.into_owned();
    }

    if let Some((enc, bom_len)) = Encoding::for_bom(bytes) {
        tracing::debug!(
            target: "modinput.stdin",
            encoding = enc.name(),
            bytes = bytes.len(),
            "detected byte order mark"
        );
        let (text, _) = enc.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    if let Some(enc) = sniff_utf16(bytes) {
        tracing::debug!(
            target: "modinput.stdin",
            encoding = enc.name(),
            bytes = bytes.len(),
            "detected utf-16 without byte order mark"
        );
        let (text, _) = enc.decode_without_bom_handling(bytes);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(e) => {
            tracing::warn!(
                target: "modinput.stdin",
                valid_up_to = e.valid_up_to(),
                bytes = bytes.len(),
                "handshake is not valid utf-8, decoding lossily"
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// XML starts with ASCII `<`, so UTF-16 shows up as a NUL in every other byte.
fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    let sample = &bytes[..bytes.len().min(64)];
    if sample.len() < 2 {
        return None;
    }

    let (mut even, mut odd) = (0usize, 0usize);
    for (i, b) in sample.iter().enumerate() {
        if *b == 0 {
            if i % 2 == 0 {
                even += 1;
            } else {
                odd += 1;
            }
        }
    }

    let threshold = sample.len() / 4;
    if odd > threshold && odd > even * 2 {
        Some(encoding_rs::UTF_16LE)
    } else if even > threshold && even > odd * 2 {
        Some(encoding_rs::UTF_16BE)
    } else {
        None
    }
}
