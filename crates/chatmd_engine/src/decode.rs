use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// How far into the file to look for a `<meta charset>` declaration.
const META_SNIFF_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSource {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("bytes are not valid {encoding}")]
    DecodeFailure { encoding: String },
}

/// Decode raw export bytes into UTF-8 using:
/// BOM -> meta charset -> valid UTF-8 -> chardetng fallback.
pub fn decode_source(bytes: &[u8]) -> Result<DecodedSource, DecodeError> {
    // 1) BOM aware decode using encoding_rs helper
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    // 2) <meta charset=...> near the top of the document
    if let Some(enc) = sniff_meta_charset(bytes).and_then(|l| Encoding::for_label(l.as_bytes())) {
        return decode_with(bytes, enc);
    }

    // 3) already valid UTF-8
    if std::str::from_utf8(bytes).is_ok() {
        return decode_with(bytes, UTF_8);
    }

    // 4) chardetng guess over the whole file
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedSource, DecodeError> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
        });
    }
    Ok(DecodedSource {
        html: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn utf8_bom_is_honored() {
        let decoded = decode_source(b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(decoded.html, "hello");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn meta_charset_wins_over_detection() {
        let bytes = b"<html><head><meta charset=\"windows-1251\"></head><body>\xcf\xf0\xe8\xe2\xe5\xf2</body></html>";
        let decoded = decode_source(bytes).unwrap();
        assert!(decoded.html.contains("Привет"));
        assert_eq!(decoded.encoding_label, "windows-1251");
    }

    #[test]
    fn http_equiv_content_type_is_sniffed() {
        let html = r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8"/>héllo"#;
        let decoded = decode_source(html.as_bytes()).unwrap();
        assert_eq!(decoded.encoding_label, "UTF-8");
        assert!(decoded.html.ends_with("héllo"));
    }

    #[test]
    fn invalid_bytes_for_declared_charset_fail() {
        let bytes = b"<meta charset=\"utf-8\">caf\xe9";
        assert_eq!(
            decode_source(bytes),
            Err(DecodeError::DecodeFailure {
                encoding: "UTF-8".to_string()
            })
        );
    }

    #[test]
    fn plain_utf8_without_declaration() {
        let decoded = decode_source("Привет".as_bytes()).unwrap();
        assert_eq!(decoded.html, "Привет");
    }
}
