//! Email corpus loading.
//!
//! Forwarded threads are parsed as MIME messages. Plain-text parts are
//! decoded by their declared charset with UTF-8 and Latin-1 fallbacks, HTML parts are reduced to their text
//! nodes, attachments are skipped. The result has every line trimmed and
//! blank lines removed.

use charset::Charset;
use evidence::{split_lines, Document};
use mailparse::{parse_mail, DispositionType, MailParseError, ParsedMail};
use scraper::Html;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extract readable text from a raw message.
///
/// Never fails: a message that cannot be parsed yields an empty string.
pub fn parse_message(raw: &[u8]) -> String {
    match extract_text(raw) {
        Ok(text) => clean_lines(&text),
        Err(e) => {
            warn!(error = %e, "Failed to parse email message");
            String::new()
        }
    }
}

fn extract_text(raw: &[u8]) -> Result<String, MailParseError> {
    let mail = parse_mail(raw)?;

    if mail.subparts.is_empty() {
        return Ok(single_part_text(&mail));
    }

    let mut body = String::new();
    collect_parts(&mail, &mut body);
    Ok(body)
}

fn single_part_text(part: &ParsedMail) -> String {
    let text = decode_body(part);
    if part.ctype.mimetype.eq_ignore_ascii_case("text/html") {
        html_to_text(&text)
    } else {
        text
    }
}

/// Depth-first walk of a multipart tree, container first.
fn collect_parts(part: &ParsedMail, body: &mut String) {
    if !is_attachment(part) {
        let mimetype = part.ctype.mimetype.to_ascii_lowercase();
        match mimetype.as_str() {
            "text/plain" => body.push_str(&decode_body(part)),
            "text/html" => body.push_str(&html_to_text(&decode_body(part))),
            _ => {}
        }
        body.push('\n');
    }

    for sub in &part.subparts {
        collect_parts(sub, body);
    }
}

fn is_attachment(part: &ParsedMail) -> bool {
    part.get_content_disposition().disposition == DispositionType::Attachment
}

/// Decode a part's body.
///
/// Tries the declared charset (UTF-8 when none is declared), then UTF-8,
/// then Latin-1, each strictly.
fn decode_body(part: &ParsedMail) -> String {
    let bytes = match part.get_body_raw() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Failed to undo transfer encoding");
            return String::new();
        }
    };
    let label = part
        .ctype
        .params
        .get("charset")
        .map(String::as_str)
        .unwrap_or("utf-8");

    decode_bytes(&bytes, label)
}

fn decode_bytes(bytes: &[u8], label: &str) -> String {
    let declared = Charset::for_label(label.trim().as_bytes())
        .and_then(|charset| {
            let (text, had_errors) = charset.decode_without_bom_handling(bytes);
            (!had_errors).then_some(text)
        });
    if let Some(text) = declared {
        return text.into_owned();
    }

    debug!(charset = label, "Declared charset failed, falling back");
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Concatenated text nodes of an HTML fragment or document.
pub fn html_to_text(html: &str) -> String {
    Html::parse_document(html)
        .root_element()
        .text()
        .collect::<String>()
}

fn clean_lines(text: &str) -> String {
    split_lines(text)
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `.eml` files directly inside `dir`, in sorted path order.
pub fn message_paths(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Cannot read email directory");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_eml_extension(path))
        .collect();
    paths.sort();
    paths
}

fn has_eml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("eml"))
}

/// Load every `.eml` message in `dir` as a document.
///
/// Unreadable files are logged and skipped; messages with no text are
/// dropped.
pub fn load_messages(dir: &Path) -> Vec<Document> {
    let paths = message_paths(dir);
    let mut documents = Vec::with_capacity(paths.len());

    for path in &paths {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read email file");
                continue;
            }
        };

        let text = parse_message(&raw);
        if text.is_empty() {
            debug!(path = %path.display(), "Email has no readable text");
            continue;
        }
        documents.push(Document::new(text).with_source(path.display().to_string()));
    }

    info!(
        dir = %dir.display(),
        files = paths.len(),
        documents = documents.len(),
        "Loaded email corpus"
    );
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLAIN: &str = "From: a@example.com\r\n\
To: b@example.com\r\n\
Subject: Nominations\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
\x20\x20Hello team,  \r\n\
\r\n\
Dr. Alpha was wonderful this term.\r\n";

    const MULTIPART: &str = "From: a@example.com\r\n\
Subject: Thread\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\
\r\n\
--XYZ\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Plain part about Dr. Alpha.\r\n\
--XYZ\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<html><body><p>HTML part</p><p>Also for Prof Z.</p></body></html>\r\n\
--XYZ\r\n\
Content-Type: text/plain\r\n\
Content-Disposition: attachment; filename=\"notes.txt\"\r\n\
\r\n\
Attachment text mentioning Dr. Alpha.\r\n\
--XYZ--\r\n";

    #[test]
    fn test_plain_message_is_trimmed() {
        let text = parse_message(PLAIN.as_bytes());
        assert_eq!(text, "Hello team,\nDr. Alpha was wonderful this term.");
    }

    #[test]
    fn test_multipart_skips_attachments() {
        let text = parse_message(MULTIPART.as_bytes());

        assert!(text.contains("Plain part about Dr. Alpha."));
        assert!(text.contains("HTML partAlso for Prof Z."));
        assert!(!text.contains("Attachment text"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn test_single_part_html() {
        let raw = "Subject: x\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<div>Dear Dr. Y,</div>\n<div>An HTML&nbsp;email.</div>\r\n";

        let text = parse_message(raw.as_bytes());
        assert_eq!(text, "Dear Dr. Y,\nAn HTML\u{a0}email.");
    }

    #[test]
    fn test_latin1_charset_is_decoded() {
        let mut raw = b"Subject: x\r\nContent-Type: text/plain; charset=iso-8859-1\r\n\r\nCaf".to_vec();
        raw.push(0xE9);
        raw.extend_from_slice(b" with Dr. Beta\r\n");

        assert_eq!(parse_message(&raw), "Caf\u{e9} with Dr. Beta");
    }

    #[test]
    fn test_invalid_bytes_for_declared_charset_fall_back_to_latin1() {
        let raw = b"Subject: x\r\nContent-Type: text/plain; charset=utf-8\r\n\r\nHello \xff Prof Q\r\n";

        assert_eq!(parse_message(raw), "Hello \u{ff} Prof Q");
    }

    #[test]
    fn test_unknown_charset_falls_back_to_utf8() {
        assert_eq!(decode_bytes("Caf\u{e9}".as_bytes(), "x-made-up"), "Caf\u{e9}");
        assert_eq!(decode_bytes(b"Caf\xe9", "x-made-up"), "Caf\u{e9}");
    }

    #[test]
    fn test_undeclared_charset_is_utf8() {
        let raw = "Subject: x\r\n\r\nNa\u{ef}ve praise for Dr. Beta\r\n";

        assert_eq!(parse_message(raw.as_bytes()), "Na\u{ef}ve praise for Dr. Beta");
    }

    #[test]
    fn test_unusual_line_breaks_split_lines() {
        let raw = "Subject: x\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n\
One\u{2028} Two \x0cThree\r\n";

        assert_eq!(parse_message(raw.as_bytes()), "One\nTwo\nThree");
    }

    #[test]
    fn test_html_to_text_concatenates_nodes() {
        assert_eq!(html_to_text("<p>One</p><p>Two</p>"), "OneTwo");
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn test_load_messages_reads_only_eml_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.eml"), PLAIN).unwrap();
        fs::write(dir.path().join("a.EML"), MULTIPART).unwrap();
        fs::write(dir.path().join("notes.txt"), "Dr. Alpha").unwrap();
        fs::write(dir.path().join("empty.eml"), "Subject: nothing\r\n\r\n").unwrap();
        fs::create_dir(dir.path().join("nested.eml")).unwrap();

        let documents = load_messages(dir.path());

        assert_eq!(documents.len(), 2);
        assert!(documents[0].source.as_deref().unwrap().ends_with("a.EML"));
        assert!(documents[1].source.as_deref().unwrap().ends_with("b.eml"));
        assert!(documents[1].text.starts_with("Hello team,"));
    }

    #[test]
    fn test_missing_directory_is_empty_corpus() {
        let dir = TempDir::new().unwrap();
        assert!(load_messages(&dir.path().join("missing")).is_empty());
    }
}
