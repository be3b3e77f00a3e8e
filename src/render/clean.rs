//! Content normalization: decoding, clipper-artifact scrubbing, and
//! embedded-media substitution.
//!
//! Clipped pages arrive with inline styles that only made sense on the
//! original site: fixed-position overlays, zero-opacity veils, off-screen
//! boxes. A single combined regex strips the known fragments out of
//! `style="..."` attributes. The pass runs to a fixed point because one
//! removal can expose another matchable run in the same attribute.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::sync::LazyLock;

/// Inline-style fragments known to break rendered clips. Mostly
/// site-specific; each line names the offender where one is known.
const BROKEN_CSS_FRAGMENTS: &[&str] = &[
    r"position:(?:absolute|fixed);(?:top:-10000px;)?(?:height|width):[01]px;(?:width|height):[01]px",
    r"overflow:hidden|position:fixed;top:0px;left:0px", // GitHub
    r"opacity:0",                                       // GitHub
    r"box-sizing:border-box;float:right",               // GitHub
    r"position:static;visibility:visible;width:61px;height:20px;", // tweet button
    r"display:none !important",
    r"(?:left|top):0px;(?:left|top):0px;width:100%;height:0px", // StackOverflow
    r"position:fixed;margin:0px;border:0px;padding:0px",        // StackOverflow
    r"rgb\(255, 255, 255\);position:fixed;left:0px;width:100%", // Quora
    r"float:left;height:16px;width:14px;",                      // Quora
    r"display:table;width:100%;padding-left:88px;box-sizing:border-box", // Quora
    r"z-index:800(?:[^\x22]*(?:background|color): *rgb\(255, *255, *255\))+", // Quora
    r"filter:url\(http:\/\/gigaom\.com\/wp-content\/themes\/vip\/gigaom5\/css\/img\/post-page-blur\.svg#blur\);margin:0px;bottom:0px;-webkit-filter:blur\(5px\)",
    r"left:0px;position:absolute;right:0px;background:rgb\(255, 255, 255\)", // Gigaom
    r"bottom:0px;left:0px;position:absolute;right:0px;top:0px;background:rgba\(0, 0, 0, 0.498039\)",
    r"overflow-x:auto",   // never good
    r"overflow-y:scroll", // never good
    r#"height:12px;width:12px;background-image:url\(['"]?[^\)]*facebook\.com\/rsrc\.php[^\)]*\)"#, // Facebook
    r"background:transparent;box-sizing:border-box;width:100%;left:0px;top:0px;height:75px;position:fixed;z-index:10101;display:block;vertical-align:baseline;", // LifeHacker
];

/// Matches a `style="..."` attribute containing any broken fragment,
/// capturing the text before and after the fragment.
static STYLE_CLEANER: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r#"(?i)([ \t\r\n]style[ \t\r\n]*=[ \t\r\n]*"[^"]*)(?:{})([^"]*")"#,
        BROKEN_CSS_FRAGMENTS.join("|")
    );
    Regex::new(&pattern).expect("style cleaner pattern must compile")
});

/// Matches one embedded-media placeholder element.
static EN_MEDIA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<en-media(?:[^/]|/[^>])+/>").expect("media pattern must compile"));

/// Decode note markup from its base64 storage encoding.
pub fn decode_content(b64_content: &str) -> anyhow::Result<String> {
    let bytes = STANDARD
        .decode(b64_content.as_bytes())
        .map_err(|err| anyhow::anyhow!("content is not valid base64: {err}"))?;
    String::from_utf8(bytes).map_err(|err| anyhow::anyhow!("content is not valid UTF-8: {err}"))
}

/// Strip known clipper artifacts from inline styles, to a fixed point.
///
/// Idempotent by construction: once no fragment matches, a further pass
/// is a no-op.
pub fn scrub_styles(content: &str) -> String {
    let mut current = content.to_string();
    loop {
        let cleaned = STYLE_CLEANER.replace_all(&current, "${1}${2}").into_owned();
        if cleaned == current {
            return cleaned;
        }
        current = cleaned;
    }
}

/// Markup that replaces one media placeholder.
pub enum MediaMarkup {
    /// `<a>` link, used for PDFs.
    PdfLink { rel_path: String, filename: String },
    /// Raw body passthrough, used for mislabeled inline SVG.
    InlineSvg(String),
    /// Linked `<img>`, the general case.
    LinkedImage { rel_path: String },
}

impl MediaMarkup {
    fn render(&self, index: usize, total: usize) -> String {
        match self {
            Self::PdfLink { rel_path, filename } => format!(
                r#"<a href="{rel_path}">View PDF: {filename}</a> (Asset {index}/{total})"#
            ),
            Self::InlineSvg(body) => body.clone(),
            Self::LinkedImage { rel_path } => format!(
                r#"<a href="{rel_path}"><img src="{rel_path}" alt="Image (Asset {index}/{total})" /></a>"#
            ),
        }
    }
}

/// Replace media placeholders first-to-last, one per entry in
/// `replacements`. Each placeholder is consumed exactly once; extra
/// placeholders (a count mismatch with the resource list) stay in place
/// and show up as broken markup rather than aborting the render.
pub fn substitute_media(content: &str, replacements: &[MediaMarkup]) -> String {
    let total = replacements.len();
    let mut current = content.to_string();
    for (i, replacement) in replacements.iter().enumerate() {
        let markup = replacement.render(i + 1, total);
        current = EN_MEDIA
            .replace(&current, regex::NoExpand(&markup))
            .into_owned();
    }
    current
}

/// A body whose declared type is octet-stream but which starts with an
/// `<svg` element is vector-image content and can be inlined directly.
pub fn sniffs_as_svg(body: &[u8]) -> bool {
    let text = match std::str::from_utf8(body) {
        Ok(text) => text,
        Err(_) => return false,
    };
    let trimmed = text.trim_start();
    // Skip an XML declaration if present.
    let trimmed = match trimmed.strip_prefix("<?xml") {
        Some(rest) => rest.split_once("?>").map(|(_, tail)| tail.trim_start()).unwrap_or(""),
        None => trimmed,
    };
    // Byte-wise prefix check; indexing the str would panic on a multibyte
    // character straddling the boundary.
    trimmed
        .as_bytes()
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"<svg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_removes_broken_fragment() {
        let html = r#"<div style="color:red;opacity:0;font-size:12px">x</div>"#;
        let cleaned = scrub_styles(html);
        assert_eq!(
            cleaned,
            r#"<div style="color:red;;font-size:12px">x</div>"#
        );
    }

    #[test]
    fn test_scrub_reaches_fixed_point() {
        // Two fragments in one attribute: the first removal exposes the
        // second to the single-fragment-per-match pattern.
        let html = r#"<p style="opacity:0;overflow-x:auto">y</p>"#;
        let once = scrub_styles(html);
        assert!(!once.contains("opacity:0"));
        assert!(!once.contains("overflow-x:auto"));
        assert_eq!(scrub_styles(&once), once);
    }

    #[test]
    fn test_scrub_is_idempotent_on_clean_input() {
        let html = r#"<div style="color:blue">ok</div><p>text</p>"#;
        assert_eq!(scrub_styles(html), html);
    }

    #[test]
    fn test_scrub_case_insensitive() {
        let html = "<span STYLE=\"Opacity:0\">z</span>";
        let cleaned = scrub_styles(html);
        assert!(!cleaned.to_lowercase().contains("opacity:0"));
    }

    #[test]
    fn test_substitute_media_in_document_order() {
        let content = r#"<p>a</p><en-media hash="h1" type="image/png"/><en-media hash="h2" type="image/jpeg"/>"#;
        let out = substitute_media(
            content,
            &[
                MediaMarkup::LinkedImage {
                    rel_path: "../assets/g-0.png".into(),
                },
                MediaMarkup::LinkedImage {
                    rel_path: "../assets/g-1.jpeg".into(),
                },
            ],
        );
        assert!(!out.contains("<en-media"));
        let first = out.find("g-0.png").unwrap();
        let second = out.find("g-1.jpeg").unwrap();
        assert!(first < second);
        assert!(out.contains("(Asset 1/2)"));
        assert!(out.contains("(Asset 2/2)"));
    }

    #[test]
    fn test_substitute_media_pdf_link() {
        let content = r#"<en-media hash="h" type="application/pdf"/>"#;
        let out = substitute_media(
            content,
            &[MediaMarkup::PdfLink {
                rel_path: "../assets/g-0.pdf".into(),
                filename: "g-0.pdf".into(),
            }],
        );
        assert!(out.contains(r#"<a href="../assets/g-0.pdf">View PDF: g-0.pdf</a>"#));
    }

    #[test]
    fn test_extra_placeholders_stay_unreplaced() {
        let content = r#"<en-media hash="a" type="image/png"/><en-media hash="b" type="image/png"/>"#;
        let out = substitute_media(
            content,
            &[MediaMarkup::LinkedImage {
                rel_path: "../assets/g-0.png".into(),
            }],
        );
        assert_eq!(out.matches("<en-media").count(), 1);
    }

    #[test]
    fn test_replacement_dollar_signs_are_literal() {
        let content = r#"<en-media hash="a" type="image/png"/>"#;
        let out = substitute_media(
            content,
            &[MediaMarkup::InlineSvg("<svg>$1 ${x}</svg>".into())],
        );
        assert!(out.contains("$1 ${x}"));
    }

    #[test]
    fn test_svg_sniffing() {
        assert!(sniffs_as_svg(b"<svg xmlns=\"x\"></svg>"));
        assert!(sniffs_as_svg(b"<SVG></SVG>"));
        assert!(sniffs_as_svg(b"  <?xml version=\"1.0\"?>\n<svg/>"));
        assert!(!sniffs_as_svg(b"\x89PNG\r\n"));
        assert!(!sniffs_as_svg(b"<html></html>"));
    }

    #[test]
    fn test_svg_sniffing_multibyte_text_body() {
        // UTF-8 text whose fourth byte is mid-character must not panic.
        assert!(!sniffs_as_svg("日本語のメモ".as_bytes()));
        assert!(!sniffs_as_svg("<género>".as_bytes()));
        assert!(!sniffs_as_svg("é".as_bytes()));
    }

    #[test]
    fn test_decode_content() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode("<en-note>hi</en-note>");
        assert_eq!(decode_content(&encoded).unwrap(), "<en-note>hi</en-note>");
        assert!(decode_content("!!!not-base64!!!").is_err());
    }
}
