//! Turns a tracking page into `PhotoCandidate`s and derives tracking tokens.
//!
//! This is a tag scanner, not an HTML parser: it only needs the attributes of
//! `<img>` elements and tolerates broken markup.

use common::model::photo::PhotoCandidate;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*)>").expect("img pattern compiles"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute pattern compiles")
});

/// Plain or `px` pixel counts. Percentages and other units are unknown sizes.
static PIXELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+)(?:\.\d+)?\s*(?:px)?\s*$").expect("pixels pattern compiles")
});

/// Lazy loaders keep the real image here and a placeholder in `src`.
const LAZY_SOURCE_ATTRIBUTES: &[&str] = &["data-src", "data-original", "data-lazy-src"];

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn attributes(tag_body: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(tag_body)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            (caps[1].to_ascii_lowercase(), value)
        })
        .collect()
}

fn parse_dimension(value: Option<&String>) -> Option<u32> {
    let caps = PIXELS.captures(value?)?;
    caps[1].parse().ok()
}

/// `width: 768px` inside an inline style.
fn style_dimension(style: Option<&String>, property: &str) -> Option<u32> {
    let style = style?.to_ascii_lowercase();
    style.split(';').find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        if name.trim() != property {
            return None;
        }
        let value = value.trim();
        if !value.ends_with("px") {
            return None;
        }
        value.trim_end_matches("px").trim().parse::<f64>().ok().map(|v| v as u32)
    })
}

fn resolve(src: &str, base: Option<&Url>) -> String {
    if src.starts_with("data:") {
        return src.to_string();
    }
    match base.and_then(|base| base.join(src).ok()) {
        Some(resolved) => resolved.to_string(),
        None => src.to_string(),
    }
}

/// Every `<img>` on the page, in document order. Relative sources are
/// resolved against `page_url` when it is given and parseable.
pub fn scan_candidates(html: &str, page_url: Option<&str>) -> Vec<PhotoCandidate> {
    let base = page_url.and_then(|u| Url::parse(u).ok());

    IMG_TAG
        .captures_iter(html)
        .filter_map(|caps| {
            let attrs = attributes(&caps[1]);
            let src = LAZY_SOURCE_ATTRIBUTES
                .iter()
                .chain(std::iter::once(&"src"))
                .filter_map(|name| attrs.get(*name))
                .map(|value| value.trim())
                .find(|value| !value.is_empty())?;

            let style = attrs.get("style");
            let width = parse_dimension(attrs.get("width"))
                .or_else(|| style_dimension(style, "width"))
                .unwrap_or(0);
            let height = parse_dimension(attrs.get("height"))
                .or_else(|| style_dimension(style, "height"))
                .unwrap_or(0);

            Some(PhotoCandidate {
                src: resolve(src, base.as_ref()),
                width,
                height,
                alt: attrs.get("alt").cloned(),
                class_name: attrs.get("class").cloned(),
            })
        })
        .collect()
}

/// Final non-empty path segment of a tracking URL, or the input itself when it
/// already is a bare token.
pub fn tracking_token(tracking: &str) -> Option<String> {
    let tracking = tracking.trim();
    if tracking.is_empty() {
        return None;
    }

    match Url::parse(tracking) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .last()
            .map(str::to_string),
        Ok(_) => None,
        Err(_) if tracking.contains('/') || tracking.contains(char::is_whitespace) => None,
        Err(_) => Some(tracking.to_string()),
    }
}

pub fn tracking_page_url(base_url: &str, token: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), token)
}
