//! Decides whether an image URL can point at a real proof-of-delivery photo.
//!
//! Pure string/URL logic, no network access. Anything that cannot be parsed
//! is rejected rather than reported as an error.
//!
//! Policy, in order:
//! 1. `data:` URIs are accepted only when the caller allows them (legacy preset).
//! 2. Scheme must be `http` or `https`.
//! 3. Known non-photo sources are rejected outright: map tile servers,
//!    analytics pixels, scripts, stylesheets, API endpoints, favicons, logos.
//! 4. Azure Blob Storage is the primary photo store and is always accepted.
//! 5. The carrier's own domain is accepted with a permissive heuristic.
//! 6. S3, Cloudinary and a short list of CDNs are accepted.
//! 7. Any other `https` URL needs an image extension. Everything else is rejected.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".webp", ".gif", ".heic", ".heif", ".bmp", ".tif", ".tiff",
];

/// Hosts (and their subdomains) that never serve delivery photos.
const BLOCKED_HOSTS: &[&str] = &[
    // map tiles
    "tile.openstreetmap.org",
    "maps.googleapis.com",
    "maps.gstatic.com",
    "api.mapbox.com",
    "tiles.mapbox.com",
    "arcgisonline.com",
    // analytics and tracking pixels
    "google-analytics.com",
    "googletagmanager.com",
    "doubleclick.net",
    "connect.facebook.net",
    "bat.bing.com",
    "hotjar.com",
    "clarity.ms",
    "mixpanel.com",
    "segment.io",
];

const BLOCKED_HOST_PREFIXES: &[&str] = &["tile.", "tiles.", "analytics.", "pixel.", "stats."];

const BLOCKED_PATH_MARKERS: &[&str] = &["/api/", "favicon", "logo", "/tiles/", "/tile/", "/pixel"];

const BLOCKED_PATH_SUFFIXES: &[&str] = &[".js", ".css", ".ico", ".svg", ".json", ".map"];

const CDN_HOST_SUFFIXES: &[&str] = &[
    ".cloudfront.net",
    ".akamaized.net",
    ".fastly.net",
    ".imgix.net",
    ".azureedge.net",
];

const CARRIER_IMAGE_KEYWORDS: &[&str] = &[
    "photo", "image", "img", "picture", "pod", "attachment", "media", "file", "download",
];

const PAGE_SUFFIXES: &[&str] = &[".html", ".htm", ".php", ".aspx", ".asp", ".jsp"];

static GUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("guid pattern compiles")
});

static HASH_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{16,}").expect("hash pattern compiles"));

static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,}$").expect("numeric pattern compiles"));

/// Strictest policy: data URIs are never photos.
pub fn is_valid_photo_url(url: &str) -> bool {
    validate_photo_url(url, false)
}

pub fn validate_photo_url(url: &str, accept_data_uris: bool) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }

    if url.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:")) {
        return accept_data_uris && url[5..].to_ascii_lowercase().starts_with("image/");
    }

    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let path = parsed.path().to_ascii_lowercase();

    if is_blocked_host(&host) || is_blocked_path(&path) {
        return false;
    }

    if host.ends_with(".blob.core.windows.net") {
        return true;
    }

    if host == "axylog.com" || host.ends_with(".axylog.com") {
        return looks_like_carrier_image(&path);
    }

    if is_object_store(&host) || CDN_HOST_SUFFIXES.iter().any(|s| host.ends_with(s)) {
        return true;
    }

    scheme == "https" && has_image_extension(&path)
}

pub fn has_image_extension(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn host_matches(host: &str, entry: &str) -> bool {
    host == entry
        || host
            .strip_suffix(entry)
            .is_some_and(|rest| rest.ends_with('.'))
}

fn is_blocked_host(host: &str) -> bool {
    BLOCKED_HOSTS.iter().any(|entry| host_matches(host, entry))
        || BLOCKED_HOST_PREFIXES.iter().any(|p| host.starts_with(p))
}

fn is_blocked_path(path: &str) -> bool {
    BLOCKED_PATH_MARKERS.iter().any(|m| path.contains(m))
        || BLOCKED_PATH_SUFFIXES.iter().any(|s| path.ends_with(s))
}

fn is_object_store(host: &str) -> bool {
    let s3 = host.ends_with(".amazonaws.com")
        && (host.starts_with("s3.") || host.starts_with("s3-") || host.contains(".s3."));
    let cloudinary = host_matches(host, "cloudinary.com");
    s3 || cloudinary
}

/// Loose catch-all for the carrier domain. Tunable: it favours recall over
/// precision and effectively accepts anything that is not an HTML page.
fn looks_like_carrier_image(path: &str) -> bool {
    if CARRIER_IMAGE_KEYWORDS.iter().any(|k| path.contains(k)) || has_image_extension(path) {
        return true;
    }

    let identifier_segment = path.split('/').filter(|s| !s.is_empty()).any(|segment| {
        GUID_SEGMENT.is_match(segment)
            || HASH_SEGMENT.is_match(segment)
            || NUMERIC_SEGMENT.is_match(segment)
    });
    if identifier_segment {
        return true;
    }

    !PAGE_SUFFIXES.iter().any(|s| path.ends_with(s))
}
