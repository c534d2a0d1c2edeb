use serde::{Deserialize, Serialize};

/// A candidate `<img>` element found on a tracking page.
///
/// Candidates only live for the duration of one extraction pass. Dimensions
/// default to `0` when the page does not declare them, which makes the
/// size-based classifiers drop the candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCandidate {
    pub src: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
}

impl PhotoCandidate {
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            width,
            height,
            alt: None,
            class_name: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Whether the page declared both dimensions for this image.
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// What a surviving image shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    Photo,
    Signature,
}

impl PhotoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoKind::Photo => "photo",
            PhotoKind::Signature => "signature",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "photo" => Some(PhotoKind::Photo),
            "signature" => Some(PhotoKind::Signature),
            _ => None,
        }
    }
}

/// Output of the classifier: one entry per candidate that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredPhoto {
    pub url: String,
    pub kind: PhotoKind,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_thumbnail: Option<bool>,
}
