//! Image upload shapes.

use serde::{Deserialize, Serialize};

/// Processing applied by the upload endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageVariant {
    #[default]
    Original,
    Compressed,
    Resized,
    Webp,
    Advanced,
}

impl ImageVariant {
    pub fn path(self) -> &'static str {
        match self {
            ImageVariant::Original => "/file-upload/image",
            ImageVariant::Compressed => "/file-upload/image/compressed",
            ImageVariant::Resized => "/file-upload/image/resized",
            ImageVariant::Webp => "/file-upload/image/webp",
            ImageVariant::Advanced => "/file-upload/image/advanced",
        }
    }
}

impl std::str::FromStr for ImageVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(ImageVariant::Original),
            "compressed" => Ok(ImageVariant::Compressed),
            "resized" => Ok(ImageVariant::Resized),
            "webp" => Ok(ImageVariant::Webp),
            "advanced" => Ok(ImageVariant::Advanced),
            other => Err(format!("unknown image variant: {other}")),
        }
    }
}

/// Optional processing parameters sent as extra form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
}

impl ImageOptions {
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(width) = self.width {
            fields.push(("width".to_string(), width.to_string()));
        }
        if let Some(height) = self.height {
            fields.push(("height".to_string(), height.to_string()));
        }
        if let Some(quality) = self.quality {
            fields.push(("quality".to_string(), quality.to_string()));
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteImage {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteImages {
    pub keys: Vec<String>,
}
