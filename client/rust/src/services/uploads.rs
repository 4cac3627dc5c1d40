//! Image upload endpoints.

use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{DeleteImage, DeleteImages, ImageOptions, ImageVariant, UploadedImage};
use crate::request::FilePart;
use crate::validation::{require_any, require_non_empty};

/// Multipart field the upload endpoints read.
pub const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct UploadsService {
    api: ApiClient,
}

impl UploadsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn upload(
        &self,
        file_name: &str,
        data: Vec<u8>,
        variant: ImageVariant,
        options: &ImageOptions,
    ) -> Result<UploadedImage> {
        require_non_empty(file_name, "file name")?;
        let size = data.len();
        let image: UploadedImage = self
            .api
            .upload(
                variant.path(),
                vec![FilePart::new(FILE_FIELD, file_name, data)],
                options.fields(),
            )
            .await?;
        info!(file_name, size, url = %image.url, "image uploaded");
        Ok(image)
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        require_non_empty(key, "key")?;
        self.api
            .delete_with(
                "/file-upload/image",
                &DeleteImage {
                    key: key.to_string(),
                },
            )
            .await
    }

    pub async fn delete_many(&self, keys: &[String]) -> Result<()> {
        require_any(keys, "keys")?;
        self.api
            .delete_with(
                "/file-upload/images",
                &DeleteImages {
                    keys: keys.to_vec(),
                },
            )
            .await
    }
}
