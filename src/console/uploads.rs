//! Image uploads.

use std::path::Path;

use stockroom_client::model::{ImageOptions, ImageVariant, UploadedImage};
use stockroom_client::ClientError;
use tracing::debug;

use super::Console;
use crate::error::Result;

impl Console {
    /// Upload the image at `path`. Nothing is cached, so nothing is invalidated.
    pub async fn upload_image(
        &self,
        path: &Path,
        variant: ImageVariant,
        options: &ImageOptions,
    ) -> Result<UploadedImage> {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                let err = ClientError::InvalidArgument(format!(
                    "not a file path: {}",
                    path.display()
                ));
                self.notifier.error(err.message());
                return Err(err.into());
            }
        };
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(err) => {
                self.notifier
                    .error(format!("Cannot read {}: {err}", path.display()));
                return Err(err.into());
            }
        };
        debug!(file = %path.display(), size = data.len(), ?variant, "Uploading image");

        self.mutate(
            "Image uploaded",
            &[],
            self.services
                .uploads
                .upload(&file_name, data, variant, options),
        )
        .await
    }

    pub async fn delete_image(&self, key: &str) -> Result<()> {
        self.mutate("Image deleted", &[], self.services.uploads.delete(key))
            .await
    }

    pub async fn delete_images(&self, keys: &[String]) -> Result<()> {
        let message = format!("{} images deleted", keys.len());
        self.mutate(&message, &[], self.services.uploads.delete_many(keys))
            .await
    }
}
