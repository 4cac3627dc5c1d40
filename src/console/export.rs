//! Spreadsheet exports.
//!
//! The backend renders the xlsx file; the console only saves it.

use std::future::Future;
use std::path::Path;

use tracing::info;

use super::Console;
use crate::error::Result;

/// Write an export to `path`, creating parent directories. Returns bytes written.
pub async fn write_export(path: &Path, bytes: &[u8]) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(bytes.len() as u64)
}

impl Console {
    /// `label` names the export in the notification, e.g. "Orders".
    pub(super) async fn export_to<Fut>(
        &self,
        label: &str,
        download: Fut,
        path: &Path,
    ) -> Result<u64>
    where
        Fut: Future<Output = stockroom_client::Result<Vec<u8>>>,
    {
        let bytes = match download.await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.notifier.error(err.message());
                return Err(err.into());
            }
        };

        match write_export(path, &bytes).await {
            Ok(written) => {
                info!(label, path = %path.display(), bytes = written, "Export saved");
                self.notifier
                    .success(format!("{label} exported to {}", path.display()));
                Ok(written)
            }
            Err(err) => {
                self.notifier.error(err.message());
                Err(err)
            }
        }
    }
}
