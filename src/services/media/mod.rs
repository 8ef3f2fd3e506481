//! Clinical image uploads.

use std::path::Path;

use chrono::Local;
use uuid::Uuid;

use crate::services::backend::Backend;

/// Bucket holding every clinical image
pub const IMAGE_BUCKET: &str = "order_images";
/// Folder inside the bucket
pub const MEDIA_FOLDER: &str = "clinical_media";

const TOKEN_LEN: usize = 5;

/// Storage path for an upload: `clinical_media/{millis}_{token}.{ext}`.
pub fn media_path(file_name: &str, millis: i64, token: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string());
    format!("{}/{}_{}.{}", MEDIA_FOLDER, millis, token, ext)
}

fn random_token() -> String {
    Uuid::new_v4().simple().to_string()[..TOKEN_LEN].to_string()
}

pub struct MediaService<'a> {
    backend: &'a dyn Backend,
}

impl<'a> MediaService<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// Store an image and return its public URL.
    ///
    /// Failures are logged and give `None`; the caller just skips the image.
    pub fn upload_image(&self, file_name: &str, bytes: &[u8]) -> Option<String> {
        let path = media_path(file_name, Local::now().timestamp_millis(), &random_token());
        match self.backend.upload(IMAGE_BUCKET, &path, bytes) {
            Ok(()) => {
                log::info!("Uploaded {} as {}", file_name, path);
                Some(self.backend.public_url(IMAGE_BUCKET, &path))
            }
            Err(err) => {
                log::error!("Image upload failed for {}: {:#}", file_name, err);
                None
            }
        }
    }
}
