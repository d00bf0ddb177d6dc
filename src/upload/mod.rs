mod image_kind;

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use axum::{
    extract::multipart::{Field, Multipart, MultipartError, MultipartRejection},
    http::StatusCode,
};
use thiserror::Error;
use time::OffsetDateTime;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};

use image_kind::ImageKind;

/// The only multipart field allowed to carry a file.
pub const IMAGE_FIELD: &str = "image";

/// Sent by clients that don't know the file type; the extension decides then.
const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Malformed(String),
    #[error("File too large (limit is {limit} bytes)")]
    FileTooLarge { limit: u64 },
    #[error("Unsupported file type, expected one of: {allowed}")]
    UnsupportedType { allowed: String },
    #[error("Unexpected field `{0}`")]
    UnexpectedField(String),
    #[error("Could not store uploaded file: {0}")]
    Storage(#[from] io::Error),
}

impl UploadError {
    /// Storage failures are on our side, everything else is the client's fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Storage(_))
    }
}

impl From<MultipartError> for UploadError {
    fn from(value: MultipartError) -> Self {
        UploadError::Malformed(value.body_text())
    }
}

impl From<MultipartRejection> for UploadError {
    fn from(value: MultipartRejection) -> Self {
        UploadError::Malformed(value.body_text())
    }
}

/// An image written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    pub path: PathBuf,
}

impl StagedImage {
    /// The value stored in `contact_form.image_path`.
    pub fn stored_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Text fields of a multipart request plus the staged image, if any.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub image: Option<StagedImage>,
}

pub struct UploadHandler {
    dir: PathBuf,
    max_file_bytes: u64,
}

impl UploadHandler {
    pub fn new(dir: impl Into<PathBuf>, max_file_bytes: u64) -> UploadHandler {
        UploadHandler {
            dir: dir.into(),
            max_file_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Reads every part of `multipart`, staging the `image` file on disk.
    ///
    /// On error nothing is left in the upload directory.
    #[tracing::instrument(skip_all)]
    pub async fn accept(&self, mut multipart: Multipart) -> Result<MultipartForm, UploadError> {
        let mut form = MultipartForm::default();

        match self.read_parts(&mut multipart, &mut form).await {
            Ok(()) => Ok(form),
            Err(err) => {
                if let Some(image) = form.image.take() {
                    self.discard(&image).await;
                }
                Err(err)
            }
        }
    }

    async fn read_parts(
        &self,
        multipart: &mut Multipart,
        form: &mut MultipartForm,
    ) -> Result<(), UploadError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| self.read_error(err))?
        {
            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field.file_name().map(str::to_owned);

            match file_name {
                None => {
                    let value = field.text().await.map_err(|err| self.read_error(err))?;
                    form.fields.insert(name, value);
                }

                // Browsers send an empty file part when nothing was picked
                Some(file_name) if file_name.is_empty() => {
                    debug!("Skipping empty file part `{name}`");
                }

                Some(_) if name != IMAGE_FIELD || form.image.is_some() => {
                    return Err(UploadError::UnexpectedField(name));
                }

                Some(file_name) => {
                    form.image = Some(self.stage_image(field, &file_name).await?);
                }
            }
        }

        Ok(())
    }

    async fn stage_image(
        &self,
        mut field: Field<'_>,
        file_name: &str,
    ) -> Result<StagedImage, UploadError> {
        let extension = self.check_image_type(file_name, field.content_type())?;
        let path = self.dir.join(generate_file_name(&extension));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        match self.copy_field(&mut field, &mut file).await {
            Ok(written) => {
                info!("Stored {written} byte upload `{file_name}` as {}", path.display());
                Ok(StagedImage { path })
            }
            Err(err) => {
                drop(file);
                remove_quietly(&path).await;
                Err(err)
            }
        }
    }

    /// Returns the lowercased extension to store the file under.
    fn check_image_type(
        &self,
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, UploadError> {
        let unsupported = || UploadError::UnsupportedType {
            allowed: ImageKind::allowed_list(),
        };

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(unsupported)?;
        let kind = ImageKind::from_extension(&extension).ok_or_else(unsupported)?;

        let declared = content_type.filter(|content_type| {
            let essence = content_type.split(';').next().unwrap_or_default().trim();
            !essence.eq_ignore_ascii_case(GENERIC_CONTENT_TYPE)
        });

        if let Some(content_type) = declared {
            if ImageKind::from_content_type(content_type) != Some(kind) {
                return Err(unsupported());
            }
        }

        Ok(extension)
    }

    async fn copy_field(
        &self,
        field: &mut Field<'_>,
        file: &mut fs::File,
    ) -> Result<u64, UploadError> {
        let mut written: u64 = 0;

        while let Some(chunk) = field.chunk().await.map_err(|err| self.read_error(err))? {
            written += chunk.len() as u64;
            if written > self.max_file_bytes {
                return Err(UploadError::FileTooLarge {
                    limit: self.max_file_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(written)
    }

    /// A body cut off by the request size limit means the image was too big.
    fn read_error(&self, err: MultipartError) -> UploadError {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::FileTooLarge {
                limit: self.max_file_bytes,
            }
        } else {
            UploadError::from(err)
        }
    }

    /// Removes a staged image whose submission was rejected.
    pub async fn discard(&self, image: &StagedImage) {
        debug!("Discarding staged upload {}", image.path.display());
        remove_quietly(&image.path).await;
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        warn!("Could not remove upload {}: {err}", path.display());
    }
}

fn generate_file_name(extension: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("{millis}-{:08x}.{extension}", rand::random::<u32>())
}
