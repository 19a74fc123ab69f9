use axum::{
    body::Bytes,
    extract::multipart::{Multipart, MultipartError},
    http::StatusCode,
};
use chrono::Utc;
use futures::{Stream, StreamExt};
use log::{debug, info, warn};
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use volunteer_network_shared::identity::RequestIdentity;

/// Form field carrying the event image
pub const IMAGE_FIELD: &str = "image";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Missing request identity for the upload destination")]
    MissingIdentity,

    #[error("Invalid request identity: '{0}'")]
    InvalidIdentity(String),

    #[error("Unexpected file field: '{0}'")]
    UnexpectedField(String),

    #[error("Only one file may be uploaded under 'image'")]
    TooManyFiles,

    #[error("Invalid file name: '{0}'")]
    InvalidFileName(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Failed to write uploaded file: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::MissingIdentity
            | UploadError::InvalidIdentity(_)
            | UploadError::UnexpectedField(_)
            | UploadError::TooManyFiles
            | UploadError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
            UploadError::Multipart(e) => e.status(),
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A file written under the upload root
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Text fields and the optional image of an event-creation form
#[derive(Debug, Default)]
pub struct EventForm {
    pub fields: Vec<(String, String)>,
    pub image: Option<StoredFile>,
}

/// `<unix millis>-<random>.<extension>`; the extension is whatever follows the
/// last `.` of the original name, or the whole name when it has none.
/// An extension that would leave the destination directory is rejected.
pub fn generate_filename(original_name: &str) -> Result<String, UploadError> {
    let extension = original_name
        .rsplit_once('.')
        .map_or(original_name, |(_, ext)| ext);
    if extension.contains(['/', '\\']) {
        return Err(UploadError::InvalidFileName(original_name.to_string()));
    }
    let suffix: u32 = rand::thread_rng().gen_range(0..=1_000_000_000);
    Ok(format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        suffix,
        extension
    ))
}

/// Writes event images to `<root>/<identity>/<generated name>`
#[derive(Debug, Clone)]
pub struct ImageUploader {
    root: PathBuf,
}

impl ImageUploader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the per-identity directory. Nothing is created on disk.
    pub fn destination(&self, identity: Option<&RequestIdentity>) -> Result<PathBuf, UploadError> {
        let identity = identity.ok_or(UploadError::MissingIdentity)?;
        if !identity.is_safe_path_segment() {
            return Err(UploadError::InvalidIdentity(identity.as_str().to_string()));
        }
        Ok(self.root.join(identity.as_str()))
    }

    /// Streams one file into `dir`. A failed write removes the partial file.
    pub async fn save<S, E>(
        &self,
        dir: &Path,
        original_name: &str,
        chunks: S,
    ) -> Result<StoredFile, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        UploadError: From<E>,
    {
        futures::pin_mut!(chunks);
        let filename = generate_filename(original_name)?;
        fs::create_dir_all(dir).await?;

        let path = dir.join(&filename);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let written = async {
            let mut size = 0u64;
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                size += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<u64, UploadError>(size)
        }
        .await;
        drop(file);

        match written {
            Ok(size) => {
                info!("Stored upload {} ({} bytes)", path.display(), size);
                Ok(StoredFile {
                    filename,
                    path,
                    size,
                })
            }
            Err(e) => {
                warn!("Upload to {} failed, removing partial file: {}", path.display(), e);
                if let Err(remove_err) = fs::remove_file(&path).await {
                    warn!("Failed to remove {}: {}", path.display(), remove_err);
                }
                Err(e)
            }
        }
    }

    /// Best-effort removal of a stored file
    pub async fn discard(&self, stored: &StoredFile) {
        match fs::remove_file(&stored.path).await {
            Ok(()) => info!("Removed orphaned upload {}", stored.path.display()),
            Err(e) => warn!("Failed to remove orphaned upload {}: {}", stored.path.display(), e),
        }
    }

    /// Reads the whole form, writing the `image` file to `dir` as it arrives.
    /// If anything fails after the image was written, the image is removed again.
    pub async fn read_event_form(
        &self,
        dir: &Path,
        mut multipart: Multipart,
    ) -> Result<EventForm, UploadError> {
        let mut form = EventForm::default();
        let result = self.read_fields(dir, &mut multipart, &mut form).await;
        if let Err(e) = result {
            if let Some(stored) = form.image.take() {
                self.discard(&stored).await;
            }
            return Err(e);
        }
        Ok(form)
    }

    async fn read_fields(
        &self,
        dir: &Path,
        multipart: &mut Multipart,
        form: &mut EventForm,
    ) -> Result<(), UploadError> {
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                // An empty file input is sent as a part with no file name
                Some(original_name) if original_name.is_empty() => {
                    let skipped = field.bytes().await?;
                    debug!("Skipping unnamed file part '{}' ({} bytes)", name, skipped.len());
                }
                Some(original_name) => {
                    if name != IMAGE_FIELD {
                        return Err(UploadError::UnexpectedField(name));
                    }
                    if form.image.is_some() {
                        return Err(UploadError::TooManyFiles);
                    }
                    debug!("Receiving image '{}'", original_name);
                    form.image = Some(self.save(dir, &original_name, field).await?);
                }
                None => {
                    let value = field.text().await?;
                    form.fields.push((name, value));
                }
            }
        }
        Ok(())
    }
}
