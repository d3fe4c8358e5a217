use std::fmt::Display;
use std::path::{Path, PathBuf};

use axum::{
    Extension, Json,
    body::{Body, Bytes},
    extract::{Path as UrlPath, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{Stream, StreamExt};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use yatube_types::api::{Claims, MediaUploadResponse};

use crate::auth::AppState;
use crate::error::ApiError;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Post,
    Profile,
}

impl MediaKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "posts" => Some(Self::Post),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }

    /// Directory relative to the media root. Post images are bucketed by day.
    fn relative_dir(self) -> String {
        match self {
            Self::Post => chrono::Utc::now().format("img_post/%Y/%m/%d").to_string(),
            Self::Profile => "images/profile".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("upload is empty")]
    Empty,
    #[error("upload exceeds {MAX_UPLOAD_BYTES} bytes")]
    TooLarge,
    #[error("upload stream failed: {0}")]
    Stream(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// On-disk store for uploaded images.
///
/// Files are named by the SHA-256 of their contents, so re-uploading the
/// same bytes on the same day yields the same path. Contents are not
/// inspected.
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub async fn new(root: PathBuf) -> anyhow::Result<Self> {
        fs::create_dir_all(&root).await?;
        info!("Media directory: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a path returned by `save`.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Stream an upload to disk and return its path relative to the root.
    pub async fn save<S, E>(&self, kind: MediaKind, ext: &str, stream: S) -> Result<String, MediaError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let mut stream = std::pin::pin!(stream);
        let tmp_path = self.root.join(format!(".upload-{}", Uuid::new_v4()));
        let mut file = fs::File::create(&tmp_path).await?;
        let mut hasher = Sha256::new();
        let mut written = 0usize;

        let outcome: Result<(), MediaError> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| MediaError::Stream(e.to_string()))?;
                written += chunk.len();
                if written > MAX_UPLOAD_BYTES {
                    return Err(MediaError::TooLarge);
                }
                hasher.update(&chunk);
                file.write_all(&chunk).await?;
            }
            if written == 0 {
                return Err(MediaError::Empty);
            }
            file.flush().await?;
            Ok(())
        }
        .await;
        drop(file);

        if let Err(e) = outcome {
            fs::remove_file(&tmp_path).await.ok();
            return Err(e);
        }

        let dir = kind.relative_dir();
        let name = format!("{}.{}", hex::encode(hasher.finalize()), ext);
        fs::create_dir_all(self.root.join(&dir)).await?;
        let relative = format!("{dir}/{name}");
        fs::rename(&tmp_path, self.resolve(&relative)).await?;

        Ok(relative)
    }
}

fn extension_for(headers: &HeaderMap) -> &'static str {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    match content_type.split(';').next().map(str::trim) {
        Some("image/png") => "png",
        Some("image/jpeg") => "jpg",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        _ => "bin",
    }
}

/// POST /media/{kind}: raw request body is the image.
pub async fn upload(
    State(state): State<AppState>,
    UrlPath(kind): UrlPath<String>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    body: Body,
) -> Result<impl IntoResponse, ApiError> {
    let kind = MediaKind::from_slug(&kind).ok_or(ApiError::NotFound)?;
    let ext = extension_for(&headers);

    let path = state
        .media
        .save(kind, ext, body.into_data_stream())
        .await
        .map_err(|e| match e {
            MediaError::Empty => ApiError::bad_request(e.to_string()),
            MediaError::TooLarge => ApiError::PayloadTooLarge,
            MediaError::Stream(_) | MediaError::Io(_) => {
                warn!("Media upload by {} failed: {}", claims.username, e);
                ApiError::Internal(e.into())
            }
        })?;

    info!("{} uploaded {}", claims.username, path);
    Ok((StatusCode::CREATED, Json(MediaUploadResponse { path })))
}
