//! Disk storage for uploaded images.
//!
//! Files land flat in one directory which the static file server exposes under
//! [`UPLOAD_URL_PREFIX`](agora_common::upload::UPLOAD_URL_PREFIX).

use agora_common::upload::UploadName;
use axum::body::Bytes;
use futures_util::{Stream, TryStreamExt};
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
    pin::pin,
};
use thiserror::Error;
use tokio::{
    fs::{self, File, OpenOptions},
    io::{AsyncWriteExt, BufWriter},
};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

/// Attempts at finding an unused file name before giving up.
pub const NAME_ATTEMPTS: usize = 8;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Writing upload failed: {0}")]
    Io(#[from] io::Error),
    #[error("No free upload name found after {NAME_ATTEMPTS} attempts")]
    NameCollision,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub async fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;

        Ok(Self { dir })
    }

    /// Streams `body` into a freshly named file. Existing files are never overwritten.
    pub async fn store<S, E>(
        &self,
        original_file_name: &str,
        body: S,
    ) -> Result<UploadName, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (name, path, file) = self
            .create_file(|| UploadName::generate(original_file_name))
            .await?;

        let mut reader = pin!(StreamReader::new(body.map_err(io::Error::other)));
        let mut writer = BufWriter::new(file);
        let written = match tokio::io::copy(&mut reader, &mut writer).await {
            Ok(written) => writer.flush().await.map(|()| written),
            Err(err) => Err(err),
        };
        drop(writer);

        match written {
            Ok(bytes) => {
                debug!(%name, bytes, "Stored upload");
                Ok(name)
            }
            Err(err) => {
                if let Err(remove_err) = fs::remove_file(&path).await {
                    warn!(%name, %remove_err, "Could not remove partial upload");
                }
                Err(err.into())
            }
        }
    }

    /// Opens a new file under the first name from `next_name` that is not taken yet.
    async fn create_file(
        &self,
        mut next_name: impl FnMut() -> UploadName,
    ) -> Result<(UploadName, PathBuf, File), UploadError> {
        for _ in 0..NAME_ATTEMPTS {
            let name = next_name();
            let path = self.dir.join(name.get());

            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match opened {
                Ok(file) => return Ok((name, path, file)),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    debug!(%name, "Upload name taken, generating another");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(UploadError::NameCollision)
    }
}
