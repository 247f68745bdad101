//! Naming of uploaded image files.
//!
//! Stored names are `<unix millis>-<random hex>[.<ext>]`, which keeps them roughly
//! ordered by upload time while two uploads in the same millisecond still differ.

use std::{
    fmt::{Display, Formatter},
    path::Path,
};
use time::OffsetDateTime;

pub const UPLOAD_URL_PREFIX: &str = "/uploads";
pub const UPLOAD_EXTENSION_MAX_LEN: usize = 16;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct UploadName(String);

impl UploadName {
    #[must_use]
    pub fn generate(original_file_name: &str) -> Self {
        Self::generate_at(original_file_name, OffsetDateTime::now_utc(), rand::random())
    }

    #[must_use]
    pub fn generate_at(original_file_name: &str, time: OffsetDateTime, nonce: u32) -> Self {
        let millis = time.unix_timestamp_nanos() / 1_000_000;

        match extension(original_file_name) {
            Some(extension) => Self(format!("{millis}-{nonce:08x}.{extension}")),
            None => Self(format!("{millis}-{nonce:08x}")),
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    /// Path under which the static file server exposes this upload.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{UPLOAD_URL_PREFIX}/{}", self.0)
    }
}

impl Display for UploadName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extension of the client's file name, reduced to lower-case ASCII alphanumerics.
fn extension(file_name: &str) -> Option<String> {
    let extension: String = Path::new(file_name)
        .extension()?
        .to_str()?
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(UPLOAD_EXTENSION_MAX_LEN)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    (!extension.is_empty()).then_some(extension)
}
