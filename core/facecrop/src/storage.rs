use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::RgbaImage;

use crate::codec::{encode_jpeg, load_thumbnail};
use crate::error::FaceCropError;

/// Directory name processed faces are stored under by default.
pub const PROCESSED_FACES_DIR: &str = "ProcessedFaces";

/// Edge length of history thumbnails in pixels.
pub const THUMBNAIL_SIZE: u32 = 48;

const SAVE_QUALITY: u8 = 100;
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A previously stored image.
#[derive(Debug, Clone)]
pub struct SavedImage {
    /// File name, including extension.
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Last modification time of the file.
    pub created: DateTime<Local>,
    /// Small preview, populated by [`FaceStore::list_with_thumbnails`].
    pub thumbnail: Option<RgbaImage>,
}

/// Filesystem-backed history of processed face images.
///
/// Images are written as JPEG into `<base>/<category>`; the category
/// defaults to [`PROCESSED_FACES_DIR`].
#[derive(Debug, Clone)]
pub struct FaceStore {
    dir: PathBuf,
}

impl FaceStore {
    /// Store under `base/ProcessedFaces`.
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            dir: base.as_ref().join(PROCESSED_FACES_DIR),
        }
    }

    /// Store under `base/<category>` instead of the default directory.
    pub fn with_category(mut self, category: &str) -> Self {
        if let Some(base) = self.dir.parent() {
            self.dir = base.join(category);
        }
        self
    }

    /// Directory images are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Encode `image` as JPEG and write it as `face_<YYYYMMDD_HHMMSS>.jpg`.
    ///
    /// Creates the directory when missing. A name already taken within the
    /// same second gets a numeric suffix.
    pub fn save(&self, image: &RgbaImage) -> Result<PathBuf, FaceCropError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            FaceCropError::StorageFailure(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let data = encode_jpeg(image, SAVE_QUALITY)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let (path, mut file) = self.create_unused(&stamp)?;

        file.write_all(&data).map_err(|e| {
            FaceCropError::StorageFailure(format!("cannot write {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "saved processed face");
        Ok(path)
    }

    /// Atomically claim the first free `face_<stamp>[_N].jpg` name.
    fn create_unused(&self, stamp: &str) -> Result<(PathBuf, File), FaceCropError> {
        let mut suffix = 0u32;
        loop {
            let name = match suffix {
                0 => format!("face_{stamp}.jpg"),
                n => format!("face_{stamp}_{n}.jpg"),
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => {
                    return Err(FaceCropError::StorageFailure(format!(
                        "cannot create {}: {e}",
                        path.display()
                    )))
                }
            }
        }
    }

    /// Stored images, newest first. A missing directory lists as empty.
    pub fn list(&self) -> Result<Vec<SavedImage>, FaceCropError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut images = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let metadata = entry.metadata()?;
            if !metadata.is_file() || !has_image_extension(&path) {
                continue;
            }
            images.push(SavedImage {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                created: DateTime::<Local>::from(metadata.modified()?),
                thumbnail: None,
            });
        }

        images.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(images)
    }

    /// [`FaceStore::list`] with a thumbnail for each image. Files that fail
    /// to decode are listed without one.
    pub fn list_with_thumbnails(&self) -> Result<Vec<SavedImage>, FaceCropError> {
        let mut images = self.list()?;
        for saved in &mut images {
            match self.thumbnail(&saved.path) {
                Ok(thumbnail) => saved.thumbnail = Some(thumbnail),
                Err(e) => {
                    tracing::warn!(path = %saved.path.display(), error = %e, "no thumbnail")
                }
            }
        }
        Ok(images)
    }

    /// A [`THUMBNAIL_SIZE`] square preview of the image at `path`.
    pub fn thumbnail(&self, path: &Path) -> Result<RgbaImage, FaceCropError> {
        load_thumbnail(path, THUMBNAIL_SIZE)
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
