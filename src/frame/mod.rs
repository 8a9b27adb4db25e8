//! 单帧图像句柄
//!
//! A [FrameHandle] remembers where an image lives and hands out the decoded
//! grayscale [Mat], either decoded up front ([LoadMode::Eager]) or on first
//! access ([LoadMode::Lazy]).
mod decoder;

pub use decoder::{ImageDecoder, OpenCvDecoder};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use opencv::core::Mat;
use opencv::prelude::*;

use crate::config::LoadMode;
use crate::error::{LoaderError, Result};

pub struct FrameHandle {
    path: PathBuf,
    image: Image,
}

enum Image {
    Eager(Mat),
    Lazy {
        decoder: Arc<dyn ImageDecoder>,
        cell: OnceLock<Mat>,
        /// serializes the first decode so concurrent readers decode once
        init: Mutex<()>,
    },
}

impl FrameHandle {
    /// Eager handles decode here and fail on an unreadable image, so a bad
    /// path never survives into a built table.
    pub fn new(
        path: impl Into<PathBuf>,
        mode: LoadMode,
        decoder: &Arc<dyn ImageDecoder>,
    ) -> Result<Self> {
        let path = path.into();
        let image = match mode {
            LoadMode::Eager => Image::Eager(decode_non_empty(decoder.as_ref(), &path)?),
            LoadMode::Lazy => Image::Lazy {
                decoder: Arc::clone(decoder),
                cell: OnceLock::new(),
                init: Mutex::new(()),
            },
        };
        Ok(Self { path, image })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LoadMode {
        match self.image {
            Image::Eager(_) => LoadMode::Eager,
            Image::Lazy { .. } => LoadMode::Lazy,
        }
    }

    pub fn is_loaded(&self) -> bool {
        match &self.image {
            Image::Eager(_) => true,
            Image::Lazy { cell, .. } => cell.get().is_some(),
        }
    }

    /// The decoded image. Never empty.
    pub fn load(&self) -> Result<&Mat> {
        match &self.image {
            Image::Eager(img) => Ok(img),
            Image::Lazy {
                decoder,
                cell,
                init,
            } => {
                if let Some(img) = cell.get() {
                    return Ok(img);
                }
                let _guard = init.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(img) = cell.get() {
                    return Ok(img);
                }
                let img = decode_non_empty(decoder.as_ref(), &self.path)?;
                Ok(cell.get_or_init(|| img))
            }
        }
    }
}

impl std::fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHandle")
            .field("path", &self.path)
            .field("mode", &self.mode())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

fn decode_non_empty(decoder: &dyn ImageDecoder, path: &Path) -> Result<Mat> {
    let img = decoder.decode(path)?;
    // imread 读取失败时返回空 Mat, 不会报错
    if img.empty() {
        return Err(LoaderError::DecodeFailed {
            path: path.to_path_buf(),
        });
    }
    Ok(img)
}
