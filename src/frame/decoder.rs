use std::path::Path;

use opencv::core::Mat;
use opencv::imgcodecs;

use crate::error::{LoaderError, Result};

/// Turns an image file into a single channel pixel buffer.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<Mat>;
}

/// `imread` with `IMREAD_GRAYSCALE`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCvDecoder;

impl ImageDecoder for OpenCvDecoder {
    fn decode(&self, path: &Path) -> Result<Mat> {
        let Some(filename) = path.to_str() else {
            return Err(LoaderError::DecodeFailed {
                path: path.to_path_buf(),
            });
        };
        imgcodecs::imread(filename, imgcodecs::IMREAD_GRAYSCALE).map_err(|source| {
            LoaderError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use opencv::core::{Scalar, Vector, CV_8UC1, CV_8UC3};
    use opencv::prelude::*;

    use super::*;

    #[test]
    fn decodes_png_as_grayscale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        let color = Mat::new_rows_cols_with_default(4, 6, CV_8UC3, Scalar::all(90.0)).unwrap();
        assert!(imgcodecs::imwrite(path.to_str().unwrap(), &color, &Vector::new()).unwrap());

        let img = OpenCvDecoder.decode(&path).unwrap();
        assert_eq!(img.typ(), CV_8UC1);
        assert_eq!(img.rows(), 4);
        assert_eq!(img.cols(), 6);
        assert!(img.data_bytes().unwrap().iter().all(|&v| v == 90));
    }

    #[test]
    fn missing_file_decodes_to_empty_mat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.png");
        assert!(OpenCvDecoder.decode(&path).unwrap().empty());
    }
}
