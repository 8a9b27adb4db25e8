//! Fixtures shared by the unit tests.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use opencv::core::{Mat, Scalar, CV_8UC1};
use opencv::prelude::*;

use crate::config::{IMAGE_DIR, MANIFEST_FILE};
use crate::error::Result;
use crate::frame::ImageDecoder;

/// Reads "images" that are text files holding a single gray level, and
/// counts every decode. A missing or empty file decodes to an empty [Mat],
/// the way `imread` does.
#[derive(Debug, Default)]
pub struct FakeDecoder {
    count: AtomicUsize,
    decoded: Mutex<Vec<PathBuf>>,
    /// slept inside every decode
    delay: Option<Duration>,
}

impl FakeDecoder {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn write_image(dir: &Path, name: &str, value: u8) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    pub fn pixel(img: &Mat) -> u8 {
        *img.at_2d::<u8>(0, 0).unwrap()
    }

    pub fn decode_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn decoded_paths(&self) -> Vec<PathBuf> {
        self.decoded.lock().unwrap().clone()
    }
}

impl ImageDecoder for FakeDecoder {
    fn decode(&self, path: &Path) -> Result<Mat> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.decoded.lock().unwrap().push(path.to_path_buf());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let value = match fs::read_to_string(path) {
            Ok(text) => match text.trim().parse::<u8>() {
                Ok(value) => value,
                Err(_) => return Ok(Mat::default()),
            },
            Err(_) => return Ok(Mat::default()),
        };
        Ok(Mat::new_rows_cols_with_default(2, 2, CV_8UC1, Scalar::all(value as f64)).unwrap())
    }
}

/// One manifest row plus the gray level of the image it points at.
pub type Row<'a> = (u64, &'a str, u8);

/// Lays out `<root>/<stream>/data.csv` and `<root>/<stream>/data/*`.
pub fn write_stream(root: &Path, stream: &str, rows: &[Row]) {
    let stream_dir = root.join(stream);
    let image_dir = stream_dir.join(IMAGE_DIR);
    fs::create_dir_all(&image_dir).unwrap();

    let mut manifest = String::from("#timestamp [ns],filename\n");
    for (timestamp, name, value) in rows {
        manifest.push_str(&format!("{},{}\n", timestamp, name));
        FakeDecoder::write_image(&image_dir, name, *value);
    }
    fs::write(stream_dir.join(MANIFEST_FILE), manifest).unwrap();
}

pub fn write_dataset(root: &Path, eye0: &[Row], eye1: &[Row]) {
    write_stream(root, "eye0", eye0);
    write_stream(root, "eye1", eye1);
}
