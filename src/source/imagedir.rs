use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, debug};

use crate::errors::*;
use crate::frame::{Frame, PixelFormat};

use super::CaptureSource;

// Batch mode, every file in a directory in name order
pub struct ImageDir {
	dir: PathBuf,
	pending: VecDeque<PathBuf>,
}

impl ImageDir {
	pub fn open(dir: &Path) -> Result<Self> {
		let entries = fs::read_dir(dir)
			.map_err(|e| Error::ImageDirUnavailable{
				dir: dir.display().to_string(),
				reason: e.to_string(),
			})?;

		let mut paths = vec![];
		for entry in entries {
			let path = entry?.path();
			if path.is_file() {
				paths.push(path);
			}
		}
		paths.sort();

		info!(
			dir:% = dir.display(),
			images = paths.len();
			"loaded image list");

		Ok(Self{
			dir: dir.to_path_buf(),
			pending: paths.into(),
		})
	}

	pub fn remaining(&self) -> usize {
		self.pending.len()
	}
}

impl CaptureSource for ImageDir {
	fn next_frame(&mut self) -> Result<Option<Frame>> {
		let path = match self.pending.pop_front() {
			Some(path) => path,
			None => return Ok(None),
		};

		debug!(
			path:% = path.display(),
			remaining = self.remaining();
			"decoding image");
		let img = image::open(&path)
			.map_err(|e| Error::Capture(
				format!("{}: {}", path.display(), e)))?
			.to_rgb8();

		let (width, height) = img.dimensions();
		let frame = Frame::new(width, height, PixelFormat::Rgb8,
			img.into_raw())?;
		Ok(Some(frame))
	}

	fn describe(&self) -> String {
		self.dir.display().to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{Rgb, RgbImage};

	fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
		let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
		img.save(dir.join(name)).unwrap();
	}

	#[test]
	fn yields_images_in_name_order() {
		let dir = tempfile::tempdir().unwrap();
		write_png(dir.path(), "b.png", 4, 2);
		write_png(dir.path(), "a.png", 2, 6);
		fs::create_dir(dir.path().join("subdir")).unwrap();

		let mut source = ImageDir::open(dir.path()).unwrap();
		assert_eq!(source.remaining(), 2);

		let first = source.next_frame().unwrap().unwrap();
		assert_eq!((first.width(), first.height()), (2, 6));
		assert_eq!(first.format(), PixelFormat::Rgb8);

		let second = source.next_frame().unwrap().unwrap();
		assert_eq!((second.width(), second.height()), (4, 2));

		assert!(source.next_frame().unwrap().is_none());
	}

	#[test]
	fn missing_dir_is_unavailable() {
		let dir = tempfile::tempdir().unwrap();
		let err = ImageDir::open(&dir.path().join("gone"))
			.err()
			.unwrap();
		assert_eq!(err.kind(), "image_dir_unavailable");
		assert!(err.to_string().contains("gone"));
	}

	#[test]
	fn undecodable_file_is_a_capture_error() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

		let mut source = ImageDir::open(dir.path()).unwrap();
		let err = source.next_frame().unwrap_err();
		assert_eq!(err.kind(), "capture_error");
		assert!(err.to_string().contains("notes.txt"));
	}
}
