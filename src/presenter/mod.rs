use image::{Rgb, RgbImage};

use crate::errors::*;
use crate::frame::{Detection, Frame, OverlayColor, PixelFormat};

pub mod snapshot;
#[cfg(feature = "highgui")]
pub mod window;

pub use snapshot::SnapshotPresenter;
#[cfg(feature = "highgui")]
pub use window::WindowPresenter;

// A Presenter draws the frame with its detections on a
// display surface. An empty detection list still shows
// the frame.
pub trait Presenter {
	fn show(&mut self,
	        frame: &Frame,
	        detections: &[Detection],
	        color: OverlayColor) -> Result<()>;
}

impl<T: Presenter + ?Sized> Presenter for Box<T> {
	fn show(&mut self,
	        frame: &Frame,
	        detections: &[Detection],
	        color: OverlayColor) -> Result<()> {
		(**self).show(frame, detections, color)
	}
}

// The grayscale frame as RGB with one pixel outlines
// for each detection, clipped to the frame.
pub fn render_overlay(frame: &Frame,
	                  detections: &[Detection],
	                  color: OverlayColor) -> Result<RgbImage> {
	if frame.format() != PixelFormat::Gray8 {
		return Err(Error::Present(
			format!("expected a grayscale frame, got {:?}", frame.format())));
	}

	let (width, height) = (frame.width(), frame.height());
	let data = frame.data();
	let mut img = RgbImage::from_fn(width, height, |x, y| {
		let v = data[(y * width + x) as usize];
		Rgb([v, v, v])
	});

	let pixel = Rgb([color.0, color.1, color.2]);
	for d in detections {
		draw_rect(&mut img, d, pixel);
	}
	Ok(img)
}

fn draw_rect(img: &mut RgbImage, d: &Detection, pixel: Rgb<u8>) {
	let (w, h) = (img.width() as i32, img.height() as i32);
	if w == 0 || h == 0 {
		return;
	}

	// Entirely off the frame
	if d.right < 0 || d.bottom < 0 || d.left >= w || d.top >= h {
		return;
	}

	let left = d.left.max(0);
	let right = d.right.min(w - 1);
	let top = d.top.max(0);
	let bottom = d.bottom.min(h - 1);

	for x in left..=right {
		if d.top >= 0 {
			img.put_pixel(x as u32, top as u32, pixel);
		}
		if d.bottom < h {
			img.put_pixel(x as u32, bottom as u32, pixel);
		}
	}

	for y in top..=bottom {
		if d.left >= 0 {
			img.put_pixel(left as u32, y as u32, pixel);
		}
		if d.right < w {
			img.put_pixel(right as u32, y as u32, pixel);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const RED: OverlayColor = OverlayColor(255, 0, 0);

	fn gray(width: u32, height: u32, v: u8) -> Frame {
		Frame::new(width, height, PixelFormat::Gray8,
			vec![v; (width * height) as usize]).unwrap()
	}

	#[test]
	fn no_detections_renders_plain_frame() {
		let img = render_overlay(&gray(8, 6, 42), &[], RED).unwrap();
		assert_eq!(img.dimensions(), (8, 6));
		assert!(img.pixels().all(|p| *p == Rgb([42, 42, 42])));
	}

	#[test]
	fn outline_only() {
		let d = Detection::from_bbox(2, 1, 4, 3, 1.0);
		let img = render_overlay(&gray(8, 6, 0), &[d], RED).unwrap();

		let red = Rgb([255, 0, 0]);
		// Corners and edges
		assert_eq!(*img.get_pixel(2, 1), red);
		assert_eq!(*img.get_pixel(5, 1), red);
		assert_eq!(*img.get_pixel(2, 3), red);
		assert_eq!(*img.get_pixel(5, 3), red);
		assert_eq!(*img.get_pixel(4, 1), red);
		// Inside and outside untouched
		assert_eq!(*img.get_pixel(3, 2), Rgb([0, 0, 0]));
		assert_eq!(*img.get_pixel(6, 2), Rgb([0, 0, 0]));

		let painted = img.pixels().filter(|p| **p == red).count();
		assert_eq!(painted, 10);
	}

	#[test]
	fn clips_to_frame() {
		let d = Detection{left: -3, top: -3, right: 2, bottom: 2, score: 1.0};
		let img = render_overlay(&gray(6, 6, 0), &[d], RED).unwrap();

		let red = Rgb([255, 0, 0]);
		// Only the right and bottom edges are on the frame
		assert_eq!(*img.get_pixel(2, 0), red);
		assert_eq!(*img.get_pixel(0, 2), red);
		assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
	}

	#[test]
	fn skips_rectangles_off_the_frame() {
		let d = Detection{left: 10, top: 10, right: 20, bottom: 20, score: 1.0};
		let img = render_overlay(&gray(6, 6, 7), &[d], RED).unwrap();
		assert!(img.pixels().all(|p| *p == Rgb([7, 7, 7])));
	}

	#[test]
	fn rejects_colour_frames() {
		let rgb = Frame::new(1, 1, PixelFormat::Rgb8, vec![1, 2, 3]).unwrap();
		let err = render_overlay(&rgb, &[], RED).unwrap_err();
		assert_eq!(err.kind(), "present_error");
	}
}
