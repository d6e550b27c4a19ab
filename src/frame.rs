use crate::errors::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
	Gray8,
	Rgb8,
	// Packed 4:2:2, Y0 U Y1 V
	Yuyv,
}

impl PixelFormat {
	pub fn bytes_per_pixel(self) -> usize {
		match self {
			PixelFormat::Gray8 => 1,
			PixelFormat::Rgb8 => 3,
			PixelFormat::Yuyv => 2,
		}
	}
}

// A Frame is owned by the loop iteration that captured it
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	width: u32,
	height: u32,
	format: PixelFormat,
	data: Vec<u8>,
}

impl Frame {
	pub fn new(width: u32,
	           height: u32,
	           format: PixelFormat,
	           data: Vec<u8>) -> Result<Self> {
		let expected = width as usize * height as usize
			* format.bytes_per_pixel();

		// YUYV pairs pixels so the width has to be even
		let odd_yuyv = format == PixelFormat::Yuyv && width % 2 != 0;

		if data.len() != expected || odd_yuyv {
			return Err(Error::MalformedFrame{
				expected: expected,
				actual: data.len(),
			});
		}

		Ok(Self{
			width: width,
			height: height,
			format: format,
			data: data,
		})
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn format(&self) -> PixelFormat {
		self.format
	}

	#[cfg(test)]
	pub fn channels(&self) -> usize {
		match self.format {
			PixelFormat::Gray8 => 1,
			PixelFormat::Rgb8 | PixelFormat::Yuyv => 3,
		}
	}

	pub fn data(&self) -> &[u8] {
		&self.data
	}
}

// An inclusive rectangle around one face, in pixels.
// Only meaningful for the frame it was detected in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Detection {
	pub left: i32,
	pub top: i32,
	pub right: i32,
	pub bottom: i32,
	pub score: f64,
}

impl Detection {
	pub fn from_bbox(x: i32, y: i32, width: u32, height: u32,
	                 score: f64) -> Self {
		Self{
			left: x,
			top: y,
			right: x + width.max(1) as i32 - 1,
			bottom: y + height.max(1) as i32 - 1,
			score: score,
		}
	}

	#[cfg(test)]
	pub fn width(&self) -> u32 {
		(self.right - self.left + 1).max(0) as u32
	}

	#[cfg(test)]
	pub fn height(&self) -> u32 {
		(self.bottom - self.top + 1).max(0) as u32
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlayColor(pub u8, pub u8, pub u8);

impl Default for OverlayColor {
	fn default() -> Self {
		OverlayColor(255, 0, 0)
	}
}

impl From<[u8; 3]> for OverlayColor {
	fn from(rgb: [u8; 3]) -> Self {
		OverlayColor(rgb[0], rgb[1], rgb[2])
	}
}

// Single channel intensity, same dimensions as the input
pub fn to_grayscale(frame: &Frame) -> Frame {
	let data = match frame.format {
		PixelFormat::Gray8 => frame.data.clone(),
		PixelFormat::Rgb8 => frame.data
			.chunks_exact(3)
			.map(|px| luma(px[0], px[1], px[2]))
			.collect(),
		// Every other byte is a Y sample
		PixelFormat::Yuyv => frame.data
			.iter()
			.step_by(2)
			.copied()
			.collect(),
	};

	Frame{
		width: frame.width,
		height: frame.height,
		format: PixelFormat::Gray8,
		data: data,
	}
}

// BT.601 weights in 8 bit fixed point
fn luma(r: u8, g: u8, b: u8) -> u8 {
	((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8) as u8
}
