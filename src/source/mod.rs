use crate::errors::*;
use crate::frame::Frame;

pub mod webcam;
pub mod imagedir;

pub use webcam::Webcam;
pub use imagedir::ImageDir;

// A CaptureSource hands out one frame at a time.
// Ok(None) means the source is exhausted, a live
// camera never returns it.
pub trait CaptureSource {
	fn next_frame(&mut self) -> Result<Option<Frame>>;

	fn describe(&self) -> String;
}

impl<T: CaptureSource + ?Sized> CaptureSource for Box<T> {
	fn next_frame(&mut self) -> Result<Option<Frame>> {
		(**self).next_frame()
	}

	fn describe(&self) -> String {
		(**self).describe()
	}
}
