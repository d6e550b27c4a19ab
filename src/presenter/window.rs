use log::{info, error};
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;

use crate::errors::*;
use crate::frame::{Detection, Frame, OverlayColor};

use super::{Presenter, render_overlay};

// One OpenCV window, held until the presenter is dropped
pub struct WindowPresenter {
	name: String,
	wait_ms: i32,
}

fn present_error(e: opencv::Error) -> Error {
	Error::Present(e.to_string())
}

impl WindowPresenter {
	pub fn open(name: &str, wait_ms: u64) -> Result<Self> {
		highgui::named_window(name, highgui::WINDOW_AUTOSIZE)
			.map_err(present_error)?;
		info!(window:% = name; "window opened");

		Ok(Self{
			name: name.to_string(),
			wait_ms: wait_ms.min(i32::MAX as u64) as i32,
		})
	}
}

impl Presenter for WindowPresenter {
	fn show(&mut self,
	        frame: &Frame,
	        detections: &[Detection],
	        color: OverlayColor) -> Result<()> {
		let img = render_overlay(frame, detections, color)?;

		let mut mat = Mat::new_rows_cols_with_default(
			img.height() as i32,
			img.width() as i32,
			CV_8UC3,
			Scalar::all(0.0))
			.map_err(present_error)?;

		// OpenCV wants BGR
		let dst = mat.data_bytes_mut().map_err(present_error)?;
		for (out, px) in dst.chunks_exact_mut(3).zip(img.pixels()) {
			out[0] = px.0[2];
			out[1] = px.0[1];
			out[2] = px.0[0];
		}

		highgui::imshow(&self.name, &mat).map_err(present_error)?;
		// Pump GUI events, the key itself is ignored
		highgui::wait_key(self.wait_ms).map_err(present_error)?;
		Ok(())
	}
}

impl Drop for WindowPresenter {
	fn drop(&mut self) {
		if let Err(e) = highgui::destroy_window(&self.name) {
			error!(
				window:% = self.name,
				error:% = e;
				"couldn't destroy window");
		}
	}
}
