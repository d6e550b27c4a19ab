use std::path::PathBuf;

use log::debug;

use crate::errors::*;
use crate::frame::{Detection, Frame, OverlayColor};

use super::{Presenter, render_overlay};

// Writes each presented frame to a PNG. A "{}" in the
// path is replaced with the frame number, otherwise the
// same file is overwritten every frame.
pub struct SnapshotPresenter {
	pattern: String,
	seq: u64,
}

impl SnapshotPresenter {
	pub fn new(pattern: &str) -> Self {
		Self{
			pattern: pattern.to_string(),
			seq: 0,
		}
	}

	fn path_for(&self, seq: u64) -> PathBuf {
		PathBuf::from(self.pattern.replace("{}", &seq.to_string()))
	}
}

impl Presenter for SnapshotPresenter {
	fn show(&mut self,
	        frame: &Frame,
	        detections: &[Detection],
	        color: OverlayColor) -> Result<()> {
		let img = render_overlay(frame, detections, color)?;
		let path = self.path_for(self.seq);
		self.seq += 1;

		img.save(&path)
			.map_err(|e| Error::Present(
				format!("{}: {}", path.display(), e)))?;
		debug!(
			path:% = path.display(),
			detections = detections.len();
			"wrote snapshot");
		Ok(())
	}
}
