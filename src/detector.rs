use std::fs::File;

use log::info;
use rustface::{Detector, ImageData};

use crate::errors::*;
use crate::facecam::Facecam;
use crate::frame::{Detection, Frame, PixelFormat};

// Given a grayscale frame, return the rectangles
// believed to bound faces. Detectors may keep state
// between frames, hence &mut self.
pub trait FaceDetector {
	fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;
}

// SeetaFace frontal detector (funnel cascade over an image pyramid)
pub struct SeetaDetector {
	inner: Box<dyn Detector>,
}

impl SeetaDetector {
	pub fn new(fc: &Facecam) -> Result<Self> {
		let config = &fc.config;
		info!(model:% = config.model_path; "loading face model");

		let file = File::open(&config.model_path)
			.map_err(|e| Error::Detector(
				format!("couldn't open model {}: {}", config.model_path, e)))?;
		let model = rustface::read_model(file)
			.map_err(|e| Error::Detector(
				format!("couldn't read model {}: {}", config.model_path, e)))?;

		let mut inner = rustface::create_detector_with_model(model);
		inner.set_min_face_size(config.min_face_size);
		inner.set_score_thresh(config.score_thresh);
		inner.set_pyramid_scale_factor(config.pyramid_scale_factor);
		inner.set_slide_window_step(
			config.slide_window_step.0,
			config.slide_window_step.1);

		Ok(Self{
			inner: inner,
		})
	}
}

impl FaceDetector for SeetaDetector {
	fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
		if frame.format() != PixelFormat::Gray8 {
			return Err(Error::Detector(
				format!("expected a grayscale frame, got {:?}", frame.format())));
		}

		let image = ImageData::new(frame.data(), frame.width(), frame.height());
		let faces = self.inner.detect(&image);

		Ok(faces.iter()
			.map(|face| {
				let bbox = face.bbox();
				Detection::from_bbox(bbox.x(), bbox.y(),
					bbox.width(), bbox.height(), face.score())
			})
			.collect())
	}
}
