use log::{info, warn, error};
use rscam::{Camera, ResolutionInfo};

use crate::errors::*;
use crate::facecam::Facecam;
use crate::frame::{Frame, PixelFormat};

use super::CaptureSource;

const FORMAT: &[u8] = b"YUYV";
const WARMUP_FRAMES: usize = 3;

// Webcam holds the device for as long as it lives.
// Dropping it stops the stream and closes the device
// whichever way the loop ended.
pub struct Webcam {
	camera: Camera,
	device: String,
}

impl Webcam {
	pub fn open(fc: &Facecam) -> Result<Self> {
		let device = fc.config.device_path();
		let unavailable = |reason: String| Error::DeviceUnavailable{
			device: device.clone(),
			reason: reason,
		};

		info!(
			device:% = device,
			interval:? = fc.config.interval,
			resolution:? = fc.config.resolution;
			"opening camera");
		let mut camera = Camera::new(&device)
			.map_err(|e| unavailable(e.to_string()))?;

		let resolution = configure(&mut camera, fc)
			.map_err(|e| unavailable(e.to_string()))?;

		// Check it's working
		for _ in 0..WARMUP_FRAMES {
			camera.capture()
				.map_err(|e| Error::Capture(e.to_string()))?;
		}

		info!(
			device:% = device,
			resolution:? = resolution;
			"capture started");

		Ok(Self{
			camera: camera,
			device: device,
		})
	}
}

// Best effort. Drivers reject resolutions they don't
// support, in which case we take the closest one they do.
fn configure(camera: &mut Camera, fc: &Facecam)
	-> std::result::Result<(u32, u32), rscam::Error> {
	let wanted = fc.config.resolution;

	match start(camera, fc, wanted) {
		Err(rscam::Error::BadResolution) => {},
		other => return other.map(|_| wanted),
	}

	let supported = camera.resolutions(FORMAT)?;
	let fallback = closest_resolution(&supported, wanted)
		.ok_or(rscam::Error::BadResolution)?;

	warn!(
		requested:? = wanted,
		using:? = fallback;
		"resolution not supported by device");
	start(camera, fc, fallback)?;
	Ok(fallback)
}

fn start(camera: &mut Camera, fc: &Facecam, resolution: (u32, u32))
	-> std::result::Result<(), rscam::Error> {
	camera.start(&rscam::Config{
		interval: fc.config.interval,
		resolution: resolution,
		format: FORMAT,
		nbuffers: 2,
		field: rscam::FIELD_NONE,
	})
}

fn closest_resolution(info: &ResolutionInfo, wanted: (u32, u32))
	-> Option<(u32, u32)> {
	match info {
		ResolutionInfo::Discretes(sizes) => {
			let area = wanted.0 as i64 * wanted.1 as i64;
			sizes.iter()
				.copied()
				.filter(|&(w, _)| w % 2 == 0)
				.min_by_key(|&(w, h)| (w as i64 * h as i64 - area).abs())
		},
		ResolutionInfo::Stepwise{min, max, step} => {
			let width = snap(wanted.0, min.0, max.0, step.0);
			let step_w = step.0.max(1);

			// YUYV needs an even width. With an odd step the
			// neighbouring grid points flip parity, with an even
			// step and an odd minimum there is no even width at all.
			let width = [width, width + step_w, width.saturating_sub(step_w)]
				.iter()
				.copied()
				.find(|&w| w % 2 == 0 && w >= min.0 && w <= max.0)?;

			Some((width, snap(wanted.1, min.1, max.1, step.1)))
		},
	}
}

// Clamp into [lo, hi] and round down onto the step grid
fn snap(v: u32, lo: u32, hi: u32, step: u32) -> u32 {
	let v = v.max(lo).min(hi);
	let step = step.max(1);
	lo + (v - lo) / step * step
}

impl CaptureSource for Webcam {
	fn next_frame(&mut self) -> Result<Option<Frame>> {
		let raw = self.camera.capture()
			.map_err(|e| Error::Capture(e.to_string()))?;

		let (width, height) = raw.resolution;
		let frame = Frame::new(width, height, PixelFormat::Yuyv,
			raw[..].to_vec())?;
		Ok(Some(frame))
	}

	fn describe(&self) -> String {
		self.device.clone()
	}
}

impl Drop for Webcam {
	fn drop(&mut self) {
		// The device may already have gone away,
		// log it and carry on closing.
		if let Err(e) = self.camera.stop() {
			error!(
				device:% = self.device,
				error:% = e;
				"couldn't stop camera");
		}
		info!(device:% = self.device; "camera released");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn closest_discrete_by_area() {
		let info = ResolutionInfo::Discretes(vec![
			(640, 480),
			(1280, 720),
			(352, 288),
		]);
		assert_eq!(closest_resolution(&info, (320, 240)), Some((352, 288)));
	}

	#[test]
	fn no_discretes_no_fallback() {
		let info = ResolutionInfo::Discretes(vec![]);
		assert_eq!(closest_resolution(&info, (320, 240)), None);
	}

	#[test]
	fn stepwise_clamps_and_snaps() {
		let info = ResolutionInfo::Stepwise{
			min: (640, 480),
			max: (1920, 1080),
			step: (16, 8),
		};
		assert_eq!(closest_resolution(&info, (320, 240)), Some((640, 480)));
		assert_eq!(closest_resolution(&info, (650, 485)), Some((640, 480)));
		assert_eq!(closest_resolution(&info, (4000, 4000)), Some((1920, 1080)));
	}

	#[test]
	fn stepwise_without_even_width_has_no_fallback() {
		let info = ResolutionInfo::Stepwise{
			min: (321, 241),
			max: (1281, 961),
			step: (8, 8),
		};
		assert_eq!(closest_resolution(&info, (320, 240)), None);
	}

	#[test]
	fn stepwise_moves_to_an_even_width() {
		let info = ResolutionInfo::Stepwise{
			min: (321, 241),
			max: (1281, 961),
			step: (1, 1),
		};
		let (width, height) = closest_resolution(&info, (320, 240)).unwrap();
		assert_eq!((width, height), (322, 241));
		assert!(Frame::new(width, height, PixelFormat::Yuyv,
			vec![0; (width * height * 2) as usize]).is_ok());
	}

	#[test]
	fn missing_device_is_unavailable() {
		let mut config = crate::facecam::Config::default();
		config.device_index = 250;
		let fc = Facecam::new(config);
		match Webcam::open(&fc) {
			Err(Error::DeviceUnavailable{device, ..}) => {
				assert_eq!(device, "/dev/video250");
			},
			Err(e) => panic!("unexpected error {:?}", e),
			Ok(_) => panic!("/dev/video250 shouldn't exist"),
		}
	}
}
