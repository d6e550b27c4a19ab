use std::path::PathBuf;

use clap::Parser;

use crate::facecam::Config;

/// Live face detection over a webcam (or a directory of images),
/// with per frame timing.
#[derive(Parser, Debug)]
#[command(name = "facecam", version)]
pub struct Args {
	/// JSON config file, defaults are used when omitted
	#[arg(long)]
	pub config: Option<PathBuf>,

	/// Capture device index, opens /dev/video<N>
	#[arg(long)]
	pub device: Option<u32>,

	/// Process every image in this directory instead of the camera
	#[arg(long, value_name = "DIR")]
	pub images: Option<PathBuf>,

	/// SeetaFace model file
	#[arg(long)]
	pub model: Option<PathBuf>,

	/// Where to write annotated frames, "{}" is replaced by the frame number
	#[arg(long)]
	pub snapshot: Option<String>,

	/// Stop after this many frames
	#[arg(long)]
	pub frames: Option<u64>,

	/// error, warn, info, debug or trace
	#[arg(long)]
	pub log_level: Option<String>,

	/// Show frames in a window instead of writing snapshots
	#[cfg(feature = "highgui")]
	#[arg(long)]
	pub window: bool,
}

impl Args {
	// Flags win over the config file
	pub fn apply(&self, config: &mut Config) {
		if let Some(device) = self.device {
			config.device_index = device;
		}
		if let Some(ref images) = self.images {
			config.image_dir = Some(images.display().to_string());
		}
		if let Some(ref model) = self.model {
			config.model_path = model.display().to_string();
		}
		if let Some(ref snapshot) = self.snapshot {
			config.snapshot_path = snapshot.clone();
		}
		if self.frames.is_some() {
			config.max_frames = self.frames;
		}
		if let Some(ref level) = self.log_level {
			config.log_level = level.clone();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flags_override_config() {
		let args = Args::parse_from([
			"facecam",
			"--device", "3",
			"--images", "faces",
			"--frames", "12",
			"--log-level", "debug",
		]);

		let mut config = Config::default();
		config.max_frames = Some(1);
		args.apply(&mut config);

		assert_eq!(config.device_index, 3);
		assert_eq!(config.image_dir.as_deref(), Some("faces"));
		assert_eq!(config.max_frames, Some(12));
		assert_eq!(config.log_level, "debug");
	}

	#[test]
	fn no_flags_leave_config_alone() {
		let args = Args::parse_from(["facecam"]);
		let mut config = Config::default();
		config.snapshot_path = "out/{}.png".to_string();
		args.apply(&mut config);
		assert_eq!(config.snapshot_path, "out/{}.png");
		assert_eq!(config, {
			let mut c = Config::default();
			c.snapshot_path = "out/{}.png".to_string();
			c
		});
	}
}
