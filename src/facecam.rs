use std::fs;
use std::path::Path;

use log::LevelFilter;
use serde::{Serialize, Deserialize};

use crate::errors::*;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
	pub device_index: u32,
	pub resolution: (u32, u32),
	pub interval: (u32, u32),
	pub model_path: String,
	pub min_face_size: u32,
	pub score_thresh: f64,
	pub pyramid_scale_factor: f32,
	pub slide_window_step: (u32, u32),
	pub overlay_color: [u8; 3],
	pub display_wait_ms: u64,
	pub snapshot_path: String,
	pub image_dir: Option<String>,
	pub max_frames: Option<u64>,
	pub log_level: String,
}

impl Default for Config {
	fn default() -> Self {
		Self{
			device_index: 0,
			resolution: (320, 240),
			interval: (1, 30),
			model_path: "model/seeta_fd_frontal_v1.0.bin".to_string(),
			min_face_size: 20,
			score_thresh: 2.0,
			pyramid_scale_factor: 0.8,
			slide_window_step: (4, 4),
			overlay_color: [255, 0, 0],
			display_wait_ms: 10,
			snapshot_path: "facecam.png".to_string(),
			image_dir: None,
			max_frames: None,
			log_level: "info".to_string(),
		}
	}
}

impl Config {
	// No path means defaults. A path that can't be read
	// or parsed is an error, we don't silently fall back.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let path = match path {
			Some(path) => path,
			None => return Ok(Self::default()),
		};

		let config_error = |reason: String| Error::Config{
			path: path.display().to_string(),
			reason: reason,
		};

		let raw = fs::read_to_string(path)
			.map_err(|e| config_error(e.to_string()))?;
		serde_json::from_str(&raw)
			.map_err(|e| config_error(e.to_string()))
	}

	// An unknown level is an error rather than a silent "info"
	pub fn level_filter(&self) -> Result<LevelFilter> {
		self.log_level.parse()
			.map_err(|_| Error::Config{
				path: "logLevel".to_string(),
				reason: format!("unknown log level {:?}, expected one of \
					off, error, warn, info, debug, trace", self.log_level),
			})
	}

	pub fn device_path(&self) -> String {
		format!("/dev/video{}", self.device_index)
	}
}

// Facecam is the resolved configuration
// shared by reference across the components.
pub struct Facecam {
	pub config: Config,
}

impl Facecam {
	pub fn new(config: Config) -> Self {
		Self{
			config: config,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn no_path_gives_defaults() {
		let config = Config::load(None).unwrap();
		assert_eq!(config, Config::default());
		assert_eq!(config.resolution, (320, 240));
		assert_eq!(config.overlay_color, [255, 0, 0]);
	}

	#[test]
	fn partial_file_keeps_other_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, r#"{{"deviceIndex": 2, "maxFrames": 5}}"#).unwrap();

		let config = Config::load(Some(file.path())).unwrap();
		assert_eq!(config.device_index, 2);
		assert_eq!(config.max_frames, Some(5));
		assert_eq!(config.display_wait_ms, 10);
		assert_eq!(config.device_path(), "/dev/video2");
	}

	#[test]
	fn missing_file_is_a_config_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nope.json");
		let err = Config::load(Some(&path)).unwrap_err();
		assert_eq!(err.kind(), "config_error");
	}

	#[test]
	fn log_levels_parse() {
		let mut config = Config::default();
		assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
		config.log_level = "DEBUG".to_string();
		assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
	}

	#[test]
	fn unknown_log_level_is_a_config_error() {
		let mut config = Config::default();
		config.log_level = "bogus".to_string();
		let err = config.level_filter().unwrap_err();
		assert_eq!(err.kind(), "config_error");
		assert!(err.to_string().contains("bogus"));
	}

	#[test]
	fn bad_json_is_a_config_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "{{not json").unwrap();
		let err = Config::load(Some(file.path())).unwrap_err();
		assert_eq!(err.kind(), "config_error");
	}
}
