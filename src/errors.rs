use std::fmt;
use std::io;

pub enum Error {
	// The capture device couldn't be opened
	DeviceUnavailable {
		device: String,
		reason: String,
	},
	// Batch mode: the image directory couldn't be listed
	ImageDirUnavailable {
		dir: String,
		reason: String,
	},
	// A frame couldn't be read from an open source
	Capture(String),
	MalformedFrame {
		expected: usize,
		actual: usize,
	},
	Detector(String),
	Present(String),
	Config {
		path: String,
		reason: String,
	},
	Signal(String),
	Io(io::Error),
}

impl Error {
	// Stable tag used in log lines
	pub fn kind(&self) -> &'static str {
		use Error::*;
		match self {
			DeviceUnavailable{..} => "device_unavailable",
			ImageDirUnavailable{..} => "image_dir_unavailable",
			Capture(_) => "capture_error",
			MalformedFrame{..} => "malformed_frame",
			Detector(_) => "detector_error",
			Present(_) => "present_error",
			Config{..} => "config_error",
			Signal(_) => "signal_error",
			Io(_) => "io_error",
		}
	}

	fn format(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		use Error::*;
		match self {
			DeviceUnavailable{device, reason} => write!(f,
				"couldn't open capture device {}: {} \
				 (check the device exists and isn't in use)", device, reason),
			ImageDirUnavailable{dir, reason} => write!(f,
				"couldn't list image directory {}: {} \
				 (check the --images path or imageDir)", dir, reason),
			Capture(reason) => write!(f,
				"couldn't read a frame: {}", reason),
			MalformedFrame{expected, actual} => write!(f,
				"frame buffer holds {} bytes, expected {}", actual, expected),
			Detector(reason) => write!(f,
				"face detector failed: {}", reason),
			Present(reason) => write!(f,
				"couldn't present frame: {}", reason),
			Config{path, reason} => write!(f,
				"bad config file {}: {}", path, reason),
			Signal(reason) => write!(f,
				"couldn't install ctrl-c handler: {}", reason),
			Io(e) => write!(f, "{}", e),
		}
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.format(f)
	}
}

impl fmt::Debug for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: ", self.kind())?;
		self.format(f)
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Self {
		Error::Io(e)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
