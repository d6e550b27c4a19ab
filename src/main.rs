use std::io::{self, Write};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::path::Path;

use clap::Parser;
use log::{info, error};

mod errors;
use errors::*;
mod facecam;
use facecam::{Config, Facecam};
mod cli;
use cli::Args;
mod frame;
use frame::OverlayColor;
mod source;
use source::{CaptureSource, ImageDir, Webcam};
mod detector;
use detector::SeetaDetector;
mod presenter;
use presenter::{Presenter, SnapshotPresenter};
mod runner;
use runner::{Runner, RunSummary};

mod ltsv;

fn open_source(fc: &Facecam) -> Result<Box<dyn CaptureSource>> {
	match fc.config.image_dir {
		Some(ref dir) => Ok(Box::new(ImageDir::open(Path::new(dir))?)),
		None => Ok(Box::new(Webcam::open(fc)?)),
	}
}

#[cfg(feature = "highgui")]
fn open_presenter(fc: &Facecam, args: &Args) -> Result<Box<dyn Presenter>> {
	if args.window {
		let window = presenter::WindowPresenter::open(
			"facecam", fc.config.display_wait_ms)?;
		return Ok(Box::new(window));
	}
	Ok(Box::new(SnapshotPresenter::new(&fc.config.snapshot_path)))
}

#[cfg(not(feature = "highgui"))]
fn open_presenter(fc: &Facecam, _args: &Args) -> Result<Box<dyn Presenter>> {
	Ok(Box::new(SnapshotPresenter::new(&fc.config.snapshot_path)))
}

fn run(args: &Args) -> Result<RunSummary> {
	let mut config = Config::load(args.config.as_deref())?;
	args.apply(&mut config);

	let level = config.level_filter()?;
	// Only fails if a logger is already installed
	let _ = ltsv::init(level);

	info!("facecam started");
	let fc = Facecam::new(config);

	// Ctrl-C handler
	let stop = Arc::new(AtomicBool::new(false));
	let s = stop.clone();

	ctrlc::set_handler(move || {
		info!("received ctrlc - closing");
		s.store(true, Ordering::SeqCst);
	}).map_err(|e| Error::Signal(e.to_string()))?;

	// The camera is opened before anything else so an
	// absent device fails fast.
	let source = open_source(&fc)?;
	let detector = SeetaDetector::new(&fc)?;
	let presenter = open_presenter(&fc, args)?;

	let mut runner = Runner::new(
		source,
		detector,
		presenter,
		io::stdout(),
		OverlayColor::from(fc.config.overlay_color),
		stop)
		.with_max_frames(fc.config.max_frames);

	// The runner (and with it the camera and window) is
	// dropped before we return, error or not.
	runner.run()
}

// Tell the user what failed and pick the exit status.
// A console that's gone can't be reported to, the
// status still stands.
fn report<W: Write>(out: &mut W, e: &Error) -> i32 {
	error!(kind = e.kind(), error:% = e; "something went wrong");
	match e {
		Error::DeviceUnavailable{..} => {
			let _ = writeln!(out, "Failed to open camera.");
			-1
		},
		Error::ImageDirUnavailable{dir, ..} => {
			let _ = writeln!(out, "Failed to open image directory {}.", dir);
			-1
		},
		_ => {
			let _ = writeln!(out, "\nerror: {}", e.kind());
			let _ = writeln!(out, "{}", e);
			1
		},
	}
}

fn main() {
	let args = Args::parse();
	let code = match run(&args) {
		Ok(summary) => {
			info!(
				frames = summary.frames,
				reason:? = summary.reason;
				"facecam finished");
			0
		},
		Err(e) => report(&mut io::stdout(), &e),
	};
	process::exit(code);
}
