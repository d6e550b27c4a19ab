use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{info, debug};

use crate::detector::FaceDetector;
use crate::errors::*;
use crate::frame::{to_grayscale, OverlayColor};
use crate::presenter::Presenter;
use crate::source::CaptureSource;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
	// The stop flag was raised (ctrl-c)
	Interrupted,
	// Batch mode ran out of images
	SourceExhausted,
	FrameLimit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
	Running,
	Stopped(StopReason),
}

#[derive(Debug, PartialEq)]
pub struct RunSummary {
	pub frames: u64,
	pub average_fps: Option<f64>,
	pub reason: StopReason,
}

// Per iteration timings. Instantaneous FPS is undefined
// for a zero elapsed time rather than infinite.
#[derive(Default)]
pub struct FpsMeter {
	frames: u64,
	total: Duration,
}

impl FpsMeter {
	pub fn record(&mut self, elapsed: Duration) -> Option<f64> {
		self.frames += 1;
		self.total += elapsed;
		fps(1, elapsed)
	}

	pub fn frames(&self) -> u64 {
		self.frames
	}

	pub fn average(&self) -> Option<f64> {
		fps(self.frames, self.total)
	}
}

fn fps(frames: u64, elapsed: Duration) -> Option<f64> {
	let secs = elapsed.as_secs_f64();
	if frames == 0 || secs <= 0.0 {
		return None;
	}
	Some(frames as f64 / secs)
}

fn format_fps(fps: Option<f64>) -> String {
	match fps {
		Some(fps) => format!("{:.2}", fps),
		None => "n/a".to_string(),
	}
}

// Runner owns every resource of the loop, so they are
// released whichever way run() returns.
pub struct Runner<S, D, P, W> {
	source: S,
	detector: D,
	presenter: P,
	out: W,
	color: OverlayColor,
	stop: Arc<AtomicBool>,
	max_frames: Option<u64>,
	meter: FpsMeter,
	state: State,
}

impl<S, D, P, W> Runner<S, D, P, W>
	where S: CaptureSource,
	      D: FaceDetector,
	      P: Presenter,
	      W: Write {

	pub fn new(source: S,
	           detector: D,
	           presenter: P,
	           out: W,
	           color: OverlayColor,
	           stop: Arc<AtomicBool>) -> Self {
		Self{
			source: source,
			detector: detector,
			presenter: presenter,
			out: out,
			color: color,
			stop: stop,
			max_frames: None,
			meter: FpsMeter::default(),
			state: State::Running,
		}
	}

	pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
		self.max_frames = max_frames;
		self
	}

	#[cfg(test)]
	pub fn state(&self) -> State {
		self.state
	}

	#[cfg(test)]
	pub fn presenter(&self) -> &P {
		&self.presenter
	}

	// Loop until stopped. The first error ends the run
	// and is handed back untouched.
	pub fn run(&mut self) -> Result<RunSummary> {
		info!(source:% = self.source.describe(); "loop started");

		let reason = loop {
			if let State::Stopped(reason) = self.state {
				break reason;
			}
			self.step()?;
		};

		let average_fps = self.meter.average();
		writeln!(self.out, "Average FPS: {}", format_fps(average_fps))?;
		info!(
			frames = self.meter.frames(),
			reason:? = reason;
			"loop stopped");

		Ok(RunSummary{
			frames: self.meter.frames(),
			average_fps: average_fps,
			reason: reason,
		})
	}

	// One capture, detect, present cycle
	pub fn step(&mut self) -> Result<()> {
		if self.stop.load(Ordering::SeqCst) {
			self.state = State::Stopped(StopReason::Interrupted);
			return Ok(());
		}

		if let Some(max) = self.max_frames {
			if self.meter.frames() >= max {
				self.state = State::Stopped(StopReason::FrameLimit);
				return Ok(());
			}
		}

		let t = Instant::now();

		let frame = match self.source.next_frame()? {
			Some(frame) => frame,
			None => {
				self.state = State::Stopped(StopReason::SourceExhausted);
				return Ok(());
			},
		};

		let gray = to_grayscale(&frame);
		// The colour frame isn't needed past here
		drop(frame);

		let detections = self.detector.detect(&gray)?;
		writeln!(self.out, "Number of faces detected: {}", detections.len())?;

		self.presenter.show(&gray, &detections, self.color)?;

		let elapsed = t.elapsed();
		let fps = self.meter.record(elapsed);
		writeln!(self.out, "Time consumed: {:.6}s   FPS: {}",
			elapsed.as_secs_f64(), format_fps(fps))?;
		debug!(
			faces = detections.len(),
			frame = self.meter.frames();
			"frame processed");

		Ok(())
	}
}
