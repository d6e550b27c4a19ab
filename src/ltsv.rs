// Key value logging
//
// Lines are LTSV: thread, level and msg come first,
// followed by whatever key/values the call site captured.
// Call sites use the log crate macros, e.g.
//     info!(device:% = path; "opening camera");

use std::io::Write;
use std::thread;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use log::kv::{self, Key, Value, VisitSource};

struct LtsvLogger {
	level: LevelFilter,
}

// Collects the captured key/values of a record
struct Tags(Vec<(String, String)>);

impl<'kvs> VisitSource<'kvs> for Tags {
	fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>)
		-> Result<(), kv::Error> {
		self.0.push((key.as_str().to_string(), value.to_string()));
		Ok(())
	}
}

impl Log for LtsvLogger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= self.level
	}

	fn log(&self, record: &Record) {
		if !self.enabled(record.metadata()) {
			return;
		}

		let mut tags = Tags(vec![]);
		// A failed visit only loses the tags, never the line
		let _ = record.key_values().visit(&mut tags);

		let line = format_line(
			thread::current().name().unwrap_or("unnamed"),
			level_name(record.level()),
			&record.args().to_string(),
			&tags.0);

		// Nothing sensible to do if stderr is gone
		let stderr = std::io::stderr();
		let _ = writeln!(stderr.lock(), "{}", line);
	}

	fn flush(&self) {
		let _ = std::io::stderr().flush();
	}
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
	log::set_boxed_logger(Box::new(LtsvLogger{level: level}))?;
	log::set_max_level(level);
	Ok(())
}

fn level_name(level: Level) -> &'static str {
	match level {
		Level::Error => "error",
		Level::Warn => "warn",
		Level::Info => "info",
		Level::Debug => "debug",
		Level::Trace => "trace",
	}
}

fn format_line(thread: &str,
	           level: &str,
	           msg: &str,
	           tags: &[(String, String)]) -> String {
	let mut log_line = String::with_capacity(1024);
	// The first entry is the thread name
	ltsv_encode(&mut log_line, "thread", thread);

	// The second tag is the level
	log_line.push('\t');
	ltsv_encode(&mut log_line, "level", level);

	// The third tag is the message
	log_line.push('\t');
	ltsv_encode(&mut log_line, "msg", msg);

	// We add any additional tags
	for (key, value) in tags.iter() {
		log_line.push('\t');
		ltsv_encode(&mut log_line, key, value);
	}
	log_line
}

fn ltsv_escape(buf: &mut String, s: &str) {
	for c in s.chars() {
		match c {
			'\\' | '\t' | '=' => {
				buf.push('\\');
				buf.push(c);
			},
			// A raw newline would split the record
			'\n' => buf.push_str("\\n"),
			_ => buf.push(c),
		}
	}
}

fn ltsv_encode(buf: &mut String, key: &str, value: &str) {
	ltsv_escape(buf, key);
	buf.push('=');
	ltsv_escape(buf, value);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn line_starts_with_thread_level_msg() {
		let line = format_line("main", "info", "opening camera", &[]);
		assert_eq!(line, "thread=main\tlevel=info\tmsg=opening camera");
	}

	#[test]
	fn tags_follow_in_order() {
		let tags = vec![
			("device".to_string(), "/dev/video0".to_string()),
			("width".to_string(), "320".to_string()),
		];
		let line = format_line("main", "info", "opened", &tags);
		assert!(line.ends_with("\tdevice=/dev/video0\twidth=320"));
	}

	#[test]
	fn separators_are_escaped() {
		let mut buf = String::new();
		ltsv_encode(&mut buf, "k=1", "a\tb\\c\nd");
		assert_eq!(buf, "k\\=1=a\\\tb\\\\c\\nd");
		assert!(!buf.contains('\n'));
	}

	#[test]
	fn level_names_are_lowercase() {
		assert_eq!(level_name(Level::Warn), "warn");
		assert_eq!(level_name(Level::Error), "error");
	}
}
