use std::io;
use std::io::Write;
use std::time;


pub trait ProgressSink {
	fn update(&mut self, inow: usize);
	fn finish(&mut self, inow: Option<usize>);
}


pub struct ProgressMeter {
	t0: time::Instant,
	tprev: time::Instant,
	iprev: usize,
}

impl ProgressMeter {
	pub fn start() -> Self {
		let now = time::Instant::now();
		print!("{:12} [{:6.2}/s]\r", 0, 0.0);
		io::stdout().flush().unwrap();
		Self{
			t0: now,
			tprev: now,
			iprev: 0,
		}
	}
}

impl ProgressSink for ProgressMeter {
	fn update(&mut self, inow: usize) {
		let now = time::Instant::now();
		let dt = (now - self.tprev).as_secs_f64();
		let rate = (inow - self.iprev) as f64 / dt;
		print!("{:12} [{:6.2}/s]\r", inow, rate);
		io::stdout().flush().unwrap();
		self.iprev = inow;
		self.tprev = now;
	}

	fn finish(&mut self, inow: Option<usize>) {
		let inow = inow.unwrap_or(self.iprev);
		let dt = (time::Instant::now() - self.t0).as_secs_f64();
		let rate = inow as f64 / dt;
		println!("{:12} [{:6.2}/s]", inow, rate);
	}
}


pub struct Quiet;

impl ProgressSink for Quiet {
	fn update(&mut self, _inow: usize) {}

	fn finish(&mut self, _inow: Option<usize>) {}
}


// Live meter on a terminal, silence when output is piped somewhere.
pub fn default_output() -> Box<dyn ProgressSink> {
	if isatty::stdout_isatty() {
		Box::new(ProgressMeter::start())
	} else {
		Box::new(Quiet)
	}
}


pub struct CountMeter<'x, S: ProgressSink + ?Sized> {
	sink: &'x mut S,
}

impl<'x, S: ProgressSink + ?Sized> CountMeter<'x, S> {
	pub fn new(sink: &'x mut S) -> Self {
		Self{sink}
	}

	pub fn update(&mut self, inow: usize) {
		self.sink.update(inow);
	}

	pub fn finish(&mut self, inow: usize) {
		self.sink.finish(Some(inow));
	}
}
