use std::io;
use std::thread;
use std::time::{
	Duration,
	Instant,
};

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

/// Blocking duplex byte stream to the programmer
pub trait Transport {
	/// returns number of bytes actually written
	fn send(&mut self, data: &[u8]) -> io::Result<usize>;

	// blocks until at least one byte is available; may return less than
	// `buf.len()`.  0 only on a closed line.
	fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;

	// give the programmer time to react (reset after open, mode switch after
	// a command)
	fn settle(&mut self, duration: Duration) {
		reliable_sleep(duration);
	}
}

impl<'a, T: ?Sized + Transport> Transport for &'a mut T {
	fn send(&mut self, data: &[u8]) -> io::Result<usize> {
		T::send(*self, data)
	}

	fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		T::receive(*self, buf)
	}

	fn settle(&mut self, duration: Duration) {
		T::settle(*self, duration)
	}
}
