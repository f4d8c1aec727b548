use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use super::Transport;

/// replays prepared device output and records everything sent to it
#[derive(Default, Debug)]
pub(crate) struct ScriptedTransport {
	incoming: VecDeque<Vec<u8>>,
	pub sends: Vec<Vec<u8>>,
	pub receives: usize,
	pub settled: Vec<Duration>,
	send_limit: Option<usize>,
}

impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// queue data returned by one receive (split if the receive buffer is smaller)
	pub fn incoming(mut self, data: &[u8]) -> Self {
		self.incoming.push_back(data.to_vec());
		self
	}

	pub fn address(self, address: u16) -> Self {
		self.incoming(&address.to_le_bytes())
	}

	/// cap the number of bytes a single send accepts
	pub fn with_send_limit(mut self, limit: usize) -> Self {
		self.send_limit = Some(limit);
		self
	}

	pub fn pending(&self) -> usize {
		self.incoming.len()
	}
}

impl Transport for ScriptedTransport {
	fn send(&mut self, data: &[u8]) -> io::Result<usize> {
		let len = match self.send_limit {
			Some(limit) => data.len().min(limit),
			None => data.len(),
		};
		self.sends.push(data[..len].to_vec());
		Ok(len)
	}

	fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		self.receives += 1;
		let mut data = match self.incoming.pop_front() {
			Some(data) => data,
			None => return Ok(0),
		};
		let len = data.len().min(buf.len());
		buf[..len].copy_from_slice(&data[..len]);
		if len < data.len() {
			self.incoming.push_front(data.split_off(len));
		}
		Ok(len)
	}

	fn settle(&mut self, duration: Duration) {
		self.settled.push(duration);
	}
}
