use std::fmt;
use std::str;
use std::time::Duration;

use crate::image::ChipImage;
use crate::serial::{
	Transport,
	TransportExt,
};
use crate::{
	ProtocolError,
	BUFFER_SIZE,
};

pub mod read;
pub mod write;

/// Wait after a command byte before data is exchanged
pub const COMMAND_SETTLE: Duration = Duration::from_secs(1);

// log progress on info level every PROGRESS_STEP bytes
const PROGRESS_STEP: usize = 0x1000;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Command {
	Read,
	Write,
	Erase,
	Unlock,
}

impl Command {
	/// byte starting the session on the wire; ERASE has none
	pub fn code(self) -> Option<u8> {
		match self {
			Command::Read => Some(b'R'),
			Command::Write => Some(b'W'),
			Command::Erase => None,
			Command::Unlock => Some(b'U'),
		}
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Command::Read => "READ",
			Command::Write => "WRITE",
			Command::Erase => "ERASE",
			Command::Unlock => "UNLOCK",
		})
	}
}

impl str::FromStr for Command {
	type Err = ::failure::Error;

	// accepts the flag letter (with or without dash) or the name
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let name = s.trim_start_matches('-');
		Ok(match name.to_ascii_uppercase().as_str() {
			"R" | "READ" => Command::Read,
			"W" | "WRITE" => Command::Write,
			"E" | "ERASE" => Command::Erase,
			"U" | "UNLOCK" => Command::Unlock,
			_ => bail!("unknown command: {:?}", s),
		})
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Outcome {
	Read {
		bytes: usize,
	},
	Written {
		rounds: usize,
		bytes: usize,
	},
	Unlocked,
	NotImplemented(Command),
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Outcome::Read { bytes } => write!(f, "Received {} bytes", bytes),
			Outcome::Written { rounds, bytes } => write!(f, "Sent {} bytes in {} rounds", bytes, rounds),
			Outcome::Unlocked => write!(f, "Sent UNLOCK command"),
			Outcome::NotImplemented(command) => write!(f, "{} not implemented yet", command),
		}
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum State {
	Idle,
	Dispatched(Command),
	Done,
}

/// Runs exactly one command over a transport.
///
/// Once a command was dispatched there is no way back to `Idle`, even if the
/// session failed.
pub struct Dispatcher<T: Transport> {
	transport: T,
	state: State,
	settle: Duration,
}

impl<T: Transport> Dispatcher<T> {
	pub fn new(transport: T) -> Self {
		Dispatcher {
			transport,
			state: State::Idle,
			settle: COMMAND_SETTLE,
		}
	}

	/// override the wait between command byte and data exchange
	pub fn with_settle_time(mut self, settle: Duration) -> Self {
		self.settle = settle;
		self
	}

	pub fn state(&self) -> State {
		self.state
	}

	fn begin(&mut self, command: Command) -> crate::AResult<()> {
		self.state = State::Dispatched(command);
		if let Some(code) = command.code() {
			info!("Sending {} command", command);
			self.transport.send_exact(&[code])?;
		}
		Ok(())
	}

	/// `image` is the sink for READ and the source for WRITE; other commands
	/// ignore it.
	pub fn dispatch(&mut self, command: Command, image: Option<&mut dyn ChipImage>) -> crate::AResult<Outcome> {
		ensure!(self.state == State::Idle, "Can't dispatch {}: already {:?}", command, self.state);

		let outcome = match command {
			Command::Erase => {
				self.begin(command)?;
				warn!("{} not implemented yet", command);
				Outcome::NotImplemented(command)
			},
			Command::Unlock => {
				self.begin(command)?;
				Outcome::Unlocked
			},
			Command::Read => {
				let sink = image.ok_or(ProtocolError::MissingOutput)?;
				self.begin(command)?;
				self.transport.settle(self.settle);
				info!("Receiving data");
				let bytes = read::run(&mut self.transport, sink)?;
				Outcome::Read { bytes }
			},
			Command::Write => {
				let source = image.ok_or(ProtocolError::MissingInput)?;
				self.begin(command)?;
				self.transport.settle(self.settle);
				info!("Sending data");
				let rounds = write::run(&mut self.transport, source)?;
				Outcome::Written {
					rounds,
					bytes: rounds * BUFFER_SIZE,
				}
			},
		};

		self.state = State::Done;
		Ok(outcome)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	use crate::serial::mock::ScriptedTransport;
	use crate::CHIP_SIZE;

	#[test]
	fn parse_command() {
		assert_eq!("-R".parse::<Command>().unwrap(), Command::Read);
		assert_eq!("w".parse::<Command>().unwrap(), Command::Write);
		assert_eq!("erase".parse::<Command>().unwrap(), Command::Erase);
		assert_eq!("U".parse::<Command>().unwrap(), Command::Unlock);
		assert!("-X".parse::<Command>().is_err());
	}

	#[test]
	fn unlock_sends_single_byte() {
		let mut transport = ScriptedTransport::new();
		let mut dispatcher = Dispatcher::new(&mut transport);
		assert_eq!(dispatcher.dispatch(Command::Unlock, None).unwrap(), Outcome::Unlocked);
		assert_eq!(dispatcher.state(), State::Done);
		drop(dispatcher);

		assert_eq!(transport.sends, vec![b"U".to_vec()]);
		assert_eq!(transport.receives, 0);
		assert!(transport.settled.is_empty());
	}

	#[test]
	fn erase_sends_nothing() {
		let mut transport = ScriptedTransport::new();
		let mut dispatcher = Dispatcher::new(&mut transport);
		assert_eq!(dispatcher.dispatch(Command::Erase, None).unwrap(), Outcome::NotImplemented(Command::Erase));
		drop(dispatcher);

		assert!(transport.sends.is_empty());
	}

	#[test]
	fn write_without_input_does_no_io() {
		let mut transport = ScriptedTransport::new().address(0);
		let mut dispatcher = Dispatcher::new(&mut transport);
		let e = dispatcher.dispatch(Command::Write, None).unwrap_err();
		assert_eq!(e.downcast_ref::<ProtocolError>(), Some(&ProtocolError::MissingInput));
		assert_eq!(dispatcher.state(), State::Idle);
		drop(dispatcher);

		assert!(transport.sends.is_empty());
		assert_eq!(transport.receives, 0);
	}

	#[test]
	fn read_without_output_does_no_io() {
		let mut transport = ScriptedTransport::new();
		let mut dispatcher = Dispatcher::new(&mut transport);
		let e = dispatcher.dispatch(Command::Read, None).unwrap_err();
		assert_eq!(e.downcast_ref::<ProtocolError>(), Some(&ProtocolError::MissingOutput));
		drop(dispatcher);

		assert!(transport.sends.is_empty());
	}

	#[test]
	fn read_sends_command_then_settles() {
		let text = b"00".repeat(CHIP_SIZE);
		let mut transport = ScriptedTransport::new();
		for part in text.chunks(128) {
			transport = transport.incoming(part);
		}

		let mut sink = Cursor::new(Vec::new());
		let mut dispatcher = Dispatcher::new(&mut transport);
		let outcome = dispatcher.dispatch(Command::Read, Some(&mut sink)).unwrap();
		assert_eq!(outcome, Outcome::Read { bytes: CHIP_SIZE });
		drop(dispatcher);

		assert_eq!(transport.sends, vec![b"R".to_vec()]);
		assert_eq!(transport.settled, vec![COMMAND_SETTLE]);
		assert_eq!(sink.into_inner(), vec![0u8; CHIP_SIZE]);
	}

	#[test]
	fn write_reports_rounds() {
		let mut transport = ScriptedTransport::new().address(0).address(64).address(0x8000);
		let mut source = Cursor::new(vec![0u8; CHIP_SIZE]);
		let mut dispatcher = Dispatcher::new(&mut transport).with_settle_time(Duration::from_millis(0));
		let outcome = dispatcher.dispatch(Command::Write, Some(&mut source)).unwrap();
		assert_eq!(outcome, Outcome::Written { rounds: 2, bytes: 128 });
		drop(dispatcher);

		assert_eq!(transport.sends[0], b"W".to_vec());
		assert_eq!(transport.sends.len(), 3);
		assert_eq!(transport.settled, vec![Duration::from_millis(0)]);
	}

	#[test]
	fn runs_only_one_command() {
		let mut transport = ScriptedTransport::new();
		let mut dispatcher = Dispatcher::new(&mut transport);
		dispatcher.dispatch(Command::Unlock, None).unwrap();
		assert!(dispatcher.dispatch(Command::Unlock, None).is_err());
		drop(dispatcher);

		assert_eq!(transport.sends.len(), 1);
	}

	#[test]
	fn failed_session_stays_dispatched() {
		let mut transport = ScriptedTransport::new().incoming(b"123");
		let mut sink = Cursor::new(Vec::new());
		let mut dispatcher = Dispatcher::new(&mut transport);
		assert!(dispatcher.dispatch(Command::Read, Some(&mut sink)).is_err());
		assert_eq!(dispatcher.state(), State::Dispatched(Command::Read));
		assert!(dispatcher.dispatch(Command::Read, Some(&mut sink)).is_err());
	}
}
