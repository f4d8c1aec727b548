use std::fmt;
use std::fs;
use std::io::{
	self,
	Read,
	Write,
};
use std::mem;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{
	Path,
	PathBuf,
};
use std::str;
use std::time::Duration;

use libc::{
	c_int,
	speed_t,
	termios,
};

use super::Transport;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Baud {
	B9600,
	B19200,
	B38400,
	B57600,
	B115200,
}

impl Baud {
	pub fn bits_per_second(self) -> u32 {
		match self {
			Baud::B9600 => 9600,
			Baud::B19200 => 19200,
			Baud::B38400 => 38400,
			Baud::B57600 => 57600,
			Baud::B115200 => 115200,
		}
	}

	fn speed(self) -> speed_t {
		match self {
			Baud::B9600 => libc::B9600,
			Baud::B19200 => libc::B19200,
			Baud::B38400 => libc::B38400,
			Baud::B57600 => libc::B57600,
			Baud::B115200 => libc::B115200,
		}
	}
}

impl Default for Baud {
	fn default() -> Self {
		Baud::B9600
	}
}

impl fmt::Display for Baud {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.bits_per_second())
	}
}

impl str::FromStr for Baud {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let rate = with_context!(("invalid baud rate: {:?}", s),
			Ok(s.parse::<u32>()?)
		)?;
		Ok(match rate {
			9600 => Baud::B9600,
			19200 => Baud::B19200,
			38400 => Baud::B38400,
			57600 => Baud::B57600,
			115200 => Baud::B115200,
			_ => bail!("unsupported baud rate: {} (supported: 9600, 19200, 38400, 57600, 115200)", rate),
		})
	}
}

/// Line settings; always 8N1 raw without flow control.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SerialConfig {
	pub baud: Baud,
	/// VMIN: a read blocks until this many bytes arrived ...
	pub min_bytes: u8,
	/// VTIME: ... or the line was idle this long after the first byte
	pub timeout: Duration,
}

impl Default for SerialConfig {
	fn default() -> Self {
		SerialConfig {
			baud: Baud::default(),
			min_bytes: crate::FRAME_SIZE as u8,
			timeout: Duration::from_secs(5),
		}
	}
}

impl SerialConfig {
	// VTIME is in deciseconds, one byte wide
	fn deciseconds(&self) -> u8 {
		let ds = self.timeout.as_millis() / 100;
		if ds > 255 { 255 } else { ds as u8 }
	}

	pub(crate) fn apply(&self, options: &mut termios) -> io::Result<()> {
		cvt(unsafe { libc::cfsetispeed(options, self.baud.speed()) })?;
		cvt(unsafe { libc::cfsetospeed(options, self.baud.speed()) })?;

		options.c_cflag |= libc::CLOCAL | libc::CREAD;
		options.c_cflag &= !libc::PARENB; // no parity
		options.c_cflag &= !libc::CSTOPB; // one stop bit
		options.c_cflag &= !libc::CSIZE;
		options.c_cflag |= libc::CS8;
		options.c_cflag &= !libc::CRTSCTS;
		options.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ECHOE | libc::ISIG | libc::IEXTEN);
		// no flow control; address headers are binary, so no CR/NL mangling either
		options.c_iflag &= !(libc::IXON | libc::IXOFF | libc::IXANY);
		options.c_iflag &= !(libc::ICRNL | libc::INLCR | libc::IGNCR | libc::ISTRIP | libc::BRKINT | libc::PARMRK);
		options.c_oflag &= !libc::OPOST;
		options.c_cc[libc::VMIN] = self.min_bytes;
		options.c_cc[libc::VTIME] = self.deciseconds();

		Ok(())
	}
}

fn cvt(res: c_int) -> io::Result<()> {
	if res < 0 {
		Err(io::Error::last_os_error())
	} else {
		Ok(())
	}
}

/// Configured tty; the previous line settings are restored on drop.
pub struct SerialPort {
	file: fs::File,
	saved: termios,
	path: PathBuf,
}

impl SerialPort {
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Drop for SerialPort {
	fn drop(&mut self) {
		// let pending output drain before switching the line back
		let res = unsafe { libc::tcsetattr(self.file.as_raw_fd(), libc::TCSADRAIN, &self.saved) };
		if 0 != res {
			warn!("{}: couldn't restore serial settings: {}", self.path.display(), io::Error::last_os_error());
		}
	}
}

impl Transport for SerialPort {
	fn send(&mut self, data: &[u8]) -> io::Result<usize> {
		self.file.write(data)
	}

	fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		self.file.read(buf)
	}
}

pub fn open<P: AsRef<Path>>(path: P, config: &SerialConfig) -> crate::AResult<SerialPort> {
	let path = path.as_ref();

	with_context!(("couldn't open serial device {}", path.display()), {
		let file = fs::OpenOptions::new()
			.read(true)
			.write(true)
			.custom_flags(libc::O_NOCTTY)
			.open(path)?;
		let fd = file.as_raw_fd();

		// we want reads to be blocking
		cvt(unsafe { libc::fcntl(fd, libc::F_SETFL, 0) })?;

		let mut saved: termios = unsafe { mem::zeroed() };
		cvt(unsafe { libc::tcgetattr(fd, &mut saved) })?;

		let mut options = saved;
		config.apply(&mut options)?;
		cvt(unsafe { libc::tcsetattr(fd, libc::TCSANOW, &options) })?;
		debug!("{}: configured {} baud, VMIN {}, VTIME {}", path.display(), config.baud, config.min_bytes, config.deciseconds());

		Ok(SerialPort {
			file,
			saved,
			path: path.to_owned(),
		})
	})
}
