#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate eeprom_burner;
use eeprom_burner::*;

use std::process::exit;
use std::time::Duration;

use eeprom_burner::serial::Transport;
use eeprom_burner::session::{
	Command,
	Dispatcher,
	Outcome,
};

// the programmer resets when the port gets opened
const OPEN_SETTLE: Duration = Duration::from_secs(2);

fn get_param<T>(matches: &clap::ArgMatches, name: &str, default: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = matches.value_of(name).unwrap_or(default);
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

fn selected_command(matches: &clap::ArgMatches) -> AResult<Command> {
	for name in ["read", "write", "erase", "unlock"].iter() {
		if matches.is_present(name) {
			return name.parse::<Command>();
		}
	}
	bail!("no command selected")
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@arg read: -R "read chip to file")
		(@arg write: -W "write file to chip")
		(@arg erase: -E "erase chip (not implemented)")
		(@arg unlock: -U "disable software data protection")
		(@arg baud: --baud +takes_value "baud rate (default 9600)")
		(@arg DEVICE: +required "serial device of the programmer")
		(@arg FILENAME: "image file (read default: file.bin)")
	)
	.group(clap::ArgGroup::with_name("command")
		.args(&["read", "write", "erase", "unlock"])
		.required(true))
	.get_matches();

	let command = selected_command(&matches)?;
	let config = serial::SerialConfig {
		baud: get_param(&matches, "baud", "9600")?,
		..serial::SerialConfig::default()
	};
	let device = matches.value_of("DEVICE").unwrap_or_default();
	// usage problems surface before the programmer gets reset by opening the port
	let path = image::resolve_path(command, matches.value_of("FILENAME"))?;

	// serial port is closed (and its settings restored) on every path out of here
	let mut port = serial::open(device, &config)?;
	info!("Opened {}", port.path().display());
	port.settle(OPEN_SETTLE);

	let mut file = match (command, path) {
		(Command::Read, Some(path)) => Some(image::create_sink(path)?),
		(Command::Write, Some(path)) => Some(image::open_source(path)?),
		_ => None,
	};

	let mut dispatcher = Dispatcher::new(&mut port);
	let outcome = dispatcher.dispatch(command, file.as_mut().map(|f| f as &mut dyn image::ChipImage))?;

	match outcome {
		Outcome::Read { bytes } => {
			info!("Wrote {} bytes to {}", bytes, path.unwrap_or(DEFAULT_FILENAME));
		},
		Outcome::Written { bytes, .. } => {
			info!("Sent {} bytes to {}", bytes, device);
		},
		Outcome::NotImplemented(_) | Outcome::Unlocked => {
			info!("{}", outcome);
		},
	}

	Ok(())
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
