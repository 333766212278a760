/*
   Copyright 2019 Supercomputing Systems AG

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

	   http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.

*/

//! GitHub Actions runner: outputs through the `GITHUB_OUTPUT` file, failures
//! through workflow commands on stdout.

use crate::{host::ActionHost, Result};
use log::*;
use sp_core::hashing::blake2_128;
use std::{
	env,
	fs::OpenOptions,
	io::{self, Write},
	path::PathBuf,
	process,
	time::{SystemTime, UNIX_EPOCH},
};

pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

#[derive(Debug)]
pub struct GithubActionsHost<W = io::Stdout> {
	output_file: Option<PathBuf>,
	commands: W,
	failed: bool,
}

impl GithubActionsHost {
	/// Host writing to the file named by `GITHUB_OUTPUT`, if set, and to stdout.
	pub fn from_env() -> Self {
		let output_file = env::var_os(OUTPUT_FILE_VAR).filter(|path| !path.is_empty());
		if output_file.is_none() {
			debug!("{OUTPUT_FILE_VAR} is not set, falling back to the set-output command");
		}
		Self::new(output_file.map(PathBuf::from), io::stdout())
	}
}

impl<W: Write> GithubActionsHost<W> {
	pub fn new(output_file: Option<PathBuf>, commands: W) -> Self {
		Self { output_file, commands, failed: false }
	}

	pub fn failed(&self) -> bool {
		self.failed
	}

	pub fn into_commands(self) -> W {
		self.commands
	}
}

impl<W: Write> ActionHost for GithubActionsHost<W> {
	fn set_outputs(&mut self, outputs: &[(&str, &str)]) -> Result<()> {
		for (name, value) in outputs {
			debug!("Setting output {name}={value}");
		}
		// Each batch goes out in a single write.
		match &self.output_file {
			Some(path) => {
				let entries: String =
					outputs.iter().map(|(name, value)| file_command_entry(name, value)).collect();
				let mut file = OpenOptions::new().create(true).append(true).open(path)?;
				file.write_all(entries.as_bytes())?;
			},
			None => {
				let commands: String = outputs
					.iter()
					.map(|(name, value)| {
						format!("::set-output name={}::{}\n", escape_property(name), escape_data(value))
					})
					.collect();
				self.commands.write_all(commands.as_bytes())?;
			},
		}
		Ok(())
	}

	fn set_failed(&mut self, message: &str) {
		self.failed = true;
		if let Err(e) = writeln!(self.commands, "::error::{}", escape_data(message)) {
			// Last resort, the exit code still marks the run as failed.
			error!("{message} (could not issue the error command: {e})");
		}
	}
}

/// `name<<delimiter`, the value and the delimiter, each on its own line.
fn file_command_entry(name: &str, value: &str) -> String {
	let mut delimiter = unique_delimiter(0);
	let mut attempt = 1;
	while name.contains(&delimiter) || value.contains(&delimiter) {
		delimiter = unique_delimiter(attempt);
		attempt += 1;
	}
	format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

fn unique_delimiter(attempt: u32) -> String {
	let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_nanos());
	let seed = [nanos.to_le_bytes().as_slice(), &process::id().to_le_bytes(), &attempt.to_le_bytes()]
		.concat();
	format!("ghadelimiter_{}", hex::encode(blake2_128(&seed)))
}

fn escape_data(value: &str) -> String {
	value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
	escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
