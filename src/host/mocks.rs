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

use crate::{host::ActionHost, Result};
use std::io;

/// Records everything reported to it.
#[derive(Debug, Default)]
pub struct HostMock {
	pub outputs: Vec<(String, String)>,
	pub failures: Vec<String>,
	/// Reject every output, e.g. a runner whose output file is gone.
	pub reject_outputs: bool,
}

impl HostMock {
	pub fn output(&self, name: &str) -> Option<&str> {
		self.outputs.iter().find(|(n, _)| n == name).map(|(_, value)| value.as_str())
	}
}

impl ActionHost for HostMock {
	fn set_outputs(&mut self, outputs: &[(&str, &str)]) -> Result<()> {
		if self.reject_outputs {
			return Err(io::Error::new(io::ErrorKind::PermissionDenied, "output file").into())
		}
		self.outputs
			.extend(outputs.iter().map(|(name, value)| (name.to_string(), value.to_string())));
		Ok(())
	}

	fn set_failed(&mut self, message: &str) {
		self.failures.push(message.into());
	}
}
