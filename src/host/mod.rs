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

//! The CI system running the action.

pub use github::GithubActionsHost;

pub mod github;

#[cfg(test)]
pub mod mocks;

use crate::Result;

/// Receives the results of a run.
pub trait ActionHost {
	/// Publish all `(name, value)` outputs for subsequent workflow steps, or none of them.
	fn set_outputs(&mut self, outputs: &[(&str, &str)]) -> Result<()>;

	/// Publish output `name` for subsequent workflow steps.
	fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
		self.set_outputs(&[(name, value)])
	}

	/// Mark the run as failed with `message`.
	fn set_failed(&mut self, message: &str);
}
