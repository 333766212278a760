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

use clap::Parser;
use contract_approve_action::{api::JsonrpseeConnector, config::ActionInputs, host::GithubActionsHost, run};
use env_logger::Env;
use std::process::ExitCode;

/// Set by the runner when a workflow is re-run with debug logging enabled.
const RUNNER_DEBUG: &str = "RUNNER_DEBUG";

#[tokio::main]
async fn main() -> ExitCode {
	let default_level =
		if std::env::var(RUNNER_DEBUG).is_ok_and(|value| value == "1") { "debug" } else { "info" };
	env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

	let inputs = ActionInputs::parse();
	let mut host = GithubActionsHost::from_env();

	if run(&mut host, &JsonrpseeConnector, inputs).await {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}
