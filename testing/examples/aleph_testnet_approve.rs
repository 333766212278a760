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

//! Approves contribution 1 on the contributions contract deployed to the Aleph Zero testnet.
//!
//! Needs a funded account: set `MNEMONIC_PHRASE` to its secret phrase and
//! `CONTRACT_ABI` to the path of the contract metadata, then
//! `cargo run -p contract-approve-action-testing --example aleph_testnet_approve`.

use contract_approve_action::{
	api::JsonrpseeConnector, config::ActionInputs, host::GithubActionsHost, run,
};
use std::env;

const ALEPH_TESTNET: &str = "wss://ws.test.azero.dev";
const CONTRACT: &str = "5D5x653PxChSTBczHzjveBvda85oPG4CwZYYkq2qAujeEP49";
const CONTRIBUTOR: &str = "5GspWdbeG69eH6nNnZBhjY3ay15SVfxwt5zapxbVkDQP27Vy";

#[tokio::main]
async fn main() {
	env_logger::init();

	let inputs = ActionInputs {
		ws_provider_url: Some(ALEPH_TESTNET.into()),
		mnemonic_phrase: env::var("MNEMONIC_PHRASE").ok(),
		contract_address: Some(CONTRACT.into()),
		contract_abi: env::var("CONTRACT_ABI").ok(),
		contribution_id: Some("1".into()),
		contributor: Some(CONTRIBUTOR.into()),
		..Default::default()
	};
	let mut host = GithubActionsHost::new(None, Vec::new());

	let succeeded = run(&mut host, &JsonrpseeConnector, inputs).await;

	let commands = String::from_utf8(host.into_commands()).unwrap();
	println!("{commands}");
	assert!(succeeded, "approval failed: {commands}");
	assert!(commands.contains("::set-output name=hash::0x"));
	assert!(commands.contains("::set-output name=block::0x"));
}
