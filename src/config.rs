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

//! Action inputs.
//!
//! The runner passes each input `<name>` as environment variable `INPUT_<NAME>`,
//! with the name uppercased and hyphens kept. All inputs can also be given as
//! `--<name>` flags, which take precedence.

use crate::{contract::ContractMetadata, Error, Result};
use clap::Parser;
use contract_action_primitives::{ReductionFactor, ReductionFactorError};
use core::fmt;
use log::*;
use sp_core::crypto::{AccountId32, Ss58Codec};
use std::{fs, time::Duration};

pub const WS_PROVIDER_URL: &str = "ws-provider-url";
pub const MNEMONIC_PHRASE: &str = "mnemonic-phrase";
pub const CONTRACT_ADDRESS: &str = "contract-address";
pub const CONTRACT_ABI: &str = "contract-abi";
pub const CONTRIBUTION_ID: &str = "contribution-id";
pub const CONTRIBUTOR: &str = "contributor";
pub const GAS_REDUCTION_FACTOR: &str = "gas-reduction-factor";
pub const FINALIZATION_TIMEOUT: &str = "finalization-timeout";

pub const DEFAULT_FINALIZATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Raw inputs as handed over by the runner. Validated by converting into [`ActionConfig`].
#[derive(Parser, Default, Clone)]
#[command(version, about = "Approve a contribution by calling `approve` on an ink! contract")]
pub struct ActionInputs {
	/// Websocket endpoint of the chain, e.g. wss://ws.test.azero.dev
	#[arg(long = WS_PROVIDER_URL, env = "INPUT_WS-PROVIDER-URL")]
	pub ws_provider_url: Option<String>,

	/// Secret phrase of the signing account, optionally with derivation junctions
	#[arg(long = MNEMONIC_PHRASE, env = "INPUT_MNEMONIC-PHRASE", hide_env_values = true)]
	pub mnemonic_phrase: Option<String>,

	/// SS58 address of the contract
	#[arg(long = CONTRACT_ADDRESS, env = "INPUT_CONTRACT-ADDRESS")]
	pub contract_address: Option<String>,

	/// Contract metadata, either the JSON document itself or a path to it
	#[arg(long = CONTRACT_ABI, env = "INPUT_CONTRACT-ABI")]
	pub contract_abi: Option<String>,

	/// Id of the contribution to approve
	#[arg(long = CONTRIBUTION_ID, env = "INPUT_CONTRIBUTION-ID")]
	pub contribution_id: Option<String>,

	/// Address of the contributor
	#[arg(long = CONTRIBUTOR, env = "INPUT_CONTRIBUTOR")]
	pub contributor: Option<String>,

	/// Share of the maximal extrinsic weight used as gas limit, in (0, 1]
	#[arg(long = GAS_REDUCTION_FACTOR, env = "INPUT_GAS-REDUCTION-FACTOR")]
	pub gas_reduction_factor: Option<String>,

	/// Seconds to wait for the transaction to be finalized
	#[arg(long = FINALIZATION_TIMEOUT, env = "INPUT_FINALIZATION-TIMEOUT")]
	pub finalization_timeout: Option<String>,
}

/// Mnemonic phrase, kept out of logs and debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPhrase(String);

impl SecretPhrase {
	pub fn new(phrase: impl Into<String>) -> Self {
		Self(phrase.into())
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for SecretPhrase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretPhrase(<redacted>)")
	}
}

/// Validated action configuration.
#[derive(Debug, Clone)]
pub struct ActionConfig {
	pub ws_provider_url: String,
	pub mnemonic: SecretPhrase,
	pub contract_address: AccountId32,
	pub contract_abi: ContractMetadata,
	pub contribution_id: u128,
	pub contributor: String,
	pub gas_reduction: ReductionFactor,
	pub finalization_timeout: Duration,
}

impl TryFrom<ActionInputs> for ActionConfig {
	type Error = Error;

	fn try_from(inputs: ActionInputs) -> Result<Self> {
		// Presence is checked first, in the order the inputs are documented.
		let ws_provider_url = required(WS_PROVIDER_URL, inputs.ws_provider_url)?;
		let mnemonic = required(MNEMONIC_PHRASE, inputs.mnemonic_phrase)?;
		let contract_address = required(CONTRACT_ADDRESS, inputs.contract_address)?;
		let contract_abi = required(CONTRACT_ABI, inputs.contract_abi)?;
		let contribution_id = required(CONTRIBUTION_ID, inputs.contribution_id)?;
		let contributor = required(CONTRIBUTOR, inputs.contributor)?;

		Ok(Self {
			ws_provider_url: parse_ws_url(ws_provider_url)?,
			mnemonic: SecretPhrase::new(mnemonic),
			contract_address: AccountId32::from_ss58check(&contract_address).map_err(|e| {
				Error::InvalidInput { name: CONTRACT_ADDRESS, reason: format!("{e:?}") }
			})?,
			contract_abi: load_contract_abi(&contract_abi)?,
			contribution_id: contribution_id.parse().map_err(|_| Error::InvalidInput {
				name: CONTRIBUTION_ID,
				reason: format!("`{contribution_id}` is not a non-negative integer"),
			})?,
			contributor,
			gas_reduction: match optional(inputs.gas_reduction_factor) {
				Some(factor) => factor.parse().map_err(|e: ReductionFactorError| Error::InvalidInput {
					name: GAS_REDUCTION_FACTOR,
					reason: e.to_string(),
				})?,
				None => ReductionFactor::default(),
			},
			finalization_timeout: match optional(inputs.finalization_timeout) {
				Some(seconds) => parse_timeout(&seconds)?,
				None => DEFAULT_FINALIZATION_TIMEOUT,
			},
		})
	}
}

fn optional(value: Option<String>) -> Option<String> {
	value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn required(name: &'static str, value: Option<String>) -> Result<String> {
	optional(value).ok_or(Error::MissingInput(name))
}

fn parse_ws_url(url: String) -> Result<String> {
	let host = url.strip_prefix("wss://").or_else(|| url.strip_prefix("ws://"));
	match host {
		Some(host) if !host.is_empty() => Ok(url),
		_ => Err(Error::InvalidInput {
			name: WS_PROVIDER_URL,
			reason: format!("`{url}` is not a ws:// or wss:// url"),
		}),
	}
}

fn parse_timeout(seconds: &str) -> Result<Duration> {
	match seconds.parse::<u64>() {
		Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
		_ => Err(Error::InvalidInput {
			name: FINALIZATION_TIMEOUT,
			reason: format!("`{seconds}` is not a positive number of seconds"),
		}),
	}
}

/// The ABI input holds either the metadata document or the path of a metadata file.
fn load_contract_abi(input: &str) -> Result<ContractMetadata> {
	if input.starts_with('{') {
		return ContractMetadata::parse(input)
	}
	debug!("Reading contract ABI from {input}");
	let json = fs::read_to_string(input)
		.map_err(|source| Error::ReadAbi { path: input.to_owned(), source })?;
	ContractMetadata::parse(&json)
}
