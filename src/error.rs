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

use crate::watch::{TxFailure, WatchState};
use std::time::Duration;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Input required and not supplied: {0}")]
	MissingInput(&'static str),
	#[error("Invalid input `{name}`: {reason}")]
	InvalidInput { name: &'static str, reason: String },
	#[error("Could not read the contract ABI from `{path}`: {source}")]
	ReadAbi {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("Invalid contract ABI: {0}")]
	Abi(#[from] serde_json::Error),
	#[error("Contract message `{0}` is not part of the ABI")]
	MessageNotFound(String),
	#[error("Invalid selector `{selector}` of contract message `{message}`")]
	InvalidSelector { message: String, selector: String },
	#[error("Contract message `{message}` expects {expected} arguments, {actual} given")]
	ArgumentCount { message: String, expected: usize, actual: usize },
	#[error("Could not encode argument `{argument}`: {reason}")]
	Encode { argument: String, reason: String },
	#[error("Cryptographic primitives failed their self test")]
	CryptoUnavailable,
	#[error("Could not derive an account from the mnemonic phrase")]
	InvalidMnemonic,
	#[error("Chain client error: {0:?}")]
	Api(substrate_api_client::Error),
	#[error("Rpc client error: {0:?}")]
	Rpc(substrate_api_client::rpc::Error),
	#[error("Could not compose extrinsic {pallet}::{call}")]
	ComposeExtrinsic { pallet: &'static str, call: &'static str },
	#[error("Transaction failed: {0}")]
	Transaction(TxFailure),
	#[error("Unexpected transaction status {status} after the transaction was {state}")]
	UnexpectedStatus { state: WatchState, status: String },
	#[error("Transaction status stream closed while the transaction was {0}")]
	StreamClosed(WatchState),
	#[error("Transaction not finalized within {}s, it was {state}", .timeout.as_secs())]
	FinalizationTimeout { timeout: Duration, state: WatchState },
	#[error("Could not write action output: {0}")]
	Io(#[from] std::io::Error),
}

// The client errors implement neither `Display` nor `std::error::Error`, hence no `#[from]`.
impl From<substrate_api_client::Error> for Error {
	fn from(error: substrate_api_client::Error) -> Self {
		Self::Api(error)
	}
}

impl From<substrate_api_client::rpc::Error> for Error {
	fn from(error: substrate_api_client::rpc::Error) -> Self {
		Self::Rpc(error)
	}
}
