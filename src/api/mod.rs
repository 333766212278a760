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

//! Interface to the chain: the few calls the action needs from a Substrate node.

pub use runtime::{ChainConfig, ChainExtrinsicParams};
pub use substrate::{ChainApi, JsonrpseeConnector, StatusSubscription, SubstrateConnection};

pub mod runtime;
pub mod substrate;

#[cfg(test)]
pub mod mocks;

use crate::{watch::ExtrinsicStatus, Hash, Result};
use async_trait::async_trait;
use contract_action_primitives::{ContractCall, Nonce, Weight};
use sp_core::sr25519;

/// Opens connections to a node.
#[async_trait(?Send)]
pub trait Connect {
	type Connection: ContractsApi;

	/// Connect to the node at `url` and wait until the client is ready to compose
	/// extrinsics signed by `signer`.
	async fn connect(&self, url: &str, signer: sr25519::Pair) -> Result<Self::Connection>;
}

/// An open connection to a node running `pallet-contracts`.
#[async_trait(?Send)]
pub trait ContractsApi {
	type Watch: WatchExtrinsic;

	/// Maximal weight of a single normal extrinsic as advertised by `System::BlockWeights`.
	///
	/// `None` if the constant is absent, malformed or does not limit normal extrinsics.
	async fn max_extrinsic_weight(&self) -> Option<Weight>;

	/// Next nonce of the signing account, as known to the node.
	async fn account_nonce(&self) -> Result<Nonce>;

	/// Sign `call` with `nonce` and submit it, returning the extrinsic hash and its
	/// status subscription.
	async fn submit_and_watch_call(
		&self,
		call: &ContractCall,
		nonce: Nonce,
	) -> Result<SubmittedExtrinsic<Self::Watch>>;

	/// Close the connection.
	async fn release(self);
}

/// Status updates of a submitted extrinsic.
#[async_trait(?Send)]
pub trait WatchExtrinsic {
	/// Wait for the next status. `None` once the node closed the subscription.
	async fn next_status(&mut self) -> Option<Result<ExtrinsicStatus>>;

	async fn unsubscribe(self) -> Result<()>;
}

/// A submitted extrinsic and its status subscription.
#[derive(Debug)]
pub struct SubmittedExtrinsic<Watch> {
	pub extrinsic_hash: Hash,
	pub watch: Watch,
}
