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

//! [`Connect`] and [`ContractsApi`] backed by `substrate-api-client` over a jsonrpsee
//! websocket client.

use crate::{
	api::{ChainConfig, Connect, ContractsApi, SubmittedExtrinsic, WatchExtrinsic},
	extrinsic::compose_contract_call,
	watch::ExtrinsicStatus,
	Hash, Result,
};
use async_trait::async_trait;
use contract_action_primitives::{BlockWeights, ContractCall, Nonce, Weight};
use log::*;
use sp_core::{hashing::blake2_256, sr25519, Bytes};
use substrate_api_client::{
	rpc::{HandleSubscription, JsonrpseeClient},
	rpc_api::author::TransactionSubscriptionFor,
	Api, GetStorage, SubmitAndWatch, TransactionStatus,
};

pub type ChainApi = Api<ChainConfig, JsonrpseeClient>;

pub const SYSTEM_MODULE: &str = "System";
pub const BLOCK_WEIGHTS: &str = "BlockWeights";

/// Connects through a [`JsonrpseeClient`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonrpseeConnector;

#[async_trait(?Send)]
impl Connect for JsonrpseeConnector {
	type Connection = SubstrateConnection;

	async fn connect(&self, url: &str, signer: sr25519::Pair) -> Result<Self::Connection> {
		info!("Connecting to {url}");
		let client = JsonrpseeClient::new(url).await?;
		// Fetches metadata, runtime version and genesis hash before returning.
		let mut api = ChainApi::new(client).await?;
		api.set_signer(signer.into());
		info!(
			"Connected to {url}, runtime spec version {}",
			api.runtime_version().spec_version
		);
		Ok(SubstrateConnection { api })
	}
}

pub struct SubstrateConnection {
	api: ChainApi,
}

#[async_trait(?Send)]
impl ContractsApi for SubstrateConnection {
	type Watch = StatusSubscription;

	async fn max_extrinsic_weight(&self) -> Option<Weight> {
		match self.api.get_constant::<BlockWeights>(SYSTEM_MODULE, BLOCK_WEIGHTS).await {
			Ok(block_weights) => {
				let max_extrinsic = block_weights.max_extrinsic();
				debug!("Max extrinsic weight of normal class: {max_extrinsic:?}");
				max_extrinsic
			},
			Err(e) => {
				warn!("Could not read {SYSTEM_MODULE}::{BLOCK_WEIGHTS}: {e:?}");
				None
			},
		}
	}

	async fn account_nonce(&self) -> Result<Nonce> {
		let nonce = self.api.get_nonce().await?;
		debug!("Account nonce of the signer: {nonce}");
		Ok(nonce)
	}

	async fn submit_and_watch_call(
		&self,
		call: &ContractCall,
		nonce: Nonce,
	) -> Result<SubmittedExtrinsic<Self::Watch>> {
		let encoded_extrinsic = compose_contract_call(&self.api, call, nonce)?;
		let extrinsic_hash = Hash::from(blake2_256(&encoded_extrinsic));
		debug!("Submitting extrinsic {extrinsic_hash:?}");
		let inner = self
			.api
			.submit_and_watch_opaque_extrinsic(&Bytes::from(encoded_extrinsic))
			.await?;
		Ok(SubmittedExtrinsic { extrinsic_hash, watch: StatusSubscription { inner } })
	}

	async fn release(self) {
		// Dropping the last handle of the jsonrpsee client closes the websocket.
		drop(self.api);
		debug!("Connection released");
	}
}

/// Transaction status subscription of `author_submitAndWatchExtrinsic`.
pub struct StatusSubscription {
	inner: TransactionSubscriptionFor<JsonrpseeClient, Hash>,
}

#[async_trait(?Send)]
impl WatchExtrinsic for StatusSubscription {
	async fn next_status(&mut self) -> Option<Result<ExtrinsicStatus>> {
		self.inner
			.next()
			.await
			.map(|status| status.map(ExtrinsicStatus::from).map_err(Into::into))
	}

	async fn unsubscribe(self) -> Result<()> {
		self.inner.unsubscribe().await.map_err(Into::into)
	}
}

impl From<TransactionStatus<Hash, Hash>> for ExtrinsicStatus {
	fn from(status: TransactionStatus<Hash, Hash>) -> Self {
		match status {
			TransactionStatus::Future => Self::Future,
			TransactionStatus::Ready => Self::Ready,
			TransactionStatus::Broadcast(peers) => Self::Broadcast(peers),
			TransactionStatus::InBlock(block) => Self::InBlock(block),
			TransactionStatus::Retracted(block) => Self::Retracted(block),
			TransactionStatus::FinalityTimeout(block) => Self::FinalityTimeout(block),
			TransactionStatus::Finalized(block) => Self::Finalized(block),
			TransactionStatus::Usurped(hash) => Self::Usurped(hash),
			TransactionStatus::Dropped => Self::Dropped,
			TransactionStatus::Invalid => Self::Invalid,
		}
	}
}
