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

//! Runtime configuration of the targeted chains.
//!
//! Their signed extensions, in runtime order: `CheckNonZeroSender`, `CheckSpecVersion`,
//! `CheckTxVersion`, `CheckGenesis`, `CheckEra`, `CheckNonce`, `CheckWeight` and
//! `ChargeTransactionPayment`. There is no `CheckMetadataHash`, so neither the
//! extension nor the implicit carry a metadata hash.

use contract_action_primitives::{Balance, Hash, Nonce};
use sp_runtime::generic::Era;
use substrate_api_client::ac_primitives::{
	extrinsic_params_without_hash_check::{ImplicitWithoutHashCheck, TxExtensionWithoutHashCheck},
	DefaultRuntimeConfig, ExtrinsicParams, GenericAdditionalParams, PlainTip, WithExtrinsicParams,
};

pub type ChainTip = PlainTip<Balance>;

/// [`DefaultRuntimeConfig`] signing with [`ChainExtrinsicParams`].
pub type ChainConfig = WithExtrinsicParams<DefaultRuntimeConfig, ChainExtrinsicParams>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainExtrinsicParams {
	era: Era,
	nonce: Nonce,
	tip: ChainTip,
	spec_version: u32,
	transaction_version: u32,
	genesis_hash: Hash,
	mortality_checkpoint: Hash,
}

impl ExtrinsicParams<Nonce, Hash> for ChainExtrinsicParams {
	type AdditionalParams = GenericAdditionalParams<ChainTip, Hash>;
	type TxExtension = TxExtensionWithoutHashCheck<ChainTip, Nonce>;
	type Implicit = ImplicitWithoutHashCheck<Hash>;

	fn new(
		spec_version: u32,
		transaction_version: u32,
		nonce: Nonce,
		genesis_hash: Hash,
		additional_params: Self::AdditionalParams,
	) -> Self {
		Self {
			era: additional_params.era,
			nonce,
			tip: additional_params.tip,
			spec_version,
			transaction_version,
			genesis_hash,
			// Immortal transactions are checked against the genesis block.
			mortality_checkpoint: additional_params.mortality_checkpoint.unwrap_or(genesis_hash),
		}
	}

	fn transaction_extension(&self) -> Self::TxExtension {
		TxExtensionWithoutHashCheck::new(self.era, self.nonce, self.tip)
	}

	fn implicit(&self) -> Self::Implicit {
		(
			(),
			self.spec_version,
			self.transaction_version,
			self.genesis_hash,
			self.mortality_checkpoint,
			(),
			(),
			(),
		)
	}
}
