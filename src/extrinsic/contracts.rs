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

//! Extrinsics for `pallet-contracts`.

use crate::{api::ChainApi, Error, Result};
use codec::{Compact, Encode, Output};
use contract_action_primitives::{ContractCall, Nonce};
use sp_core::crypto::AccountId32;
use sp_runtime::MultiAddress;
use substrate_api_client::ac_compose_macros::compose_extrinsic_with_nonce;

pub const MODULE: &str = "Contracts";
pub const CALL: &str = "call";

/// Address type of `Contracts::call` destinations, the default `AccountIdLookup`.
pub type ContractAddress = MultiAddress<AccountId32, ()>;

/// Arguments of `Contracts::call`, encoded in dispatchable order:
/// `dest`, `value`, `gas_limit`, `storage_deposit_limit`, `data`.
#[derive(Debug, Clone, Copy)]
pub struct CallArgs<'a>(pub &'a ContractCall);

impl Encode for CallArgs<'_> {
	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		let call = self.0;
		ContractAddress::Id(call.dest.clone()).encode_to(dest);
		Compact(call.value).encode_to(dest);
		call.gas_limit.encode_to(dest);
		call.storage_deposit_limit.map(Compact).encode_to(dest);
		call.data.encode_to(dest);
	}
}

/// Compose, sign with `nonce` and encode a `Contracts::call` extrinsic.
pub fn compose_contract_call(
	api: &ChainApi,
	call: &ContractCall,
	nonce: Nonce,
) -> Result<Vec<u8>> {
	let xt = compose_extrinsic_with_nonce!(api, nonce, MODULE, CALL, CallArgs(call))
		.ok_or(Error::ComposeExtrinsic { pallet: MODULE, call: CALL })?;
	Ok(xt.encode())
}
