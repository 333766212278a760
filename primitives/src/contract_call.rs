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

use crate::{Balance, Weight};
use alloc::vec::Vec;
use sp_core::crypto::AccountId32;

/// Arguments of a `Contracts::call` dispatchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
	/// Address of the contract to call.
	pub dest: AccountId32,
	/// Balance transferred to the contract along with the call.
	pub value: Balance,
	/// Resource ceiling of the call.
	pub gas_limit: Weight,
	/// Maximum storage deposit the caller pays. `None` means no limit.
	pub storage_deposit_limit: Option<Balance>,
	/// Selector followed by the SCALE encoded message arguments.
	pub data: Vec<u8>,
}

impl ContractCall {
	/// A call transferring no value and without storage deposit limit.
	pub fn new(dest: AccountId32, gas_limit: Weight, data: Vec<u8>) -> Self {
		Self { dest, value: 0, gas_limit, storage_deposit_limit: None, data }
	}
}
