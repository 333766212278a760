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

//! Primitive types shared by the contract-approve-action: the weight limits
//! read from the chain and the contract call submitted to it.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use contract_call::*;
pub use weights::*;

pub mod contract_call;
pub mod weights;

/// Hash type of the targeted runtimes.
pub type Hash = sp_core::H256;

/// Balance type of the targeted runtimes.
pub type Balance = u128;

/// Account nonce type of the targeted runtimes.
pub type Nonce = u32;
