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

//! CI action approving a contribution on an ink! contract.
//!
//! The action reads its inputs, signs a `Contracts::call` of the contract message
//! `approve(contribution_id, contributor)`, submits it with a gas limit derived from
//! the chain's `System::BlockWeights` and reports the transaction hash and the
//! finalized block to the runner.

pub use action::{execute, run, Finalized};
pub use contract_action_primitives as primitives;
pub use contract_action_primitives::Hash;
pub use error::{Error, Result};

pub mod action;
pub mod api;
pub mod config;
pub mod contract;
pub mod error;
pub mod extrinsic;
pub mod host;
pub mod keyring;
pub mod watch;
