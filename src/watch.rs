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

//! Observation of a submitted extrinsic until it reaches a terminal status.
//!
//! [`observe`] maps the current [`WatchState`] and an incoming [`ExtrinsicStatus`]
//! to the next state and the effect the caller has to act on. [`watch_until_terminal`]
//! drives a status subscription through it.

use crate::{api::WatchExtrinsic, Error, Hash, Result};
use core::fmt;
use log::*;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// Possible transaction status events.
// Same variants as `TransactionStatus` of `sc-transaction-pool`, with both hashes fixed to `Hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtrinsicStatus {
	/// Transaction is part of the future queue.
	Future,
	/// Transaction is part of the ready queue.
	Ready,
	/// The transaction has been broadcast to the given peers.
	Broadcast(Vec<String>),
	/// Transaction has been included in block with given hash.
	InBlock(Hash),
	/// The block this transaction was included in has been retracted.
	Retracted(Hash),
	/// Maximum number of finality watchers has been reached,
	/// old watchers are being removed.
	FinalityTimeout(Hash),
	/// Transaction has been finalized by a finality-gadget, e.g GRANDPA
	Finalized(Hash),
	/// Transaction has been replaced in the pool, by another transaction
	/// that provides the same tags. (e.g. same (sender, nonce)).
	Usurped(Hash),
	/// Transaction has been dropped from the pool because of the limit.
	Dropped,
	/// Transaction is no longer valid in the current state.
	Invalid,
}

impl fmt::Display for ExtrinsicStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Future => write!(f, "future"),
			Self::Ready => write!(f, "ready"),
			Self::Broadcast(peers) => write!(f, "broadcast to {} peers", peers.len()),
			Self::InBlock(block) => write!(f, "in block {block:?}"),
			Self::Retracted(block) => write!(f, "retracted from block {block:?}"),
			Self::FinalityTimeout(block) => write!(f, "finality timeout in block {block:?}"),
			Self::Finalized(block) => write!(f, "finalized in block {block:?}"),
			Self::Usurped(hash) => write!(f, "usurped by {hash:?}"),
			Self::Dropped => write!(f, "dropped"),
			Self::Invalid => write!(f, "invalid"),
		}
	}
}

/// Progress of a watched extrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
	Submitted,
	InBlock(Hash),
	Finalized(Hash),
	Errored,
}

impl WatchState {
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Finalized(_) | Self::Errored)
	}
}

impl fmt::Display for WatchState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Submitted => write!(f, "submitted"),
			Self::InBlock(block) => write!(f, "in block {block:?}"),
			Self::Finalized(block) => write!(f, "finalized in block {block:?}"),
			Self::Errored => write!(f, "errored"),
		}
	}
}

/// Reason a submitted extrinsic did not make it into a finalized block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxFailure {
	FinalityTimeout(Hash),
	Usurped(Hash),
	Dropped,
	Invalid,
}

impl fmt::Display for TxFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::FinalityTimeout(block) =>
				write!(f, "finality watcher timed out, last seen in block {block:?}"),
			Self::Usurped(hash) => write!(f, "replaced in the pool by transaction {hash:?}"),
			Self::Dropped => write!(f, "dropped from the transaction pool"),
			Self::Invalid => write!(f, "no longer valid in the current chain state"),
		}
	}
}

/// What the caller has to do after a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
	None,
	Finalized(Hash),
	Failed(TxFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
	pub next: WatchState,
	pub effect: Effect,
}

impl Transition {
	fn to(next: WatchState) -> Self {
		Self { next, effect: Effect::None }
	}

	fn failed(failure: TxFailure) -> Self {
		Self { next: WatchState::Errored, effect: Effect::Failed(failure) }
	}
}

/// Apply `status` to `state`.
///
/// Statuses arriving after a terminal state are not modeled and result in an error.
pub fn observe(state: WatchState, status: &ExtrinsicStatus) -> Result<Transition> {
	if state.is_terminal() {
		return Err(Error::UnexpectedStatus { state, status: status.to_string() })
	}
	let transition = match status {
		ExtrinsicStatus::Future | ExtrinsicStatus::Ready | ExtrinsicStatus::Broadcast(_) => {
			debug!("Extrinsic is {status}");
			Transition::to(state)
		},
		ExtrinsicStatus::InBlock(block) => {
			info!("Extrinsic included in block {block:?}");
			Transition::to(WatchState::InBlock(*block))
		},
		ExtrinsicStatus::Retracted(block) => {
			warn!("Block {block:?} including the extrinsic has been retracted");
			Transition::to(WatchState::Submitted)
		},
		ExtrinsicStatus::Finalized(block) => {
			info!("Extrinsic finalized in block {block:?}");
			Transition { next: WatchState::Finalized(*block), effect: Effect::Finalized(*block) }
		},
		ExtrinsicStatus::FinalityTimeout(block) =>
			Transition::failed(TxFailure::FinalityTimeout(*block)),
		ExtrinsicStatus::Usurped(hash) => Transition::failed(TxFailure::Usurped(*hash)),
		ExtrinsicStatus::Dropped => Transition::failed(TxFailure::Dropped),
		ExtrinsicStatus::Invalid => Transition::failed(TxFailure::Invalid),
	};
	Ok(transition)
}

/// Watch the extrinsic until it is finalized or errored and return the finalized block hash.
///
/// The subscription is closed in any case. A subscription ending without a terminal
/// status or exceeding `timeout` is reported as an error.
pub async fn watch_until_terminal<Watch: WatchExtrinsic>(
	mut watch: Watch,
	timeout: Duration,
) -> Result<Hash> {
	let outcome = next_terminal(&mut watch, timeout).await;
	if let Err(e) = watch.unsubscribe().await {
		// Nodes close the subscription themselves once a terminal status has been sent.
		debug!("Could not unsubscribe from extrinsic status updates: {e}");
	}
	outcome
}

async fn next_terminal<Watch: WatchExtrinsic>(
	watch: &mut Watch,
	timeout: Duration,
) -> Result<Hash> {
	let deadline = Instant::now() + timeout;
	let mut state = WatchState::Submitted;
	loop {
		let status = match timeout_at(deadline, watch.next_status()).await {
			Ok(Some(status)) => status?,
			Ok(None) => return Err(Error::StreamClosed(state)),
			Err(_elapsed) => return Err(Error::FinalizationTimeout { timeout, state }),
		};
		let transition = observe(state, &status)?;
		state = transition.next;
		match transition.effect {
			Effect::None => trace!("Waiting for the next extrinsic status, currently {state}"),
			Effect::Finalized(block_hash) => return Ok(block_hash),
			Effect::Failed(failure) => return Err(Error::Transaction(failure)),
		}
	}
}
