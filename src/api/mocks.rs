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

use crate::{
	api::{Connect, ContractsApi, SubmittedExtrinsic, WatchExtrinsic},
	watch::ExtrinsicStatus,
	Error, Hash, Result,
};
use async_trait::async_trait;
use contract_action_primitives::{ContractCall, Nonce, Weight};
use sp_core::{crypto::AccountId32, sr25519, Pair};
use std::{
	collections::VecDeque,
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc, Mutex,
	},
};
use substrate_api_client::rpc;

/// Nonce the mocked node reports for every signer.
pub const ACCOUNT_NONCE: Nonce = 7;

/// Counts what happened to the mocks after they have been moved into the code under test.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
	connects: Arc<AtomicUsize>,
	releases: Arc<AtomicUsize>,
	unsubscribes: Arc<AtomicUsize>,
	signers: Arc<Mutex<Vec<AccountId32>>>,
	calls: Arc<Mutex<Vec<(ContractCall, Nonce)>>>,
}

impl Recorder {
	pub fn connects(&self) -> usize {
		self.connects.load(Ordering::SeqCst)
	}

	pub fn releases(&self) -> usize {
		self.releases.load(Ordering::SeqCst)
	}

	pub fn unsubscribed(&self) -> usize {
		self.unsubscribes.load(Ordering::SeqCst)
	}

	pub fn signers(&self) -> Vec<AccountId32> {
		self.signers.lock().unwrap().clone()
	}

	pub fn calls(&self) -> Vec<ContractCall> {
		self.calls.lock().unwrap().iter().map(|(call, _)| call.clone()).collect()
	}

	pub fn nonces(&self) -> Vec<Nonce> {
		self.calls.lock().unwrap().iter().map(|(_, nonce)| *nonce).collect()
	}
}

/// Replays a fixed list of statuses.
#[derive(Debug)]
pub struct StatusStreamMock {
	statuses: VecDeque<ExtrinsicStatus>,
	pending_when_drained: bool,
	recorder: Recorder,
}

impl StatusStreamMock {
	/// Closes the stream after the last status.
	pub fn new(statuses: Vec<ExtrinsicStatus>) -> (Self, Recorder) {
		let recorder = Recorder::default();
		(Self::with_recorder(statuses, false, recorder.clone()), recorder)
	}

	/// Never yields anything after the last status.
	pub fn pending_after(statuses: Vec<ExtrinsicStatus>) -> (Self, Recorder) {
		let recorder = Recorder::default();
		(Self::with_recorder(statuses, true, recorder.clone()), recorder)
	}

	fn with_recorder(
		statuses: Vec<ExtrinsicStatus>,
		pending_when_drained: bool,
		recorder: Recorder,
	) -> Self {
		Self { statuses: statuses.into(), pending_when_drained, recorder }
	}
}

#[async_trait(?Send)]
impl WatchExtrinsic for StatusStreamMock {
	async fn next_status(&mut self) -> Option<Result<ExtrinsicStatus>> {
		match self.statuses.pop_front() {
			Some(status) => Some(Ok(status)),
			None if self.pending_when_drained => std::future::pending().await,
			None => None,
		}
	}

	async fn unsubscribe(self) -> Result<()> {
		self.recorder.unsubscribes.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

/// Hands out [`ConnectionMock`]s which answer with the configured chain behaviour.
#[derive(Debug, Clone)]
pub struct ConnectorMock {
	max_extrinsic: Option<Weight>,
	statuses: Vec<ExtrinsicStatus>,
	pending_when_drained: bool,
	nonce_available: bool,
	recorder: Recorder,
}

impl ConnectorMock {
	pub fn new(max_extrinsic: Option<Weight>, statuses: Vec<ExtrinsicStatus>) -> (Self, Recorder) {
		let recorder = Recorder::default();
		let connector = Self {
			max_extrinsic,
			statuses,
			pending_when_drained: false,
			nonce_available: true,
			recorder: recorder.clone(),
		};
		(connector, recorder)
	}

	pub fn pending_after(
		max_extrinsic: Option<Weight>,
		statuses: Vec<ExtrinsicStatus>,
	) -> (Self, Recorder) {
		let (mut connector, recorder) = Self::new(max_extrinsic, statuses);
		connector.pending_when_drained = true;
		(connector, recorder)
	}

	/// The node closes the connection when asked for the account nonce.
	pub fn without_nonce(max_extrinsic: Option<Weight>) -> (Self, Recorder) {
		let (mut connector, recorder) = Self::new(max_extrinsic, vec![]);
		connector.nonce_available = false;
		(connector, recorder)
	}
}

#[async_trait(?Send)]
impl Connect for ConnectorMock {
	type Connection = ConnectionMock;

	async fn connect(&self, _url: &str, signer: sr25519::Pair) -> Result<Self::Connection> {
		self.recorder.connects.fetch_add(1, Ordering::SeqCst);
		self.recorder.signers.lock().unwrap().push(signer.public().into());
		Ok(ConnectionMock { connector: self.clone() })
	}
}

#[derive(Debug)]
pub struct ConnectionMock {
	connector: ConnectorMock,
}

#[async_trait(?Send)]
impl ContractsApi for ConnectionMock {
	type Watch = StatusStreamMock;

	async fn max_extrinsic_weight(&self) -> Option<Weight> {
		self.connector.max_extrinsic
	}

	async fn account_nonce(&self) -> Result<Nonce> {
		if self.connector.nonce_available {
			Ok(ACCOUNT_NONCE)
		} else {
			Err(Error::Rpc(rpc::Error::ConnectionClosed))
		}
	}

	async fn submit_and_watch_call(
		&self,
		call: &ContractCall,
		nonce: Nonce,
	) -> Result<SubmittedExtrinsic<Self::Watch>> {
		let recorder = &self.connector.recorder;
		recorder.calls.lock().unwrap().push((call.clone(), nonce));
		let watch = StatusStreamMock::with_recorder(
			self.connector.statuses.clone(),
			self.connector.pending_when_drained,
			recorder.clone(),
		);
		Ok(SubmittedExtrinsic { extrinsic_hash: Hash::repeat_byte(0xee), watch })
	}

	async fn release(self) {
		self.connector.recorder.releases.fetch_add(1, Ordering::SeqCst);
	}
}
