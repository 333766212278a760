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

//! A single run of the action: approve one contribution and report the finalized transaction.

use crate::{
	api::{Connect, ContractsApi, SubmittedExtrinsic},
	config::{ActionConfig, ActionInputs},
	host::ActionHost,
	keyring::signer_from_mnemonic,
	watch::watch_until_terminal,
	Hash, Result,
};
use contract_action_primitives::{derive_gas_limit, ContractCall, Weight};
use log::*;

/// Contract message called by the action.
pub const APPROVE_MESSAGE: &str = "approve";

pub const HASH_OUTPUT: &str = "hash";
pub const BLOCK_OUTPUT: &str = "block";

/// A transaction included in a finalized block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finalized {
	pub extrinsic_hash: Hash,
	pub block_hash: Hash,
}

/// Run the action and report its outcome to `host`.
///
/// Returns whether the run succeeded. Failures are reported to the host exactly once.
pub async fn run<Host, Connector>(host: &mut Host, connector: &Connector, inputs: ActionInputs) -> bool
where
	Host: ActionHost,
	Connector: Connect,
{
	let outcome = match execute(connector, inputs).await {
		Ok(finalized) => report(host, &finalized),
		Err(e) => Err(e),
	};
	match outcome {
		Ok(()) => true,
		Err(e) => {
			error!("{e}");
			host.set_failed(&e.to_string());
			false
		},
	}
}

/// Validate `inputs`, then submit the `approve` call and wait for its finalization.
///
/// Nothing is sent to the node unless all inputs are valid. Once connected, the
/// connection is released before returning, whatever the outcome.
pub async fn execute<Connector: Connect>(
	connector: &Connector,
	inputs: ActionInputs,
) -> Result<Finalized> {
	let config = ActionConfig::try_from(inputs)?;
	let call_data = config.contract_abi.encode_call(
		APPROVE_MESSAGE,
		&[&config.contribution_id.to_string(), &config.contributor],
	)?;
	let signer = signer_from_mnemonic(&config.mnemonic).await?;

	let connection = connector.connect(&config.ws_provider_url, signer).await?;
	let outcome = approve(&connection, &config, call_data).await;
	connection.release().await;
	outcome
}

async fn approve<Api: ContractsApi>(
	connection: &Api,
	config: &ActionConfig,
	call_data: Vec<u8>,
) -> Result<Finalized> {
	let max_extrinsic = connection.max_extrinsic_weight().await;
	let gas_limit = derive_gas_limit(max_extrinsic, config.gas_reduction);
	if gas_limit == Weight::zero() {
		warn!("Chain advertises no maximal extrinsic weight, submitting with a zero gas limit");
	}
	info!(
		"Approving contribution {} of {} on contract {} with gas limit {gas_limit:?}",
		config.contribution_id, config.contributor, config.contract_address
	);

	let nonce = connection.account_nonce().await?;
	let call = ContractCall::new(config.contract_address.clone(), gas_limit, call_data);
	let SubmittedExtrinsic { extrinsic_hash, watch } =
		connection.submit_and_watch_call(&call, nonce).await?;
	info!("Submitted extrinsic {extrinsic_hash:?}");

	let block_hash = watch_until_terminal(watch, config.finalization_timeout).await?;
	Ok(Finalized { extrinsic_hash, block_hash })
}

fn report<Host: ActionHost>(host: &mut Host, finalized: &Finalized) -> Result<()> {
	let extrinsic_hash = hex_string(&finalized.extrinsic_hash);
	let block_hash = hex_string(&finalized.block_hash);
	host.set_outputs(&[(HASH_OUTPUT, &extrinsic_hash), (BLOCK_OUTPUT, &block_hash)])
}

fn hex_string(hash: &Hash) -> String {
	format!("0x{}", hex::encode(hash))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		api::mocks::{ConnectorMock, ACCOUNT_NONCE},
		host::mocks::HostMock,
		watch::ExtrinsicStatus,
	};
	use sp_core::crypto::{AccountId32, Ss58Codec};

	const ABI: &str = include_str!("contract/fixtures/contributions_v4.json");
	const CONTRACT: &str = "5D5x653PxChSTBczHzjveBvda85oPG4CwZYYkq2qAujeEP49";
	const CONTRIBUTOR: &str = "5GspWdbeG69eH6nNnZBhjY3ay15SVfxwt5zapxbVkDQP27Vy";
	const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

	fn inputs() -> ActionInputs {
		ActionInputs {
			ws_provider_url: Some("ws://127.0.0.1:9944".into()),
			mnemonic_phrase: Some("//Alice".into()),
			contract_address: Some(CONTRACT.into()),
			contract_abi: Some(ABI.into()),
			contribution_id: Some("1".into()),
			contributor: Some(CONTRIBUTOR.into()),
			..Default::default()
		}
	}

	fn max_extrinsic() -> Weight {
		Weight::from_parts(299_875_000_000, 3_932_160)
	}

	fn finalized_in(block: Hash) -> Vec<ExtrinsicStatus> {
		vec![
			ExtrinsicStatus::Ready,
			ExtrinsicStatus::Broadcast(vec!["peer".into()]),
			ExtrinsicStatus::InBlock(block),
			ExtrinsicStatus::Finalized(block),
		]
	}

	#[tokio::test]
	async fn missing_input_fails_before_connecting() {
		let (connector, recorder) = ConnectorMock::new(Some(max_extrinsic()), vec![]);
		let mut host = HostMock::default();

		let succeeded =
			run(&mut host, &connector, ActionInputs { contributor: None, ..inputs() }).await;

		assert!(!succeeded);
		assert_eq!(recorder.connects(), 0);
		assert_eq!(host.failures, ["Input required and not supplied: contributor"]);
		assert!(host.outputs.is_empty());
	}

	#[tokio::test]
	async fn unencodable_argument_fails_before_connecting() {
		let (connector, recorder) = ConnectorMock::new(Some(max_extrinsic()), vec![]);
		let mut host = HostMock::default();
		let inputs = ActionInputs { contribution_id: Some("18446744073709551616".into()), ..inputs() };

		assert!(!run(&mut host, &connector, inputs).await);

		assert_eq!(recorder.connects(), 0);
		assert_eq!(host.failures.len(), 1);
		assert!(host.failures[0].contains("contribution_id"), "{}", host.failures[0]);
	}

	#[tokio::test]
	async fn invalid_mnemonic_fails_before_connecting() {
		let (connector, recorder) = ConnectorMock::new(Some(max_extrinsic()), vec![]);
		let mut host = HostMock::default();
		let inputs = ActionInputs { mnemonic_phrase: Some("not a mnemonic".into()), ..inputs() };

		assert!(!run(&mut host, &connector, inputs).await);

		assert_eq!(recorder.connects(), 0);
		assert_eq!(host.failures.len(), 1);
	}

	#[tokio::test]
	async fn finalized_transaction_is_reported_once() {
		let block = Hash::repeat_byte(3);
		let (connector, recorder) = ConnectorMock::new(Some(max_extrinsic()), finalized_in(block));
		let mut host = HostMock::default();

		assert!(run(&mut host, &connector, inputs()).await);

		assert!(host.failures.is_empty());
		assert_eq!(
			host.outputs,
			[
				(HASH_OUTPUT.to_string(), format!("0x{}", "ee".repeat(32))),
				(BLOCK_OUTPUT.to_string(), format!("0x{}", "03".repeat(32))),
			]
		);
		assert_eq!(recorder.connects(), 1);
		assert_eq!(recorder.releases(), 1);
		assert_eq!(recorder.unsubscribed(), 1);
		assert_eq!(recorder.signers(), [AccountId32::from_ss58check(ALICE).unwrap()]);
	}

	#[tokio::test]
	async fn call_is_signed_with_the_account_nonce_of_the_node() {
		let (connector, recorder) =
			ConnectorMock::new(Some(max_extrinsic()), finalized_in(Hash::repeat_byte(3)));

		execute(&connector, inputs()).await.unwrap();

		assert_eq!(recorder.nonces(), [ACCOUNT_NONCE]);
	}

	#[tokio::test]
	async fn unavailable_account_nonce_is_reported_once() {
		let (connector, recorder) = ConnectorMock::without_nonce(Some(max_extrinsic()));
		let mut host = HostMock::default();

		assert!(!run(&mut host, &connector, inputs()).await);

		assert_eq!(host.failures, ["Rpc client error: ConnectionClosed"]);
		assert!(host.outputs.is_empty());
		assert!(recorder.calls().is_empty());
		assert_eq!(recorder.releases(), 1);
	}

	#[tokio::test]
	async fn rejected_outputs_leave_no_partial_result() {
		let (connector, recorder) =
			ConnectorMock::new(Some(max_extrinsic()), finalized_in(Hash::repeat_byte(3)));
		let mut host = HostMock { reject_outputs: true, ..Default::default() };

		assert!(!run(&mut host, &connector, inputs()).await);

		assert!(host.output(HASH_OUTPUT).is_none());
		assert!(host.output(BLOCK_OUTPUT).is_none());
		assert_eq!(host.failures.len(), 1);
		let failure = &host.failures[0];
		assert!(failure.starts_with("Could not write action output"), "{failure}");
		assert_eq!(recorder.releases(), 1);
	}

	#[tokio::test]
	async fn submitted_call_approves_contribution_with_reduced_gas_limit() {
		let (connector, recorder) =
			ConnectorMock::new(Some(max_extrinsic()), finalized_in(Hash::repeat_byte(3)));

		execute(&connector, inputs()).await.unwrap();

		let calls = recorder.calls();
		assert_eq!(calls.len(), 1);
		let call = &calls[0];
		assert_eq!(call.dest, AccountId32::from_ss58check(CONTRACT).unwrap());
		assert_eq!(call.value, 0);
		assert_eq!(call.storage_deposit_limit, None);
		assert_eq!(call.gas_limit, Weight::from_parts(239_900_000_000, 3_145_728));
		assert_eq!(&call.data[..4], &[0x68, 0x12, 0x66, 0xa0]);
		assert_eq!(&call.data[4..12], &1u64.to_le_bytes());
		let contributor = AccountId32::from_ss58check(CONTRIBUTOR).unwrap();
		assert_eq!(&call.data[12..], AsRef::<[u8]>::as_ref(&contributor));
	}

	#[tokio::test]
	async fn missing_block_weights_submit_zero_gas_limit() {
		let (connector, recorder) = ConnectorMock::new(None, finalized_in(Hash::repeat_byte(3)));

		execute(&connector, inputs()).await.unwrap();

		assert_eq!(recorder.calls()[0].gas_limit, Weight::zero());
	}

	#[tokio::test]
	async fn errored_transaction_is_reported_once() {
		let statuses = vec![ExtrinsicStatus::Ready, ExtrinsicStatus::Invalid];
		let (connector, recorder) = ConnectorMock::new(Some(max_extrinsic()), statuses);
		let mut host = HostMock::default();

		assert!(!run(&mut host, &connector, inputs()).await);

		assert_eq!(host.failures, ["Transaction failed: no longer valid in the current chain state"]);
		assert!(host.outputs.is_empty());
		assert_eq!(recorder.releases(), 1);
	}

	#[tokio::test]
	async fn closed_status_stream_is_reported_once() {
		let block = Hash::repeat_byte(5);
		let (connector, recorder) =
			ConnectorMock::new(Some(max_extrinsic()), vec![ExtrinsicStatus::InBlock(block)]);
		let mut host = HostMock::default();

		assert!(!run(&mut host, &connector, inputs()).await);

		assert_eq!(host.failures.len(), 1);
		assert!(host.failures[0].contains("stream closed"), "{}", host.failures[0]);
		assert!(host.output(HASH_OUTPUT).is_none());
		assert_eq!(recorder.releases(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn finalization_timeout_is_reported_once() {
		let (connector, recorder) =
			ConnectorMock::pending_after(Some(max_extrinsic()), vec![ExtrinsicStatus::Ready]);
		let mut host = HostMock::default();
		let inputs = ActionInputs { finalization_timeout: Some("5".into()), ..inputs() };

		assert!(!run(&mut host, &connector, inputs).await);

		assert_eq!(host.failures.len(), 1);
		assert!(host.failures[0].contains("not finalized within 5s"), "{}", host.failures[0]);
		assert_eq!(recorder.releases(), 1);
		assert_eq!(recorder.unsubscribed(), 1);
	}
}
