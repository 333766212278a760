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

//! Derivation of the signing account.

use crate::{config::SecretPhrase, Error, Result};
use log::*;
use sp_core::{sr25519, Pair};
use tokio::sync::OnceCell;

static CRYPTO_READY: OnceCell<()> = OnceCell::const_new();

const SELF_TEST_SEED: [u8; 32] = [0x42; 32];
const SELF_TEST_MESSAGE: &[u8] = b"contract-approve-action";

/// Resolves once the sr25519 primitives passed a sign and verify round.
///
/// The self test runs on the first call only, concurrent callers wait for it.
pub async fn crypto_wait_ready() -> Result<()> {
	CRYPTO_READY
		.get_or_try_init(|| async {
			let pair = sr25519::Pair::from_seed(&SELF_TEST_SEED);
			let signature = pair.sign(SELF_TEST_MESSAGE);
			if sr25519::Pair::verify(&signature, SELF_TEST_MESSAGE, &pair.public()) {
				debug!("sr25519 self test passed");
				Ok(())
			} else {
				error!("sr25519 self test failed");
				Err(Error::CryptoUnavailable)
			}
		})
		.await
		.map(|_| ())
}

/// Derive the sr25519 key pair of the secret uri `phrase`, e.g. `<mnemonic>//hard/soft`.
pub async fn signer_from_mnemonic(phrase: &SecretPhrase) -> Result<sr25519::Pair> {
	crypto_wait_ready().await?;
	// The error may contain parts of the phrase, it is therefore dropped.
	let pair =
		sr25519::Pair::from_string(phrase.expose(), None).map_err(|_| Error::InvalidMnemonic)?;
	info!("Signing as {}", pair.public());
	Ok(pair)
}
