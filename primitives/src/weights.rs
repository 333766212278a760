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

//! Block weight limits as advertised by the `System` pallet and the
//! derivation of a contract call gas limit from them.

use codec::{Decode, Encode};
use core::{fmt, str::FromStr};
pub use sp_weights::Weight;

/// Fraction of the maximum extrinsic weight used when no other factor is configured.
pub const DEFAULT_REDUCTION_PERCENT: u8 = 80;

/// `System.BlockWeights` constant.
// Exact structure from
// https://github.com/paritytech/polkadot-sdk/blob/master/substrate/frame/system/src/limits.rs
// Mirrored so we don't need frame-system, which is not no-std compatible in all versions.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockWeights {
	/// Base weight of block execution.
	pub base_block: Weight,
	/// Maximal total weight consumed by all kinds of extrinsics (without `reserved` space).
	pub max_block: Weight,
	/// Weight limits for extrinsics of given dispatch class.
	pub per_class: PerDispatchClass<WeightsPerClass>,
}

impl BlockWeights {
	/// Maximal weight of a single `Normal` extrinsic, the class contract calls are dispatched with.
	pub fn max_extrinsic(&self) -> Option<Weight> {
		self.per_class.normal.max_extrinsic
	}
}

/// `WeightsPerClass` from `frame_system::limits`.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightsPerClass {
	/// Base weight of single extrinsic of given class.
	pub base_extrinsic: Weight,
	/// Maximal weight of single extrinsic. `None` means unlimited.
	pub max_extrinsic: Option<Weight>,
	/// Block maximal total weight for all extrinsics of given class.
	pub max_total: Option<Weight>,
	/// Block reserved allowance for all extrinsics of a particular class.
	pub reserved: Option<Weight>,
}

/// `PerDispatchClass` from `frame_support::dispatch`.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerDispatchClass<T> {
	pub normal: T,
	pub operational: T,
	pub mandatory: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReductionFactorError {
	/// The factor is not a number.
	Invalid(alloc::string::String),
	/// The factor lies outside of (0, 1].
	OutOfRange(f64),
}

impl fmt::Display for ReductionFactorError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Invalid(value) => write!(f, "reduction factor `{value}` is not a number"),
			Self::OutOfRange(value) =>
				write!(f, "reduction factor {value} must be greater than 0 and at most 1"),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for ReductionFactorError {}

/// Share of the advertised maximum extrinsic weight a call may use.
///
/// Only whole percents are kept: a factor `r` is applied as `floor(r * 100) / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionFactor {
	percent: u8,
}

impl ReductionFactor {
	pub fn new(factor: f64) -> Result<Self, ReductionFactorError> {
		if !(factor > 0.0 && factor <= 1.0) {
			return Err(ReductionFactorError::OutOfRange(factor))
		}
		// In range (0, 100], the cast can not truncate.
		let percent = (factor * 100.0) as u8;
		Ok(Self { percent })
	}

	pub const fn percent(&self) -> u8 {
		self.percent
	}
}

impl Default for ReductionFactor {
	fn default() -> Self {
		Self { percent: DEFAULT_REDUCTION_PERCENT }
	}
}

impl FromStr for ReductionFactor {
	type Err = ReductionFactorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let factor: f64 =
			s.trim().parse().map_err(|_| ReductionFactorError::Invalid(s.into()))?;
		Self::new(factor)
	}
}

/// Derive the gas limit of a contract call from the maximum extrinsic weight of the chain.
///
/// Each weight component is scaled by the reduction factor. An absent maximum results
/// in a zero limit, with which the chain will reject the call.
pub fn derive_gas_limit(max_extrinsic: Option<Weight>, factor: ReductionFactor) -> Weight {
	match max_extrinsic {
		Some(max) => Weight::from_parts(
			scale(max.ref_time(), factor.percent()),
			scale(max.proof_size(), factor.percent()),
		),
		None => Weight::zero(),
	}
}

fn scale(value: u64, percent: u8) -> u64 {
	// percent <= 100, so the result never exceeds `value` and always fits back into u64.
	(u128::from(value) * u128::from(percent) / 100) as u64
}
