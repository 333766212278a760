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

use crate::{contract::encode_argument, Error, Result};
use log::*;
use scale_info::PortableRegistry;
use serde::Deserialize;

/// Key wrapping the project of ink! v3 metadata documents.
const V3_KEY: &str = "V3";

/// Messages and type registry of an ink! contract.
///
/// Accepts the metadata layout of ink! 4 and 5, as well as the `V3` wrapped
/// layout of ink! 3.
#[derive(Debug, Clone)]
pub struct ContractMetadata {
	messages: Vec<MessageSpec>,
	registry: PortableRegistry,
}

#[derive(Debug, Deserialize)]
struct InkProject {
	spec: ContractSpec,
	#[serde(flatten)]
	registry: PortableRegistry,
}

#[derive(Debug, Deserialize)]
struct ContractSpec {
	#[serde(default)]
	messages: Vec<MessageSpec>,
}

/// A callable message of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageSpec {
	pub label: String,
	/// Hex encoded 4 byte selector, e.g. `0x681266a0`.
	pub selector: String,
	#[serde(default)]
	pub args: Vec<MessageParamSpec>,
	#[serde(default)]
	pub mutates: bool,
	#[serde(default)]
	pub payable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageParamSpec {
	pub label: String,
	#[serde(rename = "type")]
	pub ty: TypeSpec,
}

/// Reference into the type registry, together with the name the type has in the contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
	#[serde(rename = "type")]
	pub id: u32,
	#[serde(default)]
	pub display_name: Vec<String>,
}

impl TypeSpec {
	pub fn display_name(&self) -> String {
		self.display_name.join("::")
	}
}

impl MessageSpec {
	pub fn selector(&self) -> Result<[u8; 4]> {
		let invalid =
			|| Error::InvalidSelector { message: self.label.clone(), selector: self.selector.clone() };
		let bytes = hex::decode(self.selector.trim_start_matches("0x")).map_err(|_| invalid())?;
		bytes.try_into().map_err(|_| invalid())
	}
}

impl ContractMetadata {
	pub fn parse(json: &str) -> Result<Self> {
		let mut document: serde_json::Value = serde_json::from_str(json)?;
		let project = match document.get_mut(V3_KEY) {
			Some(project) => {
				debug!("Reading ink! v3 contract metadata");
				project.take()
			},
			None => document,
		};
		let InkProject { spec, registry } = serde_json::from_value(project)?;
		debug!(
			"Contract metadata with {} messages and {} types",
			spec.messages.len(),
			registry.types.len()
		);
		Ok(Self { messages: spec.messages, registry })
	}

	pub fn messages(&self) -> &[MessageSpec] {
		&self.messages
	}

	pub fn registry(&self) -> &PortableRegistry {
		&self.registry
	}

	pub fn message(&self, label: &str) -> Result<&MessageSpec> {
		self.messages
			.iter()
			.find(|message| message.label == label)
			.ok_or_else(|| Error::MessageNotFound(label.into()))
	}

	/// Encode a call of message `label`: its selector followed by the SCALE encoded `args`.
	///
	/// Arguments are given as strings and parsed according to the type the message
	/// declares for them.
	pub fn encode_call(&self, label: &str, args: &[&str]) -> Result<Vec<u8>> {
		let message = self.message(label)?;
		if message.args.len() != args.len() {
			return Err(Error::ArgumentCount {
				message: label.into(),
				expected: message.args.len(),
				actual: args.len(),
			})
		}
		let mut data = message.selector()?.to_vec();
		for (param, value) in message.args.iter().zip(args) {
			trace!("Encoding argument `{}` of type {}", param.label, param.ty.display_name());
			encode_argument(&self.registry, param.ty.id, value, &mut data).map_err(|reason| {
				Error::Encode { argument: param.label.clone(), reason }
			})?;
		}
		Ok(data)
	}
}
