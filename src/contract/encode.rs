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

//! SCALE encoding of message arguments given as strings.

use codec::{Compact, Encode};
use core::{any::type_name, str::FromStr};
use scale_info::{form::PortableForm, PortableRegistry, Type, TypeDef, TypeDefPrimitive};
use sp_core::crypto::{AccountId32, Ss58Codec};

pub type EncodeResult = core::result::Result<(), String>;

/// Encode `value` as the registry type `type_id` and append it to `out`.
///
/// Supported are booleans, strings, integers up to 128 bit (plain and compact),
/// byte arrays given as hex and single field wrappers of those, such as `AccountId`.
/// 32 byte arrays additionally accept SS58 addresses.
pub fn encode_argument(
	registry: &PortableRegistry,
	type_id: u32,
	value: &str,
	out: &mut Vec<u8>,
) -> EncodeResult {
	let ty = registry
		.resolve(type_id)
		.ok_or_else(|| format!("type {type_id} is missing in the type registry"))?;
	match &ty.type_def {
		TypeDef::Primitive(primitive) => encode_primitive(primitive, value, out),
		TypeDef::Compact(compact) => encode_compact(registry, compact.type_param.id, value, out),
		TypeDef::Array(array) => encode_byte_array(registry, array.len, array.type_param.id, value, out),
		TypeDef::Composite(composite) if composite.fields.len() == 1 =>
			encode_argument(registry, composite.fields[0].ty.id, value, out),
		_ => Err(format!("arguments of type {} are not supported", describe(ty))),
	}
}

fn encode_primitive(primitive: &TypeDefPrimitive, value: &str, out: &mut Vec<u8>) -> EncodeResult {
	match primitive {
		TypeDefPrimitive::Bool => parse::<bool>(value)?.encode_to(out),
		TypeDefPrimitive::Str => value.encode_to(out),
		TypeDefPrimitive::U8 => parse::<u8>(value)?.encode_to(out),
		TypeDefPrimitive::U16 => parse::<u16>(value)?.encode_to(out),
		TypeDefPrimitive::U32 => parse::<u32>(value)?.encode_to(out),
		TypeDefPrimitive::U64 => parse::<u64>(value)?.encode_to(out),
		TypeDefPrimitive::U128 => parse::<u128>(value)?.encode_to(out),
		TypeDefPrimitive::I8 => parse::<i8>(value)?.encode_to(out),
		TypeDefPrimitive::I16 => parse::<i16>(value)?.encode_to(out),
		TypeDefPrimitive::I32 => parse::<i32>(value)?.encode_to(out),
		TypeDefPrimitive::I64 => parse::<i64>(value)?.encode_to(out),
		TypeDefPrimitive::I128 => parse::<i128>(value)?.encode_to(out),
		other => return Err(format!("arguments of type {other:?} are not supported")),
	}
	Ok(())
}

fn encode_compact(
	registry: &PortableRegistry,
	type_id: u32,
	value: &str,
	out: &mut Vec<u8>,
) -> EncodeResult {
	let inner = registry
		.resolve(type_id)
		.ok_or_else(|| format!("type {type_id} is missing in the type registry"))?;
	match &inner.type_def {
		TypeDef::Primitive(TypeDefPrimitive::U8) => Compact(parse::<u8>(value)?).encode_to(out),
		TypeDef::Primitive(TypeDefPrimitive::U16) => Compact(parse::<u16>(value)?).encode_to(out),
		TypeDef::Primitive(TypeDefPrimitive::U32) => Compact(parse::<u32>(value)?).encode_to(out),
		TypeDef::Primitive(TypeDefPrimitive::U64) => Compact(parse::<u64>(value)?).encode_to(out),
		TypeDef::Primitive(TypeDefPrimitive::U128) => Compact(parse::<u128>(value)?).encode_to(out),
		_ => return Err(format!("compact arguments of type {} are not supported", describe(inner))),
	}
	Ok(())
}

fn encode_byte_array(
	registry: &PortableRegistry,
	len: u32,
	element: u32,
	value: &str,
	out: &mut Vec<u8>,
) -> EncodeResult {
	let is_byte = registry
		.resolve(element)
		.map_or(false, |ty| matches!(ty.type_def, TypeDef::Primitive(TypeDefPrimitive::U8)));
	if !is_byte {
		return Err(format!("arrays of type {element} are not supported"))
	}
	let len = len as usize;
	let bytes = match value.strip_prefix("0x") {
		Some(hex_value) => decode_hex(hex_value)?,
		None if len == 32 => match AccountId32::from_ss58check(value) {
			Ok(account) => AsRef::<[u8]>::as_ref(&account).to_vec(),
			Err(_) => decode_hex(value)
				.map_err(|_| format!("`{value}` is neither an SS58 address nor hex"))?,
		},
		None => decode_hex(value)?,
	};
	if bytes.len() != len {
		return Err(format!("expected {len} bytes, got {}", bytes.len()))
	}
	// Fixed size arrays are encoded without length prefix.
	out.extend_from_slice(&bytes);
	Ok(())
}

fn parse<T: FromStr>(value: &str) -> Result<T, String> {
	value
		.trim()
		.parse()
		.map_err(|_| format!("`{value}` is not a valid {}", type_name::<T>()))
}

fn decode_hex(value: &str) -> Result<Vec<u8>, String> {
	hex::decode(value).map_err(|e| format!("`{value}` is not valid hex: {e}"))
}

fn describe(ty: &Type<PortableForm>) -> String {
	if ty.path.segments.is_empty() {
		format!("{:?}", ty.type_def)
	} else {
		ty.path.segments.join("::")
	}
}
