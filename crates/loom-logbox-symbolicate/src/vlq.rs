// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Base64 VLQ decoding of source map `mappings`.

use crate::error::{Result, SymbolicateError};

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const fn build_decode_table() -> [i8; 128] {
	let mut table = [-1i8; 128];
	let mut i = 0;
	while i < ALPHABET.len() {
		table[ALPHABET[i] as usize] = i as i8;
		i += 1;
	}
	table
}

static DECODE_TABLE: [i8; 128] = build_decode_table();

const CONTINUATION_BIT: i64 = 0b10_0000;
const VALUE_MASK: i64 = 0b01_1111;

// Fields are 32-bit; seven sextets cover them.
const MAX_SHIFT: u32 = 30;

fn sextet(byte: u8) -> Result<i64> {
	match DECODE_TABLE.get(byte as usize) {
		Some(&v) if v >= 0 => Ok(v as i64),
		_ => Err(SymbolicateError::InvalidVlqChar(byte as char)),
	}
}

/// Decodes one comma-separated segment into its signed fields.
pub fn decode_segment(segment: &str) -> Result<Vec<i64>> {
	let mut fields = Vec::with_capacity(5);
	let mut accumulator = 0i64;
	let mut shift = 0u32;

	for byte in segment.bytes() {
		let digit = sextet(byte)?;
		if shift > MAX_SHIFT {
			return Err(SymbolicateError::VlqOverflow(segment.to_string()));
		}
		accumulator |= (digit & VALUE_MASK) << shift;

		if digit & CONTINUATION_BIT != 0 {
			shift += 5;
			continue;
		}

		// Lowest bit carries the sign.
		let magnitude = accumulator >> 1;
		fields.push(if accumulator & 1 == 1 { -magnitude } else { magnitude });
		accumulator = 0;
		shift = 0;
	}

	if shift != 0 {
		return Err(SymbolicateError::UnterminatedVlq(segment.to_string()));
	}

	Ok(fields)
}

/// One generated-to-original position pair. All fields are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
	pub generated_line: u32,
	pub generated_column: u32,
	pub source: u32,
	pub original_line: u32,
	pub original_column: u32,
	pub name: Option<u32>,
}

/// Mappings ordered by generated position.
#[derive(Debug, Clone, Default)]
pub struct MappingIndex {
	mappings: Vec<Mapping>,
}

impl MappingIndex {
	/// Closest mapping at or before `column` on `line` (both 0-indexed).
	pub fn find(&self, line: u32, column: u32) -> Option<&Mapping> {
		let start = self.mappings.partition_point(|m| m.generated_line < line);
		let end = self.mappings.partition_point(|m| m.generated_line <= line);
		let on_line = &self.mappings[start..end];

		match on_line.partition_point(|m| m.generated_column <= column) {
			0 => None,
			idx => on_line.get(idx - 1),
		}
	}

	pub fn len(&self) -> usize {
		self.mappings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.mappings.is_empty()
	}
}

#[derive(Default)]
struct DeltaState {
	source: i64,
	original_line: i64,
	original_column: i64,
	name: i64,
}

fn accumulate(total: &mut i64, delta: i64, segment: &str) -> Result<i64> {
	*total = total
		.checked_add(delta)
		.ok_or_else(|| SymbolicateError::VlqOverflow(segment.to_string()))?;
	Ok(*total)
}

fn to_u32(value: i64) -> u32 {
	u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Decodes a full `mappings` string.
///
/// Lines are separated by `;`, segments by `,`. Segments with a single field
/// carry no original position and are skipped.
pub fn decode_mappings(mappings: &str) -> Result<MappingIndex> {
	let mut decoded = Vec::new();
	let mut state = DeltaState::default();

	for (generated_line, line) in mappings.split(';').enumerate() {
		let mut generated_column = 0i64;

		for segment in line.split(',').filter(|s| !s.is_empty()) {
			let fields = decode_segment(segment)?;
			let Some(&column_delta) = fields.first() else {
				continue;
			};
			accumulate(&mut generated_column, column_delta, segment)?;

			if fields.len() < 4 {
				continue;
			}

			accumulate(&mut state.source, fields[1], segment)?;
			accumulate(&mut state.original_line, fields[2], segment)?;
			accumulate(&mut state.original_column, fields[3], segment)?;
			let name = match fields.get(4) {
				Some(&delta) => Some(to_u32(accumulate(&mut state.name, delta, segment)?)),
				None => None,
			};

			decoded.push(Mapping {
				generated_line: to_u32(generated_line as i64),
				generated_column: to_u32(generated_column),
				source: to_u32(state.source),
				original_line: to_u32(state.original_line),
				original_column: to_u32(state.original_column),
				name,
			});
		}
	}

	decoded.sort_by_key(|m| (m.generated_line, m.generated_column));

	Ok(MappingIndex { mappings: decoded })
}
