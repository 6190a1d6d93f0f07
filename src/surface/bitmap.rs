// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Boolean fields packed into raw/bitmap datapoints.
//!
//! Value and mask must have the same length; anything else is treated as
//! "no match" rather than an error.

/// True iff some byte of `value & mask` is nonzero.
pub fn masked_any(value: &[u8], mask: &[u8]) -> bool {
    value.len() == mask.len() && value.iter().zip(mask).any(|(v, m)| v & m != 0)
}

/// Set (`on`) or clear the masked bits, keeping all others.
///
/// `None` on a length mismatch.
pub fn apply_mask(value: &[u8], mask: &[u8], on: bool) -> Option<Vec<u8>> {
    if value.len() != mask.len() {
        return None;
    }
    let bytes = value
        .iter()
        .zip(mask)
        .map(|(v, m)| if on { v | m } else { v & !m })
        .collect();
    Some(bytes)
}
