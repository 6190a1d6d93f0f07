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

//! Fingerbot predicates.
//!
//! The fingerbot "mode" datapoint is an enum: 0 = push, 1 = switch,
//! 2 = program. The program datapoint is a raw blob whose first two bytes
//! hold the big-endian repeat count.

use super::{Availability, SwitchGetter, SwitchSetter};
use crate::catalog::{FingerbotInfo, ProductInfo};
use crate::device::{DatapointStore, DatapointValue};

const MODE_PUSH: i32 = 0;
const MODE_SWITCH: i32 = 1;
const MODE_PROGRAM: i32 = 2;

/// Repeat count that makes a program run until stopped.
pub const REPEAT_FOREVER: u16 = 0xFFFF;
const REPEAT_ONCE: u16 = 1;

fn fingerbot(product: Option<&ProductInfo>) -> Option<&FingerbotInfo> {
    product.and_then(|p| p.fingerbot.as_ref())
}

/// True while the mode has not been reported yet. A reported mode only
/// matches as an integer (`Value` or `Enum`); any other value matches no mode.
fn mode_is(store: &DatapointStore, fingerbot: &FingerbotInfo, expected: i32) -> bool {
    match store.get(fingerbot.mode) {
        Some(dp) => dp.value.as_integer() == Some(expected),
        None => true,
    }
}

fn repeat_count(raw: &[u8]) -> Option<u16> {
    match raw {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

impl Availability {
    /// Evaluate against current datapoints. Products without a fingerbot
    /// block are not gated.
    pub fn evaluate(&self, store: &DatapointStore, product: Option<&ProductInfo>) -> bool {
        let Some(fingerbot) = fingerbot(product) else {
            return true;
        };
        match self {
            Self::FingerbotPushMode => mode_is(store, fingerbot, MODE_PUSH),
            Self::FingerbotSwitchMode => mode_is(store, fingerbot, MODE_SWITCH),
            Self::FingerbotProgramMode => {
                fingerbot.program_id().is_some() && mode_is(store, fingerbot, MODE_PROGRAM)
            }
        }
    }
}

impl SwitchGetter {
    /// `None` when the state cannot be determined.
    pub fn read(&self, store: &DatapointStore, product: Option<&ProductInfo>) -> Option<bool> {
        match self {
            Self::FingerbotProgramRepeatForever => {
                let program = fingerbot(product)?.program_id()?;
                let dp = store.get(program)?;
                let raw = dp.value.as_bytes()?;
                Some(repeat_count(raw) == Some(REPEAT_FOREVER))
            }
        }
    }
}

impl SwitchSetter {
    /// The write that puts the switch into `on`, or `None` if there is
    /// nothing to write.
    pub fn write(
        &self,
        store: &DatapointStore,
        product: Option<&ProductInfo>,
        on: bool,
    ) -> Option<(u8, DatapointValue)> {
        match self {
            Self::FingerbotProgramRepeatForever => {
                let program = fingerbot(product)?.program_id()?;
                let dp = store.get(program)?;
                let raw = dp.value.as_bytes()?;

                let count = if on { REPEAT_FOREVER } else { REPEAT_ONCE };
                let mut value = count.to_be_bytes().to_vec();
                value.extend_from_slice(raw.get(2..).unwrap_or_default());
                Some((program, DatapointValue::Bytes(value)))
            }
        }
    }
}
