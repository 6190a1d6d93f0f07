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

//! Switch mapping table.

use super::{SurfaceDescriptor, SwitchMapping};
use crate::catalog::{CUBETOUCH_IDS, FINGERBOT_IDS, FINGERBOT_PLUS_IDS, SMART_LOCK_IDS};
use crate::device::DeviceInfo;
use crate::registry::{self, CategoryEntry, ProductEntry};

const CUBETOUCH: &[SwitchMapping] = &[
    SwitchMapping::fingerbot_switch(1),
    SwitchMapping::reverse_positions(4),
];

const FINGERBOT: &[SwitchMapping] = &[
    SwitchMapping::fingerbot_switch(2),
    SwitchMapping::reverse_positions(11),
    SwitchMapping::program_repeat_forever(121),
];

const FINGERBOT_PLUS: &[SwitchMapping] = &[
    SwitchMapping::fingerbot_switch(2),
    SwitchMapping::reverse_positions(11),
    SwitchMapping::program_repeat_forever(121),
    SwitchMapping::new(17, SurfaceDescriptor::new("manual_control").config()),
];

static SWITCHES: &[CategoryEntry<&[SwitchMapping]>] = &[
    CategoryEntry {
        category: "ms",
        products: &[ProductEntry {
            product_ids: SMART_LOCK_IDS,
            value: &[SwitchMapping::new(
                47,
                SurfaceDescriptor::new("lock_motor_state"),
            )],
        }],
        fallback: None,
    },
    CategoryEntry {
        category: "szjqr",
        products: &[
            ProductEntry {
                product_ids: CUBETOUCH_IDS,
                value: CUBETOUCH,
            },
            ProductEntry {
                product_ids: FINGERBOT_IDS,
                value: FINGERBOT,
            },
            ProductEntry {
                product_ids: FINGERBOT_PLUS_IDS,
                value: FINGERBOT_PLUS,
            },
        ],
        fallback: None,
    },
    CategoryEntry {
        category: "jtmspro",
        products: &[ProductEntry {
            product_ids: &["rlyxv7pe"],
            // Reverses the motor direction.
            value: &[SwitchMapping::new(
                78,
                SurfaceDescriptor::new("special_control"),
            )],
        }],
        fallback: None,
    },
];

/// Switches exposed by a product, in presentation order. Unknown
/// products expose none.
pub fn switch_mappings(category: &str, product_id: &str) -> &'static [SwitchMapping] {
    registry::resolve(SWITCHES, category, product_id)
        .copied()
        .unwrap_or_default()
}

pub fn device_switch_mappings(device: &DeviceInfo) -> &'static [SwitchMapping] {
    switch_mappings(&device.category, &device.product_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Availability;

    #[test]
    fn test_fingerbot_switches() {
        let keys: Vec<_> = switch_mappings("szjqr", "ltak7e1p")
            .iter()
            .map(|m| m.descriptor.key)
            .collect();
        assert_eq!(
            keys,
            ["switch", "reverse_positions", "program_repeat_forever", "manual_control"]
        );

        let cube = switch_mappings("szjqr", "xhf790if");
        assert_eq!(cube.len(), 2);
        assert_eq!(cube[0].dp_id, 1);
        assert_eq!(cube[1].is_available, Some(Availability::FingerbotSwitchMode));
    }

    #[test]
    fn test_unknown_devices_have_no_switches() {
        assert!(switch_mappings("szjqr", "unknown").is_empty());
        assert!(switch_mappings("unknown", "xhf790if").is_empty());
    }

    #[test]
    fn test_lock_switches() {
        let lock = switch_mappings("ms", "isk2p555");
        assert_eq!(lock.len(), 1);
        assert_eq!(lock[0].dp_id, 47);
        assert_eq!(switch_mappings("jtmspro", "rlyxv7pe")[0].descriptor.key, "special_control");
    }
}
