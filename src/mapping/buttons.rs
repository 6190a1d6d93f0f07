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

//! Button mapping table.

use super::{ButtonMapping, SurfaceDescriptor};
use crate::catalog::{FINGERBOT_IDS, FINGERBOT_PLUS_IDS};
use crate::device::DeviceInfo;
use crate::registry::{self, CategoryEntry, ProductEntry};

const FINGERBOT: &[ButtonMapping] = &[ButtonMapping::fingerbot_push(2)];

static BUTTONS: &[CategoryEntry<&[ButtonMapping]>] = &[
    CategoryEntry {
        category: "szjqr",
        // TODO: CubeTouch push button on dp 1 once its mode handling is confirmed.
        products: &[
            ProductEntry {
                product_ids: FINGERBOT_IDS,
                value: FINGERBOT,
            },
            ProductEntry {
                product_ids: FINGERBOT_PLUS_IDS,
                value: FINGERBOT,
            },
        ],
        fallback: None,
    },
    CategoryEntry {
        category: "jtmspro",
        products: &[ProductEntry {
            product_ids: &["rlyxv7pe"],
            value: &[
                ButtonMapping::new(46, SurfaceDescriptor::new("manual_lock")),
                ButtonMapping::new(6, SurfaceDescriptor::new("manual_unlock")),
            ],
        }],
        fallback: None,
    },
];

/// Buttons exposed by a product, in presentation order. Unknown products
/// expose none.
pub fn button_mappings(category: &str, product_id: &str) -> &'static [ButtonMapping] {
    registry::resolve(BUTTONS, category, product_id)
        .copied()
        .unwrap_or_default()
}

pub fn device_button_mappings(device: &DeviceInfo) -> &'static [ButtonMapping] {
    button_mappings(&device.category, &device.product_id)
}
