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

//! Product catalog: what each known device model is and what it can do.

use crate::device::DeviceInfo;
use crate::registry::{self, CategoryEntry, ProductEntry};

/// Manufacturer reported for products that do not name one.
pub const DEFAULT_MANUFACTURER: &str = "Tuya";

/// Datapoint layout of a fingerbot style pusher.
///
/// An id of 0 means the product lacks that datapoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerbotInfo {
    pub switch: u8,
    pub mode: u8,
    pub up_position: u8,
    pub down_position: u8,
    pub hold_time: u8,
    pub reverse_positions: u8,
    pub manual_control: u8,
    pub program: u8,
}

impl FingerbotInfo {
    pub fn has_manual_control(&self) -> bool {
        self.manual_control != 0
    }

    pub fn program_id(&self) -> Option<u8> {
        (self.program != 0).then_some(self.program)
    }
}

/// Static description of a product model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductInfo {
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub fingerbot: Option<FingerbotInfo>,
}

impl ProductInfo {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            manufacturer: DEFAULT_MANUFACTURER,
            fingerbot: None,
        }
    }

    const fn fingerbot(name: &'static str, fingerbot: FingerbotInfo) -> Self {
        Self {
            name,
            manufacturer: DEFAULT_MANUFACTURER,
            fingerbot: Some(fingerbot),
        }
    }
}

const CUBETOUCH: FingerbotInfo = FingerbotInfo {
    switch: 1,
    mode: 2,
    up_position: 5,
    down_position: 6,
    hold_time: 3,
    reverse_positions: 4,
    manual_control: 0,
    program: 0,
};

const FINGERBOT: FingerbotInfo = FingerbotInfo {
    switch: 2,
    mode: 8,
    up_position: 15,
    down_position: 9,
    hold_time: 10,
    reverse_positions: 11,
    manual_control: 0,
    program: 121,
};

const FINGERBOT_PLUS: FingerbotInfo = FingerbotInfo {
    manual_control: 17,
    ..FINGERBOT
};

/// Product ids of the plain Fingerbot.
pub(crate) const FINGERBOT_IDS: &[&str] =
    &["yrnk7mnn", "nvr2rocq", "bnt7wajf", "rvdceqjh", "5xhbk964"];

/// Product ids of the Fingerbot Plus, which adds a manual control datapoint.
pub(crate) const FINGERBOT_PLUS_IDS: &[&str] = &["ltak7e1p", "y6kttvd6"];

/// Product ids of the CubeTouch 1s and II.
pub(crate) const CUBETOUCH_IDS: &[&str] = &["3yqdo5yt", "xhf790if"];

/// Product ids of the smart locks in category `ms`.
pub(crate) const SMART_LOCK_IDS: &[&str] = &["ludzroix", "isk2p555"];

static CATALOG: &[CategoryEntry<ProductInfo>] = &[
    CategoryEntry {
        category: "szjqr",
        products: &[
            ProductEntry {
                product_ids: &["3yqdo5yt"],
                value: ProductInfo::fingerbot("CubeTouch 1s", CUBETOUCH),
            },
            ProductEntry {
                product_ids: &["xhf790if"],
                value: ProductInfo::fingerbot("CubeTouch II", CUBETOUCH),
            },
            ProductEntry {
                product_ids: FINGERBOT_IDS,
                value: ProductInfo::fingerbot("Fingerbot", FINGERBOT),
            },
            ProductEntry {
                product_ids: FINGERBOT_PLUS_IDS,
                value: ProductInfo::fingerbot("Fingerbot Plus", FINGERBOT_PLUS),
            },
        ],
        fallback: None,
    },
    CategoryEntry {
        category: "ms",
        products: &[ProductEntry {
            product_ids: SMART_LOCK_IDS,
            value: ProductInfo::new("Smart Lock"),
        }],
        fallback: Some(ProductInfo::new("Smart Lock")),
    },
    CategoryEntry {
        category: "jtmspro",
        products: &[ProductEntry {
            product_ids: &["rlyxv7pe"],
            value: ProductInfo::new("A1 PRO MAX"),
        }],
        fallback: None,
    },
];

/// Look up product metadata by identity.
pub fn product_info(category: &str, product_id: &str) -> Option<&'static ProductInfo> {
    registry::resolve(CATALOG, category, product_id)
}

/// Look up product metadata for a device.
pub fn device_product_info(device: &DeviceInfo) -> Option<&'static ProductInfo> {
    product_info(&device.category, &device.product_id)
}
