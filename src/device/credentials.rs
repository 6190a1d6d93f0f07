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

//! Device credential records.

use bluer::Address;
use serde::{Deserialize, Serialize};

/// Credentials needed to talk to one device.
///
/// `uuid` and `local_key` are only consumed by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCredentials {
    /// BLE address the record belongs to.
    pub address: String,
    pub uuid: String,
    pub local_key: String,
    pub device_id: String,
    pub category: String,
    pub product_id: String,
    pub device_name: String,
    #[serde(default)]
    pub product_model: String,
    #[serde(default)]
    pub product_name: String,
}

impl DeviceCredentials {
    /// Whether this record belongs to `address`.
    pub fn matches(&self, address: &Address) -> bool {
        super::parse_address(&self.address)
            .map(|own| own == *address)
            .unwrap_or(false)
    }
}

/// Source of device credentials, looked up by address.
pub trait CredentialSource {
    fn credentials(&self, address: &Address) -> Option<DeviceCredentials>;
}

impl CredentialSource for [DeviceCredentials] {
    fn credentials(&self, address: &Address) -> Option<DeviceCredentials> {
        self.iter().find(|c| c.matches(address)).cloned()
    }
}
