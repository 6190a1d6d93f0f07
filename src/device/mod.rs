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

//! Device identity and datapoint state.

mod credentials;
mod datapoint;

use anyhow::{anyhow, Result};
use bluer::Address;

use crate::catalog::ProductInfo;

pub use credentials::{CredentialSource, DeviceCredentials};
pub use datapoint::{Datapoint, DatapointStore, DatapointType, DatapointValue, PendingWrite};

/// Identity of a device, as known from its credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub address: Address,
    pub device_id: String,
    pub category: String,
    pub product_id: String,
    pub name: String,
}

impl DeviceInfo {
    pub fn from_credentials(address: Address, credentials: &DeviceCredentials) -> Self {
        Self {
            address,
            device_id: credentials.device_id.clone(),
            category: credentials.category.clone(),
            product_id: credentials.product_id.clone(),
            name: credentials.device_name.clone(),
        }
    }
}

/// A device handle: identity plus its datapoint store.
pub struct Device {
    info: DeviceInfo,
    datapoints: DatapointStore,
}

impl Device {
    pub fn new(info: DeviceInfo, datapoints: DatapointStore) -> Self {
        Self { info, datapoints }
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn address(&self) -> Address {
        self.info.address
    }

    pub fn device_id(&self) -> &str {
        &self.info.device_id
    }

    pub fn datapoints(&self) -> &DatapointStore {
        &self.datapoints
    }
}

/// Parse a BLE address, accepting `-` as well as `:` separators.
pub fn parse_address(address: &str) -> Result<Address> {
    address
        .trim()
        .replace('-', ":")
        .parse()
        .map_err(|_| anyhow!("Invalid Bluetooth address: {}", address))
}

/// Last three bytes of the address as uppercase hex, e.g. `8B608F`.
pub fn short_address(address: &Address) -> String {
    hex::encode_upper(&address.0[3..])
}

/// Human readable name: product name, else credential name, else the
/// advertised name, each followed by the short address.
pub fn readable_name(
    address: &Address,
    product: Option<&ProductInfo>,
    credentials: Option<&DeviceCredentials>,
    advertised: &str,
) -> String {
    let base = product
        .map(|p| p.name)
        .or_else(|| credentials.map(|c| c.device_name.as_str()))
        .unwrap_or(advertised);
    format!("{} {}", base, short_address(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn credentials() -> DeviceCredentials {
        DeviceCredentials {
            address: "DC:23:4D:7B:E1:CE".to_string(),
            uuid: "xmbmd29e724c403a".to_string(),
            local_key: "0123456789abcdef".to_string(),
            device_id: "bf2d2eox9j31au8q".to_string(),
            category: "jtmspro".to_string(),
            product_id: "rlyxv7pe".to_string(),
            device_name: "Smart lock 2".to_string(),
            product_model: String::new(),
            product_name: "Smart lock".to_string(),
        }
    }

    #[test]
    fn test_short_address() {
        let address = parse_address("dc-23-4e-8b-60-8f").unwrap();
        assert_eq!(short_address(&address), "8B608F");
        assert!(parse_address("not an address").is_err());
    }

    #[test]
    fn test_readable_name_preference() {
        let address = parse_address("DC:23:4D:7B:E1:CE").unwrap();
        let creds = credentials();
        let product = catalog::product_info("jtmspro", "rlyxv7pe");

        assert_eq!(
            readable_name(&address, product, Some(&creds), "BLE"),
            "A1 PRO MAX 7BE1CE"
        );
        assert_eq!(
            readable_name(&address, None, Some(&creds), "BLE"),
            "Smart lock 2 7BE1CE"
        );
        assert_eq!(readable_name(&address, None, None, "BLE"), "BLE 7BE1CE");
    }

    #[test]
    fn test_device_info_from_credentials() {
        let address = parse_address("DC:23:4D:7B:E1:CE").unwrap();
        let info = DeviceInfo::from_credentials(address, &credentials());
        assert_eq!(info.category, "jtmspro");
        assert_eq!(info.device_id, "bf2d2eox9j31au8q");
        assert_eq!(info.name, "Smart lock 2");
    }
}
