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

//! On/off switch surface.

use std::sync::Arc;
use tracing::{debug, warn};

use super::bitmap::{apply_mask, masked_any};
use super::{SurfaceContext, SurfaceKind, SurfaceState};
use crate::coordinator::Coordinator;
use crate::device::{DatapointType, DatapointValue};
use crate::mapping::SwitchMapping;

/// A switch bound to one datapoint (or to bits of one).
pub struct Switch {
    ctx: SurfaceContext,
    mapping: SwitchMapping,
}

impl Switch {
    pub fn new(coordinator: Arc<Coordinator>, mapping: SwitchMapping) -> Self {
        Self {
            ctx: SurfaceContext::new(coordinator, mapping.descriptor),
            mapping,
        }
    }

    /// `"{device_id}-{key}"`.
    pub fn unique_id(&self) -> &str {
        &self.ctx.unique_id
    }

    pub fn key(&self) -> &'static str {
        self.ctx.descriptor.key
    }

    pub fn available(&self) -> bool {
        self.ctx.available(self.mapping.is_available)
    }

    /// Current state. Datapoints the device has not reported read as off.
    pub fn is_on(&self) -> bool {
        if let Some(getter) = self.mapping.getter {
            return getter
                .read(self.ctx.datapoints(), self.ctx.product)
                .unwrap_or(false);
        }

        let Some(dp) = self.ctx.datapoints().get(self.mapping.dp_id) else {
            return false;
        };
        match (self.mapping.bitmap_mask, dp.dp_type.is_bytes()) {
            (Some(mask), true) => dp
                .value
                .as_bytes()
                .map_or(false, |value| masked_any(value, mask)),
            _ => dp.value.as_bool(),
        }
    }

    pub fn turn_on(&self) {
        self.set(true);
    }

    pub fn turn_off(&self) {
        self.set(false);
    }

    /// Write the opposite of the current state. Returns the requested state.
    pub fn toggle(&self) -> bool {
        let on = !self.is_on();
        self.set(on);
        on
    }

    fn set(&self, on: bool) {
        let store = self.ctx.datapoints();

        if let Some(setter) = self.mapping.setter {
            match setter.write(store, self.ctx.product, on) {
                Some((id, value)) => self.ctx.send(id, value),
                None => debug!("{}: nothing to write", self.unique_id()),
            }
            return;
        }

        let id = self.mapping.dp_id;
        if let Some(mask) = self.mapping.bitmap_mask {
            let dp = store.get_or_create(
                id,
                DatapointType::Bitmap,
                DatapointValue::Bytes(mask.to_vec()),
            );
            let next = dp
                .value
                .as_bytes()
                .and_then(|value| apply_mask(value, mask, on));
            match next {
                Some(bytes) => self.ctx.send(id, DatapointValue::Bytes(bytes)),
                None => warn!(
                    "{}: datapoint {} does not match mask {}",
                    self.unique_id(),
                    id,
                    hex::encode(mask)
                ),
            }
        } else {
            store.get_or_create(id, DatapointType::Bool, DatapointValue::Bool(false));
            self.ctx.send(id, DatapointValue::Bool(on));
        }
    }

    pub fn state(&self) -> SurfaceState {
        SurfaceState {
            id: self.unique_id().to_string(),
            key: self.key(),
            kind: SurfaceKind::Switch,
            available: self.available(),
            is_on: Some(self.is_on()),
            entity_category: self.ctx.descriptor.entity_category,
            icon: self.ctx.descriptor.icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::device::{parse_address, Datapoint, DatapointStore, Device, DeviceInfo};
    use crate::mapping::{SurfaceDescriptor, REPEAT_FOREVER};
    use crate::transport::DatapointCommand;
    use std::time::Duration;
    use tokio::runtime::Handle;
    use tokio::sync::mpsc;

    struct Fixture {
        coordinator: Arc<Coordinator>,
        commands: mpsc::UnboundedReceiver<DatapointCommand>,
    }

    impl Fixture {
        fn new(category: &str, product_id: &str) -> Self {
            let (tx, commands) = mpsc::unbounded_channel();
            let info = DeviceInfo {
                address: parse_address("DC:23:4E:8B:60:8F").unwrap(),
                device_id: "bf7360fte8jomrnv".to_string(),
                category: category.to_string(),
                product_id: product_id.to_string(),
                name: "test".to_string(),
            };
            let product = catalog::device_product_info(&info);
            let device = Arc::new(Device::new(info, DatapointStore::new(tx)));
            let coordinator =
                Coordinator::new(device, product, Duration::from_secs(5), Handle::current());
            Self {
                coordinator,
                commands,
            }
        }

        fn report(&self, dp: Datapoint) {
            self.coordinator.device().datapoints().apply_updates(&[dp.clone()]);
            self.coordinator.handle_update(&[dp]);
        }

        fn next_write(&mut self) -> (u8, DatapointValue) {
            let command = self.commands.try_recv().expect("no write issued");
            (command.id, command.value)
        }
    }

    fn bitmap_switch(mask: &'static [u8]) -> SwitchMapping {
        SwitchMapping::new(20, SurfaceDescriptor::new("relay")).with_mask(mask)
    }

    #[tokio::test]
    async fn test_unique_id_and_missing_datapoint() {
        let fx = Fixture::new("jtmspro", "rlyxv7pe");
        let switch = Switch::new(
            fx.coordinator.clone(),
            SwitchMapping::new(78, SurfaceDescriptor::new("special_control")),
        );
        assert_eq!(switch.unique_id(), "bf7360fte8jomrnv-special_control");
        assert!(!switch.is_on());
    }

    #[tokio::test]
    async fn test_plain_switch_reads_and_writes_bool() {
        let mut fx = Fixture::new("jtmspro", "rlyxv7pe");
        let switch = Switch::new(
            fx.coordinator.clone(),
            SwitchMapping::new(78, SurfaceDescriptor::new("special_control")),
        );

        switch.turn_on();
        assert_eq!(fx.next_write(), (78, DatapointValue::Bool(true)));
        // Not applied until the device reports it.
        assert!(!switch.is_on());

        fx.report(Datapoint::new(78, DatapointType::Bool, DatapointValue::Bool(true)));
        assert!(switch.is_on());

        switch.turn_off();
        assert_eq!(fx.next_write(), (78, DatapointValue::Bool(false)));
    }

    #[tokio::test]
    async fn test_bitmap_switch_read() {
        let fx = Fixture::new("jtmspro", "rlyxv7pe");
        let switch = Switch::new(fx.coordinator.clone(), bitmap_switch(&[0x00, 0x02]));

        fx.report(Datapoint::new(
            20,
            DatapointType::Bitmap,
            DatapointValue::Bytes(vec![0xFF, 0x01]),
        ));
        assert!(!switch.is_on());

        fx.report(Datapoint::new(
            20,
            DatapointType::Raw,
            DatapointValue::Bytes(vec![0x00, 0x03]),
        ));
        assert!(switch.is_on());

        // Length mismatch reads as off.
        fx.report(Datapoint::new(
            20,
            DatapointType::Raw,
            DatapointValue::Bytes(vec![0x02]),
        ));
        assert!(!switch.is_on());
    }

    #[tokio::test]
    async fn test_mask_ignored_for_scalar_datapoints() {
        let fx = Fixture::new("jtmspro", "rlyxv7pe");
        let switch = Switch::new(fx.coordinator.clone(), bitmap_switch(&[0x02]));
        fx.report(Datapoint::new(20, DatapointType::Bool, DatapointValue::Bool(true)));
        assert!(switch.is_on());
    }

    #[tokio::test]
    async fn test_bitmap_switch_write_preserves_other_bits() {
        let mut fx = Fixture::new("jtmspro", "rlyxv7pe");
        let switch = Switch::new(fx.coordinator.clone(), bitmap_switch(&[0x00, 0x02]));
        fx.report(Datapoint::new(
            20,
            DatapointType::Bitmap,
            DatapointValue::Bytes(vec![0x81, 0x01]),
        ));

        switch.turn_on();
        assert_eq!(fx.next_write(), (20, DatapointValue::Bytes(vec![0x81, 0x03])));

        fx.report(Datapoint::new(
            20,
            DatapointType::Bitmap,
            DatapointValue::Bytes(vec![0x81, 0x03]),
        ));
        switch.turn_off();
        assert_eq!(fx.next_write(), (20, DatapointValue::Bytes(vec![0x81, 0x01])));
    }

    #[tokio::test]
    async fn test_bitmap_switch_creates_datapoint_from_mask() {
        let mut fx = Fixture::new("jtmspro", "rlyxv7pe");
        let switch = Switch::new(fx.coordinator.clone(), bitmap_switch(&[0x00, 0x02]));

        switch.turn_off();
        assert_eq!(fx.next_write(), (20, DatapointValue::Bytes(vec![0x00, 0x00])));
        let created = fx.coordinator.device().datapoints().get(20).unwrap();
        assert_eq!(created.dp_type, DatapointType::Bitmap);
    }

    #[tokio::test]
    async fn test_bitmap_length_mismatch_writes_nothing() {
        let mut fx = Fixture::new("jtmspro", "rlyxv7pe");
        let switch = Switch::new(fx.coordinator.clone(), bitmap_switch(&[0x00, 0x02]));
        fx.report(Datapoint::new(
            20,
            DatapointType::Bitmap,
            DatapointValue::Bytes(vec![0x01]),
        ));

        switch.turn_on();
        assert!(fx.commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_program_repeat_forever() {
        let mut fx = Fixture::new("szjqr", "yrnk7mnn");
        let switch = Switch::new(
            fx.coordinator.clone(),
            SwitchMapping::program_repeat_forever(121),
        );
        let tail = [0x03, 0x00, 0x10, 0x20];
        let mut raw = vec![0x00, 0x01];
        raw.extend_from_slice(&tail);
        fx.report(Datapoint::new(121, DatapointType::Raw, DatapointValue::Bytes(raw)));
        assert!(!switch.is_on());

        switch.turn_on();
        let (id, value) = fx.next_write();
        assert_eq!(id, 121);
        let written = value.as_bytes().unwrap().to_vec();
        assert_eq!(&written[..2], &REPEAT_FOREVER.to_be_bytes());
        assert_eq!(&written[2..], &tail);

        fx.report(Datapoint::new(121, DatapointType::Raw, DatapointValue::Bytes(written)));
        assert!(switch.is_on());
    }

    #[tokio::test]
    async fn test_availability_follows_mode_and_link() {
        let fx = Fixture::new("szjqr", "yrnk7mnn");
        fx.coordinator
            .device()
            .datapoints()
            .apply_updates(&[Datapoint::new(8, DatapointType::Enum, DatapointValue::Integer(1))]);
        let switch = Switch::new(fx.coordinator.clone(), SwitchMapping::fingerbot_switch(2));
        // Mode allows it but the device never connected.
        assert!(!switch.available());

        fx.report(Datapoint::new(8, DatapointType::Enum, DatapointValue::Integer(1)));
        assert!(switch.available());

        fx.report(Datapoint::new(8, DatapointType::Enum, DatapointValue::Integer(0)));
        assert!(!switch.available());
    }

    #[tokio::test]
    async fn test_state_snapshot() {
        let fx = Fixture::new("szjqr", "yrnk7mnn");
        fx.coordinator.handle_connected();
        let switch = Switch::new(fx.coordinator.clone(), SwitchMapping::reverse_positions(11));
        let state = switch.state();
        assert_eq!(state.key, "reverse_positions");
        assert_eq!(state.kind, SurfaceKind::Switch);
        assert_eq!(state.is_on, Some(false));
        assert!(state.available);
        assert_eq!(state.icon, Some("mdi:arrow-up-down-bold"));
    }
}
