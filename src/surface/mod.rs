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

//! Control surfaces: switches and buttons bound to device datapoints.
//!
//! Surfaces hold no state of their own. Every read goes to the datapoint
//! store and the coordinator, every command becomes a datapoint write.

mod bitmap;
mod button;
mod switch;

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::ProductInfo;
use crate::coordinator::Coordinator;
use crate::device::{DatapointStore, DatapointValue, Device};
use crate::mapping::{Availability, EntityCategory, SurfaceDescriptor};

pub use bitmap::{apply_mask, masked_any};
pub use button::Button;
pub use switch::Switch;

/// Bindings shared by every kind of surface.
struct SurfaceContext {
    coordinator: Arc<Coordinator>,
    device: Arc<Device>,
    product: Option<&'static ProductInfo>,
    descriptor: SurfaceDescriptor,
    unique_id: String,
}

impl SurfaceContext {
    fn new(coordinator: Arc<Coordinator>, descriptor: SurfaceDescriptor) -> Self {
        let device = coordinator.device().clone();
        let product = coordinator.product();
        let unique_id = format!("{}-{}", device.device_id(), descriptor.key);
        Self {
            coordinator,
            device,
            product,
            descriptor,
            unique_id,
        }
    }

    fn datapoints(&self) -> &DatapointStore {
        self.device.datapoints()
    }

    /// Connected, and the extra rule (if any) holds.
    fn available(&self, rule: Option<Availability>) -> bool {
        self.coordinator.connected()
            && rule.map_or(true, |rule| rule.evaluate(self.datapoints(), self.product))
    }

    /// Issue a write without waiting for the device.
    fn send(&self, id: u8, value: DatapointValue) {
        let write = self.datapoints().set_value(id, value);
        self.coordinator.track_write(write);
    }
}

/// Kind of a surface, for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Switch,
    Button,
}

/// Point-in-time view of one surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceState {
    pub id: String,
    pub key: &'static str,
    pub kind: SurfaceKind,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_category: Option<EntityCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
}

/// All surfaces of one device.
#[derive(Default)]
pub struct SurfaceSet {
    pub switches: Vec<Switch>,
    pub buttons: Vec<Button>,
}

impl SurfaceSet {
    pub fn switch(&self, key: &str) -> Option<&Switch> {
        self.switches.iter().find(|s| s.key() == key)
    }

    pub fn button(&self, key: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.key() == key)
    }

    pub fn len(&self) -> usize {
        self.switches.len() + self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current state of every surface, switches first.
    pub fn snapshot(&self) -> Vec<SurfaceState> {
        self.switches
            .iter()
            .map(Switch::state)
            .chain(self.buttons.iter().map(Button::state))
            .collect()
    }
}
