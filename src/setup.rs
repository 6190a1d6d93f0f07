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

//! Surface assembly.
//!
//! A mapping becomes a surface when it is force-added or when the device has
//! reported its datapoint (with the hinted type, if any).

use std::sync::Arc;
use tracing::debug;

use crate::coordinator::Coordinator;
use crate::device::{DatapointStore, DatapointType};
use crate::mapping::{self, ButtonMapping, SwitchMapping};
use crate::session::DeviceSession;
use crate::surface::{Button, Switch, SurfaceSet};

fn wanted(
    store: &DatapointStore,
    key: &str,
    force_add: bool,
    dp_id: u8,
    dp_type: Option<DatapointType>,
) -> bool {
    if force_add || store.has_id(dp_id, dp_type) {
        return true;
    }
    debug!("Skipping {}: datapoint {} not reported", key, dp_id);
    false
}

pub fn setup_switches(coordinator: &Arc<Coordinator>, mappings: &[SwitchMapping]) -> Vec<Switch> {
    let store = coordinator.device().datapoints();
    mappings
        .iter()
        .filter(|m| wanted(store, m.descriptor.key, m.force_add, m.dp_id, m.dp_type))
        .map(|m| Switch::new(coordinator.clone(), *m))
        .collect()
}

pub fn setup_buttons(coordinator: &Arc<Coordinator>, mappings: &[ButtonMapping]) -> Vec<Button> {
    let store = coordinator.device().datapoints();
    mappings
        .iter()
        .filter(|m| wanted(store, m.descriptor.key, m.force_add, m.dp_id, m.dp_type))
        .map(|m| Button::new(coordinator.clone(), *m))
        .collect()
}

/// Build every surface the session's product maps, in table order.
pub fn setup_surfaces(session: &DeviceSession) -> SurfaceSet {
    let info = session.device().info();
    let surfaces = SurfaceSet {
        switches: setup_switches(session.coordinator(), mapping::device_switch_mappings(info)),
        buttons: setup_buttons(session.coordinator(), mapping::device_button_mappings(info)),
    };
    debug!(
        "Assembled {} surfaces for {}",
        surfaces.len(),
        info.device_id
    );
    surfaces
}
