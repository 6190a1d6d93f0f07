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

//! Momentary button surface.

use std::sync::Arc;

use super::{SurfaceContext, SurfaceKind, SurfaceState};
use crate::coordinator::Coordinator;
use crate::device::{DatapointType, DatapointValue};
use crate::mapping::ButtonMapping;

/// A button that triggers an action by flipping a boolean datapoint.
///
/// Tuya devices react to any change of the datapoint, so a press writes the
/// negation of whatever the store holds.
pub struct Button {
    ctx: SurfaceContext,
    mapping: ButtonMapping,
}

impl Button {
    pub fn new(coordinator: Arc<Coordinator>, mapping: ButtonMapping) -> Self {
        Self {
            ctx: SurfaceContext::new(coordinator, mapping.descriptor),
            mapping,
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.ctx.unique_id
    }

    pub fn key(&self) -> &'static str {
        self.ctx.descriptor.key
    }

    pub fn available(&self) -> bool {
        self.ctx.available(self.mapping.is_available)
    }

    pub fn press(&self) {
        let id = self.mapping.dp_id;
        let dp = self
            .ctx
            .datapoints()
            .get_or_create(id, DatapointType::Bool, DatapointValue::Bool(false));
        self.ctx.send(id, DatapointValue::Bool(!dp.value.as_bool()));
    }

    pub fn state(&self) -> SurfaceState {
        SurfaceState {
            id: self.unique_id().to_string(),
            key: self.key(),
            kind: SurfaceKind::Button,
            available: self.available(),
            is_on: None,
            entity_category: self.ctx.descriptor.entity_category,
            icon: self.ctx.descriptor.icon,
        }
    }
}
