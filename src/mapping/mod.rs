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

//! Control surface mappings.
//!
//! Maps a device identity to the switches and buttons it exposes. Each
//! mapping binds one datapoint and may carry predicates that gate
//! availability or replace the default read/write encoding. Predicates are
//! closed enums so the tables stay plain data.

mod buttons;
mod predicates;
mod switches;

use serde::Serialize;

use crate::device::DatapointType;

pub use buttons::{button_mappings, device_button_mappings};
pub use predicates::REPEAT_FOREVER;
pub use switches::{device_switch_mappings, switch_mappings};

/// Presentation category of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    /// Changes device configuration rather than operating it.
    Config,
    Diagnostic,
}

/// How a surface is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    /// Stable key, unique per device.
    pub key: &'static str,
    pub icon: Option<&'static str>,
    pub entity_category: Option<EntityCategory>,
}

impl SurfaceDescriptor {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            icon: None,
            entity_category: None,
        }
    }

    pub const fn with_icon(self, icon: &'static str) -> Self {
        Self {
            icon: Some(icon),
            ..self
        }
    }

    pub const fn config(self) -> Self {
        Self {
            entity_category: Some(EntityCategory::Config),
            ..self
        }
    }
}

/// Extra availability rule of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Fingerbot mode datapoint is 0 (push).
    FingerbotPushMode,
    /// Fingerbot mode datapoint is 1 (switch).
    FingerbotSwitchMode,
    /// Fingerbot mode datapoint is 2 (program) and the product has a program datapoint.
    FingerbotProgramMode,
}

/// Replacement for the default switch read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchGetter {
    /// Program repeat count equals [`REPEAT_FOREVER`].
    FingerbotProgramRepeatForever,
}

/// Replacement for the default switch write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchSetter {
    /// Rewrite the program repeat count, keeping the rest of the program.
    FingerbotProgramRepeatForever,
}

/// Binding of one switch to a datapoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchMapping {
    pub dp_id: u8,
    pub descriptor: SurfaceDescriptor,
    /// Create the switch even if the device has not reported the datapoint.
    pub force_add: bool,
    pub dp_type: Option<DatapointType>,
    /// Bits of a raw/bitmap datapoint that make up this switch.
    pub bitmap_mask: Option<&'static [u8]>,
    pub is_available: Option<Availability>,
    pub getter: Option<SwitchGetter>,
    pub setter: Option<SwitchSetter>,
}

impl SwitchMapping {
    pub const fn new(dp_id: u8, descriptor: SurfaceDescriptor) -> Self {
        Self {
            dp_id,
            descriptor,
            force_add: true,
            dp_type: None,
            bitmap_mask: None,
            is_available: None,
            getter: None,
            setter: None,
        }
    }

    /// Only create the switch when the device reports the datapoint.
    pub const fn when_reported(self, dp_type: Option<DatapointType>) -> Self {
        Self {
            force_add: false,
            dp_type,
            ..self
        }
    }

    pub const fn with_mask(self, mask: &'static [u8]) -> Self {
        Self {
            bitmap_mask: Some(mask),
            ..self
        }
    }

    pub const fn available_when(self, availability: Availability) -> Self {
        Self {
            is_available: Some(availability),
            ..self
        }
    }

    pub const fn with_accessors(self, getter: SwitchGetter, setter: SwitchSetter) -> Self {
        Self {
            getter: Some(getter),
            setter: Some(setter),
            ..self
        }
    }

    /// The fingerbot on/off switch, usable in switch mode.
    pub const fn fingerbot_switch(dp_id: u8) -> Self {
        Self::new(dp_id, SurfaceDescriptor::new("switch"))
            .available_when(Availability::FingerbotSwitchMode)
    }

    /// Swap the fingerbot up and down positions.
    pub const fn reverse_positions(dp_id: u8) -> Self {
        Self::new(
            dp_id,
            SurfaceDescriptor::new("reverse_positions")
                .with_icon("mdi:arrow-up-down-bold")
                .config(),
        )
        .available_when(Availability::FingerbotSwitchMode)
    }

    /// Run the fingerbot program forever instead of once.
    pub const fn program_repeat_forever(dp_id: u8) -> Self {
        Self::new(
            dp_id,
            SurfaceDescriptor::new("program_repeat_forever")
                .with_icon("mdi:repeat")
                .config(),
        )
        .available_when(Availability::FingerbotProgramMode)
        .with_accessors(
            SwitchGetter::FingerbotProgramRepeatForever,
            SwitchSetter::FingerbotProgramRepeatForever,
        )
    }
}

/// Binding of one button to a boolean datapoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonMapping {
    pub dp_id: u8,
    pub descriptor: SurfaceDescriptor,
    pub force_add: bool,
    pub dp_type: Option<DatapointType>,
    pub is_available: Option<Availability>,
}

impl ButtonMapping {
    pub const fn new(dp_id: u8, descriptor: SurfaceDescriptor) -> Self {
        Self {
            dp_id,
            descriptor,
            force_add: true,
            dp_type: None,
            is_available: None,
        }
    }

    /// Only create the button when the device reports the datapoint.
    pub const fn when_reported(self, dp_type: Option<DatapointType>) -> Self {
        Self {
            force_add: false,
            dp_type,
            ..self
        }
    }

    pub const fn available_when(self, availability: Availability) -> Self {
        Self {
            is_available: Some(availability),
            ..self
        }
    }

    /// The fingerbot push button, usable in push mode.
    pub const fn fingerbot_push(dp_id: u8) -> Self {
        Self::new(dp_id, SurfaceDescriptor::new("push"))
            .available_when(Availability::FingerbotPushMode)
    }
}
