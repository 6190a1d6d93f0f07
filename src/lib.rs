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

//! Control surfaces and connection coordination for Tuya BLE devices.
//!
//! A [`session::DeviceSession`] feeds transport events into a datapoint
//! store and a [`coordinator::Coordinator`]. [`setup::setup_surfaces`] turns
//! the product's mapping table into switches and buttons that read from the
//! store and write through the transport.

pub mod catalog;
pub mod config;
pub mod console;
pub mod coordinator;
pub mod device;
pub mod error;
pub mod mapping;
pub mod registry;
pub mod session;
pub mod setup;
pub mod surface;
pub mod transport;
