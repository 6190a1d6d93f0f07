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

//! Datapoint values and the per-device datapoint store.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use pin_project_lite::pin_project;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::DatapointError;
use crate::transport::DatapointCommand;

/// Wire type of a datapoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DatapointType {
    Raw = 0,
    Bool = 1,
    Value = 2,
    String = 3,
    Enum = 4,
    Bitmap = 5,
}

impl DatapointType {
    /// Whether values of this type are carried as raw bytes.
    pub fn is_bytes(&self) -> bool {
        matches!(self, Self::Raw | Self::Bitmap)
    }

    /// Whether `value` can be stored in a datapoint of this type.
    pub fn accepts(&self, value: &DatapointValue) -> bool {
        match (self, value) {
            (Self::Bool, DatapointValue::Bool(_)) => true,
            (Self::Value | Self::Enum, DatapointValue::Integer(_)) => true,
            (Self::String, DatapointValue::String(_)) => true,
            (Self::Raw | Self::Bitmap, DatapointValue::Bytes(_)) => true,
            _ => false,
        }
    }
}

/// Current value of a datapoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatapointValue {
    Bool(bool),
    Integer(i32),
    String(String),
    Bytes(Vec<u8>),
}

impl DatapointValue {
    /// Truthiness: `false`, `0`, empty strings and empty byte strings are false.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::String(s) => !s.is_empty(),
            Self::Bytes(b) => !b.is_empty(),
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for DatapointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

/// A snapshot of one datapoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datapoint {
    pub id: u8,
    pub dp_type: DatapointType,
    pub value: DatapointValue,
    /// True when the device itself reported the change rather than echoing a command.
    pub changed_by_device: bool,
    pub updated_at: DateTime<Utc>,
}

impl Datapoint {
    pub fn new(id: u8, dp_type: DatapointType, value: DatapointValue) -> Self {
        Self {
            id,
            dp_type,
            value,
            changed_by_device: false,
            updated_at: Utc::now(),
        }
    }

    /// Mark the snapshot as a device-initiated change.
    pub fn from_device(mut self) -> Self {
        self.changed_by_device = true;
        self
    }
}

pin_project! {
    /// Completion signal of a datapoint write.
    ///
    /// Dropping it does not cancel the write.
    pub struct PendingWrite {
        id: u8,
        #[pin]
        rx: oneshot::Receiver<Result<(), DatapointError>>,
    }
}

impl PendingWrite {
    fn failed(id: u8, error: DatapointError) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(error));
        Self { id, rx }
    }

    /// Datapoint addressed by this write.
    pub fn id(&self) -> u8 {
        self.id
    }
}

impl Future for PendingWrite {
    type Output = Result<(), DatapointError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match ready!(this.rx.poll(cx)) {
            Ok(result) => Poll::Ready(result),
            Err(_) => Poll::Ready(Err(DatapointError::TransportClosed(*this.id))),
        }
    }
}

/// Keyed store of the current datapoints of one device.
///
/// Lookups hand out snapshots; nothing outside the store borrows its entries.
/// Writes are forwarded to the transport and only land in the store once the
/// device reports them back through [`DatapointStore::apply_updates`].
pub struct DatapointStore {
    datapoints: RwLock<BTreeMap<u8, Datapoint>>,
    commands: mpsc::UnboundedSender<DatapointCommand>,
}

impl DatapointStore {
    /// Create an empty store that sends writes to `commands`.
    pub fn new(commands: mpsc::UnboundedSender<DatapointCommand>) -> Self {
        Self {
            datapoints: RwLock::new(BTreeMap::new()),
            commands,
        }
    }

    pub fn get(&self, id: u8) -> Option<Datapoint> {
        self.datapoints.read().get(&id).cloned()
    }

    /// Look up a datapoint, creating it with a default if the device has not
    /// reported it yet.
    pub fn get_or_create(
        &self,
        id: u8,
        dp_type: DatapointType,
        default: DatapointValue,
    ) -> Datapoint {
        if let Some(existing) = self.get(id) {
            return existing;
        }
        let mut datapoints = self.datapoints.write();
        datapoints
            .entry(id)
            .or_insert_with(|| {
                debug!("Creating datapoint {} as {:?} = {}", id, dp_type, default);
                Datapoint::new(id, dp_type, default)
            })
            .clone()
    }

    /// Whether the store holds `id`, optionally also requiring its type.
    pub fn has_id(&self, id: u8, dp_type: Option<DatapointType>) -> bool {
        match self.datapoints.read().get(&id) {
            Some(dp) => dp_type.map_or(true, |t| dp.dp_type == t),
            None => false,
        }
    }

    /// Send a new value for `id` to the device.
    ///
    /// Returns immediately; the returned future resolves once the transport
    /// acknowledges or fails the write.
    pub fn set_value(&self, id: u8, value: DatapointValue) -> PendingWrite {
        let Some(dp_type) = self.datapoints.read().get(&id).map(|dp| dp.dp_type) else {
            return PendingWrite::failed(id, DatapointError::Unknown(id));
        };
        if !dp_type.accepts(&value) {
            return PendingWrite::failed(
                id,
                DatapointError::TypeMismatch {
                    id,
                    expected: dp_type,
                },
            );
        }

        debug!("Writing datapoint {} = {}", id, value);
        let (ack, rx) = oneshot::channel();
        let command = DatapointCommand {
            id,
            dp_type,
            value,
            ack,
        };
        if self.commands.send(command).is_err() {
            // The command and its ack sender are dropped with the error,
            // so the receiver resolves to TransportClosed.
            warn!("Transport gone, dropping write to datapoint {}", id);
        }
        PendingWrite { id, rx }
    }

    /// Merge datapoints reported by the transport.
    pub fn apply_updates(&self, updates: &[Datapoint]) {
        let mut datapoints = self.datapoints.write();
        for update in updates {
            datapoints.insert(update.id, update.clone());
        }
    }
}
