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

//! Errors reported by the datapoint write path.

use thiserror::Error;

use crate::device::DatapointType;

/// Failure of a single datapoint write.
///
/// Reads never fail; only writes surface one of these, and only through
/// the [`PendingWrite`](crate::device::PendingWrite) returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatapointError {
    #[error("datapoint {0} is not known to the device")]
    Unknown(u8),

    #[error("value does not fit datapoint {id} of type {expected:?}")]
    TypeMismatch { id: u8, expected: DatapointType },

    #[error("transport closed before datapoint {0} was written")]
    TransportClosed(u8),

    #[error("device rejected write to datapoint {id}: {reason}")]
    Rejected { id: u8, reason: String },
}
