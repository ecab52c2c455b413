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

//! Permission broker.
//!
//! Owns the single pending request, decides whether a request can be
//! answered right away and correlates prompt callbacks with their caller.

mod broker;
mod gate;
mod service;

pub use broker::{BrokerState, PendingRequest, PermissionBroker, RequestOutcome};
pub use gate::{
    gate, BrokeredPermission, GateDecision, PermissionState, BLUETOOTH_CONNECT,
    BLUETOOTH_CONNECT_MIN_SDK, REQ_BLUETOOTH_CONNECT,
};
pub use service::{spawn, BrokerCommand, BrokerHandle};
