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

//! Bluetooth CONNECT permission bridge.
//!
//! The application layer calls `requestBluetoothConnectPermission` on the
//! [`bridge::BridgeEndpoint`] and gets exactly one boolean back, once the
//! [`permission::PermissionBroker`] has either answered from the OS state or
//! prompted the user and received the callback.

pub mod bridge;
pub mod config;
pub mod error;
pub mod permission;
pub mod platform;
pub mod state;
