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

//! Permission identity and the SDK version gate.

use crate::platform::{GrantResult, PermissionPlatform, RequestCode};

/// Runtime permission guarding Bluetooth connections.
pub const BLUETOOTH_CONNECT: &str = "android.permission.BLUETOOTH_CONNECT";

/// SDK level where `BLUETOOTH_CONNECT` was introduced (Android 12, "S").
pub const BLUETOOTH_CONNECT_MIN_SDK: u32 = 31;

/// Request code tagging Bluetooth CONNECT prompts.
pub const REQ_BLUETOOTH_CONNECT: RequestCode = RequestCode(1001);

/// Classification of a permission on the running OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// The permission does not exist on this OS version.
    NotApplicable,
}

impl PermissionState {
    /// Whether the permission can be used without prompting.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Granted | Self::NotApplicable)
    }
}

/// What the version gate says about a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// OS predates the permission; treat as granted.
    ShortCircuitGranted,
    /// The grant status has to be queried.
    MustQuery,
}

/// Decide from the SDK level alone whether the permission exists.
pub fn gate(sdk_version: u32, min_sdk: u32) -> GateDecision {
    if sdk_version < min_sdk {
        GateDecision::ShortCircuitGranted
    } else {
        GateDecision::MustQuery
    }
}

/// The permission a broker is responsible for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokeredPermission {
    pub name: String,
    pub min_sdk: u32,
    pub request_code: RequestCode,
}

impl BrokeredPermission {
    pub fn bluetooth_connect() -> Self {
        Self {
            name: BLUETOOTH_CONNECT.to_string(),
            min_sdk: BLUETOOTH_CONNECT_MIN_SDK,
            request_code: REQ_BLUETOOTH_CONNECT,
        }
    }

    /// Current state of this permission, read fresh from the platform.
    pub fn state(&self, platform: &dyn PermissionPlatform) -> PermissionState {
        match gate(platform.sdk_version(), self.min_sdk) {
            GateDecision::ShortCircuitGranted => PermissionState::NotApplicable,
            GateDecision::MustQuery => match platform.check_self_permission(&self.name) {
                GrantResult::Granted => PermissionState::Granted,
                GrantResult::Denied => PermissionState::Denied,
            },
        }
    }
}

impl Default for BrokeredPermission {
    fn default() -> Self {
        Self::bluetooth_connect()
    }
}
