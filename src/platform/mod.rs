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

//! OS permission subsystem abstraction.
//!
//! The broker never talks to the OS directly. It reads the SDK version,
//! queries grant status and issues prompts through [`PermissionPlatform`];
//! prompt outcomes come back later as a [`PermissionsResult`].

mod simulated;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use simulated::{PromptRecord, PromptResponder, SimulatedPlatform, UserResponse};

/// Tag correlating an issued prompt with the callback reporting its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestCode(pub i32);

impl fmt::Display for RequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-permission outcome as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantResult {
    Granted,
    Denied,
}

impl From<bool> for GrantResult {
    fn from(granted: bool) -> Self {
        if granted {
            Self::Granted
        } else {
            Self::Denied
        }
    }
}

/// Outcome of a permission prompt, delivered after the user interacted with it.
///
/// `grant_results` is aligned positionally with `permissions`. The list may be
/// empty when the prompt was dismissed without a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionsResult {
    pub request_code: RequestCode,
    pub permissions: Vec<String>,
    pub grant_results: Vec<GrantResult>,
}

impl PermissionsResult {
    pub fn new(
        request_code: RequestCode,
        permissions: Vec<String>,
        grant_results: Vec<GrantResult>,
    ) -> Self {
        Self {
            request_code,
            permissions,
            grant_results,
        }
    }

    /// Whether the first grant result is an explicit grant.
    ///
    /// Anything else, including an empty list, counts as not granted.
    pub fn first_granted(&self) -> bool {
        self.grant_results.first() == Some(&GrantResult::Granted)
    }
}

/// Capabilities of the host OS permission subsystem.
pub trait PermissionPlatform: Send + Sync {
    /// SDK level of the running OS.
    fn sdk_version(&self) -> u32;

    /// Synchronous "is this permission currently granted" query.
    fn check_self_permission(&self, permission: &str) -> GrantResult;

    /// Show the permission prompt. Returns immediately; the outcome arrives
    /// later as a [`PermissionsResult`] carrying the same `request_code`.
    fn request_permissions(&self, permissions: &[&str], request_code: RequestCode);
}
