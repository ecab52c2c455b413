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

//! Bridge endpoint.
//!
//! Exposes the permission request to the application layer as an
//! asynchronous method call with a single-use result handle.

mod endpoint;
mod host;
mod protocol;
mod result;

pub use endpoint::{BridgeEndpoint, BridgeMethod};
pub use host::serve_lines;
pub use protocol::{MethodCall, MethodResponse, ResponseEnvelope, DEFAULT_CHANNEL};
pub use result::PendingResult;
