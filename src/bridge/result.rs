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

//! Single-use result handle for a method call.

use tokio::sync::oneshot;
use tracing::debug;

use super::protocol::MethodResponse;
use crate::error::BridgeError;

/// Handle through which exactly one response is delivered to the caller.
///
/// Every resolving method takes `self`, so a handle can't answer twice.
/// Dropping it unanswered closes the caller's receiver.
#[derive(Debug)]
pub struct PendingResult {
    call_id: u64,
    tx: oneshot::Sender<MethodResponse>,
}

impl PendingResult {
    /// Create a handle and the receiver its response will arrive on.
    pub fn new(call_id: u64) -> (Self, oneshot::Receiver<MethodResponse>) {
        let (tx, rx) = oneshot::channel();
        (Self { call_id, tx }, rx)
    }

    pub fn call_id(&self) -> u64 {
        self.call_id
    }

    pub fn success(self, value: bool) {
        self.deliver(MethodResponse::success(value));
    }

    pub fn error(self, err: &BridgeError) {
        self.deliver(MethodResponse::from_error(err));
    }

    pub fn not_implemented(self) {
        self.deliver(MethodResponse::NotImplemented);
    }

    fn deliver(self, response: MethodResponse) {
        let call_id = self.call_id;
        if self.tx.send(response).is_err() {
            debug!("Caller of call {} went away before the response", call_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_delivers_once() {
        let (result, mut rx) = PendingResult::new(1);
        assert_eq!(result.call_id(), 1);
        result.success(true);
        assert_eq!(rx.try_recv().unwrap(), MethodResponse::success(true));
    }

    #[test]
    fn test_dropped_handle_closes_receiver() {
        let (result, mut rx) = PendingResult::new(2);
        drop(result);
        assert!(matches!(rx.try_recv(), Err(oneshot::error::TryRecvError::Closed)));
    }

    #[test]
    fn test_deliver_to_gone_caller_is_silent() {
        let (result, rx) = PendingResult::new(3);
        drop(rx);
        result.not_implemented();
    }
}
