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

//! Bluetooth permission bridge host.
//!
//! Reads method calls as JSON lines on stdin and writes responses on stdout.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bt_permission_bridge::bridge::{serve_lines, BridgeEndpoint, ResponseEnvelope};
use bt_permission_bridge::config::Config;
use bt_permission_bridge::permission::{self, BrokeredPermission, PermissionBroker};
use bt_permission_bridge::platform::{PromptResponder, SimulatedPlatform};
use bt_permission_bridge::state::BridgeStatus;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries the channel
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bt_permission_bridge=info".parse()?),
        )
        .init();

    info!(
        "Starting Bluetooth permission bridge v{}...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded");

    // Simulated OS permission subsystem
    let brokered = BrokeredPermission::bluetooth_connect();
    let platform = SimulatedPlatform::new(config.platform.sdk_version);
    if config.platform.already_granted {
        platform.grant(&brokered.name);
    }
    let prompts = platform.subscribe();
    info!(
        "Platform: SDK {}, user response {:?}",
        config.platform.sdk_version, config.platform.user_response
    );

    // Broker task
    let status = BridgeStatus::new();
    let broker = PermissionBroker::new(platform.clone(), brokered, status.clone());
    let (broker_handle, broker_task) = permission::spawn(broker, config.bridge.queue_depth);

    let responder = PromptResponder::new(
        platform.clone(),
        config.platform.user_response,
        Duration::from_millis(config.platform.response_delay_ms),
    );
    tokio::spawn(responder.run(prompts, broker_handle.clone()));

    let endpoint = Arc::new(BridgeEndpoint::new(config.bridge.channel.clone(), broker_handle));
    info!("Listening on channel '{}'", endpoint.channel());

    // Responses are written by a single task so lines never interleave
    let (out_tx, mut out_rx) = mpsc::channel::<ResponseEnvelope>(32);
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(envelope) = out_rx.recv().await {
            let line = match envelope.to_json() {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to encode response {}: {}", envelope.id, e);
                    continue;
                }
            };
            if let Err(e) = stdout.write_all(line.as_bytes()).await {
                error!("Failed to write response: {}", e);
                break;
            }
            if let Err(e) = stdout.flush().await {
                error!("Failed to flush response: {}", e);
                break;
            }
        }
    });

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        served = serve_lines(input, endpoint, out_tx) => {
            if let Err(e) = served {
                error!("Failed to read input: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    // Give calls already in flight a moment to be answered
    if tokio::time::timeout(SHUTDOWN_GRACE, writer).await.is_err() {
        warn!("Unanswered calls dropped at shutdown");
    }
    broker_task.abort();

    info!(
        "Bluetooth permission bridge stopped ({}, {} prompts, {} rejected, last answer: {})",
        status.get_phase().as_str(),
        status.get_prompts_issued(),
        status.get_rejected(),
        status
            .get_last_resolution()
            .map(|r| format!("{} at {}", r.granted, r.at.format("%H:%M:%S")))
            .unwrap_or_else(|| "none".to_string())
    );
    Ok(())
}
