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

//! Advertisement registration against the BlueZ advertising manager.

use std::collections::HashMap;

use tracing::debug;
use zbus::proxy;
use zbus::zvariant::{ObjectPath, Value};
use zbus::Connection;

use super::constants::BLUEZ_SERVICE_NAME;

/// D-Bus interface proxy for `org.bluez.LEAdvertisingManager1`.
#[proxy(
    interface = "org.bluez.LEAdvertisingManager1",
    default_service = "org.bluez"
)]
pub trait LeAdvertisingManager {
    /// Registers an advertisement object exported by the caller.
    fn register_advertisement(
        &self,
        advertisement: &ObjectPath<'_>,
        options: HashMap<String, Value<'_>>,
    ) -> zbus::Result<()>;

    /// Unregisters a previously registered advertisement.
    fn unregister_advertisement(&self, advertisement: &ObjectPath<'_>) -> zbus::Result<()>;
}

/// Outcome of one registration request, delivered on the dispatcher queue.
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    /// BlueZ accepted the advertisement and started broadcasting it.
    Registered,
    /// BlueZ rejected the request; carries the remote error text.
    Failed(String),
}

/// Submits advertisements to the manager on one adapter.
///
/// Stateless apart from the connection handle; `register` is fire-and-forget
/// and the asynchronous outcome arrives later as a [`RegistrationOutcome`]
/// event on the channel handed in.
pub struct RegistrationClient {
    conn: Connection,
    adapter_path: String,
}

impl RegistrationClient {
    pub fn new(conn: Connection, adapter_path: impl Into<String>) -> Self {
        Self {
            conn,
            adapter_path: adapter_path.into(),
        }
    }

    /// Issue `RegisterAdvertisement(path, {})` without waiting for the reply.
    ///
    /// The remote call runs on a background task; success or the remote error
    /// text is queued on `outcome_tx`. No retry is attempted on failure.
    pub fn register(
        &self,
        advertisement_path: ObjectPath<'static>,
        outcome_tx: tokio::sync::mpsc::Sender<RegistrationOutcome>,
    ) {
        let conn = self.conn.clone();
        let adapter_path = self.adapter_path.clone();

        tokio::spawn(async move {
            debug!(
                "Registering advertisement {} with {} on {}",
                advertisement_path, BLUEZ_SERVICE_NAME, adapter_path
            );
            let outcome = match Self::call(&conn, &adapter_path, &advertisement_path).await {
                Ok(()) => RegistrationOutcome::Registered,
                Err(e) => RegistrationOutcome::Failed(e.to_string()),
            };
            // Receiver dropped means the process loop is already gone.
            let _ = outcome_tx.send(outcome).await;
        });
    }

    async fn call(
        conn: &Connection,
        adapter_path: &str,
        advertisement_path: &ObjectPath<'_>,
    ) -> zbus::Result<()> {
        let manager = LeAdvertisingManagerProxy::builder(conn)
            .path(adapter_path.to_owned())?
            .build()
            .await?;
        manager
            .register_advertisement(advertisement_path, HashMap::new())
            .await
    }
}
