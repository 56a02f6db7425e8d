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

//! Single-task event loop serving BlueZ callbacks against the exported
//! descriptors.
//!
//! Inbound `Properties` method calls, the advertisement `Release`
//! notification and registration outcomes are all handled sequentially on
//! this one task, so no locking is needed around the descriptors. The loop
//! runs until Ctrl+C.
//!
//! Routing is split off from bus I/O: [`Router`] turns one inbound message
//! into a [`MethodReply`] without touching the connection, and the loop only
//! writes that decision back to the bus.

use std::collections::HashMap;

use anyhow::Result;
use futures::StreamExt;
use tracing::{debug, error, info, warn};
use zbus::message::Type as MessageType;
use zbus::zvariant::Value;
use zbus::{Connection, Message, MessageStream};

use super::advertisement::AdvertisementDescriptor;
use super::constants::{errors, DBUS_PROPERTIES_IFACE, LE_ADVERTISEMENT_IFACE};
use super::properties::{ObjectProperties, PropertyError};
use super::registration::RegistrationOutcome;
use super::service::ServiceDescriptor;

/// Reply decided for one inbound message, before any bus I/O.
#[derive(Debug, PartialEq)]
enum MethodReply {
    /// Not a method call addressed to one of our objects.
    Ignored,
    /// Successful `Get` reply carrying a single variant.
    Variant(Value<'static>),
    /// Successful `GetAll` reply carrying a property snapshot.
    Properties(HashMap<String, Value<'static>>),
    /// Successful empty reply (`Set`, `Release`).
    Empty,
    /// D-Bus error reply: error name plus human-readable text.
    Fault(&'static str, String),
}

/// Maps inbound method calls onto the exported descriptors.
struct Router {
    service: ServiceDescriptor,
    advertisement: AdvertisementDescriptor,
}

impl Router {
    fn new(service: ServiceDescriptor, advertisement: AdvertisementDescriptor) -> Self {
        Self {
            service,
            advertisement,
        }
    }

    fn route(&self, msg: &Message) -> MethodReply {
        let header = msg.header();
        if header.message_type() != MessageType::MethodCall {
            return MethodReply::Ignored;
        }
        let Some(path) = header.path() else {
            return MethodReply::Ignored;
        };

        let target: &dyn ObjectProperties = if path.as_str() == self.service.object_path().as_str()
        {
            &self.service
        } else if path.as_str() == self.advertisement.object_path().as_str() {
            &self.advertisement
        } else {
            // Not one of our objects.
            return MethodReply::Ignored;
        };

        let interface = header.interface().map(|i| i.as_str());
        let member = header.member().map(|m| m.as_str());
        debug!(
            "Method call on {}: {}.{}",
            path,
            interface.unwrap_or("<none>"),
            member.unwrap_or("<none>")
        );

        match (interface, member) {
            (Some(DBUS_PROPERTIES_IFACE), Some("Get")) => self.get(msg, target),
            (Some(DBUS_PROPERTIES_IFACE), Some("Set")) => self.set(msg, target),
            (Some(DBUS_PROPERTIES_IFACE), Some("GetAll")) => self.get_all(msg, target),
            (Some(LE_ADVERTISEMENT_IFACE), Some("Release"))
                if path.as_str() == self.advertisement.object_path().as_str() =>
            {
                self.advertisement.release();
                MethodReply::Empty
            }
            _ => MethodReply::Fault(
                errors::UNKNOWN_METHOD,
                format!(
                    "No method {}.{} on {}",
                    interface.unwrap_or(""),
                    member.unwrap_or(""),
                    path
                ),
            ),
        }
    }

    fn get(&self, msg: &Message, target: &dyn ObjectProperties) -> MethodReply {
        let body = msg.body();
        let Ok((interface, name)) = body.deserialize::<(String, String)>() else {
            return MethodReply::Fault(errors::INVALID_ARGS, "Expected (ss) arguments".into());
        };

        if let Some(fault) = check_interface(&interface, target) {
            return fault;
        }

        match target.get(&name) {
            Ok(value) => MethodReply::Variant(value),
            Err(e @ PropertyError::Unknown(_)) => {
                MethodReply::Fault(errors::UNKNOWN_PROPERTY, e.to_string())
            }
            Err(e @ PropertyError::Unset(_)) => {
                MethodReply::Fault(errors::INVALID_ARGS, e.to_string())
            }
        }
    }

    fn set(&self, msg: &Message, target: &dyn ObjectProperties) -> MethodReply {
        let body = msg.body();
        let Ok((interface, name, value)) = body.deserialize::<(String, String, Value<'_>)>() else {
            return MethodReply::Fault(errors::INVALID_ARGS, "Expected (ssv) arguments".into());
        };

        if let Some(fault) = check_interface(&interface, target) {
            return fault;
        }

        target.set(&name, &value);
        MethodReply::Empty
    }

    fn get_all(&self, msg: &Message, target: &dyn ObjectProperties) -> MethodReply {
        let body = msg.body();
        let Ok((interface,)) = body.deserialize::<(String,)>() else {
            return MethodReply::Fault(errors::INVALID_ARGS, "Expected (s) argument".into());
        };

        if let Some(fault) = check_interface(&interface, target) {
            return fault;
        }

        MethodReply::Properties(target.get_all())
    }
}

fn check_interface(interface: &str, target: &dyn ObjectProperties) -> Option<MethodReply> {
    if interface == target.interface() {
        None
    } else {
        Some(MethodReply::Fault(
            errors::UNKNOWN_INTERFACE,
            format!("No interface {} on {}", interface, target.object_path()),
        ))
    }
}

/// Owns the exported objects and dispatches daemon callbacks to them.
pub struct Dispatcher {
    conn: Connection,
    stream: MessageStream,
    router: Router,
    outcome_rx: tokio::sync::mpsc::Receiver<RegistrationOutcome>,
}

impl Dispatcher {
    /// Build the dispatcher and subscribe to bus traffic.
    ///
    /// The message stream starts here, not in [`run`](Self::run): callbacks
    /// triggered by a registration submitted between construction and the
    /// loop starting are queued on the stream instead of being dropped.
    pub fn new(
        conn: Connection,
        service: ServiceDescriptor,
        advertisement: AdvertisementDescriptor,
        outcome_rx: tokio::sync::mpsc::Receiver<RegistrationOutcome>,
    ) -> Self {
        let stream = MessageStream::from(&conn);
        Self {
            conn,
            stream,
            router: Router::new(service, advertisement),
            outcome_rx,
        }
    }

    /// Serve callbacks until the bus closes or an interrupt arrives.
    ///
    /// Registered objects are not cleaned up on exit; dropping the connection
    /// at process exit releases everything BlueZ holds on us.
    pub async fn run(mut self) -> Result<()> {
        info!(
            "Serving {} and {}",
            self.router.service.object_path(),
            self.router.advertisement.object_path()
        );

        loop {
            tokio::select! {
                maybe_msg = self.stream.next() => {
                    match maybe_msg {
                        Some(Ok(msg)) => {
                            if let Err(e) = self.handle_message(&msg).await {
                                warn!("Error handling bus message: {}", e);
                            }
                        }
                        Some(Err(e)) => warn!("Error reading bus message: {}", e),
                        None => {
                            warn!("Bus connection closed");
                            break;
                        }
                    }
                }
                Some(outcome) = self.outcome_rx.recv() => {
                    match outcome {
                        RegistrationOutcome::Registered => {
                            info!("Advertisement registered");
                        }
                        RegistrationOutcome::Failed(text) => {
                            error!("Failed to register advertisement: {}", text);
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Advertisement terminated");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_message(&self, msg: &Message) -> Result<()> {
        let header = msg.header();
        match self.router.route(msg) {
            MethodReply::Ignored => {}
            MethodReply::Variant(value) => {
                self.conn.reply(&header, &value).await?;
            }
            MethodReply::Properties(properties) => {
                self.conn.reply(&header, &properties).await?;
            }
            MethodReply::Empty => {
                self.conn.reply(&header, &()).await?;
            }
            MethodReply::Fault(name, text) => {
                self.conn.reply_error(&header, name, &text).await?;
            }
        }
        Ok(())
    }
}
