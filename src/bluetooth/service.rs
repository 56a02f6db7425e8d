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

//! GATT primary service descriptor served to BlueZ.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, Value};

use super::constants::{GATT_SERVICE_IFACE, PATH_BASE, SERVICE_UUID};
use super::properties::{ObjectProperties, PropertyError, PropertyTable};

/// Identity of one GATT primary service.
///
/// Immutable after construction; BlueZ only ever reads it. No characteristics
/// are attached in this scope, so `Characteristics` is always empty.
pub struct ServiceDescriptor {
    path: ObjectPath<'static>,
    uuid: Uuid,
    primary: bool,
    characteristics: Vec<OwnedObjectPath>,
}

static PROPERTIES: PropertyTable<ServiceDescriptor> = PropertyTable::new(&[
    ("UUID", ServiceDescriptor::uuid_value),
    ("Primary", ServiceDescriptor::primary_value),
    ("Characteristics", ServiceDescriptor::characteristics_value),
]);

impl ServiceDescriptor {
    /// Create the service with a path derived from a zero-based index.
    pub fn new(index: u16) -> Self {
        Self {
            path: ObjectPath::from_string_unchecked(format!("{PATH_BASE}/service{index}")),
            uuid: SERVICE_UUID,
            primary: true,
            characteristics: Vec::new(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn uuid_value(&self) -> Option<Value<'static>> {
        Some(Value::from(self.uuid.to_string()))
    }

    fn primary_value(&self) -> Option<Value<'static>> {
        Some(Value::from(self.primary))
    }

    fn characteristics_value(&self) -> Option<Value<'static>> {
        let paths: Vec<ObjectPath<'static>> = self
            .characteristics
            .iter()
            .cloned()
            .map(OwnedObjectPath::into_inner)
            .collect();
        Some(Value::from(paths))
    }
}

impl ObjectProperties for ServiceDescriptor {
    fn interface(&self) -> &'static str {
        GATT_SERVICE_IFACE
    }

    fn object_path(&self) -> &ObjectPath<'static> {
        &self.path
    }

    fn get(&self, name: &str) -> Result<Value<'static>, PropertyError> {
        PROPERTIES.get(self, name)
    }

    fn set(&self, name: &str, _value: &Value<'_>) {
        debug!("Ignoring Set on read-only service property {}", name);
    }

    fn get_all(&self) -> HashMap<String, Value<'static>> {
        PROPERTIES.get_all(self)
    }
}
