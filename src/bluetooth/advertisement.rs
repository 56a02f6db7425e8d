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

//! LE advertisement descriptor served to BlueZ.
//!
//! Base fields (`Flags`, `Type`, `ServiceUUIDs`, `IncludeTxPower`,
//! `LocalName`) are always present. The payload extras (`ManufacturerData`,
//! `SolicitUUIDs`, `ServiceData`) are `Option`al and only appear in `GetAll`
//! enumeration while set — BlueZ treats a present-but-empty key differently
//! from an omitted one.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;
use zbus::zvariant::{Dict, ObjectPath, Value};

use super::constants::{
    ADV_FLAGS_GENERAL_DISCOVERABLE, DEFAULT_LOCAL_NAME, LE_ADVERTISEMENT_IFACE, PATH_BASE,
    SERVICE_UUID,
};
use super::properties::{ObjectProperties, PropertyError, PropertyTable};

/// Advertising mode, the BlueZ `Type` property domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisementKind {
    /// Connectable advertising (the only mode constructed here).
    Peripheral,
    /// Non-connectable broadcast.
    Broadcast,
}

impl AdvertisementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Peripheral => "peripheral",
            Self::Broadcast => "broadcast",
        }
    }
}

/// The full advertising payload description for one advertisement object.
///
/// Immutable once handed to the registration client; the builder-style
/// `with_*` setters run before that.
pub struct AdvertisementDescriptor {
    path: ObjectPath<'static>,
    kind: AdvertisementKind,
    service_uuids: Vec<Uuid>,
    manufacturer_data: Option<HashMap<u16, Vec<u8>>>,
    solicit_uuids: Option<Vec<Uuid>>,
    service_data: Option<HashMap<String, Vec<u8>>>,
    include_tx_power: bool,
    local_name: String,
    flags: u8,
}

static PROPERTIES: PropertyTable<AdvertisementDescriptor> = PropertyTable::new(&[
    ("Flags", AdvertisementDescriptor::flags_value),
    ("Type", AdvertisementDescriptor::kind_value),
    ("ServiceUUIDs", AdvertisementDescriptor::service_uuids_value),
    ("ManufacturerData", AdvertisementDescriptor::manufacturer_data_value),
    ("SolicitUUIDs", AdvertisementDescriptor::solicit_uuids_value),
    ("ServiceData", AdvertisementDescriptor::service_data_value),
    ("IncludeTxPower", AdvertisementDescriptor::include_tx_power_value),
    ("LocalName", AdvertisementDescriptor::local_name_value),
]);

impl AdvertisementDescriptor {
    /// Create a peripheral advertisement carrying the service UUID, with a
    /// path derived from a zero-based index.
    pub fn new(index: u16) -> Self {
        Self {
            path: ObjectPath::from_string_unchecked(format!("{PATH_BASE}/advertisement{index}")),
            kind: AdvertisementKind::Peripheral,
            service_uuids: vec![SERVICE_UUID],
            manufacturer_data: None,
            solicit_uuids: None,
            service_data: None,
            include_tx_power: true,
            local_name: DEFAULT_LOCAL_NAME.to_string(),
            flags: ADV_FLAGS_GENERAL_DISCOVERABLE,
        }
    }

    /// Override the advertised device name.
    pub fn with_local_name(mut self, name: impl Into<String>) -> Self {
        self.local_name = name.into();
        self
    }

    /// Override the tx-power inclusion flag.
    pub fn with_include_tx_power(mut self, include: bool) -> Self {
        self.include_tx_power = include;
        self
    }

    /// Attach manufacturer-specific data, keyed by company identifier.
    pub fn with_manufacturer_data(mut self, data: HashMap<u16, Vec<u8>>) -> Self {
        self.manufacturer_data = Some(data);
        self
    }

    /// Attach solicited service UUIDs.
    pub fn with_solicit_uuids(mut self, uuids: Vec<Uuid>) -> Self {
        self.solicit_uuids = Some(uuids);
        self
    }

    /// Attach service data, keyed by service UUID string.
    pub fn with_service_data(mut self, data: HashMap<String, Vec<u8>>) -> Self {
        self.service_data = Some(data);
        self
    }

    /// Called by BlueZ when advertising is torn down. Nothing is held per
    /// advertisement, so this is a no-op and safe to call repeatedly.
    pub fn release(&self) {
        debug!("Advertisement {} released by manager", self.path);
    }

    fn flags_value(&self) -> Option<Value<'static>> {
        Some(Value::from(self.flags))
    }

    fn kind_value(&self) -> Option<Value<'static>> {
        Some(Value::from(self.kind.as_str()))
    }

    fn service_uuids_value(&self) -> Option<Value<'static>> {
        Some(uuid_list_value(&self.service_uuids))
    }

    fn manufacturer_data_value(&self) -> Option<Value<'static>> {
        self.manufacturer_data.as_ref().map(|data| {
            let dict: HashMap<u16, Value<'static>> = data
                .iter()
                .map(|(company, bytes)| (*company, Value::from(bytes.clone())))
                .collect();
            Value::Dict(Dict::from(dict))
        })
    }

    fn solicit_uuids_value(&self) -> Option<Value<'static>> {
        self.solicit_uuids.as_ref().map(|uuids| uuid_list_value(uuids))
    }

    fn service_data_value(&self) -> Option<Value<'static>> {
        self.service_data.as_ref().map(|data| {
            let dict: HashMap<String, Value<'static>> = data
                .iter()
                .map(|(uuid, bytes)| (uuid.clone(), Value::from(bytes.clone())))
                .collect();
            Value::Dict(Dict::from(dict))
        })
    }

    fn include_tx_power_value(&self) -> Option<Value<'static>> {
        Some(Value::from(self.include_tx_power))
    }

    fn local_name_value(&self) -> Option<Value<'static>> {
        Some(Value::from(self.local_name.clone()))
    }
}

fn uuid_list_value(uuids: &[Uuid]) -> Value<'static> {
    let strings: Vec<String> = uuids.iter().map(Uuid::to_string).collect();
    Value::from(strings)
}

impl ObjectProperties for AdvertisementDescriptor {
    fn interface(&self) -> &'static str {
        LE_ADVERTISEMENT_IFACE
    }

    fn object_path(&self) -> &ObjectPath<'static> {
        &self.path
    }

    fn get(&self, name: &str) -> Result<Value<'static>, PropertyError> {
        PROPERTIES.get(self, name)
    }

    fn set(&self, name: &str, _value: &Value<'_>) {
        debug!("Ignoring Set on read-only advertisement property {}", name);
    }

    fn get_all(&self) -> HashMap<String, Value<'static>> {
        PROPERTIES.get_all(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enumeration() {
        let adv = AdvertisementDescriptor::new(0);
        let all = adv.get_all();

        let mut keys: Vec<_> = all.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["Flags", "IncludeTxPower", "LocalName", "ServiceUUIDs", "Type"]
        );

        assert_eq!(all["Flags"], Value::from(6u8));
        assert_eq!(all["Type"], Value::from("peripheral"));
        assert_eq!(
            all["ServiceUUIDs"],
            Value::from(vec!["c4e3409f-7723-42e0-ad14-bd1a23469eb9".to_string()])
        );
        assert_eq!(all["IncludeTxPower"], Value::from(true));
        assert_eq!(all["LocalName"], Value::from("MyDevice"));
    }

    #[test]
    fn test_get_matches_get_all() {
        let adv = AdvertisementDescriptor::new(0)
            .with_manufacturer_data(HashMap::from([(0xffff, vec![0x01, 0x02])]));
        for (name, value) in &adv.get_all() {
            assert_eq!(&adv.get(name).unwrap(), value);
        }
    }

    #[test]
    fn test_unset_optional_get() {
        let adv = AdvertisementDescriptor::new(0);
        assert_eq!(
            adv.get("ManufacturerData"),
            Err(PropertyError::Unset("ManufacturerData".into()))
        );
        assert_eq!(
            adv.get("SolicitUUIDs"),
            Err(PropertyError::Unset("SolicitUUIDs".into()))
        );
        assert_eq!(
            adv.get("ServiceData"),
            Err(PropertyError::Unset("ServiceData".into()))
        );
    }

    #[test]
    fn test_manufacturer_data_flips_presence() {
        let bare = AdvertisementDescriptor::new(0);
        assert!(!bare.get_all().contains_key("ManufacturerData"));

        let adv = AdvertisementDescriptor::new(0)
            .with_manufacturer_data(HashMap::from([(0x004c, vec![0xde, 0xad])]));
        let all = adv.get_all();
        assert!(all.contains_key("ManufacturerData"));
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_service_data_and_solicit_uuids_presence() {
        let adv = AdvertisementDescriptor::new(0)
            .with_service_data(HashMap::from([(
                SERVICE_UUID.to_string(),
                vec![0x01],
            )]))
            .with_solicit_uuids(vec![SERVICE_UUID]);
        let all = adv.get_all();
        assert!(all.contains_key("ServiceData"));
        assert!(all.contains_key("SolicitUUIDs"));
        assert_eq!(all.len(), 7);
    }

    #[test]
    fn test_unknown_property_fails() {
        let adv = AdvertisementDescriptor::new(0);
        assert_eq!(
            adv.get("Appearance"),
            Err(PropertyError::Unknown("Appearance".into()))
        );
    }

    #[test]
    fn test_set_is_a_noop() {
        let adv = AdvertisementDescriptor::new(0);
        adv.set("LocalName", &Value::from("Other"));
        assert_eq!(adv.get("LocalName").unwrap(), Value::from("MyDevice"));
    }

    #[test]
    fn test_release_is_idempotent() {
        let adv = AdvertisementDescriptor::new(0);
        adv.release();
        adv.release();
        assert_eq!(adv.get("Type").unwrap(), Value::from("peripheral"));
    }

    #[test]
    fn test_local_name_override() {
        let adv = AdvertisementDescriptor::new(0).with_local_name("Sensor");
        assert_eq!(adv.get("LocalName").unwrap(), Value::from("Sensor"));
    }
}
