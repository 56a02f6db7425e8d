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

//! BlueZ interface names, object paths and advertising defaults.

use uuid::Uuid;

/// Well-known bus name of the BlueZ daemon.
pub const BLUEZ_SERVICE_NAME: &str = "org.bluez";

/// Advertisement interface BlueZ expects us to serve.
pub const LE_ADVERTISEMENT_IFACE: &str = "org.bluez.LEAdvertisement1";

/// GATT service interface BlueZ expects us to serve.
pub const GATT_SERVICE_IFACE: &str = "org.bluez.GattService1";

/// Standard D-Bus properties interface.
pub const DBUS_PROPERTIES_IFACE: &str = "org.freedesktop.DBus.Properties";

/// Default adapter object path (first controller).
pub const DEFAULT_ADAPTER_PATH: &str = "/org/bluez/hci0";

/// Root path under which our objects are exported.
pub const PATH_BASE: &str = "/com/blebeacon";

/// GATT service UUID advertised by this peripheral.
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0xc4e3409f_7723_42e0_ad14_bd1a23469eb9);

/// Default advertised device name.
pub const DEFAULT_LOCAL_NAME: &str = "MyDevice";

/// Advertising flags: LE general discoverable mode, BR/EDR not supported.
pub const ADV_FLAGS_GENERAL_DISCOVERABLE: u8 = 0x06;

/// D-Bus error names returned to the daemon.
pub mod errors {
    pub const UNKNOWN_PROPERTY: &str = "org.freedesktop.DBus.Error.UnknownProperty";
    pub const UNKNOWN_INTERFACE: &str = "org.freedesktop.DBus.Error.UnknownInterface";
    pub const UNKNOWN_METHOD: &str = "org.freedesktop.DBus.Error.UnknownMethod";
    pub const INVALID_ARGS: &str = "org.freedesktop.DBus.Error.InvalidArgs";
}
