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

//! BLE peripheral module.
//!
//! Exports one GATT service object and one LE advertisement object on the
//! system bus and serves BlueZ property queries against them.

mod advertisement;
pub mod constants;
mod dispatcher;
mod properties;
mod registration;
mod service;

pub use advertisement::{AdvertisementDescriptor, AdvertisementKind};
pub use dispatcher::Dispatcher;
pub use properties::{ObjectProperties, PropertyError, PropertyTable};
pub use registration::{RegistrationClient, RegistrationOutcome};
pub use service::ServiceDescriptor;
