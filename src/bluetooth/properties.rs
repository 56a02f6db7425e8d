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

//! Name-to-accessor property tables for objects served to BlueZ.
//!
//! Each exported object declares a fixed table mapping D-Bus property names
//! to accessor functions. Lookups against the table are tagged results:
//! unknown names fail with [`PropertyError::Unknown`] rather than returning
//! nothing, and declared-but-unset optional fields are distinguishable from
//! unknown names via [`PropertyError::Unset`].

use std::collections::HashMap;

use thiserror::Error;
use zbus::zvariant::{ObjectPath, Value};

/// Faults surfaced by property lookups.
#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    /// The property name is not declared by the object at all.
    #[error("unknown property: {0}")]
    Unknown(String),

    /// The property is declared but holds no value (optional field, unset).
    #[error("property not set: {0}")]
    Unset(String),
}

/// Accessor for one property of `T`.
///
/// Returns `None` when the property is declared but currently absent, which
/// excludes it from `GetAll` enumeration.
pub type Accessor<T> = fn(&T) -> Option<Value<'static>>;

/// Fixed mapping from property name to accessor, built once per object type.
pub struct PropertyTable<T: 'static> {
    entries: &'static [(&'static str, Accessor<T>)],
}

impl<T> PropertyTable<T> {
    pub const fn new(entries: &'static [(&'static str, Accessor<T>)]) -> Self {
        Self { entries }
    }

    /// Look up a single property.
    pub fn get(&self, obj: &T, name: &str) -> Result<Value<'static>, PropertyError> {
        match self.entries.iter().find(|(n, _)| *n == name) {
            None => Err(PropertyError::Unknown(name.to_owned())),
            Some((_, accessor)) => accessor(obj).ok_or_else(|| PropertyError::Unset(name.to_owned())),
        }
    }

    /// Snapshot of every present property. Absent optionals are omitted,
    /// not included as null.
    pub fn get_all(&self, obj: &T) -> HashMap<String, Value<'static>> {
        self.entries
            .iter()
            .filter_map(|(name, accessor)| accessor(obj).map(|v| (name.to_string(), v)))
            .collect()
    }

    /// All declared property names, present or not.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

/// An object exported on the bus that answers BlueZ property queries.
pub trait ObjectProperties {
    /// D-Bus interface the properties belong to.
    fn interface(&self) -> &'static str;

    /// Object path the descriptor is served at.
    fn object_path(&self) -> &ObjectPath<'static>;

    /// `Properties.Get` semantics.
    fn get(&self, name: &str) -> Result<Value<'static>, PropertyError>;

    /// `Properties.Set` semantics: accepted, but descriptors are read-only
    /// from the manager's perspective.
    fn set(&self, name: &str, value: &Value<'_>);

    /// `Properties.GetAll` semantics, field-by-field consistent with `get`.
    fn get_all(&self) -> HashMap<String, Value<'static>>;
}
