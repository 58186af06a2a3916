// Copyright 2025 the keel authors
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

//! Name-based field access through explicit accessor tables.
//!
//! A [`FieldTable`] maps field names to typed getter and setter closures
//! registered at construction time. Tools like consoles, inspectors, and
//! config binders can then read and write fields by string name while every
//! access stays statically typed underneath. Nothing is discovered at
//! runtime: a field that was never registered does not exist.

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;

/// Errors produced by [`FieldTable`] lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No field with this name was registered.
    UnknownField {
        /// The type that owns the table.
        owner: &'static str,
        /// The name that failed to resolve.
        field: String,
    },
    /// The field exists but under a different value type.
    TypeMismatch {
        /// The field that was accessed.
        field: &'static str,
        /// The type the operation needed to succeed.
        expected: &'static str,
        /// The type that was actually present.
        found: &'static str,
    },
    /// The field was registered without a setter.
    ReadOnly {
        /// The field that was written to.
        field: &'static str,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::UnknownField { owner, field } => {
                write!(f, "Unknown field '{field}' on {owner}.")
            }
            AccessError::TypeMismatch {
                field,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Type mismatch on field '{field}': expected {expected}, found {found}."
                )
            }
            AccessError::ReadOnly { field } => {
                write!(f, "Field '{field}' is read-only.")
            }
        }
    }
}

impl std::error::Error for AccessError {}

type Getter<T> = Box<dyn Fn(&T) -> Box<dyn Any> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, Box<dyn Any>) -> Result<(), Box<dyn Any>> + Send + Sync>;

struct FieldEntry<T> {
    type_name: &'static str,
    getter: Getter<T>,
    setter: Option<Setter<T>>,
}

/// A registry of named, typed accessors for the fields of `T`.
///
/// Tables are built once with the `with_*` methods and then shared freely;
/// all lookups take the table by shared reference.
///
/// # Examples
///
/// ```
/// use keel_core::access::FieldTable;
///
/// struct Player {
///     health: f32,
/// }
///
/// let table = FieldTable::new()
///     .with_field("health", |p: &Player| p.health, |p, v| p.health = v);
///
/// let mut player = Player { health: 80.0 };
/// table.set(&mut player, "health", 100.0f32).unwrap();
/// assert_eq!(table.get::<f32>(&player, "health"), Ok(100.0));
/// ```
pub struct FieldTable<T> {
    owner: &'static str,
    fields: BTreeMap<&'static str, FieldEntry<T>>,
}

impl<T> FieldTable<T> {
    /// Creates an empty table for fields of `T`.
    pub fn new() -> Self {
        Self {
            owner: type_name::<T>(),
            fields: BTreeMap::new(),
        }
    }

    /// Registers a readable and writable field.
    ///
    /// Registering the same name twice replaces the earlier entry.
    pub fn with_field<V, G, S>(mut self, name: &'static str, getter: G, setter: S) -> Self
    where
        V: Any,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.fields.insert(
            name,
            FieldEntry {
                type_name: type_name::<V>(),
                getter: Box::new(move |target| Box::new(getter(target))),
                setter: Some(Box::new(move |target, boxed| {
                    let value = boxed.downcast::<V>()?;
                    setter(target, *value);
                    Ok(())
                })),
            },
        );
        self
    }

    /// Registers a field that can be read but never written.
    pub fn with_readonly<V, G>(mut self, name: &'static str, getter: G) -> Self
    where
        V: Any,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.fields.insert(
            name,
            FieldEntry {
                type_name: type_name::<V>(),
                getter: Box::new(move |target| Box::new(getter(target))),
                setter: None,
            },
        );
        self
    }

    fn entry(&self, field: &str) -> Result<(&'static str, &FieldEntry<T>), AccessError> {
        match self.fields.get_key_value(field) {
            Some((key, entry)) => Ok((key, entry)),
            None => Err(AccessError::UnknownField {
                owner: self.owner,
                field: field.to_string(),
            }),
        }
    }

    /// Reads the field `field` as a `V`.
    pub fn get<V: Any>(&self, target: &T, field: &str) -> Result<V, AccessError> {
        let (key, entry) = self.entry(field)?;
        match (entry.getter)(target).downcast::<V>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(AccessError::TypeMismatch {
                field: key,
                expected: type_name::<V>(),
                found: entry.type_name,
            }),
        }
    }

    /// Writes `value` into the field `field`.
    pub fn set<V: Any>(&self, target: &mut T, field: &str, value: V) -> Result<(), AccessError> {
        let (key, entry) = self.entry(field)?;
        let setter = match &entry.setter {
            Some(setter) => setter,
            None => return Err(AccessError::ReadOnly { field: key }),
        };
        match setter(target, Box::new(value)) {
            Ok(()) => Ok(()),
            Err(_) => Err(AccessError::TypeMismatch {
                field: key,
                expected: entry.type_name,
                found: type_name::<V>(),
            }),
        }
    }

    /// Writes `value` into `field`, reporting failure instead of returning it.
    ///
    /// A rejected write logs a warning and yields `false`. Intended for
    /// binding user-supplied data (console commands, config files) where a
    /// bad field name should not abort the whole batch.
    pub fn try_set<V: Any>(&self, target: &mut T, field: &str, value: V) -> bool {
        match self.set(target, field, value) {
            Ok(()) => true,
            Err(error) => {
                log::warn!("Discarding field write on {}: {error}", self.owner);
                false
            }
        }
    }

    /// Checks whether a field with this name is registered.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the registered field names in sorted order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.keys().copied().collect()
    }

    /// Returns the value type name of a registered field.
    pub fn field_type(&self, field: &str) -> Option<&'static str> {
        self.fields.get(field).map(|entry| entry.type_name)
    }

    /// Returns how many fields are registered.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Checks whether the table has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTable")
            .field("owner", &self.owner)
            .field("fields", &self.field_names())
            .finish()
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    struct Settings {
        volume: f32,
        profile: String,
        build: u32,
    }

    fn settings_table() -> FieldTable<Settings> {
        FieldTable::new()
            .with_field("volume", |s: &Settings| s.volume, |s, v| s.volume = v)
            .with_field(
                "profile",
                |s: &Settings| s.profile.clone(),
                |s, v| s.profile = v,
            )
            .with_readonly("build", |s: &Settings| s.build)
    }

    fn sample() -> Settings {
        Settings {
            volume: 0.8,
            profile: "default".to_string(),
            build: 1042,
        }
    }

    #[test]
    fn test_get_typed_values() {
        let table = settings_table();
        let settings = sample();

        assert_eq!(table.get::<f32>(&settings, "volume"), Ok(0.8));
        assert_eq!(
            table.get::<String>(&settings, "profile"),
            Ok("default".to_string())
        );
        assert_eq!(table.get::<u32>(&settings, "build"), Ok(1042));
    }

    #[test]
    fn test_get_unknown_field() {
        let table = settings_table();
        let settings = sample();

        match table.get::<f32>(&settings, "missing") {
            Err(AccessError::UnknownField { owner, field }) => {
                assert!(owner.contains("Settings"));
                assert_eq!(field, "missing");
            }
            other => panic!("Expected UnknownField, got {other:?}"),
        }
    }

    #[test]
    fn test_get_type_mismatch() {
        let table = settings_table();
        let settings = sample();

        match table.get::<String>(&settings, "volume") {
            Err(AccessError::TypeMismatch {
                field,
                expected,
                found,
            }) => {
                assert_eq!(field, "volume");
                assert!(expected.contains("String"));
                assert!(found.contains("f32"));
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_set_and_read_back() {
        let table = settings_table();
        let mut settings = sample();

        table.set(&mut settings, "volume", 0.25f32).unwrap();
        assert_eq!(settings.volume, 0.25);

        table
            .set(&mut settings, "profile", "speedrun".to_string())
            .unwrap();
        assert_eq!(settings.profile, "speedrun");
    }

    #[test]
    fn test_set_rejections() {
        let table = settings_table();
        let mut settings = sample();

        // Wrong value type: the target must stay untouched
        match table.set(&mut settings, "volume", "loud".to_string()) {
            Err(AccessError::TypeMismatch { expected, found, .. }) => {
                assert!(expected.contains("f32"));
                assert!(found.contains("String"));
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
        assert_eq!(settings.volume, 0.8);

        assert_eq!(
            table.set(&mut settings, "build", 9u32),
            Err(AccessError::ReadOnly { field: "build" })
        );
        assert!(matches!(
            table.set(&mut settings, "missing", 1.0f32),
            Err(AccessError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_try_set_reports_instead_of_failing() {
        let table = settings_table();
        let mut settings = sample();

        assert!(table.try_set(&mut settings, "volume", 1.0f32));
        assert_eq!(settings.volume, 1.0);

        assert!(!table.try_set(&mut settings, "volume", "not a float"));
        assert!(!table.try_set(&mut settings, "missing", 1.0f32));
        assert!(!table.try_set(&mut settings, "build", 7u32));
    }

    #[test]
    fn test_registration_queries() {
        let table = settings_table();

        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert!(table.contains("volume"));
        assert!(!table.contains("Volume")); // Names are case sensitive

        // BTreeMap keeps names sorted
        assert_eq!(table.field_names(), vec!["build", "profile", "volume"]);

        assert!(table.field_type("volume").unwrap().contains("f32"));
        assert_eq!(table.field_type("missing"), None);
    }

    #[test]
    fn test_reregistration_replaces_entry() {
        let table = FieldTable::new()
            .with_field("value", |s: &Settings| s.volume, |s, v| s.volume = v)
            .with_readonly("value", |s: &Settings| s.build);

        let settings = sample();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get::<u32>(&settings, "value"), Ok(1042));
        assert!(matches!(
            table.set(&mut sample(), "value", 3u32),
            Err(AccessError::ReadOnly { .. })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = AccessError::UnknownField {
            owner: "Settings",
            field: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown field 'ghost' on Settings.");

        let err = AccessError::ReadOnly { field: "build" };
        assert_eq!(err.to_string(), "Field 'build' is read-only.");
    }
}
