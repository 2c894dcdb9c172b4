//! Resource Store : correspondance clé → document JSON.
//!
//! Une clé jamais écrite n'est pas une erreur : `fetch` renvoie `None` et
//! `fetch_collection` une liste vide.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Component, Path};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Teachers,
    Groups,
    Rooms,
    Constraints,
    /// Fichier d'emploi du temps, par nom (`timetable_{date}.json`).
    Timetable(String),
}

impl StoreKey {
    pub fn timetable_for(date: &str) -> Self {
        StoreKey::Timetable(format!("timetable_{date}.json"))
    }
}

/// Un nom d'emploi du temps doit rester un simple nom de fichier : une seule
/// composante normale, sans séparateur. `S1..S2` est accepté, `..` ne l'est pas.
pub(crate) fn check_timetable_name(name: &str) -> Result<(), StoreError> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidKey(name.to_string()));
    }
    Ok(())
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Teachers => f.write_str("teachers"),
            StoreKey::Groups => f.write_str("groups"),
            StoreKey::Rooms => f.write_str("rooms"),
            StoreKey::Constraints => f.write_str("constraints"),
            StoreKey::Timetable(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Timetables,
}

/// Noms des fichiers sur disque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    pub teachers: String,
    pub groups: String,
    pub rooms: String,
    pub constraints: String,
    pub timetable_dir: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            teachers: "ress-ens.json".into(),
            groups: "ress-group.json".into(),
            rooms: "ress-salle.json".into(),
            constraints: "constraints.json".into(),
            timetable_dir: "emploit".into(),
        }
    }
}

pub trait ResourceStore {
    /// Lit le document stocké sous `key`, `None` s'il n'a jamais été écrit.
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError>;
    /// Remplace entièrement le document stocké sous `key`.
    fn persist(&self, key: &StoreKey, value: &Value) -> Result<(), StoreError>;
    /// Clés présentes dans l'espace, triées.
    fn list(&self, namespace: Namespace) -> Result<Vec<String>, StoreError>;
    /// Vide l'espace ; renvoie le nombre d'éléments supprimés.
    fn delete_all(&self, namespace: Namespace) -> Result<usize, StoreError>;
    /// Date de dernière écriture, si le support la connaît.
    fn modified(&self, _key: &StoreKey) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(None)
    }
}

impl<S: ResourceStore + ?Sized> ResourceStore for &S {
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        (**self).fetch(key)
    }
    fn persist(&self, key: &StoreKey, value: &Value) -> Result<(), StoreError> {
        (**self).persist(key, value)
    }
    fn list(&self, namespace: Namespace) -> Result<Vec<String>, StoreError> {
        (**self).list(namespace)
    }
    fn delete_all(&self, namespace: Namespace) -> Result<usize, StoreError> {
        (**self).delete_all(namespace)
    }
    fn modified(&self, key: &StoreKey) -> Result<Option<DateTime<Utc>>, StoreError> {
        (**self).modified(key)
    }
}

/// Accès typés au-dessus de [`ResourceStore`].
pub trait ResourceStoreExt: ResourceStore {
    fn fetch_collection<T: DeserializeOwned>(&self, key: &StoreKey) -> Result<Vec<T>, StoreError> {
        match self.fetch(key)? {
            None => Ok(Vec::new()),
            Some(value) => decode(key, value),
        }
    }

    fn fetch_document<T: DeserializeOwned>(&self, key: &StoreKey) -> Result<Option<T>, StoreError> {
        self.fetch(key)?.map(|value| decode(key, value)).transpose()
    }

    fn persist_as<T: Serialize>(&self, key: &StoreKey, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.persist(key, &value)
    }
}

impl<S: ResourceStore + ?Sized> ResourceStoreExt for S {}

fn decode<T: DeserializeOwned>(key: &StoreKey, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|source| StoreError::Decode {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Room;
    use serde_json::json;

    #[test]
    fn timetable_key_is_derived_from_date() {
        let key = StoreKey::timetable_for("2024-01-01");
        assert_eq!(key, StoreKey::Timetable("timetable_2024-01-01.json".into()));
        assert_eq!(key.to_string(), "timetable_2024-01-01.json");
        assert_eq!(StoreKey::Rooms.to_string(), "rooms");
    }

    #[test]
    fn missing_collection_is_empty() {
        let store = MemoryStore::new();
        let rooms: Vec<Room> = store.fetch_collection(&StoreKey::Rooms).unwrap();
        assert!(rooms.is_empty());
        let doc: Option<Value> = store
            .fetch_document(&StoreKey::timetable_for("x"))
            .unwrap();
        assert!(doc.is_none());
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let store = MemoryStore::new();
        store
            .persist(&StoreKey::Rooms, &json!({"not": "a list"}))
            .unwrap();
        let err = store.fetch_collection::<Room>(&StoreKey::Rooms).unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref key, .. } if key == "rooms"));
    }

    #[test]
    fn typed_persist_round_trips() {
        let store = MemoryStore::new();
        store
            .persist_as(&StoreKey::Rooms, &vec![Room::new("B12")])
            .unwrap();
        let rooms: Vec<Room> = (&store).fetch_collection(&StoreKey::Rooms).unwrap();
        assert_eq!(rooms, vec![Room::new("B12")]);
    }
}
