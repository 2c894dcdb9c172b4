use super::{check_timetable_name, Namespace, ResourceStore, StoreKey};
use crate::error::StoreError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Store en mémoire, pour les tests et l'intégration dans un autre processus.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nombre total de documents, collections comprises.
    pub fn len(&self) -> usize {
        self.docs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn docs(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        // Un verrou empoisonné ne rend pas les données invalides ici.
        self.docs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn slot(key: &StoreKey) -> Result<String, StoreError> {
    match key {
        StoreKey::Timetable(name) => {
            check_timetable_name(name)?;
            Ok(format!("timetables/{name}"))
        }
        other => Ok(other.to_string()),
    }
}

impl ResourceStore for MemoryStore {
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        let slot = slot(key)?;
        Ok(self.docs().get(&slot).cloned())
    }

    fn persist(&self, key: &StoreKey, value: &Value) -> Result<(), StoreError> {
        let slot = slot(key)?;
        self.docs().insert(slot, value.clone());
        Ok(())
    }

    fn list(&self, namespace: Namespace) -> Result<Vec<String>, StoreError> {
        let Namespace::Timetables = namespace;
        Ok(self
            .docs()
            .keys()
            .filter_map(|k| k.strip_prefix("timetables/"))
            .map(str::to_string)
            .collect())
    }

    fn delete_all(&self, namespace: Namespace) -> Result<usize, StoreError> {
        let Namespace::Timetables = namespace;
        let mut docs = self.docs();
        let before = docs.len();
        docs.retain(|k, _| !k.starts_with("timetables/"));
        Ok(before - docs.len())
    }
}
