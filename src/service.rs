use crate::chooser::{Chooser, RandomChooser};
use crate::error::TimetableError;
use crate::generator::TimetableGenerator;
use crate::model::{Constraint, Group, HistoryEntry, Room, Teacher, Timetable};
use crate::store::{Namespace, ResourceStore, ResourceStoreExt, StoreKey};
use serde_json::{json, Value};

const UNKNOWN_DATE: &str = "Inconnu";

/// Opérations emploi du temps au-dessus d'un Resource Store.
pub struct TimetableService<S, C = RandomChooser> {
    store: S,
    generator: TimetableGenerator<C>,
}

impl<S: ResourceStore> TimetableService<S> {
    pub fn new(store: S) -> Self {
        Self::with_generator(store, TimetableGenerator::new())
    }
}

impl<S: ResourceStore, C: Chooser> TimetableService<S, C> {
    pub fn with_generator(store: S, generator: TimetableGenerator<C>) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generator(&self) -> &TimetableGenerator<C> {
        &self.generator
    }

    /// Génère puis enregistre sous `timetable_{date}.json` (écrase l'existant).
    pub fn generate(&mut self, date: &str) -> Result<Timetable, TimetableError> {
        if date.is_empty() {
            return Err(TimetableError::MissingDate);
        }
        let teachers: Vec<Teacher> = self.store.fetch_collection(&StoreKey::Teachers)?;
        let groups: Vec<Group> = self.store.fetch_collection(&StoreKey::Groups)?;
        let rooms: Vec<Room> = self.store.fetch_collection(&StoreKey::Rooms)?;
        let constraints: Vec<Constraint> = self.store.fetch_collection(&StoreKey::Constraints)?;

        let timetable = self
            .generator
            .generate(date, &teachers, &groups, &rooms, &constraints)?;
        self.store
            .persist_as(&StoreKey::timetable_for(date), &timetable)?;
        tracing::info!(date, "timetable saved");
        Ok(timetable)
    }

    /// Enregistre tel quel un emploi du temps construit ailleurs.
    pub fn export(&self, date: &str, timetables: Value) -> Result<(), TimetableError> {
        if date.is_empty() || timetables.is_null() {
            return Err(TimetableError::MissingTimetable);
        }
        let doc = json!({ "date": date, "timetable": timetables });
        self.store.persist(&StoreKey::timetable_for(date), &doc)?;
        tracing::info!(date, "timetable exported");
        Ok(())
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>, TimetableError> {
        let names = self.store.list(Namespace::Timetables)?;
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let modified = self.store.modified(&StoreKey::Timetable(name.clone()))?;
            out.push(HistoryEntry {
                date: date_from_file_name(&name).unwrap_or(UNKNOWN_DATE).to_string(),
                name,
                modified,
            });
        }
        Ok(out)
    }

    /// Document brut d'un fichier d'emploi du temps.
    pub fn timetable(&self, file_name: &str) -> Result<Value, TimetableError> {
        self.store
            .fetch(&StoreKey::Timetable(file_name.to_string()))?
            .ok_or_else(|| TimetableError::NotFound(file_name.to_string()))
    }

    /// Emploi du temps enregistré pour `date`, relu sans régénération.
    pub fn stored(&self, date: &str) -> Result<Timetable, TimetableError> {
        if date.is_empty() {
            return Err(TimetableError::MissingDate);
        }
        let key = StoreKey::timetable_for(date);
        self.store
            .fetch_document(&key)?
            .ok_or_else(|| TimetableError::NotFound(key.to_string()))
    }

    /// Tous les emplois du temps enregistrés, dans l'ordre de `history`.
    pub fn visualise(&self) -> Result<Vec<Value>, TimetableError> {
        let mut out = Vec::new();
        for name in self.store.list(Namespace::Timetables)? {
            match self.store.fetch(&StoreKey::Timetable(name.clone()))? {
                Some(doc) => out.push(doc),
                None => tracing::warn!(name = %name, "timetable vanished while listing"),
            }
        }
        Ok(out)
    }

    pub fn clear(&self) -> Result<usize, TimetableError> {
        Ok(self.store.delete_all(Namespace::Timetables)?)
    }
}

/// Date `AAAA-MM-JJ` suivant `timetable_` dans un nom de fichier.
pub fn date_from_file_name(name: &str) -> Option<&str> {
    const PREFIX: &str = "timetable_";
    let mut rest = name;
    while let Some(pos) = rest.find(PREFIX) {
        let after = &rest[pos + PREFIX.len()..];
        if let Some(candidate) = after.get(..10) {
            if looks_like_date(candidate) {
                return Some(candidate);
            }
        }
        rest = after;
    }
    None
}

fn looks_like_date(s: &str) -> bool {
    s.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    })
}
