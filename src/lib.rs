#![forbid(unsafe_code)]
//! Emploi — génération d'emplois du temps scolaires sur fichiers JSON (sans BD).
//!
//! - Enseignants, groupes, salles et contraintes lus depuis un Resource Store.
//! - Grille fixe : 4 créneaux × 5 jours (lundi → vendredi).
//! - Tirage aléatoire parmi les ressources disponibles ; `-` si aucune.
//! - Un fichier `timetable_{date}.json` par date, écrasé à chaque génération.

pub mod calendar;
pub mod chooser;
pub mod error;
pub mod generator;
pub mod io;
pub mod model;
pub mod service;
pub mod store;

pub use calendar::Calendar;
pub use chooser::{Chooser, RandomChooser};
pub use error::{ErrorBody, StoreError, TimetableError};
pub use generator::TimetableGenerator;
pub use model::{
    Assignment, Cell, Constraint, Group, HistoryEntry, Room, Teacher, Timetable, TimetableEntry,
};
pub use service::TimetableService;
pub use store::{
    JsonFileStore, MemoryStore, Namespace, ResourceStore, ResourceStoreExt, StoreKey, StoreLayout,
};
