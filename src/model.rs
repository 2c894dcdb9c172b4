use crate::calendar::{DEFAULT_SUBJECT, UNAVAILABLE, UNFILLED};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ressource nommée pouvant faire l'objet d'une contrainte.
pub trait Named {
    fn name(&self) -> &str;
}

/// Enseignant ; la première matière est la matière principale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_subjects")]
    pub subjects: Vec<String>,
}

impl Teacher {
    pub fn new<N: Into<String>>(name: N, subjects: &[&str]) -> Self {
        Self {
            name: name.into(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn primary_subject(&self) -> &str {
        self.subjects
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_SUBJECT)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubjectsRepr {
    List(Vec<String>),
    Text(String),
}

// Les fichiers existants stockent "Math, Physique" ; on accepte aussi une liste.
fn deserialize_subjects<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<SubjectsRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(SubjectsRepr::List(list)) => list,
        Some(SubjectsRepr::Text(text)) if text.is_empty() => Vec::new(),
        Some(SubjectsRepr::Text(text)) => text.split(", ").map(str::to_string).collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
}

impl Group {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Room {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Named for Teacher {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Group {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Room {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Contrainte sur une ressource pour un jour et un créneau.
/// `id` est libre (nombre ou texte) ; un `type` absent ne bloque rien.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub resource: String,
    pub day: String,
    pub time: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Constraint {
    pub fn unavailable<R, D, T>(resource: R, day: D, time: T) -> Self
    where
        R: Into<String>,
        D: Into<String>,
        T: Into<String>,
    {
        Self {
            id: None,
            resource: resource.into(),
            day: day.into(),
            time: time.into(),
            kind: UNAVAILABLE.to_string(),
        }
    }

    /// Vrai si la contrainte rend `resource` indisponible sur ce jour/créneau.
    /// `day` est attendu en minuscules ; le créneau doit correspondre exactement.
    pub fn blocks(&self, resource: &str, day: &str, slot: &str) -> bool {
        self.kind == UNAVAILABLE
            && self.resource == resource
            && self.time == slot
            && crate::calendar::Calendar::same_day(&self.day, day)
    }
}

/// Cours affecté à une case : matière, enseignant, groupe, salle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub subject: String,
    pub teacher: String,
    pub group: String,
    pub room: String,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.subject, self.teacher, self.group, self.room
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Assigned(Assignment),
    Unfilled,
}

impl Cell {
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Cell::Assigned(a) => Some(a),
            Cell::Unfilled => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Assigned(a) => fmt::Display::fmt(a, f),
            Cell::Unfilled => f.write_str(UNFILLED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCellError(String);

impl fmt::Display for ParseCellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timetable cell: {:?}", self.0)
    }
}

impl std::error::Error for ParseCellError {}

impl FromStr for Cell {
    type Err = ParseCellError;

    /// Relit `"Matière (Enseignant, Groupe, Salle)"` ou `"-"`.
    /// Les noms contenant `", "` ne sont pas relisibles sans ambiguïté.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == UNFILLED {
            return Ok(Cell::Unfilled);
        }
        let err = || ParseCellError(s.to_string());
        let body = s.strip_suffix(')').ok_or_else(err)?;
        let open = body.rfind(" (").ok_or_else(err)?;
        let subject = &body[..open];
        let mut parts = body[open + 2..].splitn(3, ", ");
        match (parts.next(), parts.next(), parts.next()) {
            (Some(teacher), Some(group), Some(room)) => Ok(Cell::Assigned(Assignment {
                subject: subject.to_string(),
                teacher: teacher.to_string(),
                group: group.to_string(),
                room: room.to_string(),
            })),
            _ => Err(err()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Une ligne de l'emploi du temps : un créneau et une case par jour.
///
/// Sérialisé à plat : `{ "time": "08:00-10:00", "lundi": "...", ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableEntry {
    pub time: String,
    pub cells: Vec<(String, Cell)>,
}

impl TimetableEntry {
    pub fn new<T: Into<String>>(time: T) -> Self {
        Self {
            time: time.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(&self, day: &str) -> Option<&Cell> {
        self.cells.iter().find(|(d, _)| d == day).map(|(_, c)| c)
    }
}

impl Serialize for TimetableEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry("time", &self.time)?;
        for (day, cell) in &self.cells {
            map.serialize_entry(day, cell)?;
        }
        map.end()
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = TimetableEntry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a timetable row with a `time` key and one cell per day")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut time = None;
        let mut cells = Vec::new();
        while let Some(key) = access.next_key::<String>()? {
            if key == "time" {
                if time.is_some() {
                    return Err(de::Error::duplicate_field("time"));
                }
                time = Some(access.next_value::<String>()?);
            } else {
                cells.push((key, access.next_value::<Cell>()?));
            }
        }
        let time = time.ok_or_else(|| de::Error::missing_field("time"))?;
        Ok(TimetableEntry { time, cells })
    }
}

impl<'de> Deserialize<'de> for TimetableEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntryVisitor)
    }
}

/// Emploi du temps identifié par sa date (format libre, utilisé tel quel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub date: String,
    #[serde(rename = "timetable")]
    pub entries: Vec<TimetableEntry>,
}

impl Timetable {
    pub fn entry(&self, slot: &str) -> Option<&TimetableEntry> {
        self.entries.iter().find(|e| e.time == slot)
    }

    pub fn cell(&self, slot: &str, day: &str) -> Option<&Cell> {
        self.entry(slot).and_then(|e| e.cell(day))
    }

    pub fn unfilled_count(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| e.cells.iter())
            .filter(|(_, c)| matches!(c, Cell::Unfilled))
            .count()
    }
}

/// Entrée d'historique : nom de fichier et date extraite du nom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}
