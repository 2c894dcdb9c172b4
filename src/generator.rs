//! Génération aléatoire d'un emploi du temps sous contraintes d'indisponibilité.
//!
//! Pour chaque créneau puis chaque jour, on filtre enseignants, groupes et
//! salles indisponibles, puis on tire un élément de chaque liste restante.
//! Si une des trois listes est vide, la case reste `-`.

use crate::calendar::Calendar;
use crate::chooser::{Chooser, RandomChooser};
use crate::error::TimetableError;
use crate::model::{
    Assignment, Cell, Constraint, Group, Named, Room, Teacher, Timetable, TimetableEntry,
};

#[derive(Debug, Clone)]
pub struct TimetableGenerator<C = RandomChooser> {
    calendar: Calendar,
    chooser: C,
}

impl TimetableGenerator {
    /// Grille standard et tirage non déterministe.
    pub fn new() -> Self {
        Self::with_chooser(Calendar::default(), RandomChooser::thread())
    }
}

impl Default for TimetableGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Chooser> TimetableGenerator<C> {
    pub fn with_chooser(calendar: Calendar, chooser: C) -> Self {
        Self { calendar, chooser }
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Construit la grille complète. N'écrit rien : la persistance est à la
    /// charge de l'appelant.
    pub fn generate(
        &mut self,
        date: &str,
        teachers: &[Teacher],
        groups: &[Group],
        rooms: &[Room],
        constraints: &[Constraint],
    ) -> Result<Timetable, TimetableError> {
        if date.is_empty() {
            return Err(TimetableError::MissingDate);
        }
        // Une liste de contraintes vide est aussi refusée.
        if teachers.is_empty() || groups.is_empty() || rooms.is_empty() || constraints.is_empty()
        {
            return Err(TimetableError::InsufficientData);
        }

        let mut entries = Vec::with_capacity(self.calendar.slots().len());
        for &slot in self.calendar.slots() {
            let mut entry = TimetableEntry::new(slot);
            for &day in self.calendar.days() {
                let cell = self.fill_cell(day, slot, teachers, groups, rooms, constraints);
                entry.cells.push((day.to_string(), cell));
            }
            entries.push(entry);
        }

        let timetable = Timetable {
            date: date.to_string(),
            entries,
        };
        tracing::debug!(
            date,
            unfilled = timetable.unfilled_count(),
            "timetable generated"
        );
        Ok(timetable)
    }

    fn fill_cell(
        &mut self,
        day: &str,
        slot: &str,
        teachers: &[Teacher],
        groups: &[Group],
        rooms: &[Room],
        constraints: &[Constraint],
    ) -> Cell {
        let free_teachers = available(teachers, constraints, day, slot);
        let free_groups = available(groups, constraints, day, slot);
        let free_rooms = available(rooms, constraints, day, slot);

        if free_teachers.is_empty() || free_groups.is_empty() || free_rooms.is_empty() {
            return Cell::Unfilled;
        }

        let teacher = pick(&mut self.chooser, &free_teachers);
        let group = pick(&mut self.chooser, &free_groups);
        let room = pick(&mut self.chooser, &free_rooms);

        Cell::Assigned(Assignment {
            subject: teacher.primary_subject().to_string(),
            teacher: teacher.name.clone(),
            group: group.name.clone(),
            room: room.name.clone(),
        })
    }
}

/// Ressources qu'aucune contrainte `Indisponible` ne bloque pour ce jour/créneau.
pub fn available<'a, R: Named>(
    resources: &'a [R],
    constraints: &[Constraint],
    day: &str,
    slot: &str,
) -> Vec<&'a R> {
    resources
        .iter()
        .filter(|r| !constraints.iter().any(|c| c.blocks(r.name(), day, slot)))
        .collect()
}

// `items` n'est jamais vide ici.
fn pick<'a, T, C: Chooser>(chooser: &mut C, items: &[&'a T]) -> &'a T {
    let idx = chooser.choose(items.len());
    debug_assert!(idx < items.len(), "chooser returned {idx} for {} items", items.len());
    items[idx]
}
