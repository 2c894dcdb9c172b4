/// Jours ouvrés, en minuscules, dans l'ordre de la semaine.
pub const SCHOOL_DAYS: [&str; 5] = ["lundi", "mardi", "mercredi", "jeudi", "vendredi"];

/// Créneaux de deux heures, dans l'ordre de la journée.
pub const TIME_SLOTS: [&str; 4] = ["08:00-10:00", "10:00-12:00", "13:00-15:00", "15:00-17:00"];

/// Type de contrainte qui rend une ressource indisponible.
pub const UNAVAILABLE: &str = "Indisponible";

/// Matière affichée quand un enseignant n'en déclare aucune.
pub const DEFAULT_SUBJECT: &str = "Matière";

/// Valeur d'une case sans affectation possible.
pub const UNFILLED: &str = "-";

/// Grille jours × créneaux injectée dans le générateur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    days: &'static [&'static str],
    slots: &'static [&'static str],
}

impl Calendar {
    pub const fn new(days: &'static [&'static str], slots: &'static [&'static str]) -> Self {
        Self { days, slots }
    }

    pub fn days(&self) -> &'static [&'static str] {
        self.days
    }

    pub fn slots(&self) -> &'static [&'static str] {
        self.slots
    }

    /// Compare un jour saisi librement à un jour de la grille, sans casse.
    pub fn same_day(input: &str, day: &str) -> bool {
        input.to_lowercase() == day
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(&SCHOOL_DAYS, &TIME_SLOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_four_by_five() {
        let cal = Calendar::default();
        assert_eq!(cal.slots().len(), 4);
        assert_eq!(cal.days().len(), 5);
        assert_eq!(cal.days()[0], "lundi");
        assert_eq!(cal.slots()[2], "13:00-15:00");
    }

    #[test]
    fn day_comparison_ignores_case() {
        assert!(Calendar::same_day("LUNDI", "lundi"));
        assert!(Calendar::same_day("Mercredi", "mercredi"));
        assert!(!Calendar::same_day("monday", "lundi"));
        assert!(!Calendar::same_day(" lundi", "lundi"));
    }
}
