use crate::calendar::Calendar;
use crate::model::Timetable;
use anyhow::Context;
use csv::{Terminator, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Grille CSV : header `time,lundi,...,vendredi`, une ligne par créneau.
pub fn write_timetable_csv<W: Write>(
    out: W,
    timetable: &Timetable,
    calendar: &Calendar,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    let mut header = vec!["time"];
    header.extend_from_slice(calendar.days());
    w.write_record(&header)?;

    for entry in &timetable.entries {
        let mut row = vec![entry.time.clone()];
        for day in calendar.days() {
            // case absente d'un fichier importé : cellule vide
            row.push(entry.cell(day).map(|c| c.to_string()).unwrap_or_default());
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_timetable_csv<P: AsRef<Path>>(
    path: P,
    timetable: &Timetable,
    calendar: &Calendar,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_timetable_csv(file, timetable, calendar)
}

/// Export JSON (jolie mise en forme), hors Resource Store.
pub fn export_timetable_json<P: AsRef<Path>>(path: P, timetable: &Timetable) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, timetable)
        .with_context(|| format!("writing {}", path.display()))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, TimetableEntry};

    #[test]
    fn missing_cells_render_empty_and_commas_are_quoted() {
        let mut entry = TimetableEntry::new("08:00-10:00");
        entry.cells.push(("mardi".into(), Cell::Unfilled));
        entry
            .cells
            .push(("lundi".into(), "Math (A, G1, R1)".parse().unwrap()));
        let tt = Timetable {
            date: "d".into(),
            entries: vec![entry],
        };

        let mut buf = Vec::new();
        write_timetable_csv(&mut buf, &tt, &Calendar::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,lundi,mardi,mercredi,jeudi,vendredi");
        assert_eq!(lines[1], "08:00-10:00,\"Math (A, G1, R1)\",-,,,");
    }

    #[test]
    fn json_export_writes_wrapped_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let tt = Timetable {
            date: "2024-01-01".into(),
            entries: Vec::new(),
        };
        export_timetable_json(&path, &tt).unwrap();
        let back: Timetable =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, tt);
    }
}
