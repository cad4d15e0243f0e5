use super::title_case;
use crate::error::{Error, Result};
use crate::model::instance::Availability;
use crate::scheduler::slot::Slot;
use log::{debug, warn};
use std::collections::HashMap;

/// Header of the musician-name column in the by-name shape.
const NAME_COLUMN: &str = "Nom";

/// First column carrying answers, in both shapes.
const FIRST_ANSWER_COLUMN: usize = 2;

/// Dotted day prefixes marking a cell as a candidate slot label in the
/// embedded shape.
const DAY_MARKERS: [&str; 7] = ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."];

/// Header and slot-label rows preceding the musician rows in the embedded
/// shape.
const EMBEDDED_HEADER_ROWS: usize = 4;

pub(super) struct AvailabilityData {
    /// Respondents discovered by the table itself (embedded shape only; the
    /// by-name shape takes its musicians from the repartition table).
    pub musicians: Vec<Box<str>>,
    /// Musician name -> canonical slot id -> answer.
    pub availability: HashMap<Box<str>, HashMap<Box<str>, Availability>>,
    /// Document-order slot list, before global sorting.
    pub slots: Vec<Slot>,
}

/// Parses the availability table, recognizing the two shapes: by-name (a
/// `Nom` column, slot labels in the remaining headers) and embedded (slot
/// labels inside body cells, musician rows identified by an email cell).
pub(super) fn parse(
    rows: &[Vec<String>],
    diagnostics: &mut Vec<String>,
) -> Result<AvailabilityData> {
    let Some(header) = rows.first() else {
        return Err(Error::InputShape("availability table is empty".into()));
    };
    if let Some(name_col) = header.iter().position(|c| c.trim() == NAME_COLUMN) {
        parse_by_name(rows, name_col, diagnostics)
    } else {
        parse_embedded(rows, diagnostics)
    }
}

/// By-name shape: each remaining column header encodes one slot, each row
/// one musician.
fn parse_by_name(
    rows: &[Vec<String>],
    name_col: usize,
    diagnostics: &mut Vec<String>,
) -> Result<AvailabilityData> {
    let header = &rows[0];

    // Column -> slot, skipping headers the grammar rejects.
    let mut columns: Vec<(usize, Slot)> = Vec::new();
    for (col, label) in header.iter().enumerate().skip(FIRST_ANSWER_COLUMN) {
        match Slot::from_label(label) {
            Some(slot) => columns.push((col, slot)),
            None => {
                diagnostics.push(format!("unparseable slot header '{}', skipped", label.trim()));
                warn!("unparseable slot header '{}', skipped", label.trim());
            }
        }
    }

    let mut availability: HashMap<Box<str>, HashMap<Box<str>, Availability>> = HashMap::new();
    for row in rows.iter().skip(1) {
        let name = row.get(name_col).map(|c| c.trim()).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let name: Box<str> = title_case(name).into_boxed_str();
        let answers = availability.entry(name).or_default();
        for (col, slot) in &columns {
            let cell = row.get(*col).map(String::as_str).unwrap_or("");
            answers.insert(slot.id.clone(), Availability::from_cell(cell));
        }
    }

    debug!(
        "by-name availability table: {} slots, {} respondents",
        columns.len(),
        availability.len()
    );
    Ok(AvailabilityData {
        musicians: Vec::new(),
        availability,
        slots: columns.into_iter().map(|(_, s)| s).collect(),
    })
}

/// Embedded shape: slot labels appear as body cells in document order, and
/// musician rows below the header block carry their answers positionally
/// aligned with that reconstructed slot sequence.
fn parse_embedded(rows: &[Vec<String>], diagnostics: &mut Vec<String>) -> Result<AvailabilityData> {
    let mut slots: Vec<Slot> = Vec::new();
    for row in rows.iter().skip(1) {
        for cell in row.iter().skip(FIRST_ANSWER_COLUMN) {
            let lowered = cell.to_lowercase();
            if !DAY_MARKERS.iter().any(|m| lowered.contains(m)) {
                continue;
            }
            match Slot::from_label(cell) {
                Some(slot) => slots.push(slot),
                None => {
                    diagnostics.push(format!(
                        "unparseable slot label '{}', skipped",
                        cell.replace(['\n', '\r'], " ").trim()
                    ));
                    warn!("unparseable slot label, skipped");
                }
            }
        }
    }
    if slots.is_empty() {
        return Err(Error::InputShape(
            "availability table matches no recognized shape (no 'Nom' column and no slot labels)"
                .into(),
        ));
    }

    let mut musicians: Vec<Box<str>> = Vec::new();
    let mut availability: HashMap<Box<str>, HashMap<Box<str>, Availability>> = HashMap::new();
    for row in rows.iter().skip(1 + EMBEDDED_HEADER_ROWS) {
        let name = row.first().map(|c| c.trim()).unwrap_or("");
        let has_email = row.get(1).is_some_and(|c| c.contains('@'));
        if name.is_empty() || !has_email {
            continue;
        }
        let name: Box<str> = title_case(name).into_boxed_str();
        if !musicians.contains(&name) {
            musicians.push(name.clone());
        }
        let answers = availability.entry(name).or_default();
        for (k, slot) in slots.iter().enumerate() {
            let cell = row
                .get(FIRST_ANSWER_COLUMN + k)
                .map(String::as_str)
                .unwrap_or("");
            answers.insert(slot.id.clone(), Availability::from_cell(cell));
        }
    }

    debug!(
        "embedded availability table: {} slots, {} respondents",
        slots.len(),
        musicians.len()
    );
    Ok(AvailabilityData {
        musicians,
        availability,
        slots,
    })
}
