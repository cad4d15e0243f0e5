//! Projects a frozen assignment into the structured result record: planning
//! list, per-week availability and participation grids, and counts.

use crate::model::instance::{Assignment, Availability, Instance, SlotId};
use crate::scheduler::search::SolveStatus;
use indexmap::IndexMap;
use serde::Serialize;

/// Placeholder strings for pieces left without a slot.
const UNASSIGNED_DAY: &str = "Non assigné";
const UNASSIGNED_HOURS: &str = "—";

/// Participation labels of the per-week grid.
const LABEL_PLAYING: &str = "repete";
const LABEL_ABSENT: &str = "absent";
const LABEL_MAYBE_ABSENT: &str = "maybe_absent";
const LABEL_NOT_NEEDED: &str = "no";

#[derive(Serialize, Debug, Clone)]
pub struct PlanningEntry {
    #[serde(rename = "Morceau")]
    pub piece: Box<str>,
    #[serde(rename = "Jour")]
    pub day: String,
    #[serde(rename = "Heures")]
    pub hours: String,
    #[serde(rename = "Participants")]
    pub participants: String,
}

/// One grid row: the fixed `Jour`/`Heures` (and `Morceau`) cells followed by
/// one cell per musician, in insertion order.
pub type GridRow = IndexMap<Box<str>, Box<str>>;

#[derive(Serialize, Debug)]
pub struct ScheduleReport {
    pub planning: Vec<PlanningEntry>,
    /// `SEMAINE_<n>` -> availability rows.
    pub disponibilites: IndexMap<String, Vec<GridRow>>,
    /// `SEMAINE_<n>` -> participation rows.
    pub repartition: IndexMap<String, Vec<GridRow>>,
    pub assigned: usize,
    pub total: usize,
    pub notassigned: Vec<Box<str>>,
    pub status: SolveStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// Builds the result record from a frozen assignment.
pub fn project(instance: &Instance, assignment: &Assignment, status: SolveStatus) -> ScheduleReport {
    let mut planning = Vec::with_capacity(instance.pieces().len());
    let mut notassigned = Vec::new();
    for (piece_id, piece) in instance.pieces().iter().enumerate() {
        let participants = piece
            .members
            .iter()
            .map(|&m| instance.musician_name(m))
            .collect::<Vec<_>>()
            .join(", ");
        match assignment.get(piece_id) {
            Some(slot_id) => {
                let slot = &instance.slots()[slot_id];
                planning.push(PlanningEntry {
                    piece: piece.title.clone(),
                    day: slot.display_day(),
                    hours: slot.display_hours(),
                    participants,
                });
            }
            None => {
                notassigned.push(piece.title.clone());
                planning.push(PlanningEntry {
                    piece: piece.title.clone(),
                    day: UNASSIGNED_DAY.to_string(),
                    hours: UNASSIGNED_HOURS.to_string(),
                    participants,
                });
            }
        }
    }

    let mut disponibilites = IndexMap::new();
    let mut repartition = IndexMap::new();
    for &week in instance.weeks() {
        let slots = week_slots(instance, week);

        let mut dispo_rows = Vec::with_capacity(slots.len());
        let mut repart_rows = Vec::with_capacity(slots.len());
        for &slot_id in &slots {
            let slot = &instance.slots()[slot_id];

            let mut dispo_row = GridRow::new();
            dispo_row.insert("Jour".into(), slot.display_day().into_boxed_str());
            dispo_row.insert("Heures".into(), slot.display_hours().into_boxed_str());
            for m in 0..instance.musicians().len() {
                dispo_row.insert(
                    instance.musician_name(m).into(),
                    instance.availability(m, slot_id).label().into(),
                );
            }
            dispo_rows.push(dispo_row);

            let piece_id = assignment.piece_at(slot_id);
            let mut repart_row = GridRow::new();
            repart_row.insert("Jour".into(), slot.display_day().into_boxed_str());
            repart_row.insert("Heures".into(), slot.display_hours().into_boxed_str());
            repart_row.insert(
                "Morceau".into(),
                piece_id
                    .map(|p| instance.pieces()[p].title.clone())
                    .unwrap_or_default(),
            );
            for m in 0..instance.musicians().len() {
                let needed = piece_id
                    .is_some_and(|p| instance.pieces()[p].members.contains(&m));
                let label = if needed {
                    match instance.availability(m, slot_id) {
                        Availability::Yes => LABEL_PLAYING,
                        Availability::No => LABEL_ABSENT,
                        Availability::Maybe => LABEL_MAYBE_ABSENT,
                    }
                } else {
                    LABEL_NOT_NEEDED
                };
                repart_row.insert(instance.musician_name(m).into(), label.into());
            }
            repart_rows.push(repart_row);
        }

        disponibilites.insert(format!("SEMAINE_{}", week), dispo_rows);
        repartition.insert(format!("SEMAINE_{}", week), repart_rows);
    }

    let assigned = assignment.assigned_count();
    ScheduleReport {
        planning,
        disponibilites,
        repartition,
        assigned,
        total: instance.pieces().len(),
        notassigned,
        status,
        diagnostics: instance.diagnostics.clone(),
    }
}

/// Musicians required by an assigned piece but marked "no" at its chosen
/// slot, keyed by piece title.
pub fn forced_absentees(
    instance: &Instance,
    assignment: &Assignment,
) -> IndexMap<Box<str>, Vec<Box<str>>> {
    let mut forced = IndexMap::new();
    for (piece_id, piece) in instance.pieces().iter().enumerate() {
        let Some(slot_id) = assignment.get(piece_id) else {
            continue;
        };
        let absent: Vec<Box<str>> = piece
            .members
            .iter()
            .filter(|&&m| instance.availability(m, slot_id) == Availability::No)
            .map(|&m| instance.musician_name(m).into())
            .collect();
        if !absent.is_empty() {
            forced.insert(piece.title.clone(), absent);
        }
    }
    forced
}

/// Slots of one week, ordered by day of week then time string. This is the
/// row order of both grids.
pub(crate) fn week_slots(instance: &Instance, week: u32) -> Vec<SlotId> {
    let mut slots: Vec<SlotId> = (0..instance.slots().len())
        .filter(|&s| instance.week_of_date(instance.slots()[s].date) == week)
        .collect();
    slots.sort_by_key(|&s| {
        let slot = &instance.slots()[s];
        (slot.day.order(), slot.display_hours())
    });
    slots
}
