//! Optional workbook rendering of the result record: one planning sheet,
//! two sheets per week and a parameters sheet, colour-coded by availability
//! and participation. Convenience only; the JSON-shaped record stays
//! canonical.

use crate::error::Result;
use crate::model::configuration::{AbsenceMode, SchedulerConfig};
use crate::model::instance::{Assignment, Availability, Instance};
use crate::scheduler::projector;
use crate::scheduler::search::SolveStatus;
use log::info;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

const FILL_YES: Color = Color::RGB(0xC6EFCE);
const FILL_MAYBE: Color = Color::RGB(0xFFEB9C);
const FILL_NO: Color = Color::RGB(0xF2DCDB);
const FILL_PLAYING: Color = Color::RGB(0xC6EFCE);
const FILL_ABSENT: Color = Color::RGB(0xFFB6C1);
const FILL_EMPTY: Color = Color::RGB(0xD3D3D3);

/// Sort rank of unassigned planning rows, after every weekday.
const UNASSIGNED_RANK: u8 = 100;

/// Writes the workbook into `directory` and returns its path. The file name
/// encodes the main knobs of the run, like the historical exports did.
pub fn export_workbook(
    instance: &Instance,
    assignment: &Assignment,
    status: SolveStatus,
    config: &SchedulerConfig,
    directory: &Path,
    base_name: &str,
) -> Result<PathBuf> {
    let file_name = format!(
        "{}_maybe{}_load{}_abs{}_timeout{}.xlsx",
        base_name,
        config.maybe_penalty,
        config.max_load,
        config.absence_threshold,
        config.generation_time_limit
    );
    let path = directory.join(file_name);

    let mut workbook = Workbook::new();

    write_planning_sheet(workbook.add_worksheet(), instance, assignment)?;
    for &week in instance.weeks() {
        write_availability_sheet(workbook.add_worksheet(), instance, week)?;
    }
    for &week in instance.weeks() {
        write_participation_sheet(workbook.add_worksheet(), instance, assignment, week)?;
    }
    write_parameters_sheet(workbook.add_worksheet(), config, status)?;

    workbook.save(&path)?;
    info!("workbook written to {}", path.display());
    Ok(path)
}

fn write_planning_sheet(
    sheet: &mut Worksheet,
    instance: &Instance,
    assignment: &Assignment,
) -> Result<()> {
    sheet.set_name("Planning")?;
    for (col, header) in ["Morceau", "Jour", "Heures", "Participants"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    // (rank, hours, piece, day, hours, participants), unassigned rows last.
    let mut rows: Vec<(u8, String, String, String, String, String)> = Vec::new();
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
                rows.push((
                    slot.day.order(),
                    slot.display_hours(),
                    piece.title.to_string(),
                    slot.display_day(),
                    slot.display_hours(),
                    participants,
                ));
            }
            None => rows.push((
                UNASSIGNED_RANK,
                String::new(),
                piece.title.to_string(),
                "Non assigné".to_string(),
                "—".to_string(),
                participants,
            )),
        }
    }
    rows.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

    for (row_idx, (_, _, piece, day, hours, participants)) in rows.iter().enumerate() {
        let row = row_idx as u32 + 1;
        sheet.write_string(row, 0, piece)?;
        sheet.write_string(row, 1, day)?;
        sheet.write_string(row, 2, hours)?;
        sheet.write_string(row, 3, participants)?;
    }
    Ok(())
}

fn write_availability_sheet(sheet: &mut Worksheet, instance: &Instance, week: u32) -> Result<()> {
    sheet.set_name(format!("Dispo_Semaine_{}", week))?;

    sheet.write_string(0, 0, "Jour")?;
    sheet.write_string(0, 1, "Heures")?;
    for (col, name) in instance.musicians().iter().enumerate() {
        sheet.write_string(0, col as u16 + 2, name.as_ref())?;
    }

    let fill_yes = Format::new().set_background_color(FILL_YES);
    let fill_maybe = Format::new().set_background_color(FILL_MAYBE);
    let fill_no = Format::new().set_background_color(FILL_NO);

    for (row_idx, &slot_id) in projector::week_slots(instance, week).iter().enumerate() {
        let row = row_idx as u32 + 1;
        let slot = &instance.slots()[slot_id];
        sheet.write_string(row, 0, slot.display_day())?;
        sheet.write_string(row, 1, slot.display_hours())?;
        for m in 0..instance.musicians().len() {
            let answer = instance.availability(m, slot_id);
            let fill = match answer {
                Availability::Yes => &fill_yes,
                Availability::Maybe => &fill_maybe,
                Availability::No => &fill_no,
            };
            sheet.write_string_with_format(row, m as u16 + 2, answer.label(), fill)?;
        }
    }
    Ok(())
}

fn write_participation_sheet(
    sheet: &mut Worksheet,
    instance: &Instance,
    assignment: &Assignment,
    week: u32,
) -> Result<()> {
    sheet.set_name(format!("Repart_Semaine_{}", week))?;

    sheet.write_string(0, 0, "Jour")?;
    sheet.write_string(0, 1, "Heures")?;
    sheet.write_string(0, 2, "Morceau")?;
    for (col, name) in instance.musicians().iter().enumerate() {
        sheet.write_string(0, col as u16 + 3, name.as_ref())?;
    }

    let fill_playing = Format::new().set_background_color(FILL_PLAYING);
    let fill_absent = Format::new().set_background_color(FILL_ABSENT);
    let fill_empty = Format::new().set_background_color(FILL_EMPTY);

    for (row_idx, &slot_id) in projector::week_slots(instance, week).iter().enumerate() {
        let row = row_idx as u32 + 1;
        let slot = &instance.slots()[slot_id];
        let piece_id = assignment.piece_at(slot_id);
        sheet.write_string(row, 0, slot.display_day())?;
        sheet.write_string(row, 1, slot.display_hours())?;
        sheet.write_string(
            row,
            2,
            piece_id
                .map(|p| instance.pieces()[p].title.as_ref())
                .unwrap_or(""),
        )?;
        for m in 0..instance.musicians().len() {
            let needed = piece_id.is_some_and(|p| instance.pieces()[p].members.contains(&m));
            let (label, fill) = if needed {
                match instance.availability(m, slot_id) {
                    Availability::Yes => ("Répète", &fill_playing),
                    Availability::No => ("Absent", &fill_absent),
                    Availability::Maybe => ("Maybe", &fill_empty),
                }
            } else {
                ("", &fill_empty)
            };
            sheet.write_string_with_format(row, m as u16 + 3, label, fill)?;
        }
    }
    Ok(())
}

fn write_parameters_sheet(
    sheet: &mut Worksheet,
    config: &SchedulerConfig,
    status: SolveStatus,
) -> Result<()> {
    sheet.set_name("Parametres")?;
    sheet.write_string(0, 0, "Paramètre")?;
    sheet.write_string(0, 1, "Valeur")?;
    sheet.write_string(0, 2, format!("Type de solution: {}", status.label()))?;

    let mode = match config.absence_mode {
        AbsenceMode::Strict => "strict",
        AbsenceMode::Flexible => "flexible",
    };
    let special = if config.special_slots.is_empty() {
        "Aucun".to_string()
    } else {
        config.special_slots.join(", ")
    };
    let rows = [
        ("Pénalité maybe", config.maybe_penalty.to_string()),
        ("Charge max", config.max_load.to_string()),
        ("Pénalité charge", config.load_penalty.to_string()),
        ("Bonus groupe", config.group_bonus.to_string()),
        ("Mode absence", mode.to_string()),
        ("Seuil absence", config.absence_threshold.to_string()),
        ("Créneaux spéciaux", special),
        (
            "Seuil absence créneaux spéciaux",
            config.special_absence_threshold.to_string(),
        ),
        (
            "Temps limite génération",
            config.generation_time_limit.to_string(),
        ),
    ];
    for (idx, (name, value)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *name)?;
        sheet.write_string(row, 1, value)?;
    }
    Ok(())
}
