use super::title_case;
use crate::error::{Error, Result};
use log::{debug, warn};

/// Number of metadata columns before the per-instrument columns start.
const INSTRUMENT_COLUMN_OFFSET: usize = 6;

/// Header of the title column.
const TITLE_COLUMN: &str = "Titre";

/// Parses the repartition table: one row per piece, a `Titre` column, and
/// one column per instrument holding comma-separated musician names.
/// Returns the pieces (title, member names) and the discovered musicians,
/// both in document order.
pub(super) fn parse(
    rows: &[Vec<String>],
    diagnostics: &mut Vec<String>,
) -> Result<(Vec<(Box<str>, Vec<Box<str>>)>, Vec<Box<str>>)> {
    let Some(header) = rows.first() else {
        return Err(Error::InputShape("repartition table is empty".into()));
    };
    let Some(title_col) = header.iter().position(|c| c.trim() == TITLE_COLUMN) else {
        return Err(Error::InputShape(format!(
            "repartition table has no '{}' column",
            TITLE_COLUMN
        )));
    };

    let mut pieces: Vec<(Box<str>, Vec<Box<str>>)> = Vec::new();
    let mut musicians: Vec<Box<str>> = Vec::new();

    for (row_idx, row) in rows.iter().enumerate().skip(1) {
        let title = row.get(title_col).map(|c| c.trim()).unwrap_or("");
        if title.is_empty() {
            continue;
        }

        let mut members: Vec<Box<str>> = Vec::new();
        for cell in row.iter().skip(INSTRUMENT_COLUMN_OFFSET) {
            for name in cell.split(',') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let name: Box<str> = title_case(name).into_boxed_str();
                if !members.contains(&name) {
                    members.push(name);
                }
            }
        }

        if members.is_empty() {
            diagnostics.push(format!(
                "repartition row {}: piece '{}' has no musicians, skipped",
                row_idx + 1,
                title
            ));
            warn!("piece '{}' has no musicians, skipped", title);
            continue;
        }

        for name in &members {
            if !musicians.contains(name) {
                musicians.push(name.clone());
            }
        }
        pieces.push((title.into(), members));
    }

    debug!(
        "repartition table: {} pieces, {} musicians",
        pieces.len(),
        musicians.len()
    );
    Ok((pieces, musicians))
}
