use itertools::Itertools;

use crate::catalog::{Catalog, SessionLoader, Training};
use crate::error::CatalogError;
use crate::plan::category_breakdown;
use crate::util::format_clock;

/// One line per training: share id, name, exercise count and minutes
pub fn training_list(catalog: &Catalog) -> String {
    catalog
        .trainings()
        .iter()
        .map(|t| {
            format!(
                "{:<10} {} ({} exercises, {} min)",
                t.share_id,
                t.name,
                t.exercises.len(),
                t.total_minutes
            )
        })
        .join("\n")
}

/// Printable summary of the training shared under `share_id`
pub fn training_summary(catalog: &Catalog, share_id: &str) -> Result<String, CatalogError> {
    let session = catalog.load(share_id)?;
    let training: &Training = catalog
        .find_by_share_id(share_id)
        .ok_or_else(|| CatalogError::SessionNotFound(share_id.to_string()))?;

    let mut out = vec![
        session.title.clone(),
        format!(
            "Share id: {}  |  Created: {}",
            training.share_id, training.created_at
        ),
        String::new(),
    ];

    for (idx, step) in session.steps().iter().enumerate() {
        out.push(format!(
            "{:>2}. {:<28} {:>6}  {}",
            idx + 1,
            step.label,
            format_clock(step.duration_seconds()),
            step.category.as_deref().unwrap_or("-")
        ));
    }

    out.push(String::new());
    out.push(format!(
        "Total: {} ({} min)",
        format_clock(session.total_duration_seconds()),
        training.total_minutes
    ));

    let shares = category_breakdown(training, catalog);
    if !shares.is_empty() {
        out.push(format!(
            "By category: {}",
            shares
                .iter()
                .map(|s| format!("{} {} min ({:.0}%)", s.name, s.minutes, s.percent))
                .join(", ")
        ));
    }

    if !session.notes.is_empty() {
        out.push(format!("Notes: {}", session.notes));
    }

    Ok(out.join("\n"))
}
