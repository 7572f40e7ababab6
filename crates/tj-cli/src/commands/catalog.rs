//! Catalog command for listing activity types and satisfaction tags.

use std::io::Write;

use anyhow::{Context, Result};

use tj_core::Catalog;
use tj_db::Database;

pub fn format_catalog(catalog: &Catalog) -> String {
    let mut output = String::from("Activity types:\n");
    for t in catalog.types() {
        output.push_str(&format!("  {:<6} {:<22} {}", t.id.as_str(), t.name, t.color));
        if !t.is_visible {
            output.push_str(" (hidden)");
        }
        output.push('\n');
    }

    output.push_str("Satisfaction tags:\n");
    for t in catalog.tags() {
        output.push_str(&format!(
            "  {:<6} {} {:<12} {:>2}  {}",
            t.id.as_str(),
            t.emoji,
            t.name,
            t.score.value(),
            t.color
        ));
        if !t.is_visible {
            output.push_str(" (hidden)");
        }
        output.push('\n');
    }
    output
}

pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let catalog = db.catalog().context("failed to load catalog")?;
    write!(writer, "{}", format_catalog(&catalog))?;
    Ok(())
}
