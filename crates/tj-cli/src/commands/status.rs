//! Status command for showing where the ledger lives and how full it is.

use std::io::Write;

use anyhow::Result;

use tj_core::UserId;
use tj_db::Database;

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    user_id: &UserId,
) -> Result<()> {
    let count = db.count_logs(user_id)?;

    writeln!(writer, "Time ledger status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(writer, "User: {user_id}")?;

    if count == 0 {
        writeln!(writer, "No logs recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Logs: {count}")?;
    if let Some(last) = db.last_log_date(user_id)? {
        writeln!(writer, "Last logged day: {last}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{record, user};

    use insta::assert_snapshot;

    #[test]
    fn status_command_outputs_log_summary() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("tj.db");
        let mut db = Database::open(&db_path).unwrap();
        record(&mut db, "2026-03-02", "09:00", "10:00", "act_1", "sat_1");
        record(&mut db, "2026-03-03", "09:00", "10:00", "act_1", "sat_1");

        let config = Config {
            database_path: db_path.clone(),
            user_id: "local".to_string(),
        };
        let mut output = Vec::new();
        run(&mut output, &db, &config, &user()).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/tj.db");
        assert_snapshot!(output, @r"
        Time ledger status
        Database: [TEMP]/tj.db
        User: local
        Logs: 2
        Last logged day: 2026-03-03
        ");
    }

    #[test]
    fn status_command_without_logs() {
        let db = Database::open_in_memory().unwrap();
        let config = Config {
            database_path: ":memory:".into(),
            user_id: "local".to_string(),
        };
        let mut output = Vec::new();
        run(&mut output, &db, &config, &user()).unwrap();
        assert!(String::from_utf8(output).unwrap().ends_with("No logs recorded.\n"));
    }
}
