use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::regulator::Regulator;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS runs (
            run_id     TEXT PRIMARY KEY,
            input      TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS regulators (
            id              INTEGER PRIMARY KEY,
            run_id          TEXT NOT NULL REFERENCES runs(run_id),
            department      INTEGER NOT NULL,
            idx             INTEGER NOT NULL,
            unit            TEXT,
            manager         TEXT,
            subject_to      TEXT,
            superior        TEXT,
            main_activities TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_regulators_run ON regulators(run_id, department);
        ",
    )?;
    Ok(())
}

pub fn new_run_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("run-{}", now)
}

/// Store one extraction run atomically.
pub fn save_run(conn: &Connection, run_id: &str, input: &str, regulators: &[Regulator]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO runs (run_id, input) VALUES (?1, ?2)",
        rusqlite::params![run_id, input],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO regulators
             (run_id, department, idx, unit, manager, subject_to, superior, main_activities)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for r in regulators {
            stmt.execute(rusqlite::params![
                run_id,
                r.department.code(),
                r.index,
                r.unit,
                r.manager,
                r.subject_to,
                r.superior,
                r.main_activities,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub struct DepartmentCount {
    pub department: u8,
    pub regulators: i64,
}

pub struct Stats {
    pub runs: i64,
    pub latest_run: Option<String>,
    /// Counts for the latest run only.
    pub departments: Vec<DepartmentCount>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let runs: i64 = conn.query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
    let latest_run: Option<String> = conn
        .query_row(
            "SELECT run_id FROM runs ORDER BY created_at DESC, run_id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let mut departments = Vec::new();
    if let Some(ref run_id) = latest_run {
        let mut stmt = conn.prepare(
            "SELECT department, COUNT(*) FROM regulators
             WHERE run_id = ?1
             GROUP BY department ORDER BY department",
        )?;
        departments = stmt
            .query_map([run_id], |row| {
                Ok(DepartmentCount {
                    department: row.get(0)?,
                    regulators: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(Stats {
        runs,
        latest_run,
        departments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::department::Department;

    fn regulator(index: u32, department: Department) -> Regulator {
        Regulator {
            index,
            unit: Some(format!("unit {}", index)),
            manager: None,
            subject_to: None,
            superior: None,
            main_activities: Some("activities".into()),
            department,
        }
    }

    #[test]
    fn save_and_count_latest_run() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        save_run(&conn, "run-1", "old.xlsx", &[regulator(1, Department::Law)]).unwrap();
        save_run(
            &conn,
            "run-2",
            "new.xlsx",
            &[
                regulator(1, Department::Economics),
                regulator(2, Department::Economics),
                regulator(1, Department::Health),
            ],
        )
        .unwrap();

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.latest_run.as_deref(), Some("run-2"));
        let counts: Vec<(u8, i64)> = stats
            .departments
            .iter()
            .map(|c| (c.department, c.regulators))
            .collect();
        assert_eq!(counts, vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn empty_database_has_no_latest_run() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.runs, 0);
        assert!(stats.latest_run.is_none());
        assert!(stats.departments.is_empty());
    }
}
