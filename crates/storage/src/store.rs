//! SQLite course database implementation.

use crate::table::{ColumnInfo, PragmaColumn, TableInfo};
use crate::{Error, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// A result row keyed by column name.
pub type Row = serde_json::Map<String, Value>;

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS student (
        id INTEGER PRIMARY KEY,
        name TEXT,
        age INTEGER,
        email TEXT,
        address TEXT
    );

    CREATE TABLE IF NOT EXISTS course (
        id INTEGER PRIMARY KEY,
        title TEXT,
        content TEXT,
        instructor TEXT,
        duration INTEGER
    );

    CREATE TABLE IF NOT EXISTS student_course (
        id INTEGER PRIMARY KEY,
        student_id INTEGER,
        course_id INTEGER,
        FOREIGN KEY (student_id) REFERENCES student(id),
        FOREIGN KEY (course_id) REFERENCES course(id)
    );

    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY,
        note REAL,
        created_at TEXT,
        student_id INTEGER,
        course_id INTEGER,
        FOREIGN KEY (student_id) REFERENCES student(id),
        FOREIGN KEY (course_id) REFERENCES course(id)
    );
"#;

const SEED: &str = r#"
    INSERT INTO student (name, age, email, address) VALUES
        ('Alice Smith', 22, 'alice@example.com', '123 Maple Street'),
        ('Bob Johnson', 24, 'bob@example.com', '456 Oak Street'),
        ('Cathy Brown', 21, 'cathy@example.com', '789 Pine Street');

    INSERT INTO course (title, content, instructor, duration) VALUES
        ('Introduction to Computer Science', 'Basics of computer science', 'Dr. John Doe', 10),
        ('Advanced Mathematics', 'In-depth coverage of mathematical concepts', 'Dr. Jane Smith', 15),
        ('English Literature', 'Study of English literature', 'Prof. Emily White', 12);

    INSERT INTO student_course (student_id, course_id) VALUES
        (1, 1), (1, 2), (2, 2), (3, 1), (3, 3);

    INSERT INTO notes (note, created_at, student_id, course_id) VALUES
        (4.5, '2023-04-01', 1, 1),
        (3.8, '2023-04-02', 1, 2),
        (4.2, '2023-04-03', 2, 2),
        (4.0, '2023-04-04', 3, 1),
        (3.5, '2023-04-05', 3, 3);
"#;

/// SQLite-backed course database.
///
/// The connection sits behind a mutex so one handle can be shared between
/// concurrently running tools; statements are serialized.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened database");
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.lock().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert the sample rows unless students already exist.
    ///
    /// Returns whether anything was inserted.
    pub fn seed(&self) -> Result<bool> {
        let mut conn = self.lock();
        let existing = count(&conn, "student")?;
        if existing > 0 {
            debug!(existing, "database already seeded");
            return Ok(false);
        }

        let tx = conn.transaction()?;
        tx.execute_batch(SEED)?;
        tx.commit()?;
        info!("seeded course database");
        Ok(true)
    }

    /// Names of the user tables, sorted.
    pub fn tables(&self) -> Result<Vec<String>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Number of rows in a table.
    pub fn count_rows(&self, table: &str) -> Result<u64> {
        let conn = self.lock();
        ensure_table(&conn, table)?;
        count(&conn, table)
    }

    /// Row count and column metadata of a table.
    pub fn table_schema(&self, table: &str) -> Result<TableInfo> {
        let conn = self.lock();
        ensure_table(&conn, table)?;

        let rows = count(&conn, table)?;
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote(table)))?;
        let schema = serde_rusqlite::from_rows::<PragmaColumn>(stmt.query([])?)
            .map(|col| col.map(ColumnInfo::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(TableInfo { rows, schema })
    }

    /// Run one SQL statement and return its rows as JSON objects.
    ///
    /// Statements that produce no result columns return an empty list.
    pub fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (i, name) in columns.iter().enumerate() {
                record.insert(name.clone(), to_json(row.get_ref(i)?));
            }
            out.push(record);
        }

        debug!(rows = out.len(), "query");
        Ok(out)
    }
}

fn ensure_table(conn: &Connection, table: &str) -> Result<()> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(Error::NotFound(format!("table {table}"))),
    }
}

fn count(conn: &Connection, table: &str) -> Result<u64> {
    let n: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote(table)),
        [],
        |row| row.get(0),
    )?;
    Ok(n.max(0) as u64)
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::from(b.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> Database {
        let db = Database::in_memory().unwrap();
        assert!(db.seed().unwrap());
        db
    }

    #[test]
    fn lists_tables_in_name_order() {
        let db = Database::in_memory().unwrap();
        assert_eq!(
            db.tables().unwrap(),
            ["course", "notes", "student", "student_course"]
        );
    }

    #[test]
    fn seed_is_applied_once() {
        let db = seeded();
        assert!(!db.seed().unwrap());
        assert_eq!(db.count_rows("student").unwrap(), 3);
        assert_eq!(db.count_rows("student_course").unwrap(), 5);
        assert_eq!(db.count_rows("notes").unwrap(), 5);
    }

    #[test]
    fn table_schema_reports_columns() {
        let db = seeded();
        let info = db.table_schema("course").unwrap();

        assert_eq!(info.rows, 3);
        let names: Vec<_> = info.schema.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "title", "content", "instructor", "duration"]);
        assert!(info.schema[0].primary_key);
        assert_eq!(info.schema[0].kind, "INTEGER");
        assert!(!info.schema[1].primary_key);
        assert!(!info.schema[1].not_null);
        assert_eq!(info.schema[1].default_value, None);
    }

    #[test]
    fn table_schema_serializes_camel_case() {
        let db = seeded();
        let info = db.table_schema("student").unwrap();
        let value = serde_json::to_value(&info).unwrap();

        assert_eq!(value["rows"], json!(3));
        assert_eq!(
            value["schema"][0],
            json!({
                "name": "id",
                "type": "INTEGER",
                "notNull": false,
                "defaultValue": null,
                "primaryKey": true
            })
        );
    }

    #[test]
    fn unknown_table_is_not_found() {
        let db = seeded();
        assert!(matches!(
            db.table_schema("professors"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.count_rows("student; DROP TABLE student"),
            Err(Error::NotFound(_))
        ));
        assert_eq!(db.count_rows("student").unwrap(), 3);
    }

    #[test]
    fn query_returns_rows_as_objects() {
        let db = seeded();
        let rows = db
            .query("SELECT name, age FROM student WHERE age > 21 ORDER BY age")
            .unwrap();

        assert_eq!(
            rows.into_iter().map(Value::Object).collect::<Vec<_>>(),
            [
                json!({"name": "Alice Smith", "age": 22}),
                json!({"name": "Bob Johnson", "age": 24})
            ]
        );
    }

    #[test]
    fn query_maps_reals_and_nulls() {
        let db = seeded();
        let rows = db
            .query("SELECT note, NULL AS missing FROM notes WHERE id = 1")
            .unwrap();
        assert_eq!(rows[0]["note"], json!(4.5));
        assert_eq!(rows[0]["missing"], Value::Null);
    }

    #[test]
    fn query_joins_across_tables() {
        let db = seeded();
        let rows = db
            .query(
                "SELECT s.name, AVG(n.note) AS average
                 FROM notes n JOIN student s ON s.id = n.student_id
                 GROUP BY s.id ORDER BY average DESC LIMIT 1",
            )
            .unwrap();
        assert_eq!(rows[0]["name"], json!("Bob Johnson"));
    }

    #[test]
    fn invalid_sql_is_a_database_error() {
        let db = seeded();
        assert!(matches!(
            db.query("SELEKT * FROM student"),
            Err(Error::Database(_))
        ));
    }

    #[test]
    fn statement_without_columns_returns_empty() {
        let db = seeded();
        let rows = db
            .query("UPDATE student SET age = 23 WHERE name = 'Alice Smith'")
            .unwrap();
        assert!(rows.is_empty());
        let rows = db
            .query("SELECT age FROM student WHERE name = 'Alice Smith'")
            .unwrap();
        assert_eq!(rows[0]["age"], json!(23));
    }

    #[test]
    fn open_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.db");
        {
            let db = Database::open(&path).unwrap();
            db.seed().unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert!(!db.seed().unwrap());
        assert_eq!(db.count_rows("course").unwrap(), 3);
    }
}
