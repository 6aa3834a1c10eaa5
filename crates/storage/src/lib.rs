//! SQLite-backed course database.
//!
//! Holds the sample school data (students, courses, enrollments and grades)
//! that the SQL tools expose to the model, plus the catalogue queries those
//! tools need.
//!
//! # Example
//!
//! ```no_run
//! use storage::Database;
//!
//! let db = Database::open("courses.db")?;
//! db.seed()?;
//!
//! for table in db.tables()? {
//!     let info = db.table_schema(&table)?;
//!     println!("{table}: {} rows, {} columns", info.rows, info.schema.len());
//! }
//!
//! let rows = db.query("SELECT name, age FROM student ORDER BY age")?;
//! println!("{rows:?}");
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod store;
mod table;

pub use error::{Error, Result};
pub use store::{Database, Row};
pub use table::{ColumnInfo, TableInfo};
