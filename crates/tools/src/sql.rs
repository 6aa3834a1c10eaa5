//! Read access to the course database for the model.

use runtime::{NoArgs, Schema, Tool, ToolDeclaration, ToolError};
use serde::Deserialize;
use std::sync::Arc;
use storage::{Database, Row, TableInfo};

/// Run a blocking database call off the async runtime.
async fn blocking<T, F>(db: &Arc<Database>, f: F) -> Result<T, ToolError>
where
    F: FnOnce(&Database) -> storage::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(ToolError::execution)?
        .map_err(ToolError::execution)
}

/// `getTables`: names of the tables in the database.
#[derive(Clone)]
pub struct GetTables {
    db: Arc<Database>,
}

impl GetTables {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl Tool for GetTables {
    type Args = NoArgs;
    type Output = Vec<String>;

    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "getTables",
            "List tables in a database that will help answer the user's question",
        )
    }

    async fn call(&self, _args: NoArgs) -> Result<Vec<String>, ToolError> {
        blocking(&self.db, |db| db.tables()).await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableArgs {
    pub table_name: String,
}

/// `getTableSchema`: row count and columns of one table.
#[derive(Clone)]
pub struct GetTableSchema {
    db: Arc<Database>,
}

impl GetTableSchema {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl Tool for GetTableSchema {
    type Args = TableArgs;
    type Output = TableInfo;

    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "getTableSchema",
            "Get information about a table, including the description, schema, and number of \
             rows that will help answer the user's question. Always use the names coming from \
             the getTables tool.",
        )
        .with_parameters(
            Schema::object()
                .property(
                    "tableName",
                    Schema::string().describe("Table name of the table to get information about"),
                )
                .require(["tableName"]),
        )
    }

    async fn call(&self, args: TableArgs) -> Result<TableInfo, ToolError> {
        blocking(&self.db, move |db| db.table_schema(&args.table_name)).await
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryArgs {
    pub query: String,
}

/// `executeQuery`: run one SQL statement and return the rows.
#[derive(Clone)]
pub struct ExecuteQuery {
    db: Arc<Database>,
}

impl ExecuteQuery {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl Tool for ExecuteQuery {
    type Args = QueryArgs;
    type Output = Vec<Row>;

    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "executeQuery",
            "Get information from data in SQLite using SQL queries",
        )
        .with_parameters(
            Schema::object()
                .property(
                    "query",
                    Schema::string().describe(
                        "SQL query on a single line that will help give quantitative answers to \
                         the user's question when run on a SQLite dataset and table. In the SQL \
                         query, always use the fully qualified dataset and table names.",
                    ),
                )
                .require(["query"]),
        )
    }

    async fn call(&self, args: QueryArgs) -> Result<Vec<Row>, ToolError> {
        blocking(&self.db, move |db| db.query(&args.query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn db() -> Arc<Database> {
        let db = Database::in_memory().unwrap();
        db.seed().unwrap();
        Arc::new(db)
    }

    #[tokio::test]
    async fn lists_tables() {
        let tables = GetTables::new(db()).call(NoArgs {}).await.unwrap();
        assert_eq!(tables, ["course", "notes", "student", "student_course"]);
    }

    #[tokio::test]
    async fn describes_a_table() {
        let info = GetTableSchema::new(db())
            .call(TableArgs {
                table_name: "student".into(),
            })
            .await
            .unwrap();
        assert_eq!(info.rows, 3);
        assert_eq!(info.schema.len(), 5);
    }

    #[tokio::test]
    async fn unknown_table_is_an_execution_error() {
        let err = GetTableSchema::new(db())
            .call(TableArgs {
                table_name: "professor".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::Execution("not found: table professor".into()));
    }

    #[tokio::test]
    async fn runs_queries() {
        let rows = ExecuteQuery::new(db())
            .call(QueryArgs {
                query: "SELECT title FROM course WHERE duration > 11 ORDER BY duration".into(),
            })
            .await
            .unwrap();
        let titles: Vec<_> = rows.iter().map(|r| r["title"].clone()).collect();
        assert_eq!(
            titles,
            [json!("English Literature"), json!("Advanced Mathematics")]
        );
    }

    #[tokio::test]
    async fn bad_sql_reports_the_database_message() {
        let err = ExecuteQuery::new(db())
            .call(QueryArgs {
                query: "SELECT * FROM professors".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Execution(m) if m.contains("no such table")));
    }
}
