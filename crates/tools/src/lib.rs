//! Demo tools for the deckhand runtime.
//!
//! Each tool implements [`runtime::Tool`] with typed arguments. The preset
//! functions bundle them into the registries the command line sessions use:
//!
//! - [`time_tools`]: `getCurrentTime`
//! - [`direction_tools`]: `getDestination`, simple or detailed
//! - [`coordinate_tools`]: `getMultipleLocationCoordinates`
//! - [`listing_tools`]: `createProductListing`
//! - [`scaffold_tools`]: `createFile` inside a workspace
//! - [`sql_tools`]: `getTables`, `getTableSchema`, `executeQuery`

mod clock;
mod coordinates;
mod directions;
mod files;
mod listing;
pub mod prompts;
mod sql;

pub use clock::{GetCurrentTime, TimeArgs};
pub use coordinates::{Coordinates, GetMultipleLocationCoordinates, Location, LocationsArgs};
pub use directions::{DestinationArgs, Directions, GetDestination};
pub use files::{CreateFile, CreateFileArgs};
pub use listing::{Color, CreateProductListing, ListingArgs, Product};
pub use sql::{ExecuteQuery, GetTableSchema, GetTables, QueryArgs, TableArgs};

use runtime::{Registry, ToolError};
use std::path::PathBuf;
use std::sync::Arc;
use storage::Database;

pub fn time_tools() -> Result<Registry, ToolError> {
    Registry::new().with_tool(GetCurrentTime::new())
}

pub fn direction_tools(detailed: bool) -> Result<Registry, ToolError> {
    let tool = if detailed {
        GetDestination::detailed()
    } else {
        GetDestination::simple()
    };
    Registry::new().with_tool(tool)
}

pub fn coordinate_tools() -> Result<Registry, ToolError> {
    Registry::new().with_tool(GetMultipleLocationCoordinates)
}

pub fn listing_tools() -> Result<Registry, ToolError> {
    Registry::new().with_tool(CreateProductListing)
}

pub fn scaffold_tools(workspace: impl Into<PathBuf>) -> Result<Registry, ToolError> {
    Registry::new().with_tool(CreateFile::new(workspace))
}

/// The three database tools over one shared handle.
pub fn sql_tools(db: Arc<Database>) -> Result<Registry, ToolError> {
    Registry::new()
        .with_tool(GetTables::new(db.clone()))?
        .with_tool(GetTableSchema::new(db.clone()))?
        .with_tool(ExecuteQuery::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtime::ToolHost;

    fn names(registry: &Registry) -> Vec<&str> {
        registry.specs().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn presets_register_expected_tools() {
        assert_eq!(names(&time_tools().unwrap()), ["getCurrentTime"]);
        assert_eq!(names(&direction_tools(true).unwrap()), ["getDestination"]);
        assert_eq!(
            names(&coordinate_tools().unwrap()),
            ["getMultipleLocationCoordinates"]
        );
        assert_eq!(names(&listing_tools().unwrap()), ["createProductListing"]);
        assert_eq!(names(&scaffold_tools("ws").unwrap()), ["createFile"]);
    }

    #[test]
    fn sql_preset_keeps_declaration_order() {
        let db = Arc::new(Database::in_memory().unwrap());
        assert_eq!(
            names(&sql_tools(db).unwrap()),
            ["getTables", "getTableSchema", "executeQuery"]
        );
    }
}
