//! Fixture coordinates for lists of places.

use runtime::{Schema, Tool, ToolDeclaration, ToolError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub point_of_interest: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationsArgs {
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub point_of_interest: String,
    pub lat: f64,
    pub lon: f64,
}

/// Eiffel Tower, Statue of Liberty, Port Douglas.
const FIXTURES: [(f64, f64); 3] = [
    (48.8584, 2.2945),
    (40.6892, -74.0445),
    (-16.4833, 145.4667),
];

/// `getMultipleLocationCoordinates`: one coordinate pair per location, in
/// input order. Positions cycle through a fixed table.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetMultipleLocationCoordinates;

impl Tool for GetMultipleLocationCoordinates {
    type Args = LocationsArgs;
    type Output = Vec<Coordinates>;

    fn declaration(&self) -> ToolDeclaration {
        let location = Schema::object()
            .describe("Components of the location")
            .property(
                "pointOfInterest",
                Schema::string().describe("Name or type of point of interest"),
            )
            .property("city", Schema::string().describe("City"))
            .property("country", Schema::string().describe("Country"))
            .require(["pointOfInterest", "city", "country"]);

        ToolDeclaration::new(
            "getMultipleLocationCoordinates",
            "Get coordinates of multiple locations",
        )
        .with_parameters(
            Schema::object().property(
                "locations",
                Schema::array(location).describe("A list of locations"),
            ),
        )
    }

    async fn call(&self, args: LocationsArgs) -> Result<Vec<Coordinates>, ToolError> {
        Ok(args
            .locations
            .into_iter()
            .zip(FIXTURES.iter().cycle())
            .map(|(location, &(lat, lon))| Coordinates {
                point_of_interest: location.point_of_interest,
                lat,
                lon,
            })
            .collect())
    }
}
