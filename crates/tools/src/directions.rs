//! Canned turn-by-turn directions.

use runtime::{Schema, Tool, ToolDeclaration, ToolError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationArgs {
    pub destination: String,
    #[serde(default)]
    pub mode_of_transportation: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directions {
    pub destination: String,
    pub directions: Vec<String>,
}

const FINAL_LEG: [&str; 4] = [
    "Take the first left",
    "Continue straight for 2 miles",
    "Take the second right",
    "You have arrived at your destination",
];

/// `getDestination`: directions to a destination.
///
/// The detailed variant also takes the mode of transportation and the
/// departure time and opens the route with them.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetDestination {
    detailed: bool,
}

impl GetDestination {
    pub fn simple() -> Self {
        Self { detailed: false }
    }

    pub fn detailed() -> Self {
        Self { detailed: true }
    }
}

impl Tool for GetDestination {
    type Args = DestinationArgs;
    type Output = Directions;

    fn declaration(&self) -> ToolDeclaration {
        let mut params = Schema::object().property(
            "destination",
            Schema::string().describe("Destination that the user wants to go to"),
        );
        if self.detailed {
            params = params
                .property(
                    "modeOfTransportation",
                    Schema::string().describe("Mode of transportation to use"),
                )
                .property(
                    "departureTime",
                    Schema::string().describe("Time that the user will leave for the destination"),
                )
                .require(["destination", "modeOfTransportation", "departureTime"]);
        }
        ToolDeclaration::new("getDestination", "Get directions to a destination")
            .with_parameters(params)
    }

    async fn call(&self, args: DestinationArgs) -> Result<Directions, ToolError> {
        let mut directions = Vec::new();
        if self.detailed {
            let mode = args
                .mode_of_transportation
                .ok_or_else(|| ToolError::InvalidInput("missing modeOfTransportation".into()))?;
            let departure = args
                .departure_time
                .ok_or_else(|| ToolError::InvalidInput("missing departureTime".into()))?;
            directions.push(format!("Leave at {departure} from your location"));
            directions.push(format!("Take the {mode} in direction to the north"));
            directions.push("Get off the train at the last stop".to_string());
        }
        directions.extend(FINAL_LEG.iter().map(|s| s.to_string()));

        Ok(Directions {
            destination: args.destination,
            directions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simple_route_has_four_steps() {
        let out = GetDestination::simple()
            .call(DestinationArgs {
                destination: "Paris".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(out.destination, "Paris");
        assert_eq!(out.directions, FINAL_LEG);
    }

    #[tokio::test]
    async fn detailed_route_starts_with_departure() {
        let out = GetDestination::detailed()
            .call(DestinationArgs {
                destination: "Paris".into(),
                mode_of_transportation: Some("train".into()),
                departure_time: Some("9:00 am".into()),
            })
            .await
            .unwrap();
        assert_eq!(out.directions.len(), 7);
        assert_eq!(out.directions[0], "Leave at 9:00 am from your location");
        assert_eq!(out.directions[1], "Take the train in direction to the north");
        assert_eq!(out.directions[6], "You have arrived at your destination");
    }

    #[tokio::test]
    async fn detailed_route_needs_all_fields() {
        let err = GetDestination::detailed()
            .call(DestinationArgs {
                destination: "Paris".into(),
                departure_time: Some("9:00 am".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::InvalidInput("missing modeOfTransportation".into())
        );
    }

    #[test]
    fn simple_declaration_has_one_property() {
        let decl = GetDestination::simple().declaration();
        let params = decl.parameters.unwrap();
        assert_eq!(params.properties.len(), 1);
        assert!(params.required.is_empty());
    }
}
