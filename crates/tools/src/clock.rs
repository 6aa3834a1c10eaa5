//! Wall-clock lookup in an IANA time zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use runtime::{Schema, Tool, ToolDeclaration, ToolError};
use serde::Deserialize;

/// en-US style `M/D/YYYY h:mm:ss AM`.
const FORMAT: &str = "%-m/%-d/%Y %-I:%M:%S %p";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeArgs {
    pub time_zone: String,
}

/// `getCurrentTime`: the current local date and time in a time zone.
#[derive(Debug, Clone, Default)]
pub struct GetCurrentTime {
    fixed: Option<DateTime<Utc>>,
}

impl GetCurrentTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always report the given instant instead of the system clock.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            fixed: Some(instant),
        }
    }
}

impl Tool for GetCurrentTime {
    type Args = TimeArgs;
    type Output = String;

    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "getCurrentTime",
            "Get the current time in a specific location",
        )
        .with_parameters(
            Schema::object()
                .property(
                    "timeZone",
                    Schema::string()
                        .describe("Timezone in IANA format. Example America/Bogota, Europe/Berlin"),
                )
                .require(["timeZone"]),
        )
    }

    async fn call(&self, args: TimeArgs) -> Result<String, ToolError> {
        let tz: Tz = args
            .time_zone
            .parse()
            .map_err(|_| ToolError::InvalidInput(format!("unknown time zone: {}", args.time_zone)))?;
        let now = self.fixed.unwrap_or_else(Utc::now);
        Ok(now.with_timezone(&tz).format(FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon_utc() -> GetCurrentTime {
        GetCurrentTime::at(Utc.with_ymd_and_hms(2024, 5, 1, 14, 5, 9).unwrap())
    }

    #[tokio::test]
    async fn formats_in_requested_zone() {
        let time = noon_utc()
            .call(TimeArgs {
                time_zone: "America/Bogota".into(),
            })
            .await
            .unwrap();
        assert_eq!(time, "5/1/2024 9:05:09 AM");
    }

    #[tokio::test]
    async fn crosses_the_date_line() {
        let time = noon_utc()
            .call(TimeArgs {
                time_zone: "Pacific/Auckland".into(),
            })
            .await
            .unwrap();
        assert_eq!(time, "5/2/2024 2:05:09 AM");
    }

    #[tokio::test]
    async fn rejects_unknown_zone() {
        let err = noon_utc()
            .call(TimeArgs {
                time_zone: "Mars/Olympus_Mons".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(m) if m.contains("Mars/Olympus_Mons")));
    }

    #[test]
    fn declaration_requires_time_zone() {
        let decl = GetCurrentTime::new().declaration();
        let params = serde_json::to_value(decl.parameters.unwrap()).unwrap();
        assert_eq!(params["required"], serde_json::json!(["timeZone"]));
    }
}
