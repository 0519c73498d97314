//! Digitransit GraphQL response DTOs.
//!
//! Every field is optional. Beyond that, fields are deserialized
//! *leniently*: a value of the wrong type becomes `None` instead of failing
//! the whole response, so one odd field never discards its neighbours.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Envelope of a GraphQL response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,

    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// An entry of the GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// `data` of the stop query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopQueryData {
    #[serde(default, deserialize_with = "lenient")]
    pub stop: Option<StopDto>,
}

/// A stop with its routes and upcoming stop times.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub lat: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub lon: Option<f64>,

    /// Routes serving the stop, in API order.
    #[serde(default, deserialize_with = "lenient_seq")]
    pub routes: Option<Vec<RouteDto>>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub stoptimes_without_patterns: Option<Vec<StopTimeDto>>,
}

/// A route serving the stop.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    #[serde(default, deserialize_with = "lenient")]
    pub short_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub patterns: Option<Vec<PatternDto>>,
}

/// A route pattern; only its destination headsign is requested.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternDto {
    #[serde(default, deserialize_with = "lenient")]
    pub headsign: Option<String>,
}

/// An upcoming stop time.
///
/// Times are seconds since the start of `service_day`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeDto {
    #[serde(default, deserialize_with = "lenient")]
    pub scheduled_arrival: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub realtime_arrival: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub arrival_delay: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub scheduled_departure: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub realtime_departure: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub departure_delay: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub realtime: Option<bool>,

    #[serde(default, deserialize_with = "lenient")]
    pub realtime_state: Option<String>,

    /// Unix timestamp of the service day start.
    #[serde(default, deserialize_with = "lenient")]
    pub service_day: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub headsign: Option<String>,
}

/// Deserialize a value, mapping null or a mistyped value to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a list, dropping elements that do not fit `T`.
///
/// A value that is not a list at all becomes `None`.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(None);
    };

    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_stop_response() {
        let json = r#"{
            "data": {
                "stop": {
                    "name": "Tapiola",
                    "code": "E2113",
                    "lat": 60.175,
                    "lon": 24.805,
                    "routes": [
                        {"shortName": "110", "patterns": [{"headsign": "Matinkylä (M)"}]}
                    ],
                    "stoptimesWithoutPatterns": [
                        {
                            "scheduledArrival": 3540,
                            "realtimeArrival": 3560,
                            "arrivalDelay": 20,
                            "scheduledDeparture": 3600,
                            "realtimeDeparture": 3620,
                            "departureDelay": 20,
                            "realtime": true,
                            "realtimeState": "UPDATED",
                            "serviceDay": 1700000000,
                            "headsign": "Matinkylä (M) via Olari"
                        }
                    ]
                }
            }
        }"#;

        let response: GraphQlResponse<StopQueryData> = serde_json::from_str(json).unwrap();
        assert!(response.errors.is_empty());

        let stop = response.data.unwrap().stop.unwrap();
        assert_eq!(stop.name.as_deref(), Some("Tapiola"));
        assert_eq!(stop.code.as_deref(), Some("E2113"));
        assert_eq!(stop.lat, Some(60.175));

        let routes = stop.routes.unwrap();
        assert_eq!(routes[0].short_name.as_deref(), Some("110"));
        let patterns = routes[0].patterns.as_ref().unwrap();
        assert_eq!(patterns[0].headsign.as_deref(), Some("Matinkylä (M)"));

        let times = stop.stoptimes_without_patterns.unwrap();
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].scheduled_departure, Some(3600.0));
        assert_eq!(times[0].realtime, Some(true));
        assert_eq!(times[0].realtime_state.as_deref(), Some("UPDATED"));
    }

    #[test]
    fn null_stop_is_none() {
        let json = r#"{"data": {"stop": null}}"#;
        let response: GraphQlResponse<StopQueryData> = serde_json::from_str(json).unwrap();
        assert!(response.data.unwrap().stop.is_none());
    }

    #[test]
    fn missing_fields_are_none() {
        let json = r#"{"data": {"stop": {"stoptimesWithoutPatterns": [{}]}}}"#;
        let response: GraphQlResponse<StopQueryData> = serde_json::from_str(json).unwrap();
        let stop = response.data.unwrap().stop.unwrap();

        assert!(stop.name.is_none());
        assert!(stop.routes.is_none());
        let time = &stop.stoptimes_without_patterns.unwrap()[0];
        assert!(time.scheduled_departure.is_none());
        assert!(time.headsign.is_none());
    }

    #[test]
    fn mistyped_fields_are_none() {
        let json = r#"{
            "name": 42,
            "code": "E1",
            "lat": "sixty",
            "routes": "not a list",
            "stoptimesWithoutPatterns": [
                {"scheduledDeparture": "soon", "realtime": "yes", "headsign": "Kamppi"},
                17
            ]
        }"#;

        let stop: StopDto = serde_json::from_str(json).unwrap();

        assert!(stop.name.is_none());
        assert_eq!(stop.code.as_deref(), Some("E1"));
        assert!(stop.lat.is_none());
        assert!(stop.routes.is_none());

        let times = stop.stoptimes_without_patterns.unwrap();
        assert_eq!(times.len(), 1);
        assert!(times[0].scheduled_departure.is_none());
        assert!(times[0].realtime.is_none());
        assert_eq!(times[0].headsign.as_deref(), Some("Kamppi"));
    }

    #[test]
    fn deserialize_errors_without_data() {
        let json = r#"{"errors": [{"message": "Validation error"}]}"#;
        let response: GraphQlResponse<StopQueryData> = serde_json::from_str(json).unwrap();

        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "Validation error");
    }
}
