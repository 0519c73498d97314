//! Stop identity.

use std::fmt;

/// Static identity and location of a monitored bus stop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopSnapshot {
    /// Source-system id, e.g. `HSL:2112401`.
    pub gtfs_id: String,

    /// Human-readable stop name.
    pub name: String,

    /// Short platform code shown on the stop sign, e.g. `E1234`.
    pub code: String,

    pub latitude: f64,
    pub longitude: f64,
}

impl StopSnapshot {
    /// Create a snapshot with no location information.
    pub fn new(
        gtfs_id: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            gtfs_id: gtfs_id.into(),
            name: name.into(),
            code: code.into(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// Set the stop coordinates.
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}

/// Renders as `"<name> (<code>)"`, the form used in spoken answers.
impl fmt::Display for StopSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code() {
        let stop = StopSnapshot::new("HSL:2112401", "Tapiola", "E2113");
        assert_eq!(stop.to_string(), "Tapiola (E2113)");
    }

    #[test]
    fn location_builder() {
        let stop = StopSnapshot::new("HSL:1", "A", "B").with_location(60.17, 24.94);
        assert_eq!(stop.latitude, 60.17);
        assert_eq!(stop.longitude, 24.94);
    }
}
