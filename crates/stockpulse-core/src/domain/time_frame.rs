use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Sampling granularity of a requested series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TimeFrame {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    /// Provider `function` identifier for this granularity.
    pub const fn function(self) -> &'static str {
        match self {
            Self::Daily => "TIME_SERIES_DAILY",
            Self::Weekly => "TIME_SERIES_WEEKLY",
            Self::Monthly => "TIME_SERIES_MONTHLY",
        }
    }

    /// Name of the JSON object that carries the series in provider responses.
    pub const fn series_key(self) -> &'static str {
        match self {
            Self::Daily => "Time Series (Daily)",
            Self::Weekly => "Weekly Time Series",
            Self::Monthly => "Monthly Time Series",
        }
    }

    /// Lenient parse used by request surfaces: anything unrecognized means daily.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Whether `value` names a time frame, so callers can warn about a fallback.
    pub fn is_recognized(value: &str) -> bool {
        value.parse::<Self>().is_ok()
    }
}

impl Display for TimeFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(ValidationError::InvalidTimeFrame {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_time_frames_case_insensitively() {
        assert_eq!(TimeFrame::from_str("Weekly"), Ok(TimeFrame::Weekly));
        assert_eq!(TimeFrame::from_str(" monthly "), Ok(TimeFrame::Monthly));
    }

    #[test]
    fn strict_parse_rejects_unknown_values() {
        let err = TimeFrame::from_str("hourly").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimeFrame { .. }));
    }

    #[test]
    fn unknown_values_fall_back_to_daily() {
        for raw in ["", "hourly", "1d", "yearly"] {
            assert_eq!(TimeFrame::parse_or_default(raw), TimeFrame::Daily);
            assert!(!TimeFrame::is_recognized(raw));
        }
    }

    #[test]
    fn endpoint_table_is_static() {
        assert_eq!(TimeFrame::Daily.function(), "TIME_SERIES_DAILY");
        assert_eq!(TimeFrame::Weekly.function(), "TIME_SERIES_WEEKLY");
        assert_eq!(TimeFrame::Monthly.function(), "TIME_SERIES_MONTHLY");
        assert_eq!(TimeFrame::Weekly.series_key(), "Weekly Time Series");
    }
}
