/// Domain models for the snow-response report service
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The 15 domestic airports recognized by the system.
pub const AIRPORTS: [&str; 15] = [
    "인천", "김포", "김해", "제주", "부산", "대구", "광주", "여수", "울산", "원주", "양양", "청주",
    "군산", "사천", "포항",
];

/// The four daily reporting checkpoints.
pub const REPORT_TIMES: [&str; 4] = ["05:10", "11:10", "17:10", "22:10"];

/// One airport's status submission for one date+time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub airport: String,
    pub report_date: String,
    pub report_time: String,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub flight_status: FlightStatus,
    #[serde(default)]
    pub actions: Actions,
    #[serde(default)]
    pub damage_recovery: String,
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Weather section. The three alert flags are independent and may all be
/// set at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default)]
    pub snowfall_area: String,
    #[serde(default)]
    pub snowfall_amount: String,
    #[serde(default)]
    pub cumulative_snowfall: String,
    #[serde(default)]
    pub preliminary_warning: bool,
    #[serde(default)]
    pub advisory: bool,
    #[serde(default)]
    pub warning: bool,
    #[serde(default)]
    pub special_notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightStatus {
    #[serde(default)]
    pub international: FlightCounters,
    #[serde(default)]
    pub domestic: FlightCounters,
}

/// Flight counters for one traffic category. No arithmetic relationship
/// between the counters is enforced; values persist as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightCounters {
    #[serde(default)]
    pub planned_total: i64,
    #[serde(default)]
    pub planned_today: i64,
    #[serde(default)]
    pub pre_cancelled: i64,
    #[serde(default)]
    pub cancelled_total: i64,
    #[serde(default)]
    pub cancelled_today: i64,
    #[serde(default)]
    pub cancelled_pre: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Actions {
    #[serde(default)]
    pub snow_removal: String,
    #[serde(default)]
    pub deicing: String,
    #[serde(default)]
    pub other: String,
}

/// A flight counter as submitted: clients send numbers, numeric strings,
/// or nothing at all. Coerced to an integer at create time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum CounterValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    #[default]
    Null,
}

impl CounterValue {
    /// Missing, null and empty values count as zero; anything else must
    /// parse as an integer.
    pub fn coerce(&self) -> Result<i64, String> {
        match self {
            CounterValue::Int(n) => Ok(*n),
            CounterValue::Float(f) => Ok(*f as i64),
            CounterValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(0)
                } else {
                    trimmed
                        .parse::<i64>()
                        .map_err(|_| format!("not an integer: {trimmed:?}"))
                }
            }
            CounterValue::Bool(b) => Ok(i64::from(*b)),
            CounterValue::Null => Ok(0),
        }
    }
}

/// Create payload. The three identity fields are required; missing and
/// empty are treated alike and rejected. Everything else defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReport {
    #[serde(default)]
    pub airport: String,
    #[serde(default)]
    pub report_date: String,
    #[serde(default)]
    pub report_time: String,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub flight_status: FlightStatusInput,
    #[serde(default)]
    pub actions: Actions,
    #[serde(default)]
    pub damage_recovery: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightStatusInput {
    #[serde(default)]
    pub international: FlightCountersInput,
    #[serde(default)]
    pub domestic: FlightCountersInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightCountersInput {
    #[serde(default)]
    pub planned_total: CounterValue,
    #[serde(default)]
    pub planned_today: CounterValue,
    #[serde(default)]
    pub pre_cancelled: CounterValue,
    #[serde(default)]
    pub cancelled_total: CounterValue,
    #[serde(default)]
    pub cancelled_today: CounterValue,
    #[serde(default)]
    pub cancelled_pre: CounterValue,
}

impl FlightCountersInput {
    pub fn coerce(&self) -> Result<FlightCounters, String> {
        Ok(FlightCounters {
            planned_total: self.planned_total.coerce()?,
            planned_today: self.planned_today.coerce()?,
            pre_cancelled: self.pre_cancelled.coerce()?,
            cancelled_total: self.cancelled_total.coerce()?,
            cancelled_today: self.cancelled_today.coerce()?,
            cancelled_pre: self.cancelled_pre.coerce()?,
        })
    }
}

impl FlightStatusInput {
    pub fn coerce(&self) -> Result<FlightStatus, String> {
        Ok(FlightStatus {
            international: self.international.coerce()?,
            domestic: self.domestic.coerce()?,
        })
    }
}

/// Update payload. Absent fields keep their stored value; a present
/// sub-record replaces the stored one wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportPatch {
    pub airport: Option<String>,
    pub report_date: Option<String>,
    pub report_time: Option<String>,
    pub weather: Option<Weather>,
    pub flight_status: Option<FlightStatus>,
    pub actions: Option<Actions>,
    pub damage_recovery: Option<String>,
}

/// Equality filter over the report collection. Empty clauses are
/// wildcards, mirroring absent query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub airport: Option<String>,
    pub report_date: Option<String>,
    pub report_time: Option<String>,
}

/// Aggregate computed over a set of reports for the headquarters view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_reports: usize,
    pub airports_with_snow: Vec<String>,
    pub airports_with_warnings: Vec<String>,
    pub total_cancellations: CancellationTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancellationTotals {
    pub international: i64,
    pub domestic: i64,
    pub total: i64,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
