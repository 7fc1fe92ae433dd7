use serde::{Deserialize, Deserializer, Serialize};

pub use bear_core::Units;

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A plottable weather metric carried by each hourly sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Variable {
    Temperature,
    ProbabilityOfPrecipitation,
    RelativeHumidity,
    WindSpeed,
    Dewpoint,
}

impl Variable {
    /// Button-row order.
    pub const ALL: [Variable; 5] = [
        Variable::Temperature,
        Variable::ProbabilityOfPrecipitation,
        Variable::RelativeHumidity,
        Variable::WindSpeed,
        Variable::Dewpoint,
    ];

    /// Field name inside an hourly sample.
    pub fn key(self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            Variable::ProbabilityOfPrecipitation => "probabilityOfPrecipitation",
            Variable::RelativeHumidity => "relativeHumidity",
            Variable::WindSpeed => "windSpeed",
            Variable::Dewpoint => "dewpoint",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Variable::Temperature => "Temperature",
            Variable::ProbabilityOfPrecipitation => "Precipitation",
            Variable::RelativeHumidity => "Humidity",
            Variable::WindSpeed => "Wind Speed",
            Variable::Dewpoint => "Dewpoint",
        }
    }
}

/// One of the three shapes a sample value arrives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Quantity {
        #[serde(default)]
        value: Option<f64>,
        #[serde(default, alias = "unitCode")]
        unit: Option<String>,
    },
}

/// A backend value shown verbatim: numbers or preformatted strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayValue::Number(n) => write!(f, "{}", n),
            DisplayValue::Text(s) => f.write_str(s),
        }
    }
}

/// One hour of a period's series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    #[serde(rename = "startTime", default)]
    pub start_time: Option<String>,

    /// Every other field, keyed by variable name.
    #[serde(flatten)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

impl HourlySample {
    /// The sample's value for `variable`, if present in a recognised shape.
    pub fn raw(&self, variable: Variable) -> Option<RawValue> {
        self.values
            .get(variable.key())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// X-axis label such as "3 PM". Unparseable times are returned as-is.
    pub fn hour_label(&self) -> String {
        let Some(start) = self.start_time.as_deref() else {
            return String::new();
        };
        match chrono::DateTime::parse_from_rfc3339(start) {
            Ok(time) => time.format("%-I %p").to_string(),
            Err(_) => start.to_string(),
        }
    }
}

/// A forecast period ("Tonight", "Tomorrow", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub temperature: Option<DisplayValue>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<DisplayValue>,
    #[serde(default)]
    pub wind_dir: Option<String>,
    #[serde(default)]
    pub precip_chance: Option<DisplayValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hourly_forecast: Vec<HourlySample>,
}

/// Latest observation plus the derived comfort indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub temperature: Option<DisplayValue>,
    #[serde(default)]
    pub clouds: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub dewpoint: Option<DisplayValue>,
    #[serde(default, rename = "windChill")]
    pub wind_chill: Option<DisplayValue>,
    #[serde(default, rename = "heatIndex")]
    pub heat_index: Option<DisplayValue>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<DisplayValue>,
    #[serde(default)]
    pub wind_dir: Option<String>,
    #[serde(default)]
    pub precip_chance: Option<DisplayValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hourly_forecast: Vec<HourlySample>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
}

/// Identifies a forecast period slot in the response and on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodSlot {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
}

impl PeriodSlot {
    pub const ALL: [PeriodSlot; 6] = [
        PeriodSlot::First,
        PeriodSlot::Second,
        PeriodSlot::Third,
        PeriodSlot::Fourth,
        PeriodSlot::Fifth,
        PeriodSlot::Sixth,
    ];

    /// Short id used in element ids ("first-chart-container").
    pub fn id(self) -> &'static str {
        match self {
            PeriodSlot::First => "first",
            PeriodSlot::Second => "second",
            PeriodSlot::Third => "third",
            PeriodSlot::Fourth => "fourth",
            PeriodSlot::Fifth => "fifth",
            PeriodSlot::Sixth => "sixth",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// The first `count` slots, capped at six.
    pub fn leading(count: usize) -> &'static [PeriodSlot] {
        &Self::ALL[..count.min(Self::ALL.len())]
    }
}

/// Body of a successful `/get-forecast` answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub first_period: Option<Period>,
    #[serde(default)]
    pub second_period: Option<Period>,
    #[serde(default)]
    pub third_period: Option<Period>,
    #[serde(default)]
    pub fourth_period: Option<Period>,
    #[serde(default)]
    pub fifth_period: Option<Period>,
    #[serde(default)]
    pub sixth_period: Option<Period>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
}

impl ForecastResponse {
    pub fn period(&self, slot: PeriodSlot) -> Option<&Period> {
        match slot {
            PeriodSlot::First => self.first_period.as_ref(),
            PeriodSlot::Second => self.second_period.as_ref(),
            PeriodSlot::Third => self.third_period.as_ref(),
            PeriodSlot::Fourth => self.fourth_period.as_ref(),
            PeriodSlot::Fifth => self.fifth_period.as_ref(),
            PeriodSlot::Sixth => self.sixth_period.as_ref(),
        }
    }

    /// Periods present in this response, in order.
    pub fn periods(&self) -> impl Iterator<Item = (PeriodSlot, &Period)> {
        PeriodSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.period(slot).map(|p| (slot, p)))
    }
}

/// Body of `POST /get-forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub units: Units,
}

impl ForecastRequest {
    pub fn for_location(location: impl Into<String>, units: Units) -> Self {
        Self {
            location: Some(location.into()),
            latitude: None,
            longitude: None,
            units,
        }
    }

    pub fn for_coordinates(coords: Coordinates, units: Units) -> Self {
        Self {
            location: None,
            latitude: Some(coords.latitude),
            longitude: Some(coords.longitude),
            units,
        }
    }
}

/// Form-encoded body of `POST /get-summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRequest {
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub units: Units,
    pub expertise: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    /// Area forecast discussion the summary was written from.
    #[serde(default)]
    pub afd: Option<String>,
}

/// Ocean basin covered by a tropical outlook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TropicalRegion {
    Atlantic,
    CentralPacific,
    EasternPacific,
}

impl TropicalRegion {
    pub const ALL: [TropicalRegion; 3] = [
        TropicalRegion::Atlantic,
        TropicalRegion::EasternPacific,
        TropicalRegion::CentralPacific,
    ];

    /// Name the backend expects in the request body.
    pub fn backend_name(self) -> &'static str {
        match self {
            TropicalRegion::Atlantic => "Atlantic",
            TropicalRegion::CentralPacific => "Central_Pacific",
            TropicalRegion::EasternPacific => "Eastern_Pacific",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            TropicalRegion::Atlantic => "atlantic",
            TropicalRegion::CentralPacific => "central",
            TropicalRegion::EasternPacific => "eastern",
        }
    }

    /// Element id of the region's summary panel.
    pub fn panel_id(self) -> String {
        format!("summary-{}", self.short_name())
    }

    /// Accepts either the short name or the backend name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|r| {
            r.short_name().eq_ignore_ascii_case(value)
                || r.backend_name().eq_ignore_ascii_case(value)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TropicalSummaryRequest {
    pub region: String,
    pub expertise: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TropicalSummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainRequest {
    pub text: String,
    pub summary: String,
    pub afd: String,
    pub expertise: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExplainResponse {
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Geolocation not supported")]
    Unsupported,
}

/// Backend client errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Backend reported error: {0}")]
    Reported(String),
    #[error("Backend returned status {0}")]
    Status(u16),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl WeatherError {
    /// True for failures that never produced a readable answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::UnexpectedResponse(_))
    }
}
