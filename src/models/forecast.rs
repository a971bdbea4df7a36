//! Forecast model decoded from the weather service response
//!
//! The schema is owned by the upstream provider (livedoor-compatible JSON).
//! Only the fields rendered by the application are modelled; unknown fields
//! are ignored and a missing required field is a decode failure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecast for one city as returned by the weather service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// Headline, e.g. "東京都 東京 の天気"
    pub title: String,
    /// Link to the provider's forecast page
    pub link: Option<String>,
    /// Publication timestamp as sent by the provider
    pub public_time: Option<String>,
    /// Free-text summary
    pub description: Option<Description>,
    /// Daily forecasts, today first
    pub forecasts: Vec<DailyForecast>,
    /// Area the forecast is for
    pub location: ForecastLocation,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub text: Option<String>,
    pub public_time: Option<String>,
}

/// Forecast for a single day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Relative label such as "今日" or "明日"
    pub date_label: String,
    /// Short weather description such as "晴れ"
    pub telop: String,
    pub temperature: Option<Temperature>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Temperature {
    pub min: Option<TemperatureReading>,
    pub max: Option<TemperatureReading>,
}

/// The provider sends readings as strings and may null either unit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TemperatureReading {
    pub celsius: Option<String>,
    pub fahrenheit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastLocation {
    pub area: Option<String>,
    pub prefecture: String,
    pub city: String,
}

impl TemperatureReading {
    fn format_celsius(reading: Option<&Self>) -> String {
        reading
            .and_then(|r| r.celsius.as_deref())
            .map_or_else(|| "--".to_string(), |c| format!("{c}°C"))
    }
}

impl DailyForecast {
    /// Format temperature range as "max / min"
    #[must_use]
    pub fn format_temperature(&self) -> String {
        let (min, max) = match &self.temperature {
            Some(t) => (t.min.as_ref(), t.max.as_ref()),
            None => (None, None),
        };
        format!(
            "max {} / min {}",
            TemperatureReading::format_celsius(max),
            TemperatureReading::format_celsius(min)
        )
    }
}

impl Forecast {
    /// Forecast for today, if the provider sent one
    #[must_use]
    pub fn today(&self) -> Option<&DailyForecast> {
        self.forecasts.first()
    }

    /// Multi-line human-readable rendering
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "{}\n{} / {}\n",
            self.title, self.location.prefecture, self.location.city
        );
        for day in &self.forecasts {
            out.push_str(&format!(
                "  {} ({}): {}, {}\n",
                day.date_label,
                day.date,
                day.telop,
                day.format_temperature()
            ));
        }
        if let Some(text) = self.description.as_ref().and_then(|d| d.text.as_deref()) {
            out.push('\n');
            out.push_str(text.trim());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "publicTime": "2020-01-09T11:00:00+09:00",
        "title": "東京都 東京 の天気",
        "link": "https://www.jma.go.jp/bosai/forecast/#area_type=offices&area_code=130000",
        "description": { "text": "高気圧に覆われて晴れています。", "publicTime": "2020-01-09T10:39:00+09:00" },
        "forecasts": [
            {
                "date": "2020-01-09",
                "dateLabel": "今日",
                "telop": "晴れ",
                "temperature": { "min": { "celsius": null, "fahrenheit": null }, "max": { "celsius": "12", "fahrenheit": "53.6" } },
                "image": { "title": "晴れ", "url": "https://example.invalid/100.svg", "width": 80, "height": 60 }
            },
            {
                "date": "2020-01-10",
                "dateLabel": "明日",
                "telop": "晴時々曇",
                "temperature": { "min": { "celsius": "3", "fahrenheit": "37.4" }, "max": { "celsius": "11", "fahrenheit": "51.8" } }
            }
        ],
        "location": { "area": "関東", "prefecture": "東京都", "district": "東京地方", "city": "東京" },
        "copyright": { "title": "(C) 天気予報 API" }
    }"#;

    #[test]
    fn test_decode_sample() {
        let forecast: Forecast = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(forecast.title, "東京都 東京 の天気");
        assert_eq!(forecast.location.city, "東京");
        assert_eq!(forecast.forecasts.len(), 2);

        let today = forecast.today().unwrap();
        assert_eq!(today.date, NaiveDate::from_ymd_opt(2020, 1, 9).unwrap());
        assert_eq!(today.telop, "晴れ");
        assert_eq!(today.format_temperature(), "max 12°C / min --");
    }

    #[test]
    fn test_decode_rejects_missing_location() {
        let result = serde_json::from_str::<Forecast>(r#"{"title": "x", "forecasts": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_contains_days() {
        let forecast: Forecast = serde_json::from_str(SAMPLE).unwrap();
        let text = forecast.render();
        assert!(text.contains("今日 (2020-01-09): 晴れ"));
        assert!(text.contains("max 11°C / min 3°C"));
        assert!(text.contains("高気圧"));
    }
}
