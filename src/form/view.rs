use crate::error::RequestError;
use crate::models::{LocationsReply, PredictionReply};
use serde_json::Value;
use tracing::{error, info};

pub const LOADING_LOCATIONS: &str = "Loading locations...";
pub const SELECT_LOCATION: &str = "Select a location";
pub const LOCATIONS_ERROR: &str = "Error loading locations";
pub const LOCATIONS_INVALID: &str = "Error: Invalid data";
pub const LOCATIONS_FAILED: &str = "Failed to load locations";

pub const ESTIMATING: &str = "Estimating Price...";
pub const ESTIMATE_FAILED: &str = "Error: Could not estimate price. Please try again.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Completion of a request task, tagged with the page region it feeds
#[derive(Debug)]
pub enum UiEvent {
    Locations(Result<Value, RequestError>),
    Estimate(Result<Value, RequestError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Non-selectable entry with an empty value
    pub fn placeholder(label: &str) -> Self {
        Self {
            value: String::new(),
            label: label.to_string(),
        }
    }

    pub fn location(name: &str) -> Self {
        Self {
            value: name.to_string(),
            label: name.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

/// The location selection control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectControl {
    pub options: Vec<SelectOption>,
}

impl SelectControl {
    pub fn show_placeholder(&mut self, label: &str) {
        self.options = vec![SelectOption::placeholder(label)];
    }

    /// Replace the options with a placeholder followed by `locations` in ascending order
    pub fn fill(&mut self, mut locations: Vec<String>) {
        locations.sort();
        self.options = std::iter::once(SelectOption::placeholder(SELECT_LOCATION))
            .chain(locations.iter().map(|name| SelectOption::location(name)))
            .collect();
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|option| option.label.as_str()).collect()
    }

    /// Selectable location names, placeholders excluded
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|option| !option.is_placeholder())
            .map(|option| option.value.as_str())
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<select id=\"uiLocations\">\n");
        for option in &self.options {
            html.push_str(&format!(
                "  <option value=\"{}\">{}</option>\n",
                escape_html(&option.value),
                escape_html(&option.label)
            ));
        }
        html.push_str("</select>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Rendered state of the widget
#[derive(Debug, Default)]
pub struct Page {
    pub locations: SelectControl,
    pub results: String,
    alerts: Vec<String>,
}

impl Page {
    /// Blocking prompt, queued for the host to show
    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Single rendering callback for every request completion
    pub fn render(&mut self, event: UiEvent) {
        match event {
            UiEvent::Locations(result) => self.render_locations(result),
            UiEvent::Estimate(result) => self.render_estimate(result),
        }
    }

    fn render_locations(&mut self, result: Result<Value, RequestError>) {
        match result {
            Ok(body) => {
                info!("Got response for get_location_names request");
                match LocationsReply::classify(&body) {
                    LocationsReply::Locations(locations) => {
                        info!("Loaded {} locations", locations.len());
                        self.locations.fill(locations);
                    }
                    LocationsReply::Error(message) => {
                        error!("Error loading locations: {}", message);
                        self.locations.show_placeholder(LOCATIONS_ERROR);
                    }
                    LocationsReply::Malformed(reason) => {
                        error!("Invalid location data received: {}", reason);
                        self.locations.show_placeholder(LOCATIONS_INVALID);
                    }
                }
            }
            Err(err) if err.is_internal() => {
                error!("Error in page load: {}", err);
                self.locations.show_placeholder(LOCATIONS_ERROR);
            }
            Err(err) => {
                error!("Error fetching locations: {}", err);
                self.locations.show_placeholder(LOCATIONS_FAILED);
            }
        }
    }

    fn render_estimate(&mut self, result: Result<Value, RequestError>) {
        self.results = match result {
            Ok(body) => match PredictionReply::classify(&body) {
                PredictionReply::Estimate(price) => {
                    info!("Estimated price: {}", price);
                    format!("Estimated Price: {price} Lakh")
                }
                PredictionReply::Error(message) => {
                    error!("Error from server: {}", message);
                    format!("Error: {message}")
                }
                PredictionReply::Malformed(reason) => {
                    error!("Error estimating price: {}", reason);
                    ESTIMATE_FAILED.to_string()
                }
            },
            Err(err) if err.is_internal() => {
                error!("Error in estimate price: {}", err);
                UNEXPECTED_ERROR.to_string()
            }
            Err(err) => {
                error!("Error estimating price: {}", err);
                match err.server_message() {
                    Some(message) => format!("Error: {message}"),
                    None => ESTIMATE_FAILED.to_string(),
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use scraper::{Html, Selector};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn locations_are_sorted_after_placeholder() {
        let mut page = Page::default();
        page.render(UiEvent::Locations(Ok(json!({ "locations": ["B", "A"] }))));

        assert_eq!(page.locations.labels(), vec!["Select a location", "A", "B"]);
        assert!(page.locations.options[0].is_placeholder());
        assert_eq!(page.locations.locations().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn location_failures_leave_a_single_placeholder() {
        let cases = [
            (Ok(json!({ "error": "x" })), LOCATIONS_ERROR),
            (Ok(json!({ "locations": null })), LOCATIONS_INVALID),
            (Err(RequestError::Timeout(Duration::from_secs(10))), LOCATIONS_FAILED),
            (Err(RequestError::Decode("eof".into())), LOCATIONS_FAILED),
            (
                Err(RequestError::Status {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    body: Some(json!({ "error": "x" })),
                }),
                LOCATIONS_FAILED,
            ),
            (Err(RequestError::Internal("panicked".into())), LOCATIONS_ERROR),
        ];

        for (result, expected) in cases {
            let mut page = Page::default();
            page.locations.fill(vec!["stale".to_string()]);
            page.render(UiEvent::Locations(result));

            assert_eq!(page.locations.options, vec![SelectOption::placeholder(expected)]);
        }
    }

    #[test]
    fn estimate_texts() {
        let mut page = Page::default();

        page.render(UiEvent::Estimate(Ok(json!({ "estimated_price": 83.2 }))));
        assert_eq!(page.results, "Estimated Price: 83.2 Lakh");

        page.render(UiEvent::Estimate(Ok(json!({ "estimated_price": 100.0 }))));
        assert_eq!(page.results, "Estimated Price: 100 Lakh");

        page.render(UiEvent::Estimate(Ok(json!({ "error": "bad location" }))));
        assert_eq!(page.results, "Error: bad location");

        page.render(UiEvent::Estimate(Ok(json!({ "status": "ok" }))));
        assert_eq!(page.results, ESTIMATE_FAILED);
    }

    #[test]
    fn estimate_failures_use_server_message_when_present() {
        let mut page = Page::default();

        page.render(UiEvent::Estimate(Err(RequestError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: Some(json!({ "error": "Service temporarily unavailable" })),
        })));
        assert_eq!(page.results, "Error: Service temporarily unavailable");

        page.render(UiEvent::Estimate(Err(RequestError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: None,
        })));
        assert_eq!(page.results, ESTIMATE_FAILED);

        page.render(UiEvent::Estimate(Err(RequestError::Internal("boom".into()))));
        assert_eq!(page.results, UNEXPECTED_ERROR);
    }

    #[test]
    fn alerts_are_drained_once() {
        let mut page = Page::default();
        page.alert("Please select a location");
        assert_eq!(page.take_alerts(), vec!["Please select a location"]);
        assert!(page.take_alerts().is_empty());
    }

    #[test]
    fn markup_escapes_location_names() {
        let mut select = SelectControl::default();
        select.fill(vec!["Richmond <Town>".to_string(), "\"Quoted\" & Co".to_string()]);

        let document = Html::parse_fragment(&select.to_html());
        let option = Selector::parse("select#uiLocations > option").unwrap();
        let rendered: Vec<(String, String)> = document
            .select(&option)
            .map(|el| {
                (
                    el.value().attr("value").unwrap_or_default().to_string(),
                    el.text().collect::<String>(),
                )
            })
            .collect();

        assert_eq!(
            rendered,
            vec![
                (String::new(), "Select a location".to_string()),
                ("\"Quoted\" & Co".to_string(), "\"Quoted\" & Co".to_string()),
                ("Richmond <Town>".to_string(), "Richmond <Town>".to_string()),
            ]
        );
    }
}
