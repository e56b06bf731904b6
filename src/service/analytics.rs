use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;

use crate::models::propertymodel::Counter;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event: &'static str,
    pub property_id: i64,
    pub property_title: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(counter: Counter, property_id: i64, property_title: Option<String>) -> Self {
        AnalyticsEvent {
            event: counter.event_name(),
            property_id,
            property_title,
            timestamp: Utc::now(),
        }
    }
}

/// Fire-and-forget event sink. Without an endpoint events are only traced.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: Client,
    endpoint: Option<String>,
}

impl AnalyticsClient {
    pub fn new(endpoint: Option<String>) -> Self {
        AnalyticsClient {
            http: Client::new(),
            endpoint,
        }
    }

    pub async fn send(&self, event: AnalyticsEvent) {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(
                "analytics event {} for property {}",
                event.event,
                event.property_id
            );
            return;
        };

        match self.http.post(endpoint).json(&event).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    "Analytics endpoint rejected {}: {}",
                    event.event,
                    response.status()
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to send analytics event {}: {}", event.event, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_named_after_the_counter() {
        let event = AnalyticsEvent::new(Counter::Whatsapp, 4, Some("Corner Shop".into()));
        assert_eq!(event.event, "click_whatsapp");

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["propertyId"], 4);
        assert_eq!(value["propertyTitle"], "Corner Shop");
    }

    #[tokio::test]
    async fn sending_without_endpoint_is_a_no_op() {
        AnalyticsClient::new(None)
            .send(AnalyticsEvent::new(Counter::View, 1, None))
            .await;
    }
}
