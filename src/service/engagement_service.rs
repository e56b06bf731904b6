// service/engagement_service.rs
use std::sync::Arc;

use crate::{
    db::propertydb::CounterExt,
    models::propertymodel::Counter,
    service::analytics::{AnalyticsClient, AnalyticsEvent},
};

/// Records views and contact clicks. Nothing here ever fails the caller:
/// store and analytics errors are logged and swallowed.
pub struct EngagementService {
    counters: Arc<dyn CounterExt>,
    analytics: Arc<AnalyticsClient>,
}

impl EngagementService {
    pub fn new(counters: Arc<dyn CounterExt>, analytics: Arc<AnalyticsClient>) -> Self {
        Self {
            counters,
            analytics,
        }
    }

    /// Increments one counter and emits the matching analytics event.
    /// Returns the new counter value when the store reported one.
    pub async fn record(
        &self,
        property_id: i64,
        counter: Counter,
        property_title: Option<String>,
    ) -> Option<i64> {
        let updated = match self.counters.increment_counter(property_id, counter).await {
            Ok(Some(value)) => {
                tracing::debug!("{} for property {} is now {}", counter.procedure(), property_id, value);
                Some(value)
            }
            Ok(None) => {
                tracing::warn!("{}: no property with id {}", counter.procedure(), property_id);
                None
            }
            Err(e) => {
                tracing::error!("{} failed for property {}: {}", counter.procedure(), property_id, e);
                None
            }
        };

        self.analytics
            .send(AnalyticsEvent::new(counter, property_id, property_title))
            .await;

        updated
    }

    /// Runs `record` on a background task so the request returns at once.
    pub fn track(self: &Arc<Self>, property_id: i64, counter: Counter, property_title: Option<String>) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.record(property_id, counter, property_title).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MemoryCounters {
        values: Mutex<HashMap<(i64, Counter), i64>>,
        known: Vec<i64>,
    }

    #[async_trait]
    impl CounterExt for MemoryCounters {
        async fn increment_counter(
            &self,
            property_id: i64,
            counter: Counter,
        ) -> Result<Option<i64>, sqlx::Error> {
            if !self.known.contains(&property_id) {
                return Ok(None);
            }
            let mut values = self.values.lock().await;
            let value = values.entry((property_id, counter)).or_insert(0);
            *value += 1;
            Ok(Some(*value))
        }
    }

    struct BrokenCounters;

    #[async_trait]
    impl CounterExt for BrokenCounters {
        async fn increment_counter(&self, _: i64, _: Counter) -> Result<Option<i64>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    fn service(counters: Arc<dyn CounterExt>) -> EngagementService {
        EngagementService::new(counters, Arc::new(AnalyticsClient::new(None)))
    }

    #[tokio::test]
    async fn concurrent_clicks_are_all_counted() {
        let counters = Arc::new(MemoryCounters {
            known: vec![1],
            ..Default::default()
        });
        let service = Arc::new(service(counters.clone()));

        let clicks = (0..3).map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.record(1, Counter::Call, None).await })
        });
        for click in futures::future::join_all(clicks).await {
            assert!(click.unwrap().is_some());
        }

        let values = counters.values.lock().await;
        assert_eq!(values.get(&(1, Counter::Call)), Some(&3));
        assert_eq!(values.get(&(1, Counter::View)), None);
    }

    #[tokio::test]
    async fn unknown_property_is_not_an_error() {
        let service = service(Arc::new(MemoryCounters::default()));
        assert_eq!(service.record(99, Counter::View, None).await, None);
    }

    #[tokio::test]
    async fn store_failures_are_swallowed() {
        let service = service(Arc::new(BrokenCounters));
        assert_eq!(service.record(1, Counter::Whatsapp, Some("Shop".into())).await, None);
    }
}
