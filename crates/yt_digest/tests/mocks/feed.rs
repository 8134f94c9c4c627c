use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use yt_digest::yt::{subscriptions::SubscriptionUpdate, SubscriptionFeed};

#[derive(Clone, Default)]
pub struct MockFeed {
    pub updates: Vec<SubscriptionUpdate>,
    pub fail_with: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl MockFeed {
    pub fn new(updates: Vec<SubscriptionUpdate>) -> Self {
        Self {
            updates,
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl SubscriptionFeed for MockFeed {
    async fn fetch_updates(&self) -> anyhow::Result<Vec<SubscriptionUpdate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.updates.clone())
    }
}
