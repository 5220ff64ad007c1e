#![allow(dead_code)]

use std::sync::Arc;

use cadview_core::translation::{TranslationJob, TranslationParams};
use cadview_core::webhook::{WebhookEvent, EVENT_TRANSLATION_COMPLETE};
use cadview_db::store::MemoryCorrelationStore;
use cadview_onshape::testing::FakeOnshape;
use cadview_pipeline::TranslationPipeline;

pub const TOKEN: &str = "token-abc";
pub const CALLBACK_ROOT: &str = "https://bridge.example.com";

/// Pipeline wired to a scripted remote service and an in-memory store.
pub struct Harness {
    pub remote: Arc<FakeOnshape>,
    pub store: Arc<MemoryCorrelationStore>,
    pub pipeline: TranslationPipeline,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_remote(FakeOnshape::new())
    }

    pub fn with_remote(remote: FakeOnshape) -> Self {
        let remote = Arc::new(remote);
        let store = Arc::new(MemoryCorrelationStore::new());
        let pipeline = TranslationPipeline::new(remote.clone(), store.clone(), CALLBACK_ROOT);
        Self {
            remote,
            store,
            pipeline,
        }
    }
}

pub fn element_job() -> TranslationJob {
    TranslationJob {
        document_id: "D1".into(),
        workspace_id: "W1".into(),
        element_id: "E42".into(),
        part_id: None,
        params: TranslationParams::default(),
    }
}

pub fn part_job() -> TranslationJob {
    TranslationJob {
        part_id: Some("JHD".into()),
        ..element_job()
    }
}

pub fn completion(translation_id: &str, webhook_id: &str) -> WebhookEvent {
    WebhookEvent {
        event: Some(EVENT_TRANSLATION_COMPLETE.into()),
        translation_id: Some(translation_id.into()),
        webhook_id: Some(webhook_id.into()),
    }
}
