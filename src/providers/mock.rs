//! In-memory blob service for tests
//!
//! Counts every call so tests can assert that invalid input never reaches the
//! network, and keeps the set of stored ids so deletes behave like the real
//! service ("ok" once, "not found" afterwards).

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::traits::{
    BlobService, DestroyOutcome, ProviderError, ProviderResult, ResourceType, UploadParams,
    UploadedBlob, UsageReport,
};

/// How the mock should misbehave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Failure {
    #[default]
    None,
    Timeout,
    Rejected,
    EmptyUrl,
}

#[derive(Default)]
pub struct MockBlobService {
    failure: Failure,
    stored: Mutex<HashSet<String>>,
    uploads: Mutex<Vec<UploadParams>>,
    destroyed: Mutex<Vec<(String, ResourceType)>>,
    calls: AtomicUsize,
}

impl MockBlobService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failure: Failure) -> Self {
        MockBlobService {
            failure,
            ..Self::default()
        }
    }

    /// Total number of remote calls of any kind
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<UploadParams> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<(String, ResourceType)> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn insert(&self, public_id: &str) {
        self.stored.lock().unwrap().insert(public_id.to_string());
    }

    fn fail(&self) -> ProviderResult<()> {
        match self.failure {
            Failure::Timeout => Err(ProviderError::Timeout { timeout_secs: 30 }),
            Failure::Rejected => Err(ProviderError::ApiError {
                status: 420,
                message: "Monthly quota exceeded".to_string(),
            }),
            Failure::None | Failure::EmptyUrl => Ok(()),
        }
    }
}

#[async_trait]
impl BlobService for MockBlobService {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn upload(&self, params: UploadParams) -> ProviderResult<UploadedBlob> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uploads.lock().unwrap().push(params.clone());
        self.fail()?;

        let secure_url = if self.failure == Failure::EmptyUrl {
            String::new()
        } else {
            self.insert(&params.public_id);
            format!(
                "https://res.blobcdn.example/cloudname/image/upload/v1700000000/{}.jpg",
                params.public_id
            )
        };

        Ok(UploadedBlob {
            secure_url,
            public_id: Some(params.public_id),
            version: Some(1700000000),
            bytes: Some(params.payload.len() as u64),
            format: Some("jpg".to_string()),
        })
    }

    async fn destroy(&self, public_id: &str, resource_type: ResourceType) -> ProviderResult<DestroyOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.destroyed
            .lock()
            .unwrap()
            .push((public_id.to_string(), resource_type));
        self.fail()?;

        let removed = self.stored.lock().unwrap().remove(public_id);
        Ok(DestroyOutcome {
            result: if removed { "ok" } else { "not found" }.to_string(),
        })
    }

    async fn usage(&self) -> ProviderResult<UsageReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fail()?;
        Ok(UsageReport {
            plan: Some("Free".to_string()),
            ..UsageReport::default()
        })
    }
}
