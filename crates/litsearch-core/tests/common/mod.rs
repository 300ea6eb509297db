//! Stub model client and factory with call recording

#![allow(dead_code)]

use async_trait::async_trait;
use litsearch_core::{
    ChatMessage, ClientFactory, CompletionOptions, Config, Endpoint, LLMClient, LitSearchError,
    ProviderResolver, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub enum Reply {
    Text(String),
    Fail,
}

/// Model client returning a canned reply and recording every call
pub struct StubClient {
    reply: Reply,
    calls: AtomicUsize,
    requests: Mutex<Vec<(Vec<ChatMessage>, CompletionOptions)>>,
}

impl StubClient {
    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(text.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Fail,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        let requests = self.requests.lock().unwrap();
        let (messages, _) = requests.last().expect("no request recorded");
        messages.last().unwrap().content.clone()
    }

    pub fn last_options(&self) -> CompletionOptions {
        let requests = self.requests.lock().unwrap();
        requests.last().expect("no request recorded").1.clone()
    }
}

#[async_trait]
impl LLMClient for StubClient {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((messages, options.clone()));
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(LitSearchError::Provider(
                "stub provider unavailable".to_string(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

/// Factory handing out one shared stub client
pub struct StubFactory {
    client: Arc<StubClient>,
    builds: AtomicUsize,
    endpoints: Mutex<Vec<Endpoint>>,
}

impl StubFactory {
    pub fn new(client: Arc<StubClient>) -> Arc<Self> {
        Arc::new(Self {
            client,
            builds: AtomicUsize::new(0),
            endpoints: Mutex::new(Vec::new()),
        })
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn last_endpoint(&self) -> Endpoint {
        self.endpoints
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no endpoint recorded")
    }
}

impl ClientFactory for StubFactory {
    fn build(&self, endpoint: Endpoint, _timeout: Duration) -> Result<Arc<dyn LLMClient>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.endpoints.lock().unwrap().push(endpoint);
        let client: Arc<dyn LLMClient> = self.client.clone();
        Ok(client)
    }
}

pub const ALL_KEYS: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "sk-openai-test"),
    ("OPENROUTER_API_KEY", "sk-or-test"),
];

/// Resolver wired to a stub factory and a fixed set of credentials
pub fn stub_resolver(
    client: Arc<StubClient>,
    keys: &[(&str, &str)],
) -> (Arc<ProviderResolver>, Arc<StubFactory>) {
    let factory = StubFactory::new(client);
    let credentials: HashMap<String, String> = keys
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let resolver = ProviderResolver::new(Config::default())
        .with_credentials(Arc::new(credentials))
        .with_factory(factory.clone());
    (Arc::new(resolver), factory)
}
