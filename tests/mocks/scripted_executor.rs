use async_trait::async_trait;
use housing_contact::error::{TransportError, TransportResult};
use housing_contact::transport::GraphqlExecutor;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Executor that replays canned attempt outcomes and timestamps each call.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    replies: Arc<Mutex<VecDeque<TransportResult<Value>>>>,
    calls: Arc<Mutex<Vec<Instant>>>,
    tokens: Arc<Mutex<Vec<Option<String>>>>,
}

#[allow(dead_code)]
impl ScriptedExecutor {
    pub fn new(replies: Vec<TransportResult<Value>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphqlExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        _operation: &str,
        _variables: &Value,
        auth_token: Option<&str>,
    ) -> TransportResult<Value> {
        self.calls.lock().unwrap().push(Instant::now());
        self.tokens
            .lock()
            .unwrap()
            .push(auth_token.map(str::to_string));

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("no scripted reply")))
    }
}
