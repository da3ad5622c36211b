//! Scripted model clients for use-case tests

use crate::ports::model_client::{GatewayError, InvokeOptions, ModelClient};
use async_trait::async_trait;
use autologic_domain::ProviderKind;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One canned reply
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(String),
    /// Fails with an HTTP error of the given status
    Fail(u16, String),
    /// Sleeps, then answers
    Slow(Duration, String),
}

pub(crate) fn text(s: impl Into<String>) -> Reply {
    Reply::Text(s.into())
}

/// Client that answers by matching a marker (a prompt heading) to a queue of
/// replies. The last reply in a queue repeats forever.
pub(crate) struct ScriptedClient {
    name: String,
    scripts: Mutex<Vec<(&'static str, VecDeque<Reply>)>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scripts: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn on(self, marker: &'static str, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .push((marker, replies.into_iter().collect()));
        self
    }

    /// Number of prompts received that contain `marker`
    pub(crate) fn calls_matching(&self, marker: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(marker))
            .count()
    }

    pub(crate) fn prompts_matching(&self, marker: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(marker))
            .cloned()
            .collect()
    }

    fn next_reply(&self, prompt: &str) -> Option<Reply> {
        let mut scripts = self.scripts.lock().unwrap();
        let (_, queue) = scripts.iter_mut().find(|(m, _)| prompt.contains(m))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn invoke(&self, prompt: &str, _options: &InvokeOptions) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        match self.next_reply(prompt) {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(status, message)) => Err(GatewayError::http(status, message)),
            Some(Reply::Slow(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(GatewayError::Other(format!(
                "{}: no script for prompt",
                self.name
            ))),
        }
    }
}
