//! Test doubles shared by the core unit tests.

use crate::domain::model::{RawCompletion, RenderedPrompt};
use crate::domain::ports::{Backoff, ChatClient};
use crate::utils::error::TransportError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

type Reply = Result<RawCompletion, TransportError>;

pub fn completion(content: &str) -> RawCompletion {
    RawCompletion {
        status: 200,
        body: serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string(),
    }
}

fn duplicate(reply: &Reply) -> Reply {
    match reply {
        Ok(raw) => Ok(raw.clone()),
        Err(TransportError::Status { status, body }) => Err(TransportError::Status {
            status: *status,
            body: body.clone(),
        }),
        Err(TransportError::Misconfigured { message }) => Err(TransportError::Misconfigured {
            message: message.clone(),
        }),
        Err(TransportError::Http(_)) => panic!("scripted replies cannot repeat reqwest errors"),
    }
}

/// Answers from a script, then repeats its fallback reply forever.
#[derive(Clone)]
pub struct ScriptedChatClient {
    script: Arc<Mutex<VecDeque<Reply>>>,
    fallback: Arc<Option<Reply>>,
    calls: Arc<AtomicU32>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedChatClient {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback: Arc::new(None),
            calls: Arc::new(AtomicU32::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn repeating(reply: Reply) -> Self {
        Self {
            fallback: Arc::new(Some(reply)),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<RawCompletion, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.as_str().to_string());

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(reply) => reply,
            None => match self.fallback.as_ref() {
                Some(reply) => duplicate(reply),
                None => panic!("chat client script exhausted"),
            },
        }
    }
}

/// Records which retries were waited for, without sleeping.
#[derive(Clone, Default)]
pub struct RecordingBackoff {
    waits: Arc<Mutex<Vec<u32>>>,
}

impl RecordingBackoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> Vec<u32> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backoff for RecordingBackoff {
    async fn wait(&self, retry: u32) {
        self.waits.lock().unwrap().push(retry);
    }
}
