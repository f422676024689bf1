#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use finance_tracker_core::errors::CoreError;
use finance_tracker_core::gateway::response::ApiResponse;
use finance_tracker_core::gateway::traits::Gateway;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Mock Gateway: records every call, replays queued replies
// ═══════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

pub enum Reply {
    Ok(Value),
    Fail(u16, &'static str),
    Network(&'static str),
}

pub struct MockGateway {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl MockGateway {
    /// Answers every call with `200 {}` unless replies are queued.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
        }
    }

    pub fn replying(replies: Vec<Reply>) -> Self {
        let gw = Self::new();
        for r in replies {
            gw.push(r);
        }
        gw
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls().last().cloned().expect("no calls recorded")
    }

    fn respond(&self, method: &'static str, path: &str, body: Option<&Value>) -> Result<ApiResponse, CoreError> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Ok(v)) => Ok(ApiResponse::new(200, v)),
            Some(Reply::Fail(status, body)) => Err(CoreError::Api {
                status,
                body: body.to_string(),
            }),
            Some(Reply::Network(msg)) => Err(CoreError::Network(msg.to_string())),
            None => Ok(ApiResponse::new(200, json!({}))),
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, CoreError> {
        self.respond("GET", path, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, CoreError> {
        self.respond("POST", path, Some(body))
    }

    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, CoreError> {
        self.respond("PUT", path, Some(body))
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, CoreError> {
        self.respond("DELETE", path, None)
    }
}

pub fn shared(gw: &Arc<MockGateway>) -> Arc<dyn Gateway> {
    gw.clone()
}

// ═══════════════════════════════════════════════════════════════════
// Log capture: collects formatted tracing output for assertions
// ═══════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install a capturing subscriber for the current thread.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
