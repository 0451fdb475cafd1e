//! Test doubles for the transport and the display.

use crate::error::ConnectivityError;
use crate::network::{Endpoint, Transport};
use crate::rendering::{DisplaySink, Outcome, Stats};
use macroquad::prelude::Image;
use serde_json::Value;
use shared::JsonObject;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// A valid 1x1 PNG, base64 encoded.
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

enum Scripted {
    Reply(Value),
    Fail,
}

/// Replies are queued per endpoint. An endpoint with an empty queue falls
/// back to its sticky reply, or fails as unreachable when it has none.
#[derive(Default)]
pub struct ScriptedTransport {
    queued: RefCell<HashMap<Endpoint, VecDeque<Scripted>>>,
    sticky: RefCell<HashMap<Endpoint, Value>>,
    requests: RefCell<Vec<(Endpoint, JsonObject)>>,
    limits: RefCell<Vec<(Endpoint, Duration)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose `/image` always answers with a tiny frame.
    pub fn with_images() -> Self {
        let transport = Self::new();
        transport.always(Endpoint::Image, serde_json::json!({ "image": TINY_PNG_BASE64 }));
        transport
    }

    pub fn reply(&self, endpoint: Endpoint, body: Value) {
        self.push(endpoint, Scripted::Reply(body));
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.push(endpoint, Scripted::Fail);
    }

    pub fn always(&self, endpoint: Endpoint, body: Value) {
        self.sticky.borrow_mut().insert(endpoint, body);
    }

    pub fn requests_to(&self, endpoint: Endpoint) -> Vec<JsonObject> {
        self.requests
            .borrow()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn endpoints_called(&self) -> Vec<Endpoint> {
        self.requests.borrow().iter().map(|(e, _)| *e).collect()
    }

    /// The bound passed with the last bounded request to `endpoint`.
    pub fn limit_for(&self, endpoint: Endpoint) -> Option<Duration> {
        self.limits
            .borrow()
            .iter()
            .rev()
            .find(|(e, _)| *e == endpoint)
            .map(|(_, limit)| *limit)
    }

    fn push(&self, endpoint: Endpoint, scripted: Scripted) {
        self.queued
            .borrow_mut()
            .entry(endpoint)
            .or_default()
            .push_back(scripted);
    }
}

impl Transport for ScriptedTransport {
    fn post(&self, endpoint: Endpoint, body: &JsonObject) -> Result<JsonObject, ConnectivityError> {
        self.requests.borrow_mut().push((endpoint, body.clone()));

        let next = self
            .queued
            .borrow_mut()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);

        let reply = match next {
            Some(Scripted::Reply(value)) => value,
            Some(Scripted::Fail) => return Err(unreachable(endpoint)),
            None => match self.sticky.borrow().get(&endpoint) {
                Some(value) => value.clone(),
                None => return Err(unreachable(endpoint)),
            },
        };

        match reply {
            Value::Object(object) => Ok(object),
            _ => Err(ConnectivityError::Malformed {
                url: endpoint.to_string(),
                reason: "scripted reply is not an object".to_string(),
            }),
        }
    }

    fn post_within(
        &self,
        endpoint: Endpoint,
        body: &JsonObject,
        limit: Duration,
    ) -> Result<JsonObject, ConnectivityError> {
        self.limits.borrow_mut().push((endpoint, limit));
        self.post(endpoint, body)
    }
}

fn unreachable(endpoint: Endpoint) -> ConnectivityError {
    ConnectivityError::Unreachable {
        url: endpoint.to_string(),
        reason: "connection refused".to_string(),
    }
}

/// Remembers everything shown to the player.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<(usize, usize)>,
    pub stats: Vec<Stats>,
    pub outcome: Option<Outcome>,
    pub outcomes_shown: usize,
    pub clears: usize,
}

impl DisplaySink for RecordingSink {
    fn show_frame(&mut self, image: &Image) {
        self.frames.push((image.width(), image.height()));
    }

    fn show_stats(&mut self, stats: Stats) {
        self.stats.push(stats);
    }

    fn show_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.outcomes_shown += 1;
    }

    fn clear_outcome(&mut self) {
        self.outcome = None;
        self.clears += 1;
    }
}
