//! Shared test doubles

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use brig::config::Settings;
use brig::infrastructure::di::ServiceContainer;
use brig::infrastructure::traits::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Transport that records every request and replays canned responses in order.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::new(message)),
            None => panic!("unexpected request: {} {}", request.method, request.url),
        }
    }
}

pub const TOKEN: &str = "s3cr3t-token";
pub const BASE_URL: &str = "http://brig.test";

pub fn settings() -> Settings {
    Settings {
        api_token: TOKEN.to_string(),
        base_url: BASE_URL.to_string(),
        timeout_secs: None,
    }
}

/// Container wired to the mock; the returned handle inspects recorded requests.
pub fn container(settings: Settings, transport: MockTransport) -> (ServiceContainer, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    let container = ServiceContainer::with_deps(settings, transport.clone());
    (container, transport)
}
