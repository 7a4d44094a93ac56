//! In-memory transport for unit tests.

use std::sync::Mutex;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

type Respond<'a> = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'a>;

/// Records every request and answers with `respond`.
pub(crate) struct FakeTransport<'a> {
    requests: Mutex<Vec<HttpRequest>>,
    respond: Respond<'a>,
}

impl<'a> FakeTransport<'a> {
    pub(crate) fn new(respond: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'a) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport<'_> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok((self.respond)(request))
    }
}

/// Responds to every request with `{"data": <data>}` and status 200.
pub(crate) fn always(
    data: serde_json::Value,
) -> impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static {
    let body = serde_json::json!({ "data": data }).to_string();
    move |_: &HttpRequest| HttpResponse::new(200, body.clone())
}
