//! A scripted transport for tests.

use std::collections::VecDeque;
use std::future::{ready, Ready};
use std::io;
use std::sync::Mutex;

use http::Method;
use serde::Serialize;
use serde_json::Value;

use proxmox_client::{Error, HttpApiClient, HttpApiResponse, HttpApiResponseStream};

/// Records request paths and answers with queued replies, in order.
#[derive(Default)]
pub struct FakeApi {
    requests: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<Result<HttpApiResponse, Error>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, status: u16, body: Value) -> Self {
        self.with_raw_reply(status, body.to_string().as_bytes())
    }

    pub fn with_raw_reply(self, status: u16, body: &[u8]) -> Self {
        self.push(Ok(HttpApiResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_vec(),
        }))
    }

    pub fn with_transport_error(self, msg: &str) -> Self {
        self.push(Err(Error::Client(Box::new(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            msg.to_string(),
        )))))
    }

    fn push(self, reply: Result<HttpApiResponse, Error>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// All request paths seen so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpApiClient for FakeApi {
    type ResponseFuture<'a> = Ready<Result<HttpApiResponse, Error>>;

    type ResponseStreamFuture<'a> = Ready<Result<HttpApiResponseStream<Self::Body>, Error>>;

    type Body = hyper::body::Incoming;

    fn request<'a, T>(
        &'a self,
        _method: Method,
        path_and_query: &'a str,
        _params: Option<T>,
    ) -> Self::ResponseFuture<'a>
    where
        T: Serialize + 'a,
    {
        self.requests
            .lock()
            .unwrap()
            .push(path_and_query.to_string());

        ready(
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(Error::Other("no reply queued"))),
        )
    }

    fn streaming_request<'a, T>(
        &'a self,
        _method: Method,
        _path_and_query: &'a str,
        _params: Option<T>,
    ) -> Self::ResponseStreamFuture<'a>
    where
        T: Serialize + 'a,
    {
        ready(Err(Error::Other("streaming requests are not scripted")))
    }
}
