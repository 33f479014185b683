use std::future::Future;
use std::io;
use std::pin::Pin;

use http::header::CONTENT_TYPE;
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;

use proxmox_client::{Error, HttpApiClient, HttpApiResponse, HttpApiResponseStream};

/// Plain HTTP transport for the unauthenticated integration API, needs to run inside a tokio
/// runtime.
///
/// `proxmox_client::Client` refuses to send requests before a login or token was set, the
/// integration port takes none.
pub struct HyperClient {
    base_url: String,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperClient {
    /// Create a client for a server address like `http://mgmt.example.com:8096`.
    ///
    /// Only scheme and authority are used, the API path is set on the
    /// [`DiagnosticsClient`](crate::DiagnosticsClient).
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let uri: Uri = base_url
            .parse()
            .map_err(|err| Error::Client(Box::new(err)))?;

        if uri.scheme_str() != Some("http") {
            return Err(invalid_input(format!(
                "unsupported url scheme in {base_url:?}, only http is supported"
            )));
        }

        let authority = uri
            .authority()
            .ok_or_else(|| invalid_input(format!("no host in {base_url:?}")))?;

        Ok(Self {
            base_url: format!("http://{authority}"),
            client: Client::builder(TokioExecutor::new()).build_http(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request<T: Serialize>(
        &self,
        method: Method,
        path_and_query: &str,
        params: Option<T>,
    ) -> Result<Request<Full<Bytes>>, Error> {
        let request = Request::builder()
            .method(method)
            .uri(format!("{}{path_and_query}", self.base_url));

        let request = match params {
            Some(params) => {
                let body = serde_json::to_vec(&params)
                    .map_err(|err| Error::Client(Box::new(err)))?;
                request
                    .header(CONTENT_TYPE, "application/json")
                    .body(Full::new(Bytes::from(body)))
            }
            None => request.body(Full::new(Bytes::new())),
        };

        request.map_err(|err| Error::Client(Box::new(err)))
    }

    async fn send(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<HttpApiResponseStream<Incoming>, Error> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|err| Error::Client(Box::new(err)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(HttpApiResponseStream {
            status,
            content_type,
            body: Some(response.into_body()),
        })
    }
}

fn invalid_input(msg: String) -> Error {
    Error::Client(Box::new(io::Error::new(io::ErrorKind::InvalidInput, msg)))
}

impl HttpApiClient for HyperClient {
    type ResponseFuture<'a> =
        Pin<Box<dyn Future<Output = Result<HttpApiResponse, Error>> + Send + 'a>>;

    type ResponseStreamFuture<'a> = Pin<
        Box<dyn Future<Output = Result<HttpApiResponseStream<Self::Body>, Error>> + Send + 'a>,
    >;

    type Body = Incoming;

    fn request<'a, T>(
        &'a self,
        method: Method,
        path_and_query: &'a str,
        params: Option<T>,
    ) -> Self::ResponseFuture<'a>
    where
        T: Serialize + 'a,
    {
        let request = self.build_request(method, path_and_query, params);
        Box::pin(async move {
            let response = self.send(request?).await?;

            let body = match response.body {
                Some(body) => body
                    .collect()
                    .await
                    .map_err(|err| Error::Client(Box::new(err)))?
                    .to_bytes()
                    .to_vec(),
                None => Vec::new(),
            };

            Ok(HttpApiResponse {
                status: response.status,
                content_type: response.content_type,
                body,
            })
        })
    }

    fn streaming_request<'a, T>(
        &'a self,
        method: Method,
        path_and_query: &'a str,
        params: Option<T>,
    ) -> Self::ResponseStreamFuture<'a>
    where
        T: Serialize + 'a,
    {
        let request = self.build_request(method, path_and_query, params);
        Box::pin(async move { self.send(request?).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url() {
        let client = HyperClient::new("http://mgmt.example.com:8096/client/api").unwrap();
        assert_eq!(client.base_url(), "http://mgmt.example.com:8096");

        assert!(HyperClient::new("https://mgmt.example.com").is_err());
        assert!(HyperClient::new("/client/api").is_err());
    }

    #[test]
    fn request_with_params() {
        let client = HyperClient::new("http://mgmt.example.com:8096").unwrap();

        let request = client
            .build_request(Method::GET, "/client/api?command=listZones", None::<()>)
            .unwrap();
        assert_eq!(
            request.uri(),
            "http://mgmt.example.com:8096/client/api?command=listZones"
        );
        assert!(request.headers().get(CONTENT_TYPE).is_none());

        let request = client
            .build_request(Method::POST, "/client/api", Some(serde_json::json!({"a": 1})))
            .unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }
}
