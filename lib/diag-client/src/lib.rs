//! Management server API client for the system VM diagnostics section.
//!
//! The management server speaks a command style API: every call is a `GET` on the API path with
//! a `command` parameter, the reply is a JSON object with a single `<command>response` member.

use http::StatusCode;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub use proxmox_client::{Error, HttpApiClient, HttpApiResponse};

mod hyper_client;
pub use hyper_client::HyperClient;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use types::*;
/// For convenience we reexport all the api types the client uses.
pub mod types {
    pub use diag_api_types::{
        AsyncJobRef, AsyncJobResult, AsyncJobStatus, DiagnosticsRequest, DiagnosticsType,
        SystemVm, SystemVmType,
    };
}

/// Default location of the API on the management server.
pub const DEFAULT_API_PATH: &str = "/client/api";

pub struct DiagnosticsClient<T: HttpApiClient> {
    client: T,
    api_path: String,
}

impl<T: HttpApiClient> std::ops::Deref for DiagnosticsClient<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.client
    }
}

impl<T: HttpApiClient> std::ops::DerefMut for DiagnosticsClient<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.client
    }
}

impl<T: HttpApiClient> DiagnosticsClient<T> {
    pub fn new(client: T) -> Self {
        Self::with_api_path(client, DEFAULT_API_PATH)
    }

    pub fn with_api_path(client: T, api_path: impl Into<String>) -> Self {
        Self {
            client,
            api_path: api_path.into(),
        }
    }

    pub fn api_path(&self) -> &str {
        &self.api_path
    }

    /// Build the request path for a command string.
    ///
    /// The command and its arguments come last, so they form the suffix of the URL.
    pub fn create_url(&self, command: &str) -> String {
        format!("{}?response=json&command={command}", self.api_path)
    }

    pub async fn list_system_vms(&self, zone_id: &str) -> Result<Vec<SystemVm>, Error> {
        #[derive(Deserialize)]
        struct ListSystemVms {
            #[serde(default)]
            systemvm: Vec<SystemVm>,
        }

        let list: ListSystemVms = self.command(&list_system_vms_command(zone_id)).await?;
        Ok(list.systemvm)
    }

    /// Ask the server to collect a diagnostics bundle. The returned job has to be polled.
    pub async fn retrieve_diagnostics(
        &self,
        request: &DiagnosticsRequest,
    ) -> Result<AsyncJobRef, Error> {
        self.command(&retrieve_diagnostics_command(request)).await
    }

    /// Query the current state of an async job once.
    pub async fn query_async_job_result(&self, jobid: &str) -> Result<AsyncJobResult, Error> {
        let mut command = "queryAsyncJobResult".to_string();
        add_query_param(&mut command, "jobid", jobid);
        self.command(&command).await
    }

    async fn command<R: DeserializeOwned>(&self, command: &str) -> Result<R, Error> {
        let path = self.create_url(command);
        log::debug!("GET {path}");
        let response = self.client.get(&path).await?;
        unwrap_response(response)
    }
}

/// The command string listing the system VMs of a zone.
pub fn list_system_vms_command(zone_id: &str) -> String {
    let mut command = "listSystemVms".to_string();
    add_query_param(&mut command, "zoneid", zone_id);
    command
}

/// The command string submitting a diagnostics request.
///
/// All three parameters are always present and in this order, `detail` may be empty.
pub fn retrieve_diagnostics_command(request: &DiagnosticsRequest) -> String {
    let mut command = "retrieveDiagnostics".to_string();
    add_query_param(&mut command, "systemVmId", &request.system_vm_id);
    add_query_param(&mut command, "type", &request.diagnostics_type.to_string());
    add_query_param(&mut command, "detail", &request.detail);
    command
}

/// Characters which would change the meaning of the query if left as they are.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Append `&name=value` to a command string.
pub fn add_query_param(query: &mut String, name: &str, value: &str) {
    query.push('&');
    query.push_str(name);
    query.push('=');
    query.extend(utf8_percent_encode(value, QUERY_VALUE));
}

/// Extract the payload of a reply, turning the error envelope into [`Error::Api`].
pub fn unwrap_response<R: DeserializeOwned>(response: HttpApiResponse) -> Result<R, Error> {
    let value: Option<Value> = serde_json::from_slice(&response.body).ok();
    let inner = value.as_ref().and_then(response_member);

    if let Some(err) = inner.and_then(envelope_error) {
        log::warn!("api error: {err}");
        return Err(err);
    }

    if !(200..300).contains(&response.status) {
        let status = StatusCode::from_u16(response.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let reason = status.canonical_reason().unwrap_or("unknown error");
        log::warn!("api request failed with status {}", response.status);
        return Err(Error::Api(status, reason.to_string()));
    }

    let inner = match (&value, inner) {
        (None, _) => return Err(Error::BadApi("response is not valid json".into(), None)),
        (Some(_), None) => {
            return Err(Error::BadApi("response envelope is missing".into(), None))
        }
        (_, Some(inner)) => inner,
    };

    serde_json::from_value(inner.clone())
        .map_err(|err| Error::BadApi("failed to parse response".into(), Some(Box::new(err))))
}

/// The message to surface to the user.
///
/// For server side errors this is the server's error text without decoration.
pub fn error_message(err: &Error) -> String {
    match err {
        Error::Api(_, text) => text.clone(),
        other => other.to_string(),
    }
}

fn response_member(value: &Value) -> Option<&Value> {
    value
        .as_object()?
        .iter()
        .find(|(key, _)| key.ends_with("response"))
        .map(|(_, inner)| inner)
}

fn envelope_error(inner: &Value) -> Option<Error> {
    let code = inner.get("errorcode")?.as_u64()?;
    let text = inner
        .get("errortext")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let status = u16::try_from(code)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Some(Error::Api(status, text.to_string()))
}

#[cfg(test)]
mod tests {
    use proxmox_async::runtime::block_on;
    use serde_json::json;

    use super::test_support::FakeApi;
    use super::*;

    #[test]
    fn list_system_vms_request() {
        let client = DiagnosticsClient::new(FakeApi::new().with_reply(
            200,
            json!({
                "listsystemvmsresponse": {
                    "count": 2,
                    "systemvm": [
                        {"id": "a1", "name": "v-1-VM", "type": "consoleproxy"},
                        {"id": "b2", "name": "s-2-VM", "type": "secondarystoragevm"},
                    ]
                }
            }),
        ));

        let vms = block_on(client.list_system_vms("zone-1")).unwrap();
        assert_eq!(vms.len(), 2);
        assert_eq!(vms[0].ty, SystemVmType::ConsoleProxy);
        assert_eq!(vms[1].name, "s-2-VM");

        assert_eq!(
            client.requests(),
            ["/client/api?response=json&command=listSystemVms&zoneid=zone-1"]
        );
    }

    #[test]
    fn empty_system_vm_list() {
        let client = DiagnosticsClient::new(
            FakeApi::new().with_reply(200, json!({"listsystemvmsresponse": {}})),
        );
        let vms = block_on(client.list_system_vms("zone-1")).unwrap();
        assert!(vms.is_empty());
    }

    #[test]
    fn retrieve_diagnostics_url_suffix() {
        let client = DiagnosticsClient::new(FakeApi::new().with_reply(
            200,
            json!({"retrievediagnosticsresponse": {"jobid": "6f3e1f0c"}}),
        ));

        let request = DiagnosticsRequest::new("i-2-3-VM", DiagnosticsType::LogFiles);
        let job = block_on(client.retrieve_diagnostics(&request)).unwrap();
        assert_eq!(job.jobid, "6f3e1f0c");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].ends_with("&systemVmId=i-2-3-VM&type=LOGFILES&detail="));
    }

    #[test]
    fn retrieve_diagnostics_parameter_order() {
        let request = DiagnosticsRequest::new("v-7-VM", DiagnosticsType::IfConfigRetrieve)
            .with_detail("/var/log/cloud.log,/etc/hosts");
        assert_eq!(
            retrieve_diagnostics_command(&request),
            "retrieveDiagnostics&systemVmId=v-7-VM&type=IFCONFIGretrieve\
             &detail=/var/log/cloud.log,/etc/hosts"
        );

        let request = DiagnosticsRequest::new("v-7-VM", DiagnosticsType::Lb)
            .with_detail("a b&c=d");
        assert_eq!(
            retrieve_diagnostics_command(&request),
            "retrieveDiagnostics&systemVmId=v-7-VM&type=LB&detail=a%20b%26c%3Dd"
        );
    }

    #[test]
    fn error_envelope() {
        let client = DiagnosticsClient::new(FakeApi::new().with_reply(
            431,
            json!({
                "retrievediagnosticsresponse": {
                    "uuidList": [],
                    "errorcode": 431,
                    "cserrorcode": 9999,
                    "errortext": "Unable to find system vm"
                }
            }),
        ));

        let request = DiagnosticsRequest::new("nope", DiagnosticsType::Vpn);
        let err = block_on(client.retrieve_diagnostics(&request)).unwrap_err();
        assert_eq!(error_message(&err), "Unable to find system vm");
        match err {
            Error::Api(status, _) => assert_eq!(status.as_u16(), 431),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn error_status_without_envelope() {
        let client = DiagnosticsClient::new(FakeApi::new().with_raw_reply(503, b"<html/>"));
        let err = block_on(client.list_system_vms("z")).unwrap_err();
        match err {
            Error::Api(status, text) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(text, "Service Unavailable");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn transport_error() {
        let client = DiagnosticsClient::new(FakeApi::new().with_transport_error("refused"));
        let err = block_on(client.list_system_vms("z")).unwrap_err();
        assert!(matches!(err, Error::Client(_)));
    }

    #[test]
    fn envelope_without_payload() {
        let client = DiagnosticsClient::new(FakeApi::new().with_reply(200, json!({"jobid": "x"})));
        let request = DiagnosticsRequest::new("v-1-VM", DiagnosticsType::Dhcp);
        let err = block_on(client.retrieve_diagnostics(&request)).unwrap_err();
        assert!(matches!(err, Error::BadApi(_, _)));
    }

    #[test]
    fn job_status_query() {
        let client = DiagnosticsClient::new(FakeApi::new().with_reply(
            200,
            json!({"queryasyncjobresultresponse": {"jobid": "j 1", "jobstatus": 0}}),
        ));
        let job = block_on(client.query_async_job_result("j 1")).unwrap();
        assert_eq!(job.jobstatus, AsyncJobStatus::Pending);
        assert_eq!(
            client.requests(),
            ["/client/api?response=json&command=queryAsyncJobResult&jobid=j%201"]
        );
    }

    #[test]
    fn custom_api_path() {
        let client = DiagnosticsClient::with_api_path(FakeApi::new(), "/api");
        assert_eq!(
            client.create_url("listSystemVms&zoneid=z"),
            "/api?response=json&command=listSystemVms&zoneid=z"
        );
    }
}
