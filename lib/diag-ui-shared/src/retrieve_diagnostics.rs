//! The "retrieve diagnostics" section: list the system VMs of a zone, request a diagnostics
//! bundle from one of them, show a submitted request.

use anyhow::{bail, format_err, Error};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use diag_api_types::{
    system_vm_type_label, AsyncJobRef, DiagnosticsRequest, DiagnosticsType, SystemVm, Zone,
};
use diag_client::{error_message, DiagnosticsClient, HttpApiClient};

use crate::labels;
use crate::request_state::RequestTracker;
use crate::section::{
    CreateAction, DetailRow, DetailTab, DetailView, FieldDescriptor, FormDescriptor, ListView,
    Notification, PollKind, SectionDescriptor, SelectOption, ViewAllLink,
};

pub const SECTION_ID: &str = "retrieveDiagnostics";

/// The selectable diagnostics types, in their fixed order.
pub fn diagnostics_type_options() -> Vec<SelectOption> {
    DiagnosticsType::ALL
        .iter()
        .map(|ty| SelectOption {
            id: ty.to_string(),
            description: ty.to_string(),
        })
        .collect()
}

/// Build the section descriptor.
pub fn descriptor() -> SectionDescriptor {
    SectionDescriptor {
        id: SECTION_ID,
        title: labels::RETRIEVE_DIAGNOSTICS,
        list_view: ListView {
            id: SECTION_ID,
            fields: vec![
                FieldDescriptor::new("name", labels::NAME),
                FieldDescriptor::new("type", labels::TYPE).converter(system_vm_type_label),
            ],
        },
        create_action: CreateAction {
            label: labels::RETRIEVE_DIAGNOSTICS,
            form: FormDescriptor {
                title: labels::RETRIEVE_DIAGNOSTICS,
                button_label: labels::RETRIEVE_DIAGNOSTICS,
                fields: vec![
                    FieldDescriptor::new("systemvmtype", labels::SYSTEM_VM_NAME)
                        .required(true)
                        .converter(system_vm_type_label),
                    FieldDescriptor::new("diagnosticstype", labels::DIAGNOSTICS_TYPE)
                        .required(true)
                        .select(diagnostics_type_options()),
                    FieldDescriptor::new("detail", labels::DETAIL),
                ],
            },
            notification: Notification {
                label: labels::RETRIEVE_DIAGNOSTICS,
                poll: PollKind::AsyncJob,
            },
        },
        detail_view: DetailView {
            tabs: vec![DetailTab {
                name: "details",
                title: labels::DETAILS,
                fields: vec![
                    FieldDescriptor::new("systemvmtype", labels::SYSTEM_VM_NAME),
                    FieldDescriptor::new("diagnosticstype", labels::DIAGNOSTICS_TYPE),
                    FieldDescriptor::new("detail", labels::DETAIL),
                ],
            }],
            view_all: Some(ViewAllLink {
                path: "instances",
                label: labels::INSTANCES,
            }),
        },
    }
}

/// A row of the system VM list.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_label: String,
}

impl From<&SystemVm> for ListRow {
    fn from(vm: &SystemVm) -> Self {
        Self {
            id: vm.id.clone(),
            name: vm.name.clone(),
            type_label: vm.ty.label().to_string(),
        }
    }
}

/// Raw input of the create form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DiagnosticsForm {
    /// Id of the chosen system VM.
    #[serde(default)]
    pub systemvmtype: Option<String>,

    #[serde(default)]
    pub diagnosticstype: Option<String>,

    #[serde(default)]
    pub detail: Option<String>,
}

fn required_value<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, Error> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!("field '{field}' is required"),
    }
}

impl DiagnosticsForm {
    /// Turn the form input into a request.
    ///
    /// `rows` are the system VMs listed for the selected zone, the chosen VM has to be one of
    /// them.
    pub fn validate(&self, rows: &[ListRow]) -> Result<DiagnosticsRequest, Error> {
        let system_vm_id = required_value(&self.systemvmtype, "systemvmtype")?;
        if !rows.iter().any(|row| row.id == system_vm_id) {
            bail!("system VM '{system_vm_id}' is not available in the selected zone");
        }

        let diagnostics_type = required_value(&self.diagnosticstype, "diagnosticstype")?;
        let diagnostics_type: DiagnosticsType = diagnostics_type
            .parse()
            .map_err(|_| format_err!("invalid diagnostics type '{diagnostics_type}'"))?;

        Ok(DiagnosticsRequest::new(system_vm_id, diagnostics_type)
            .with_detail(self.detail.clone().unwrap_or_default()))
    }
}

/// Completion callbacks of the host framework for a create action.
pub trait ActionResponder {
    fn success(&mut self, data: Value);
    fn error(&mut self, message: String);
}

impl DetailView {
    /// Read-only rows describing a submitted request.
    pub fn render(&self, request: &DiagnosticsRequest) -> Vec<DetailRow> {
        self.tabs
            .iter()
            .flat_map(|tab| tab.fields.iter())
            .filter_map(|field| {
                let value = match field.name {
                    "systemvmtype" => request.system_vm_id.clone(),
                    "diagnosticstype" => request.diagnostics_type.to_string(),
                    "detail" => request.detail.clone(),
                    _ => return None,
                };
                Some(DetailRow {
                    label: field.label,
                    value: field.display(&value),
                })
            })
            .collect()
    }
}

pub struct RetrieveDiagnosticsSection<T: HttpApiClient> {
    client: DiagnosticsClient<T>,
    descriptor: SectionDescriptor,
}

impl<T: HttpApiClient> RetrieveDiagnosticsSection<T> {
    pub fn new(client: DiagnosticsClient<T>) -> Self {
        Self {
            client,
            descriptor: descriptor(),
        }
    }

    pub fn descriptor(&self) -> &SectionDescriptor {
        &self.descriptor
    }

    pub fn client(&self) -> &DiagnosticsClient<T> {
        &self.client
    }

    /// List the system VMs of a zone.
    pub async fn list(&self, zone: &Zone) -> Result<Vec<ListRow>, diag_client::Error> {
        let vms = self.client.list_system_vms(&zone.id).await?;
        Ok(vms.iter().map(ListRow::from).collect())
    }

    /// Send a validated request, returning the job to poll.
    pub async fn submit(
        &self,
        request: &DiagnosticsRequest,
    ) -> Result<AsyncJobRef, diag_client::Error> {
        log::info!(
            "requesting {} diagnostics from system VM {}",
            request.diagnostics_type,
            request.system_vm_id
        );
        self.client.retrieve_diagnostics(request).await
    }

    /// Run the create action the way the host expects it.
    ///
    /// Errors are reported through `responder.error`, success through `responder.success` with
    /// an empty payload. `rows` is the result of [`list`](Self::list) for the selected zone.
    /// The returned tracker stays in `Draft` if the form was invalid, otherwise it is `Submitted`
    /// with the job to poll, or `Failed`.
    pub async fn run_create<R: ActionResponder>(
        &self,
        form: &DiagnosticsForm,
        rows: &[ListRow],
        responder: &mut R,
    ) -> RequestTracker {
        let mut tracker = RequestTracker::new();

        let request = match form.validate(rows) {
            Ok(request) => request,
            Err(err) => {
                responder.error(err.to_string());
                return tracker;
            }
        };

        if let Err(err) = self.send(&request, &mut tracker).await {
            responder.error(err);
            return tracker;
        }

        responder.success(json!({}));
        tracker
    }

    async fn send(
        &self,
        request: &DiagnosticsRequest,
        tracker: &mut RequestTracker,
    ) -> Result<(), String> {
        tracker.submit().map_err(|err| err.to_string())?;

        match self.submit(request).await {
            Ok(job) => tracker.accepted(job).map_err(|err| err.to_string()),
            Err(err) => {
                log::warn!("retrieving diagnostics failed: {err}");
                let message = error_message(&err);
                tracker
                    .fail(message.clone())
                    .map_err(|err| err.to_string())?;
                Err(message)
            }
        }
    }
}
