//! Admin console section for retrieving diagnostics bundles from system VMs.
//!
//! The section is described by plain data ([`section::SectionDescriptor`]) which the host
//! framework renders, plus a few async operations the host calls with explicit inputs.

pub mod labels;
pub mod registry;
pub mod request_state;
pub mod retrieve_diagnostics;
pub mod section;

pub use registry::SectionRegistry;
pub use request_state::{RequestState, RequestTracker};
pub use retrieve_diagnostics::{DiagnosticsForm, ListRow, RetrieveDiagnosticsSection};
