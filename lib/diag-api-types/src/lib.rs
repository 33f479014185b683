//! API types shared by the diagnostics client, the UI section and the CLI.

use proxmox_schema::{Schema, StringSchema};

mod diagnostics;
pub use diagnostics::*;

mod job;
pub use job::*;

mod system_vm;
pub use system_vm::*;

pub const SYSTEM_VM_ID_SCHEMA: Schema = StringSchema::new("System VM id.")
    .min_length(1)
    .max_length(255)
    .schema();

pub const ZONE_ID_SCHEMA: Schema = StringSchema::new("Zone id.")
    .min_length(1)
    .max_length(255)
    .schema();

pub const DIAGNOSTICS_DETAIL_SCHEMA: Schema = StringSchema::new(
    "Comma separated list of additional files or items to retrieve, either file names or full paths.",
)
.max_length(4096)
.schema();

pub const ASYNC_JOB_ID_SCHEMA: Schema = StringSchema::new("Async job id.")
    .min_length(1)
    .max_length(255)
    .schema();
