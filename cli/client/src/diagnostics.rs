//! Diagnostics commands.

use anyhow::Error;

use proxmox_router::cli::{
    format_and_print_result, CliCommand, CliCommandMap, CommandLineInterface, OutputFormat,
};
use proxmox_schema::api;

use diag_api_types::{
    DiagnosticsRequest, DiagnosticsType, Zone, DIAGNOSTICS_DETAIL_SCHEMA, SYSTEM_VM_ID_SCHEMA,
    ZONE_ID_SCHEMA,
};
use diag_ui_shared::retrieve_diagnostics::diagnostics_type_options;
use diag_ui_shared::{labels, DiagnosticsForm, RetrieveDiagnosticsSection};

use crate::{client, env};

pub fn cli() -> CommandLineInterface {
    CliCommandMap::new()
        .insert("types", CliCommand::new(&API_METHOD_LIST_DIAGNOSTICS_TYPES))
        .insert(
            "retrieve",
            CliCommand::new(&API_METHOD_RETRIEVE_DIAGNOSTICS)
                .arg_param(&["system-vm", "diagnostics-type"]),
        )
        .into()
}

#[api]
/// List the kinds of diagnostics which can be retrieved.
fn list_diagnostics_types() -> Result<(), Error> {
    let options = diagnostics_type_options();

    let output_format = env().format_args.output_format;
    if output_format == OutputFormat::Text {
        for option in options {
            println!("{}", option.id);
        }
    } else {
        format_and_print_result(&options, &output_format.to_string());
    }
    Ok(())
}

#[api(
    input: {
        properties: {
            "system-vm": { schema: SYSTEM_VM_ID_SCHEMA },
            "diagnostics-type": { type: DiagnosticsType },
            detail: {
                schema: DIAGNOSTICS_DETAIL_SCHEMA,
                optional: true,
            },
            zone: {
                schema: ZONE_ID_SCHEMA,
                optional: true,
            },
        }
    }
)]
/// Request a diagnostics bundle from a system VM and print the job to poll.
///
/// With a zone given, the system VM is checked against the VMs listed for that zone first.
async fn retrieve_diagnostics(
    system_vm: String,
    diagnostics_type: DiagnosticsType,
    detail: Option<String>,
    zone: Option<String>,
) -> Result<(), Error> {
    let section = RetrieveDiagnosticsSection::new(client()?);

    let request = match zone {
        Some(zone) => {
            let rows = section.list(&Zone::new(zone)).await?;
            let form = DiagnosticsForm {
                systemvmtype: Some(system_vm),
                diagnosticstype: Some(diagnostics_type.to_string()),
                detail,
            };
            form.validate(&rows)?
        }
        None => DiagnosticsRequest::new(system_vm, diagnostics_type)
            .with_detail(detail.unwrap_or_default()),
    };

    let job = section.submit(&request).await?;

    let output_format = env().format_args.output_format;
    if output_format == OutputFormat::Text {
        println!("Submitted job {}", job.jobid);
        for row in section.descriptor().detail_view.render(&request) {
            println!("    {}: {}", labels::text(row.label), row.value);
        }
        let files = request.detail_files();
        if !files.is_empty() {
            println!("    additional files: {}", files.join(", "));
        }
    } else {
        format_and_print_result(&job, &output_format.to_string());
    }
    Ok(())
}
