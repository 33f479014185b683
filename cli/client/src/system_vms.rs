//! System VM commands.

use anyhow::Error;

use proxmox_router::cli::{
    format_and_print_result, CliCommand, CliCommandMap, CommandLineInterface, OutputFormat,
};
use proxmox_schema::api;

use diag_api_types::{Zone, ZONE_ID_SCHEMA};
use diag_ui_shared::{labels, RetrieveDiagnosticsSection};

use crate::{client, env};

pub fn cli() -> CommandLineInterface {
    CliCommandMap::new()
        .insert(
            "list",
            CliCommand::new(&API_METHOD_LIST_SYSTEM_VMS).arg_param(&["zone"]),
        )
        .into()
}

#[api(
    input: {
        properties: {
            zone: { schema: ZONE_ID_SCHEMA },
        }
    }
)]
/// List the system VMs of a zone.
async fn list_system_vms(zone: String) -> Result<(), Error> {
    let section = RetrieveDiagnosticsSection::new(client()?);
    let rows = section.list(&Zone::new(zone)).await?;

    let output_format = env().format_args.output_format;
    if output_format == OutputFormat::Text {
        if rows.is_empty() {
            println!("No system VMs found.");
            return Ok(());
        }

        let header: Vec<&str> = section
            .descriptor()
            .list_view
            .fields
            .iter()
            .map(|field| labels::text(field.label))
            .collect();
        println!("{}", header.join(" / "));

        for row in rows {
            println!("{} / {}: {}", row.name, row.type_label, row.id);
        }
    } else {
        format_and_print_result(&rows, &output_format.to_string());
    }
    Ok(())
}
