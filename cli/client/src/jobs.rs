//! Async job commands.

use anyhow::Error;

use proxmox_router::cli::{
    format_and_print_result, CliCommand, CliCommandMap, CommandLineInterface, OutputFormat,
};
use proxmox_schema::api;

use diag_api_types::{AsyncJobStatus, ASYNC_JOB_ID_SCHEMA};

use crate::{client, env};

pub fn cli() -> CommandLineInterface {
    CliCommandMap::new()
        .insert(
            "status",
            CliCommand::new(&API_METHOD_JOB_STATUS).arg_param(&["jobid"]),
        )
        .into()
}

#[api(
    input: {
        properties: {
            jobid: { schema: ASYNC_JOB_ID_SCHEMA },
        }
    }
)]
/// Show the current state of an async job.
async fn job_status(jobid: String) -> Result<(), Error> {
    let job = client()?.query_async_job_result(&jobid).await?;

    let output_format = env().format_args.output_format;
    if output_format != OutputFormat::Text {
        format_and_print_result(&job, &output_format.to_string());
        return Ok(());
    }

    println!("job {}: {}", job.jobid, job.jobstatus);
    match job.jobstatus {
        AsyncJobStatus::Pending => (),
        AsyncJobStatus::Failed => {
            println!("    error: {}", job.error_text().unwrap_or("unknown error"));
        }
        AsyncJobStatus::Succeeded => {
            let Some(result) = job.diagnostics_result()? else {
                return Ok(());
            };
            if let Some(copied) = result.numberoffilescopied {
                println!("    files copied: {copied}");
            }
            let mut details: Vec<_> = result.details.iter().collect();
            details.sort();
            for (key, value) in details {
                println!("    {key}: {value}");
            }
        }
    }
    Ok(())
}
