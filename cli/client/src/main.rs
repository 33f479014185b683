use std::sync::OnceLock;

use anyhow::{bail, format_err, Error};

use proxmox_router::cli::{CliCommandMap, CliEnvironment, GlobalOptions};

use diag_client::{DiagnosticsClient, HyperClient};

pub mod config;
pub mod diagnostics;
pub mod jobs;
pub mod system_vms;

use config::{ConnectArgs, FormatArgs};

pub struct Env {
    pub connect_args: ConnectArgs,
    pub format_args: FormatArgs,
}

static ENV: OnceLock<Env> = OnceLock::new();

pub fn env() -> &'static Env {
    // unwrap: initialized at startup
    ENV.get().unwrap()
}

pub fn client() -> Result<DiagnosticsClient<HyperClient>, Error> {
    let args = &env().connect_args;
    let url = args.url()?;
    log::debug!("connecting to {url}{}", args.api_path());
    let client = HyperClient::new(&url)?;
    Ok(DiagnosticsClient::with_api_path(client, args.api_path()))
}

fn main() {
    proxmox_router::cli::init_cli_logger("DIAG_LOG", "info");

    match main_do() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::exit(1);
        }
    }
}

fn main_do() -> Result<(), Error> {
    let cmd_def = CliCommandMap::new()
        .global_option(GlobalOptions::of::<ConnectArgs>())
        .global_option(GlobalOptions::of::<FormatArgs>())
        .insert("diagnostics", diagnostics::cli())
        .insert("job", jobs::cli())
        .insert("system-vm", system_vms::cli())
        .insert_help()
        .build();

    let mut rpcenv = CliEnvironment::new();

    let cli_parser = proxmox_router::cli::CommandLine::new(cmd_def)
        .with_async(|future| proxmox_async::runtime::main(future));
    let invocation = cli_parser.parse(&mut rpcenv, std::env::args())?;

    let mut connect_args: ConnectArgs = rpcenv
        .take_global_option()
        .ok_or_else(|| format_err!("missing connect args"))?;
    connect_args.finalize()?;

    let format_args: FormatArgs = rpcenv.take_global_option().unwrap_or_default();

    let env = Env {
        connect_args,
        format_args,
    };
    if ENV.set(env).is_err() {
        bail!("failed to initialize environment");
    }

    invocation.call(&mut rpcenv)
}
