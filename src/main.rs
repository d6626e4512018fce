use std::error::Error;
use std::process::ExitCode;
use log::{error, info};

use company_sizer_lib::errors::error_chain;
use company_sizer_lib::{input_loader, logger};
use company_sizer_lib::{
    CompanyRegistry, Config, ConsoleOperator, LinkedinClient, ProgressStore, Resolver,
};

fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    // 1. Seed the registry from the input list
    let names = input_loader::load_names(&config.input_path)?;
    let mut registry = CompanyRegistry::from_names(names);

    // 2. Replay earlier progress
    let mut store = ProgressStore::initialize(&config.output_path, &mut registry)?;
    let pending = registry.pending_count();
    info!("{} of {} companies still need a size.", pending, registry.len());

    // 3. Credentials are only needed when something is left to look up.
    // Login happens on the first lookup, so a failed login is retried per company.
    let credentials = if pending > 0 {
        if !config.pacing.is_enabled() {
            info!("Request pacing disabled; operator input paces the lookups.");
        }
        Some(config.require_credentials()?)
    } else {
        None
    };
    let client = LinkedinClient::new(credentials, config.pacing.clone(), config.timeout)?;

    // 4. Resolve
    let mut resolver = Resolver::new(client, ConsoleOperator);
    let summary = resolver.run(&mut registry, &mut store)?;

    info!(
        "Done. Resolved {} companies ({} already known), wrote {} rows to {:?}.",
        summary.resolved,
        summary.already_known,
        summary.rows_written,
        store.path()
    );
    Ok(())
}

fn main() -> ExitCode {
    logger::init();
    info!("Starting company sizer...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", error_chain(&*e));
            ExitCode::FAILURE
        }
    }
}
