//! gitea-tf - Main entry point

use clap::Parser;
use log::debug;

use gitea_tf::{
    run_apply_command, run_destroy_command, run_import_command, run_plan_command,
    run_refresh_command, run_schema_command, run_show_command, Cli, Command,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .format_timestamp(None)
        .init();

    debug!("Starting gitea-tf v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "Manifest: {}, state: {}",
        cli.file.display(),
        cli.state.display()
    );

    let result = match &cli.command {
        Command::Plan { no_refresh } => run_plan_command(&cli, *no_refresh).await,
        Command::Apply { no_refresh, yes } => run_apply_command(&cli, *no_refresh, *yes).await,
        Command::Refresh => run_refresh_command(&cli).await,
        Command::Destroy { yes } => run_destroy_command(&cli, *yes).await,
        Command::Import { address, id } => run_import_command(&cli, address, id).await,
        Command::Show {
            output,
            show_sensitive,
        } => run_show_command(&cli, *output, *show_sensitive),
        Command::Schema {
            resource_type,
            output,
        } => run_schema_command(resource_type.as_deref(), *output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
