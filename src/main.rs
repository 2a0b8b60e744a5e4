use clap::Parser;
use otpvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate {
            ref db,
            ref table,
            dry_run,
            yes,
            json,
        } => otpvault::cli::commands::migrate::execute(db, table, dry_run, yes, json),
        Commands::Check => otpvault::cli::commands::check::execute(),
        Commands::Keygen => otpvault::cli::commands::keygen::execute(),
        Commands::History { ref db, last } => {
            otpvault::cli::commands::history::execute(db, last)
        }
    };

    if let Err(e) = result {
        otpvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
