//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Hotel booking API server and database tooling
#[derive(Parser, Debug)]
#[command(name = "hotel-booking")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),
}

/// Arguments for the serve command; unset values come from the configuration
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback applied migrations
    Down {
        /// How many migrations to roll back
        #[arg(short, long, default_value_t = 1)]
        steps: u32,
    },
    /// Show migration status
    Status,
    /// Drop all tables and re-run every migration
    Fresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_flags_override_nothing_by_default() {
        let cli = Cli::try_parse_from(["hotel-booking", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host, None);
        assert_eq!(args.port, None);
    }

    #[test]
    fn serve_accepts_host_and_port() {
        let cli =
            Cli::try_parse_from(["hotel-booking", "serve", "-H", "127.0.0.1", "--port", "9000"])
                .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, Some(9000));
    }

    #[test]
    fn migrate_down_defaults_to_one_step() {
        let cli = Cli::try_parse_from(["hotel-booking", "migrate", "down"]).unwrap();
        let Commands::Migrate(args) = cli.command else {
            panic!("expected migrate");
        };
        assert_eq!(args.action, MigrateAction::Down { steps: 1 });
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["hotel-booking", "migrate", "status", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
