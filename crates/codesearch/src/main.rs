mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands, SearchCommands};

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let root = cli.root;
    let result = match cli.command {
        Commands::Search(search_cmd) => match search_cmd {
            SearchCommands::Text(args) => commands::search::run_text(root, args),
            SearchCommands::Ast(args) => commands::search::run_ast(root, args),
            SearchCommands::Request { file, output } => {
                commands::search::run_request(root, file, output)
            }
        },
        Commands::Doctor { json } => commands::doctor::run(root, json),
        Commands::Mcp => commands::mcp::run_stdio(root),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays machine-readable (JSON output, MCP framing)
fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
