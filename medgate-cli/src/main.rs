//! Medgate CLI - inspect the role table and run the enforcement server.
//!
//! ```bash
//! medgate roles
//! medgate show doctor
//! medgate check technician patients export
//! medgate route technician /add-patient
//! medgate serve --config medgate.toml --users users.toml
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medgate", about = "Clinic role and permission tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List declared roles
    Roles,

    /// Print a role's permission summary
    Show {
        role: String,

        /// Print the JSON bootstrap payload instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check whether a role may perform an action on a module
    Check { role: String, module: String, action: String },

    /// Check whether a role may open a page
    Route { role: String, path: String },

    /// Run the enforcement server
    Serve {
        /// Config file (defaults to ./medgate.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// TOML file with [[users]] entries (id, role)
        #[arg(long)]
        users: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Roles => Ok(commands::inspect::roles()),
        Commands::Show { role, json } => commands::inspect::show(&role, json),
        Commands::Check { role, module, action } => {
            commands::inspect::check(&role, &module, &action)
        }
        Commands::Route { role, path } => Ok(commands::inspect::route(&role, &path)),
        Commands::Serve { config, users, port } => {
            commands::serve::run(config.as_deref(), &users, port)
                .map(|()| String::new())
                .map_err(|e| format!("{:#}", e))
        }
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
