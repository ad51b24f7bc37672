use clap::Subcommand;

use crate::localities::IbgeClient;
use crate::output::{self, OutputConfig};

/// State and city lookups against IBGE
#[derive(Subcommand, Debug)]
pub enum LocalityCommands {
    /// List the Brazilian states
    States,
    /// List the cities of a state
    Cities {
        /// Two-letter state abbreviation
        uf: String,
    },
}

/// Executes a locality command
pub async fn execute(
    ibge: &IbgeClient,
    cmd: LocalityCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        LocalityCommands::States => {
            let states = ibge.list_states().await?;
            output::print_states(&states, config);
        }
        LocalityCommands::Cities { uf } => {
            let cities = ibge.list_cities(&uf.to_uppercase()).await?;
            output::print_cities(&cities, config);
        }
    }
    Ok(())
}
