use std::path::PathBuf;

use clap::Subcommand;

use crate::client::{EcoletaClient, PointQuery};
use crate::form::RegistrationForm;
use crate::localities::IbgeClient;
use crate::output::{self, OutputConfig};

/// Collection point commands
#[derive(Subcommand, Debug)]
pub enum PointCommands {
    /// List points, optionally filtered
    List {
        /// Only points in this city
        #[clap(long)]
        city: Option<String>,
        /// Only points in this state
        #[clap(long)]
        uf: Option<String>,
        /// Only points accepting this item (repeatable)
        #[clap(long = "item")]
        items: Vec<i32>,
    },
    /// Show a point with the items it accepts
    Show {
        /// The point ID
        id: i32,
    },
    /// Register a new point
    ///
    /// The submitted position is the picked one given by --latitude and
    /// --longitude. The registration form only falls back to the user's
    /// current location when no position was picked.
    Create {
        /// Name of the organisation
        #[clap(long)]
        name: String,
        /// Contact e-mail
        #[clap(long)]
        email: String,
        /// WhatsApp number, digits only
        #[clap(long)]
        whatsapp: String,
        /// Picked latitude of the point
        #[clap(long, allow_hyphen_values = true)]
        latitude: f64,
        /// Picked longitude of the point
        #[clap(long, allow_hyphen_values = true)]
        longitude: f64,
        /// Two-letter state abbreviation
        #[clap(long)]
        uf: String,
        #[clap(long)]
        city: String,
        /// Accepted item ID (repeatable)
        #[clap(long = "item", required = true)]
        items: Vec<i32>,
        /// Photo of the point
        #[clap(long)]
        image: Option<PathBuf>,
        /// Check the state and city against IBGE before submitting
        #[clap(long)]
        check_locality: bool,
    },
}

/// Executes a point command
pub async fn execute(
    client: &EcoletaClient,
    ibge: &IbgeClient,
    cmd: PointCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        PointCommands::List { city, uf, items } => {
            let query = PointQuery { city, uf, items };
            let points = client.list_points(&query).await?;
            output::print_points(&points, config);
        }
        PointCommands::Show { id } => {
            match client.get_point(id).await? {
                Some(detail) => output::print_point_detail(&detail, config),
                None => {
                    eprintln!("Point not found: {}", id);
                    std::process::exit(1);
                }
            }
        }
        PointCommands::Create {
            name,
            email,
            whatsapp,
            latitude,
            longitude,
            uf,
            city,
            items,
            image,
            check_locality,
        } => {
            let mut form = RegistrationForm::new();
            form.set_personal_info(&name, &email, &whatsapp);
            form.select_position(latitude, longitude);
            form.select_uf(&uf);

            if check_locality {
                let selected = form.selected_uf().unwrap_or_default().to_string();
                let states = ibge.list_states().await?;
                if !states.iter().any(|s| s.sigla == selected) {
                    return Err(format!("{} is not a Brazilian state", selected).into());
                }
                let cities = ibge.list_cities(&selected).await?;
                form.set_cities(&selected, cities);
                if form.cities().is_some_and(<[String]>::is_empty) {
                    return Err(format!("IBGE lists no cities for {}", selected).into());
                }
            }
            form.select_city(&city)?;

            for item in items {
                if !form.selected_items().contains(&item) {
                    form.toggle_item(item);
                }
            }
            if let Some(path) = image {
                form.attach_image(path);
            }

            let submission = form.submission()?;
            let point = client.create_point(&submission).await?;
            output::print_point(&point, config);
        }
    }
    Ok(())
}
