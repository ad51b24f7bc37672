use clap::ValueEnum;
use ecoleta::dto::{ItemView, PointDetailView, PointView};
use serde::Serialize;

use crate::localities::IbgeState;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or names)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

/// Prints the item catalog in the specified format
pub fn print_items(items: &[ItemView], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if items.is_empty() {
                if !config.quiet {
                    println!("No items found.");
                }
                return;
            }
            if config.quiet {
                for item in items {
                    println!("{}", item.id);
                }
                return;
            }
            let max_title = items.iter().map(|i| i.title.chars().count()).max().unwrap_or(5);
            println!("{:>4}  {:<title_w$}  IMAGE", "ID", "TITLE", title_w = max_title);
            for item in items {
                println!(
                    "{:>4}  {:<title_w$}  {}",
                    item.id,
                    item.title,
                    item.image_url,
                    title_w = max_title,
                );
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Prints a list of points in the specified format
pub fn print_points(points: &[PointView], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if points.is_empty() {
                if !config.quiet {
                    println!("No points found.");
                }
                return;
            }
            if config.quiet {
                for point in points {
                    println!("{}", point.id);
                }
                return;
            }
            let max_name = points.iter().map(|p| p.name.chars().count()).max().unwrap_or(4);
            println!("{:>4}  {:<name_w$}  LOCATION", "ID", "NAME", name_w = max_name);
            for point in points {
                println!(
                    "{:>4}  {:<name_w$}  {}/{}",
                    point.id,
                    point.name,
                    point.city,
                    point.uf,
                    name_w = max_name,
                );
            }
        }
        OutputFormat::Json => print_json(points),
    }
}

fn print_point_fields(point: &PointView) {
    println!("ID:        {}", point.id);
    println!("Name:      {}", point.name);
    println!("E-mail:    {}", point.email);
    println!("WhatsApp:  {}", point.whatsapp);
    println!("Location:  {}/{}", point.city, point.uf);
    println!("Position:  {}, {}", point.latitude, point.longitude);
    match &point.image_url {
        Some(url) => println!("Image:     {}", url),
        None => println!("Image:     none"),
    }
    println!("Created:   {}", point.created_at.format("%Y-%m-%d %H:%M"));
}

/// Prints a newly created point in the specified format
pub fn print_point(point: &PointView, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", point.id);
                return;
            }
            print_point_fields(point);
            let items: Vec<String> = point.items.iter().map(i32::to_string).collect();
            println!("Items:     {}", items.join(", "));
        }
        OutputFormat::Json => print_json(point),
    }
}

/// Prints a point with its items in the specified format
pub fn print_point_detail(detail: &PointDetailView, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", detail.point.id);
                return;
            }
            print_point_fields(&detail.point);
            let titles: Vec<&str> = detail.items.iter().map(|i| i.title.as_str()).collect();
            println!("Items:     {}", titles.join(", "));
        }
        OutputFormat::Json => print_json(detail),
    }
}

/// Prints the IBGE state list in the specified format
pub fn print_states(states: &[IbgeState], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            for state in states {
                if config.quiet {
                    println!("{}", state.sigla);
                } else {
                    println!("{}  {}", state.sigla, state.nome);
                }
            }
        }
        OutputFormat::Json => print_json(states),
    }
}

/// Prints city names in the specified format
pub fn print_cities(cities: &[String], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            for city in cities {
                println!("{}", city);
            }
        }
        OutputFormat::Json => print_json(cities),
    }
}
