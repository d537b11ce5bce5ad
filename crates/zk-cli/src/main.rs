//! # zk — command-line client for Zookeepr
//!
//! - `zk list [--trait T]... [--diet D] [--species S] [--name N]`
//! - `zk get <id>`
//! - `zk add --name N --species S --diet D [--trait T]...`

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tabled::{Table, Tabled};

use zk_core::{Animal, Criteria};

/// Query and add animals on a running Zookeepr server.
#[derive(Parser)]
#[command(name = "zk", version, about, long_about = None)]
struct Cli {
    /// Base URL of the server.
    #[arg(long, env = "ZK_URL", default_value = "http://127.0.0.1:3001", global = true)]
    url: String,

    /// Print raw JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List animals, optionally filtered.
    List {
        /// Required personality trait (repeatable, all must match).
        #[arg(long = "trait")]
        traits: Vec<String>,
        #[arg(long)]
        diet: Option<String>,
        #[arg(long)]
        species: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },

    /// Show one animal by id.
    Get { id: String },

    /// Add an animal. The server assigns the id.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        species: String,
        #[arg(long)]
        diet: String,
        /// Personality trait (repeatable).
        #[arg(long = "trait")]
        traits: Vec<String>,
    },
}

#[derive(Tabled)]
struct AnimalRow {
    id: String,
    name: String,
    species: String,
    diet: String,
    traits: String,
}

impl From<&Animal> for AnimalRow {
    fn from(a: &Animal) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            species: a.species.clone(),
            diet: a.diet.clone(),
            traits: a.personality_traits.join(", "),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let client = Client::new();
    let base_url = cli.url.trim_end_matches('/').to_string();

    match run(&client, &base_url, cli.json, cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(
    client: &Client,
    base_url: &str,
    json: bool,
    command: Commands,
) -> Result<ExitCode, reqwest::Error> {
    match command {
        Commands::List {
            traits,
            diet,
            species,
            name,
        } => {
            let criteria = Criteria {
                personality_traits: traits,
                diet,
                species,
                name,
                ..Default::default()
            };
            let url = format!("{}/api/animals", base_url);
            let animals: Vec<Animal> = client
                .get(&url)
                .query(&criteria.to_pairs())
                .send()?
                .error_for_status()?
                .json()?;
            print_animals(&animals, json);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Get { id } => {
            let url = format!("{}/api/animals/{}", base_url, id);
            let resp = client.get(&url).send()?;
            if resp.status() == StatusCode::NOT_FOUND {
                eprintln!("Animal {} not found", id);
                return Ok(ExitCode::FAILURE);
            }
            let animal: Animal = resp.error_for_status()?.json()?;
            print_animals(std::slice::from_ref(&animal), json);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Add {
            name,
            species,
            diet,
            traits,
        } => {
            let url = format!("{}/api/animals", base_url);
            let payload = serde_json::json!({
                "name": name,
                "species": species,
                "diet": diet,
                "personalityTraits": traits,
            });
            let resp = client.post(&url).json(&payload).send()?;
            if resp.status() == StatusCode::BAD_REQUEST {
                eprintln!("{}", resp.text()?);
                return Ok(ExitCode::FAILURE);
            }
            let animal: Animal = resp.error_for_status()?.json()?;
            print_animals(std::slice::from_ref(&animal), json);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_animals(animals: &[Animal], json: bool) {
    if json {
        match serde_json::to_string_pretty(animals) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }
    if animals.is_empty() {
        println!("No animals found.");
        return;
    }
    let rows: Vec<AnimalRow> = animals.iter().map(AnimalRow::from).collect();
    println!("{}", Table::new(rows));
}
