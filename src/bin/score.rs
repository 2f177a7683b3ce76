//! Score a set of quiz answers from the command line.
//!
//! Usage:
//!   cargo run --bin score -- meat_dairy=20_50 transport=public flights=none \
//!     home_energy_source=renewable home_efficiency=very recycling=always \
//!     sustainable_shopping=occasionally carbon_awareness=medium \
//!     device_usage=2_5 food_waste=some
//!   cargo run --bin score -- --prompt ...

use anyhow::{Context, Result, bail};
use clap::Parser;
use footprint_oracle::{answers::RawAnswers, narrative, scoring};

#[derive(Parser)]
#[command(name = "score")]
#[command(about = "Compute a carbon footprint from quiz answers", long_about = None)]
struct Cli {
    /// Answers as field=value pairs
    #[arg(required = true)]
    answers: Vec<String>,
    /// Also print the story prompt that would be sent to the generator
    #[arg(long)]
    prompt: bool,
    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut raw = RawAnswers::default();
    for pair in &cli.answers {
        let (field, value) = pair
            .split_once('=')
            .with_context(|| format!("expected field=value, got '{}'", pair))?;
        if !raw.set(field.trim(), value.trim()) {
            bail!("unknown field '{}'", field);
        }
    }

    let answers = raw.into_answer_set()?;
    let assessment = scoring::assess(&answers);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        let b = &assessment.breakdown;
        println!("Diet:            {:>8.1} kg", b.diet_kg);
        println!("Transport:       {:>8.1} kg", b.transport_kg);
        println!("Flights:         {:>8.1} kg", b.flights_kg);
        println!("Home energy:     {:>8.1} kg", b.home_kg);
        println!("Recycling:       x{:.2}", b.recycling_factor);
        println!("Shopping:        x{:.2}", b.shopping_factor);
        println!("Devices:         {:>8.1} kg", b.devices_kg);
        println!("Food waste:      {:>8.1} kg", b.food_waste_kg);
        println!("Total:           {:>8.1} kg CO2e/year", assessment.carbon_kg);
        println!("\nThis person {}.", assessment.behavior_summary);
    }

    if cli.prompt {
        println!("\n{}", narrative::build_prompt(&assessment.behavior_summary));
    }

    Ok(())
}
