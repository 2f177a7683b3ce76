//! Footprint scorer: maps an [`AnswerSet`] to an annual kg CO₂e estimate and
//! a short behavioral summary.
//!
//! Scoring is a fixed sequence over a running total. Steps 1-4 add diet,
//! transport, flight and home-energy costs; the recycling and shopping factors
//! then scale everything accumulated so far; device electricity and food waste
//! are added afterwards and are never discounted. Unknown answer keys take the
//! per-question default, so scoring never fails.

use serde::Serialize;

use crate::answers::AnswerSet;

/// Grid emission factor used for device electricity.
pub const GRID_KG_PER_KWH: f64 = 0.233;

/// Summary used when no behavioral rule matches.
pub const AVERAGE_LIFESTYLE: &str = "lives an average modern lifestyle";

pub fn diet_kg(key: &str) -> f64 {
    match key {
        "less_20" => 1800.0,
        "20_50" => 2400.0,
        "50_100" => 3200.0,
        "over_100" => 4000.0,
        _ => 3000.0,
    }
}

pub fn transport_kg(key: &str) -> f64 {
    match key {
        "car_petrol" => 2500.0,
        "car_electric" => 800.0,
        "public" => 800.0,
        "walk_cycle" => 200.0,
        "home" => 300.0,
        _ => 1000.0,
    }
}

pub fn flights_kg(key: &str) -> f64 {
    match key {
        "short" => 500.0,
        "long" => 2000.0,
        "3plus" => 3500.0,
        // "none" and anything unrecognised
        _ => 0.0,
    }
}

pub fn energy_source_kg(key: &str) -> f64 {
    match key {
        "renewable" => 500.0,
        "mixed" => 1200.0,
        "gas_oil" => 2200.0,
        _ => 1500.0,
    }
}

pub fn efficiency_factor(key: &str) -> f64 {
    match key {
        "very" => 0.7,
        "some" => 0.9,
        "not_very" => 1.2,
        _ => 1.0,
    }
}

pub fn recycling_factor(key: &str) -> f64 {
    match key {
        "always" => 0.85,
        "often" => 0.9,
        "sometimes" => 0.95,
        _ => 1.0,
    }
}

pub fn shopping_factor(key: &str) -> f64 {
    match key {
        "most" => 0.9,
        "occasionally" => 0.95,
        _ => 1.0,
    }
}

pub fn device_kwh(key: &str) -> f64 {
    match key {
        "less_2" => 300.0,
        "2_5" => 600.0,
        "5_8" => 1000.0,
        "8plus" => 1500.0,
        _ => 800.0,
    }
}

pub fn food_waste_kg(key: &str) -> f64 {
    match key {
        "almost_none" => 100.0,
        "a_little" => 300.0,
        "some" => 600.0,
        "a_lot" => 1000.0,
        _ => 500.0,
    }
}

/// Per-step contributions looked up from the answer tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakdown {
    pub diet_kg: f64,
    pub transport_kg: f64,
    pub flights_kg: f64,
    /// Energy-source base already scaled by the efficiency factor.
    pub home_kg: f64,
    pub recycling_factor: f64,
    pub shopping_factor: f64,
    pub devices_kg: f64,
    pub food_waste_kg: f64,
}

impl Breakdown {
    pub fn from_answers(answers: &AnswerSet) -> Self {
        Self {
            diet_kg: diet_kg(&answers.meat_dairy),
            transport_kg: transport_kg(&answers.transport),
            flights_kg: flights_kg(&answers.flights),
            home_kg: energy_source_kg(&answers.home_energy_source)
                * efficiency_factor(&answers.home_efficiency),
            recycling_factor: recycling_factor(&answers.recycling),
            shopping_factor: shopping_factor(&answers.sustainable_shopping),
            devices_kg: device_kwh(&answers.device_usage) * GRID_KG_PER_KWH,
            food_waste_kg: food_waste_kg(&answers.food_waste),
        }
    }

    /// Unrounded total. The multiplicative factors apply only to the first
    /// four contributions.
    pub fn raw_total(&self) -> f64 {
        let mut total = 0.0;
        total += self.diet_kg;
        total += self.transport_kg;
        total += self.flights_kg;
        total += self.home_kg;
        total *= self.recycling_factor;
        total *= self.shopping_factor;
        total += self.devices_kg;
        total += self.food_waste_kg;
        total
    }

    /// Final score: floored at zero and rounded to one decimal.
    pub fn total(&self) -> f64 {
        round_one_decimal(self.raw_total().max(0.0))
    }
}

/// Round to one decimal place, deciding on the exact stored binary value.
///
/// Scaling by ten first is itself inexact and can turn 4227.1499... into a
/// tie that then rounds up. Float formatting rounds the exact value, with
/// exact ties going to even.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Score plus the summary used to personalise the narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub carbon_kg: f64,
    pub behavior_summary: String,
    pub breakdown: Breakdown,
}

pub fn score(answers: &AnswerSet) -> f64 {
    Breakdown::from_answers(answers).total()
}

pub fn assess(answers: &AnswerSet) -> Assessment {
    let breakdown = Breakdown::from_answers(answers);
    Assessment {
        carbon_kg: breakdown.total(),
        behavior_summary: behavior_summary(answers),
        breakdown,
    }
}

const DIET_PHRASES: &[(&str, &str)] = &[
    ("less_20", "follows a mostly plant-based diet"),
    ("over_100", "consumes large amounts of meat and dairy"),
];

const TRANSPORT_PHRASES: &[(&str, &str)] = &[
    ("walk_cycle", "walks or cycles daily"),
    ("car_petrol", "relies heavily on petrol cars"),
    ("public", "uses public transport regularly"),
];

const FLIGHT_PHRASES: &[(&str, &str)] = &[
    ("3plus", "flies frequently for travel"),
    ("none", "never flies"),
];

const ENERGY_PHRASES: &[(&str, &str)] = &[
    ("renewable", "powers their home with renewable energy"),
    ("gas_oil", "heats their home with fossil fuels"),
];

const FOOD_WASTE_PHRASES: &[(&str, &str)] = &[
    ("a_lot", "wastes significant amounts of food"),
    ("almost_none", "minimizes food waste"),
];

const RECYCLING_PHRASES: &[(&str, &str)] = &[
    ("always", "recycles diligently"),
    ("rarely", "rarely recycles"),
];

const SHOPPING_PHRASES: &[(&str, &str)] = &[("most", "buys second-hand and sustainable goods")];

/// Matched phrases in rule order, at most one per field.
pub fn behavior_phrases(answers: &AnswerSet) -> Vec<&'static str> {
    let rules: [(&str, &[(&str, &'static str)]); 7] = [
        (answers.meat_dairy.as_str(), DIET_PHRASES),
        (answers.transport.as_str(), TRANSPORT_PHRASES),
        (answers.flights.as_str(), FLIGHT_PHRASES),
        (answers.home_energy_source.as_str(), ENERGY_PHRASES),
        (answers.food_waste.as_str(), FOOD_WASTE_PHRASES),
        (answers.recycling.as_str(), RECYCLING_PHRASES),
        (answers.sustainable_shopping.as_str(), SHOPPING_PHRASES),
    ];

    rules
        .iter()
        .filter_map(|(value, phrases)| {
            phrases
                .iter()
                .find(|(key, _)| key == value)
                .map(|(_, phrase)| *phrase)
        })
        .collect()
}

pub fn behavior_summary(answers: &AnswerSet) -> String {
    let phrases = behavior_phrases(answers);
    if phrases.is_empty() {
        AVERAGE_LIFESTYLE.to_string()
    } else {
        phrases.join("; ")
    }
}
