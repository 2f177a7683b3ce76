//! Survey answers and presence validation.
//!
//! The quiz submits ten categorical answers. Every field must be present and
//! non-empty before anything is scored; the values themselves are not checked
//! against a vocabulary here, the scorer falls back to defaults for unknown keys.

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};

/// Question identifiers in submission order.
pub const QUESTION_FIELDS: [&str; 10] = [
    "meat_dairy",
    "transport",
    "flights",
    "home_energy_source",
    "home_efficiency",
    "recycling",
    "sustainable_shopping",
    "carbon_awareness",
    "device_usage",
    "food_waste",
];

/// Form payload as received; any field may be absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAnswers {
    pub meat_dairy: Option<String>,
    pub transport: Option<String>,
    pub flights: Option<String>,
    pub home_energy_source: Option<String>,
    pub home_efficiency: Option<String>,
    pub recycling: Option<String>,
    pub sustainable_shopping: Option<String>,
    pub carbon_awareness: Option<String>,
    pub device_usage: Option<String>,
    pub food_waste: Option<String>,
}

/// A complete set of answers. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSet {
    pub meat_dairy: String,
    pub transport: String,
    pub flights: String,
    pub home_energy_source: String,
    pub home_efficiency: String,
    pub recycling: String,
    pub sustainable_shopping: String,
    /// Collected by the quiz but not used by scoring or the summary.
    pub carbon_awareness: String,
    pub device_usage: String,
    pub food_waste: String,
}

impl RawAnswers {
    fn slot(&mut self, field: &str) -> Option<&mut Option<String>> {
        let slot = match field {
            "meat_dairy" => &mut self.meat_dairy,
            "transport" => &mut self.transport,
            "flights" => &mut self.flights,
            "home_energy_source" => &mut self.home_energy_source,
            "home_efficiency" => &mut self.home_efficiency,
            "recycling" => &mut self.recycling,
            "sustainable_shopping" => &mut self.sustainable_shopping,
            "carbon_awareness" => &mut self.carbon_awareness,
            "device_usage" => &mut self.device_usage,
            "food_waste" => &mut self.food_waste,
            _ => return None,
        };
        Some(slot)
    }

    /// Set a field by its question identifier. Returns false for unknown fields.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.slot(field) {
            Some(slot) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    fn values(&self) -> [&Option<String>; 10] {
        [
            &self.meat_dairy,
            &self.transport,
            &self.flights,
            &self.home_energy_source,
            &self.home_efficiency,
            &self.recycling,
            &self.sustainable_shopping,
            &self.carbon_awareness,
            &self.device_usage,
            &self.food_waste,
        ]
    }

    /// Fields that are absent or empty, in question order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        QUESTION_FIELDS
            .iter()
            .zip(self.values())
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Validate presence of every field and produce a complete [`AnswerSet`].
    pub fn into_answer_set(self) -> Result<AnswerSet> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(OracleError::Validation {
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        Ok(AnswerSet {
            meat_dairy: self.meat_dairy.unwrap_or_default(),
            transport: self.transport.unwrap_or_default(),
            flights: self.flights.unwrap_or_default(),
            home_energy_source: self.home_energy_source.unwrap_or_default(),
            home_efficiency: self.home_efficiency.unwrap_or_default(),
            recycling: self.recycling.unwrap_or_default(),
            sustainable_shopping: self.sustainable_shopping.unwrap_or_default(),
            carbon_awareness: self.carbon_awareness.unwrap_or_default(),
            device_usage: self.device_usage.unwrap_or_default(),
            food_waste: self.food_waste.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> RawAnswers {
        let mut raw = RawAnswers::default();
        for field in QUESTION_FIELDS {
            assert!(raw.set(field, "x"));
        }
        raw
    }

    #[test]
    fn complete_form_has_no_missing_fields() {
        let raw = full();
        assert!(raw.missing_fields().is_empty());
        let answers = raw.into_answer_set().unwrap();
        assert_eq!(answers.flights, "x");
    }

    #[test]
    fn absent_and_empty_fields_are_reported_in_order() {
        let mut raw = full();
        raw.food_waste = None;
        raw.flights = Some(String::new());
        assert_eq!(raw.missing_fields(), vec!["flights", "food_waste"]);

        match raw.into_answer_set() {
            Err(OracleError::Validation { missing }) => {
                assert_eq!(missing, vec!["flights", "food_waste"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn carbon_awareness_is_still_required() {
        let mut raw = full();
        raw.carbon_awareness = None;
        assert_eq!(raw.missing_fields(), vec!["carbon_awareness"]);
    }

    #[test]
    fn set_rejects_unknown_field() {
        let mut raw = RawAnswers::default();
        assert!(!raw.set("favourite_colour", "green"));
        assert_eq!(raw.missing_fields().len(), QUESTION_FIELDS.len());
    }
}
