//! Narrative request: prompt construction, reply splitting and the fallback
//! story used whenever generation is unavailable.

use std::{sync::Arc, time::Duration};

use serde::Serialize;

use crate::clients::{GenerationError, GenerationRequest, TextGenerator};
use crate::config::GenerationConfig;

/// Marker the generator is asked to start each tip line with.
pub const TIP_MARKER: char = '•';

pub const FALLBACK_TIPS: [&str; 2] = [
    "• Transition to renewable energy sources for home and transport",
    "• Support local, sustainable food systems and reduce waste",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Generated,
    Fallback,
}

/// Story plus actionable tips shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub story: String,
    pub tips: Vec<String>,
    pub source: NarrativeSource,
}

pub fn build_prompt(behavior_summary: &str) -> String {
    format!(
        "You are a climate storyteller in the year 2050. Imagine a world where every person on Earth \
lived exactly like a specific individual whose lifestyle is described below.

This person: {behavior_summary}.

Based on this collective behavior, describe the state of the planet in 2050 in 120-150 words. \
Include vivid details about:
- Climate and weather patterns
- Cities and infrastructure
- Nature, oceans, and wildlife
- Daily human life and society

Be poetic but grounded in climate science. Write the story as plain paragraphs without bullet points. \
Then end with exactly 2 specific, hopeful actions people could take today to create a better future, \
each on its own line starting with \"{TIP_MARKER} \"."
    )
}

pub fn generation_request(behavior_summary: &str, config: &GenerationConfig) -> GenerationRequest {
    GenerationRequest {
        prompt: build_prompt(behavior_summary),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}

/// Split a reply into the lead story and bullet tips. Text before the first
/// marker is the story; every later non-empty segment is one tip.
pub fn split_story(text: &str) -> (String, Vec<String>) {
    let mut parts = text.split(TIP_MARKER);
    let story = parts.next().unwrap_or_default().trim().to_string();
    let tips = parts
        .map(str::trim)
        .filter(|tip| !tip.is_empty())
        .map(|tip| format!("{TIP_MARKER} {tip}"))
        .collect();
    (story, tips)
}

pub fn fallback_narrative(behavior_summary: &str) -> Narrative {
    let story = format!(
        "In 2050, the world shaped by lifestyles like yours presents a mixed picture. {behavior_summary}.

The climate shows both challenges and opportunities. While some regions face intensified weather patterns, \
global cooperation has led to innovative solutions in renewable energy and sustainable agriculture.

Cities have transformed with green infrastructure, vertical gardens, and efficient public transport systems. \
Nature shows remarkable resilience where conservation efforts have been prioritized.

The future remains unwritten - your choices today shape tomorrow's world."
    );
    Narrative {
        story,
        tips: FALLBACK_TIPS.iter().map(|t| t.to_string()).collect(),
        source: NarrativeSource::Fallback,
    }
}

/// Ask the generator for a narrative, making a single attempt bounded by
/// `config.timeout_ms`. The call runs on its own task so a panicking generator
/// is reported like any other failure. Any failure, or no generator at all,
/// yields the fallback narrative.
pub async fn request_narrative(
    generator: Option<Arc<dyn TextGenerator>>,
    behavior_summary: &str,
    config: &GenerationConfig,
) -> Narrative {
    let Some(generator) = generator else {
        tracing::info!("No text generator configured, using fallback narrative");
        return fallback_narrative(behavior_summary);
    };

    let request = generation_request(behavior_summary, config);
    tracing::debug!(model = generator.model(), "Generating story for: {}", behavior_summary);

    let task = tokio::spawn(async move { generator.generate(&request).await });
    let abort = task.abort_handle();

    let outcome = match tokio::time::timeout(Duration::from_millis(config.timeout_ms), task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(GenerationError::Aborted(join_err.to_string())),
        Err(_) => {
            abort.abort();
            Err(GenerationError::Timeout {
                timeout_ms: config.timeout_ms,
            })
        }
    };

    match outcome {
        Ok(text) => {
            let (story, tips) = split_story(&text);
            tracing::info!(tips = tips.len(), "Story generated successfully");
            Narrative {
                story,
                tips,
                source: NarrativeSource::Generated,
            }
        }
        Err(e) => {
            tracing::warn!("Text generation failed, using fallback narrative: {}", e);
            fallback_narrative(behavior_summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_summary_and_output_shape() {
        let prompt = build_prompt("never flies; recycles diligently");
        assert!(prompt.contains("This person: never flies; recycles diligently."));
        assert!(prompt.contains("120-150 words"));
        assert!(prompt.contains("exactly 2"));
        assert!(prompt.contains("starting with \"• \""));
    }

    #[test]
    fn request_uses_configured_budget() {
        let config = GenerationConfig::default();
        let request = generation_request("lives an average modern lifestyle", &config);
        assert_eq!(request.max_tokens, 250);
        assert_eq!(request.temperature, 0.8);
    }

    #[test]
    fn split_separates_story_and_tips() {
        let text = "The seas rose, but cities adapted.\n\n• Take the train\n• Eat more plants\n";
        let (story, tips) = split_story(text);
        assert_eq!(story, "The seas rose, but cities adapted.");
        assert_eq!(tips, vec!["• Take the train", "• Eat more plants"]);
    }

    #[test]
    fn split_without_marker_keeps_everything_as_story() {
        let (story, tips) = split_story("  Only prose here. \n");
        assert_eq!(story, "Only prose here.");
        assert!(tips.is_empty());
    }

    #[test]
    fn split_skips_empty_segments() {
        let (_, tips) = split_story("Story •  • Plant trees");
        assert_eq!(tips, vec!["• Plant trees"]);
    }

    #[test]
    fn fallback_interpolates_summary_and_has_two_tips() {
        let narrative = fallback_narrative("walks or cycles daily");
        assert!(narrative.story.contains("mixed picture. walks or cycles daily."));
        assert_eq!(narrative.tips, FALLBACK_TIPS.to_vec());
        assert_eq!(narrative.source, NarrativeSource::Fallback);
    }

    struct PanickingGenerator;

    #[async_trait::async_trait]
    impl TextGenerator for PanickingGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
            panic!("model backend crashed");
        }

        fn model(&self) -> &str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn panicking_generator_falls_back() {
        let narrative = request_narrative(
            Some(Arc::new(PanickingGenerator)),
            "never flies",
            &GenerationConfig::default(),
        )
        .await;
        assert_eq!(narrative.source, NarrativeSource::Fallback);
        assert_eq!(narrative.tips, FALLBACK_TIPS.to_vec());
        assert!(narrative.story.contains("never flies"));
    }

    #[tokio::test]
    async fn missing_generator_falls_back() {
        let narrative = request_narrative(None, "never flies", &GenerationConfig::default()).await;
        assert_eq!(narrative.source, NarrativeSource::Fallback);
        assert_eq!(narrative.tips.len(), 2);
    }
}
