#[allow(unused_imports)]
use anyhow::Result;
#[allow(unused_imports)]
use footprint_oracle::{
    clients::{OpenAiClient, TextGenerator},
    config::Config,
    narrative,
};

#[tokio::test]
#[cfg(feature = "live_generation")]
async fn test_openai_story_generation() -> Result<()> {
    footprint_oracle::load_env();

    let config = Config::load()?;
    let Some(client) = OpenAiClient::from_config(&config)? else {
        eprintln!("Skipping live generation test - set OPENAI_API_KEY to run");
        return Ok(());
    };

    let request = narrative::generation_request("never flies; recycles diligently", &config.generation);
    let text = client.generate(&request).await?;
    let (story, tips) = narrative::split_story(&text);

    assert!(!story.is_empty());
    println!("Story: {}", story);
    println!("Tips: {:?}", tips);

    Ok(())
}
