use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use complaint_analyzer::catalog::TopicCatalog;
use complaint_analyzer::lexicon::Lexicon;
use complaint_analyzer::preprocess::TextPreprocessor;
use complaint_analyzer::sentiment::SentimentAnalyzer;
use complaint_analyzer::topic::{dominant_topic, LdaArtifact, TopicInferenceEngine, Vocabulary};

/// Analyze a single complaint text: sentiment, dominant topic and the
/// institutions that own it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The complaint text to analyze
    text: String,
    #[clap(short, long, default_value = "models")]
    models_dir: PathBuf,
    #[clap(short, long)]
    normalization_dict: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let lexicon = match &args.normalization_dict {
        Some(path) => Arc::new(Lexicon::with_normalization_csv(path)),
        None => Arc::new(Lexicon::new()),
    };
    let preprocessor = TextPreprocessor::new(lexicon);

    let vocabulary = Vocabulary::load(&args.models_dir.join("vocabulary.json"))
        .context("loading topic vocabulary")?;
    let lda = LdaArtifact::load(&args.models_dir.join("lda.json"))
        .context("loading topic model")?;
    let engine = TopicInferenceEngine::new(vocabulary, Arc::new(lda));
    let analyzer = SentimentAnalyzer::load(&args.models_dir.join("sentiment.json"));
    let catalog = TopicCatalog::default();

    let tokens = preprocessor.tokens(&args.text);
    let vector = engine.transform_one(&tokens);
    let label = catalog.resolve(&vector);
    let sentiment = analyzer.classify(&args.text);

    println!("Text:        {}", args.text);
    println!("Tokens:      {}", tokens.join(" "));
    println!("Sentiment:   {}", sentiment.display_name());
    println!(
        "Topic:       {} (index {})",
        label.title,
        dominant_topic(&vector) + 1
    );
    println!("Institution: {}", label.institutions.join(", "));

    Ok(())
}
