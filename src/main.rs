use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use complaint_analyzer::catalog::TopicCatalog;
use complaint_analyzer::lexicon::Lexicon;
use complaint_analyzer::models::{ClassifiedComplaint, RawComplaint};
use complaint_analyzer::preprocess::TextPreprocessor;
use complaint_analyzer::report::AggregatedReport;
use complaint_analyzer::sentiment::SentimentAnalyzer;
use complaint_analyzer::topic::{LdaArtifact, TopicInferenceEngine, Vocabulary};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file of complaints with 'keluhan' and 'tanggal_keluhan' columns
    path: PathBuf,
    /// Directory with the pretrained artifacts (lda.json, vocabulary.json, sentiment.json)
    #[clap(short, long, default_value = "models")]
    models_dir: PathBuf,
    /// CSV slang-normalization dictionary (takbaku,baku); missing file disables normalization
    #[clap(short, long)]
    normalization_dict: Option<PathBuf>,
    /// JSON topic catalog overriding the built-in one
    #[clap(short, long)]
    catalog: Option<PathBuf>,
    #[clap(long, help = "Disable stemming during normalization")]
    no_stemming: bool,
    #[clap(short, long, help = "Show only the aggregated report, not per-complaint results")]
    analysis_only: bool,
    /// Write the aggregated report as JSON to this path
    #[clap(short, long)]
    report_json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    println!("Path: {}", args.path.display());

    let lexicon = match &args.normalization_dict {
        Some(path) => Arc::new(Lexicon::with_normalization_csv(path)),
        None => Arc::new(Lexicon::new()),
    };
    let preprocessor = TextPreprocessor::new(lexicon).with_stemming(!args.no_stemming);

    let vocabulary = Vocabulary::load(&args.models_dir.join("vocabulary.json"))
        .context("loading topic vocabulary")?;
    let lda = LdaArtifact::load(&args.models_dir.join("lda.json"))
        .context("loading topic model")?;
    let engine = TopicInferenceEngine::new(vocabulary, Arc::new(lda));

    let analyzer = SentimentAnalyzer::load(&args.models_dir.join("sentiment.json"));
    if !analyzer.is_available() {
        println!("Sentiment model unavailable; labels will be Unknown");
    }

    let catalog = match &args.catalog {
        Some(path) => TopicCatalog::load(path).context("loading topic catalog")?,
        None => TopicCatalog::default(),
    };

    let complaints = read_complaints(&args.path)
        .with_context(|| format!("reading complaints from {}", args.path.display()))?;
    println!("Parsed {} complaints. Classifying...", complaints.len());

    let results = classify_batch(&complaints, &preprocessor, &engine, &analyzer, &catalog);

    if !args.analysis_only {
        print_results(&results);
    }

    let mut aggregated = AggregatedReport::new();
    for record in &results {
        aggregated.fold(&record.topic_title, record.sentiment);
    }
    print_report(&aggregated);

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&aggregated)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn read_complaints(path: &PathBuf) -> anyhow::Result<Vec<RawComplaint>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut complaints = Vec::new();
    for (i, record) in reader.deserialize::<RawComplaint>().enumerate() {
        match record {
            Ok(complaint) => complaints.push(complaint),
            Err(e) => eprintln!("Skipping malformed row {}: {}", i + 1, e),
        }
    }
    Ok(complaints)
}

/// Classify every complaint: normalize, infer the topic vector for the
/// whole batch at once, then resolve topic labels and sentiment per record.
/// Records are independent; only the fold at the end brings them together.
fn classify_batch(
    complaints: &[RawComplaint],
    preprocessor: &TextPreprocessor,
    engine: &TopicInferenceEngine,
    analyzer: &SentimentAnalyzer,
    catalog: &TopicCatalog,
) -> Vec<ClassifiedComplaint> {
    let token_batch: Vec<Option<Vec<String>>> = complaints
        .iter()
        .map(|c| Some(preprocessor.tokens(&c.text)))
        .collect();
    let vectors = engine.transform(&token_batch);

    complaints
        .iter()
        .zip(token_batch)
        .zip(vectors)
        .map(|((complaint, tokens), vector)| {
            let label = catalog.resolve(&vector);
            // Sentiment runs on the raw text: the classifier pipeline
            // carries its own internal normalization.
            let sentiment = analyzer.classify(&complaint.text);
            ClassifiedComplaint {
                submitted_at: complaint.submitted_at,
                text: complaint.text.clone(),
                tokens: tokens.unwrap_or_default(),
                sentiment,
                topic_title: label.title,
                institutions: label.institutions,
            }
        })
        .collect()
}

fn print_results(results: &[ClassifiedComplaint]) {
    for record in results {
        let date = record
            .submitted_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{}] {} | {} | {} | tokens: {}",
            date,
            record.sentiment.display_name(),
            record.topic_title,
            record.institutions.join(", "),
            record.tokens.join(" "),
        );
    }
}

fn print_report(report: &AggregatedReport) {
    println!("\n=== Aggregated report ===");
    println!("{:<45} {:>8} {:>8}", "Topic", "Negatif", "Netral");
    for (title, counts) in &report.topics {
        println!("{:<45} {:>8} {:>8}", title, counts.negative, counts.neutral);
    }
    println!(
        "\nTotal: {} complaints ({} negatif, {} netral, {:.1}% negative)",
        report.total,
        report.total_negative,
        report.total_neutral,
        report.negative_ratio() * 100.0
    );
}
