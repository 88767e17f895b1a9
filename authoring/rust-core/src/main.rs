use anyhow::{bail, Context};
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lessonlab_core::config::Config;
use lessonlab_core::models::lesson::{LessonDetail, LessonDraft};
use lessonlab_core::services::{keyword_import, normalizer, validation};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lessonlab_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load configuration")?;

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("validate") => {
            let path = args.get(2).context("usage: lessonlab-core validate <lesson.json>")?;
            validate_file(path)
        }
        Some("import") => {
            let path = args.get(2).context("usage: lessonlab-core import <keywords.csv>")?;
            import_file(path, &config)
        }
        Some("template") => {
            print!("{}", keyword_import::template_csv());
            Ok(())
        }
        _ => {
            eprintln!("usage: lessonlab-core <validate|import|template> [file]");
            std::process::exit(2);
        }
    }
}

/// Checks a lesson JSON export the way the commit action would.
fn validate_file(path: &str) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let detail: LessonDetail =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path))?;

    let mut draft = LessonDraft::from_detail(&detail);
    normalizer::apply_to_draft(&mut draft);

    let errors = validation::validate(&draft);
    for warning in validation::audio_warnings(&draft) {
        tracing::warn!("{}", warning);
    }
    if errors.is_empty() {
        tracing::info!(lesson_id = %detail.lesson.id, "lesson is valid");
        return Ok(());
    }
    for (field, message) in &errors {
        eprintln!("{}: {}", field, message);
    }
    bail!("lesson failed validation with {} error(s)", errors.len());
}

fn import_file(path: &str, config: &Config) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let report = keyword_import::import_keywords(&text, config.max_import_rows)
        .context("Keyword import failed")?;

    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!(
        imported = report.keywords.len(),
        skipped = report.skipped,
        "keyword import finished"
    );
    println!("{}", serde_json::to_string_pretty(&report.keywords)?);
    Ok(())
}
