use crate::infra::{export_file_name, load_answers, load_survey};
use ai_scan::config::AppConfig;
use ai_scan::error::AppError;
use ai_scan::scan::{ScanResult, ScanScorer, ScoreBand};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;

const WEAKEST_DEFAULT: usize = 5;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Survey definition to score against (defaults to SCAN_SURVEY_PATH or the bundled survey)
    #[arg(long)]
    pub(crate) survey: Option<PathBuf>,
    /// Print the full result as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Number of weakest answered items to list
    #[arg(long, default_value_t = WEAKEST_DEFAULT)]
    pub(crate) weakest: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// JSON file mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Survey definition to score against (defaults to SCAN_SURVEY_PATH or the bundled survey)
    #[arg(long)]
    pub(crate) survey: Option<PathBuf>,
    /// Destination file. Defaults to ai-scan-export_<date>.csv in the working directory.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Date stamped into the default file name (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers,
        survey,
        json,
        weakest,
    } = args;

    let result = score_files(&answers, survey)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    render_scan_report(&result, weakest);
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        answers,
        survey,
        output,
        today,
    } = args;

    let result = score_files(&answers, survey)?;
    let csv = result.to_csv()?;

    let output = output.unwrap_or_else(|| {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        PathBuf::from(export_file_name(today))
    });
    std::fs::write(&output, csv)?;

    println!(
        "Exported {} questions to {}",
        result.heatmap.len(),
        output.display()
    );
    Ok(())
}

fn score_files(answers: &std::path::Path, survey: Option<PathBuf>) -> Result<ScanResult, AppError> {
    let config = AppConfig::load()?;
    let survey_path = survey.or(config.scan.survey_path);
    let survey = load_survey(survey_path.as_deref())?;
    let answers = load_answers(answers)?;
    let scorer = ScanScorer::new(&config.scan.scoring)?;

    Ok(scorer.score(&survey, &answers))
}

fn render_scan_report(result: &ScanResult, weakest: usize) {
    println!("AI maturity scan");
    if !result.has_data() {
        println!("- No scored answers yet; the overall score defaults to 0.");
    }
    println!("- Overall score: {} ({})", result.overall, result.level);

    println!("\nDomains:");
    for domain in &result.domains {
        let score = domain
            .score
            .map_or_else(|| "-".to_string(), |score| score.to_string());
        println!(
            "  - {}: {} [{}] | {}/{} items scored | weight {}",
            domain.title,
            score,
            ScoreBand::for_score(domain.score).label(),
            domain.scored_items(),
            domain.items.len(),
            domain.weight
        );
    }

    let spots = result.weakest_items(weakest);
    if !spots.is_empty() {
        println!("\nWeakest items:");
        for spot in &spots {
            println!(
                "  - {} ({}): {} | {}",
                spot.item_id, spot.domain_title, spot.score, spot.text
            );
            if let Some(explain) = &spot.explain {
                println!("      {explain}");
            }
        }
    }

    println!("\nRecommendations:");
    for recommendation in result.recommendations() {
        println!(
            "  - {}: {}",
            recommendation.domain_title, recommendation.action
        );
    }
}
