use crate::infra::build_screening_service;
use clap::Args;
use risk_screener::config::AppConfig;
use risk_screener::error::AppError;
use risk_screener::telemetry;
use risk_screener::workflows::screening::{
    AnswerDomain, AnswerSet, AssessmentReport, Choice, Coordinate, EmptyReason, LocationQuery,
    Provider, ProviderLookup, QuestionId, RecordingStatus, ScoringEngine, ScreeningSubmission,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Postal code used to look up nearby specialists
    #[arg(long)]
    pub(crate) postal_code: Option<String>,
    /// Print the points contributed by each triggered question
    #[arg(long)]
    pub(crate) show_components: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the points contributed by each triggered question
    #[arg(long)]
    pub(crate) show_components: bool,
}

pub(crate) fn run_questionnaire() {
    println!("Breast cancer risk questionnaire");
    for (index, question) in QuestionId::ordered().into_iter().enumerate() {
        println!("{:>2}. {}", index + 1, question.prompt());
        match question.domain() {
            AnswerDomain::Numeric { min, max } => {
                println!("    [{}] number from {min} to {max}", question.key());
            }
            domain => {
                let choices: Vec<&str> = domain.choices().iter().map(|c| c.label()).collect();
                println!("    [{}] {}", question.key(), choices.join(" / "));
            }
        }
    }
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        postal_code,
        show_components,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let raw = std::fs::read_to_string(&answers)?;
    let answers: AnswerSet = serde_json::from_str(&raw)?;

    let service = build_screening_service(&config)?;
    let outcome = service
        .assess(ScreeningSubmission {
            answers,
            postal_code: LocationQuery::new(postal_code.unwrap_or_default()),
        })
        .await;

    render_report(&outcome.report, show_components);

    match outcome.recording.wait().await {
        RecordingStatus::Recorded => println!("\nAssessment recorded."),
        RecordingStatus::Skipped => println!("\nNo postal code given; assessment not recorded."),
        RecordingStatus::Failed(reason) => {
            println!("\nAssessment could not be recorded: {reason}")
        }
    }

    Ok(())
}

/// Scores the sample respondents against canned provider data; no network or disk access.
pub(crate) fn run_demo(args: DemoArgs) {
    let engine = ScoringEngine::standard();

    println!("Breast cancer risk screener demo");
    for respondent in sample_respondents() {
        let assessment = engine.score(&respondent.answers);
        let query = LocationQuery::new(respondent.postal_code);
        let lookup = sample_lookup(&query);
        let report = AssessmentReport::build(&assessment, &query, &lookup);

        println!("\n=== {} ===", respondent.label);
        render_report(&report, args.show_components);
    }
}

pub(crate) fn render_report(report: &AssessmentReport, show_components: bool) {
    println!("Estimated Risk Score: {}", report.risk_score);
    println!("{}", report.headline);
    println!("Next step: {}", report.next_step);
    println!("{}", gauge_line(report));

    if show_components {
        if report.components.is_empty() {
            println!("No risk factors triggered.");
        } else {
            println!("Contributing factors:");
            for component in &report.components {
                println!(
                    "  +{:<2} {} ({})",
                    component.points,
                    component.question.prompt(),
                    component.notes
                );
            }
        }
    }

    println!("\nNearby Breast Specialists");
    match report.provider_notice() {
        Some(notice) => println!("  {notice}"),
        None => {
            for card in &report.providers {
                println!("  - {}", card.name);
                println!("    {}", card.address);
                println!("    Rating: {}", card.rating);
            }
            if report.providers_found > report.providers.len() {
                println!(
                    "  ({} more found nearby)",
                    report.providers_found - report.providers.len()
                );
            }
        }
    }

    println!("\n{}", report.disclaimer);
}

fn gauge_line(report: &AssessmentReport) -> String {
    let bands: Vec<String> = report
        .gauge
        .bands
        .iter()
        .map(|band| format!("{} {}-{}", band.color, band.from, band.to))
        .collect();
    format!(
        "Gauge: {}/{} [{}]",
        report.gauge.value,
        report.gauge.axis_max,
        bands.join(", ")
    )
}

struct SampleRespondent {
    label: &'static str,
    postal_code: &'static str,
    answers: AnswerSet,
}

fn negative_answers() -> AnswerSet {
    let mut answers = AnswerSet::new();
    for question in QuestionId::ordered() {
        match question {
            QuestionId::BodyMassIndex => answers.insert(question, 23.5),
            QuestionId::LateFirstPregnancy | QuestionId::BreastfedSixMonths => {
                answers.insert(question, Choice::NotApplicable)
            }
            _ => answers.insert(question, Choice::No),
        }
    }
    answers
}

fn sample_respondents() -> Vec<SampleRespondent> {
    vec![
        SampleRespondent {
            label: "Routine screening, no risk factors",
            postal_code: "",
            answers: negative_answers(),
        },
        SampleRespondent {
            label: "Known BRCA carrier",
            postal_code: "50309",
            answers: negative_answers().with(QuestionId::BrcaPositive, Choice::Yes),
        },
        SampleRespondent {
            label: "Family history with new symptoms",
            postal_code: "50309",
            answers: negative_answers()
                .with(QuestionId::FirstDegreeRelative, Choice::Yes)
                .with(QuestionId::NewBreastChanges, Choice::Yes)
                .with(QuestionId::SymptomsOverWeek, Choice::Yes)
                .with(QuestionId::DelayedCare, Choice::Yes)
                .with(QuestionId::BreastfedSixMonths, Choice::No)
                .with(QuestionId::BodyMassIndex, 31.2),
        },
    ]
}

fn sample_lookup(query: &LocationQuery) -> ProviderLookup {
    if query.is_empty() {
        return ProviderLookup::Empty(EmptyReason::NoQuery);
    }

    let providers = [
        ("Mercy Breast Center", "1111 6th Ave, Des Moines", Some(4.7)),
        ("Iowa Methodist Imaging", "1200 Pleasant St, Des Moines", Some(4.2)),
        ("Broadlawns Women's Health", "1801 Hickman Rd, Des Moines", None),
        ("UnityPoint Breast Health", "1415 Woodland Ave, Des Moines", Some(3.9)),
    ]
    .into_iter()
    .map(|(name, address, rating)| Provider {
        name: Some(name.to_string()),
        address: Some(address.to_string()),
        rating,
    })
    .collect();

    ProviderLookup::Found {
        coordinate: Coordinate {
            latitude: 41.5868,
            longitude: -93.625,
        },
        providers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_screener::workflows::screening::{RiskTier, DISPLAY_PROVIDER_LIMIT};

    #[test]
    fn sample_respondents_cover_every_tier() {
        let engine = ScoringEngine::standard();
        let tiers: Vec<RiskTier> = sample_respondents()
            .iter()
            .map(|respondent| engine.score(&respondent.answers).tier)
            .collect();

        assert_eq!(tiers, vec![RiskTier::Low, RiskTier::Moderate, RiskTier::High]);
    }

    #[test]
    fn sample_lookup_skips_empty_postal_codes() {
        let empty = sample_lookup(&LocationQuery::new("  "));
        assert!(empty.providers().is_empty());

        let found = sample_lookup(&LocationQuery::new("50309"));
        let assessment = ScoringEngine::standard().score(&negative_answers());
        let report = AssessmentReport::build(&assessment, &LocationQuery::new("50309"), &found);
        assert_eq!(report.providers.len(), DISPLAY_PROVIDER_LIMIT);
        assert_eq!(report.providers_found, 4);
        assert_eq!(report.providers[2].rating, "N/A");
    }

    #[test]
    fn gauge_line_lists_each_band() {
        let assessment = ScoringEngine::standard().score(&negative_answers());
        let report = AssessmentReport::build(
            &assessment,
            &LocationQuery::default(),
            &sample_lookup(&LocationQuery::default()),
        );

        assert_eq!(
            gauge_line(&report),
            "Gauge: 0/50 [lightgreen 0-9, yellow 10-19, red 20-50]"
        );
    }
}
