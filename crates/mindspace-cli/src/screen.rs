use mindspace_client::scan::HttpScanBackend;
use mindspace_core::models::question::QuestionSet;
use mindspace_core::models::severity::Severity;
use mindspace_core::models::submission::ScanReceipt;
use mindspace_screening::error::ScreeningError;
use mindspace_screening::navigation::BackOutcome;
use mindspace_screening::service::{Screening, SubmitOutcome};
use mindspace_screening::session::{Phase, SessionView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::config::{MindspaceConfig, credentials_from_env};

enum Flow {
    Continue,
    Done,
}

/// Run one screening session on stdin/stdout.
pub async fn run(config: &MindspaceConfig) -> eyre::Result<()> {
    let credentials = credentials_from_env()?;
    let questions = QuestionSet::depression_scan();
    let max_score = questions.max_score();
    let backend = HttpScanBackend::new(&config.api_config());
    info!(endpoint = backend.endpoint(), "scan backend configured");

    let screening = Screening::start(questions, credentials, backend, config.timer_settings());
    let mut updates = screening.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = screening.view();

    println!("Assessment / Depression Scan");
    render(&last);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed; leaving screening");
                    return Ok(());
                };
                if let Flow::Done = handle(&screening, line.trim(), max_score).await {
                    return Ok(());
                }
                last = screening.view();
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let view = updates.borrow_and_update().clone();
                if let Flow::Done = on_update(&last, &view, max_score) {
                    return Ok(());
                }
                last = view;
            }
        }
    }
}

async fn handle(screening: &Screening<HttpScanBackend>, input: &str, max_score: u32) -> Flow {
    let result = match input {
        "0" | "1" | "2" | "3" => {
            let value = input.parse::<u8>().unwrap_or_default();
            screening.select_current(value).await.map(|_| Flow::Continue)
        }
        "n" => screening.next().await.map(|_| Flow::Continue),
        "b" => match screening.back().await {
            Ok(BackOutcome::Exit) => {
                println!("Leaving the assessment.");
                return Flow::Done;
            }
            Ok(BackOutcome::Moved(_)) => Ok(Flow::Continue),
            Err(e) => Err(e),
        },
        "s" => {
            println!("Submitting...");
            match screening.submit().await {
                Ok(SubmitOutcome::Submitted(receipt)) => {
                    print_result(&receipt, max_score);
                    return Flow::Done;
                }
                Ok(SubmitOutcome::Suppressed) => return Flow::Continue,
                Err(e) => Err(e),
            }
        }
        "q" => {
            println!("Assessment abandoned.");
            return Flow::Done;
        }
        "" => return Flow::Continue,
        _ => {
            print_help();
            return Flow::Continue;
        }
    };

    match result {
        Ok(flow) => {
            render(&screening.view());
            flow
        }
        Err(ScreeningError::Backend(e)) => {
            println!("! {e}");
            println!("  Type 's' to try again.");
            Flow::Continue
        }
        Err(e) => {
            println!("! {e}");
            Flow::Continue
        }
    }
}

/// React to changes that did not come from typed input: timer ticks and
/// the forced submission.
fn on_update(last: &SessionView, view: &SessionView, max_score: u32) -> Flow {
    if let Phase::Submitted { receipt } = &view.phase {
        print_result(receipt, max_score);
        return Flow::Done;
    }

    if view.time_expired && !last.time_expired {
        println!("Time is up! Submitting your assessment.");
    }
    if view.error_message != last.error_message
        && let Some(message) = &view.error_message
    {
        println!("! {message}");
        println!("  Type 's' to try again.");
    }
    if view.remaining_secs != last.remaining_secs && should_announce(view) {
        println!("Time left: {}", view.clock);
    }
    Flow::Continue
}

fn should_announce(view: &SessionView) -> bool {
    if view.remaining_secs == 0 {
        return false;
    }
    if view.low_time {
        view.remaining_secs % 5 == 0
    } else {
        view.remaining_secs % 30 == 0
    }
}

fn render(view: &SessionView) {
    let low = if view.low_time { "  (hurry!)" } else { "" };
    println!();
    println!(
        "Question {} of {}    Time left: {}{low}",
        view.question_index + 1,
        view.question_count,
        view.clock
    );
    println!("{}", view.question_text);
    for option in QuestionSet::options() {
        let weight = option.value.weight();
        let marker = if view.selected == Some(weight) { '*' } else { ' ' };
        println!("  {marker}[{weight}] {}", option.label);
    }
    println!("Progress: {}%", view.progress_percent);

    let forward = if view.is_last { "s submit" } else { "n next" };
    println!("Commands: 0-3 answer, {forward}, b back, q quit");
}

fn print_help() {
    println!("Type 0, 1, 2 or 3 to answer, 'n' for the next question,");
    println!("'s' to submit on the last question, 'b' to go back, 'q' to quit.");
}

fn print_result(receipt: &ScanReceipt, max_score: u32) {
    let severity = Severity::assess(receipt.total_score, max_score);
    println!();
    println!("Success! Your score: {}", receipt.total_score);
    println!(
        "Severity: {}%  Status: {}",
        severity.percentage,
        severity.status.label()
    );
    println!("This is a digital screening, not a medical diagnosis.");
    println!("Returning to your dashboard.");
}
