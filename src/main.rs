use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use learnframe_client::api::{ApiClient, CourseQuery};
use learnframe_client::config::ClientConfig;
use learnframe_client::error::{AuthError, Error};
use learnframe_client::session::{FileSessionStore, SessionStore};
use learnframe_client::signup::{QuestionKind, SignupWizard, default_flow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::from_env();
    let session_file = std::env::var("LEARNFRAME_SESSION_FILE")
        .unwrap_or_else(|_| ".learnframe-session.json".to_string());

    let store = Arc::new(FileSessionStore::new(session_file));
    let client = ApiClient::new(&config, store.clone());

    let command = std::env::args().nth(1);
    let result = match command.as_deref() {
        Some("login") => run_login(&client).await,
        Some("signup") => run_signup(&client).await,
        Some("courses") => run_courses(&client, std::env::args().nth(2)).await,
        Some("whoami") => {
            match store.get().await {
                Some(s) => println!("{} <{}> ({})", s.user.name, s.user.email, s.user_type),
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Some("logout") => {
            client.logout().await;
            println!("Logged out.");
            Ok(())
        }
        _ => {
            eprintln!("LearnFrame v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("Usage: learnframe <login|signup|courses|whoami|logout>");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
    Ok(())
}

/// Translate errors for the terminal. `SessionExpired` is an expected
/// lifecycle event: the session is already cleared, the user just needs to
/// log in again.
fn report(error: &anyhow::Error) {
    match error.downcast_ref::<Error>() {
        Some(Error::Auth(AuthError::SessionExpired)) => {
            eprintln!("Your session has expired. Run `learnframe login` to sign in again.");
        }
        _ => eprintln!("Error: {error}"),
    }
}

async fn run_login(client: &ApiClient) -> anyhow::Result<()> {
    let mut lines = stdin_lines();
    let email = prompt(&mut lines, "Email").await?;
    let password = prompt(&mut lines, "Password").await?;

    let session = client.login(&email, &password).await?;
    println!(
        "Welcome back, {}! Signed in as {}.",
        session.user.name, session.user_type
    );
    Ok(())
}

async fn run_courses(client: &ApiClient, educator_id: Option<String>) -> anyhow::Result<()> {
    let query = CourseQuery {
        educator_id,
        is_published: Some(true),
    };
    let courses = client.get_courses(&query).await?;
    if courses.is_empty() {
        println!("No published courses found.");
        return Ok(());
    }
    for course in courses {
        println!(
            "{}  {}  (₹{}, ★{:.1}, {} enrolled)",
            course.course_id, course.title, course.price, course.star_rating,
            course.enrollment_count
        );
    }
    Ok(())
}

async fn run_signup(client: &ApiClient) -> anyhow::Result<()> {
    let mut lines = stdin_lines();
    let mut wizard = SignupWizard::new(default_flow());

    println!("{}\n", wizard.flow().welcome_message);

    // Role selection
    loop {
        for (i, role) in wizard.flow().roles.iter().enumerate() {
            println!("  {}. {}", i + 1, role.label);
        }
        let choice = prompt(&mut lines, "Role").await?;
        let role_id = choice
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| wizard.flow().roles.get(i))
            .map(|r| r.id.clone());
        match role_id {
            Some(id) => {
                wizard.select_role(&id)?;
                break;
            }
            None => println!("Please enter a number from the list."),
        }
    }

    // Basic info
    loop {
        for (field, label) in [
            ("name", "Full name"),
            ("email", "Email"),
            ("password", "Password"),
            ("confirmPassword", "Confirm password"),
        ] {
            let value = prompt(&mut lines, label).await?;
            wizard.set_text(field, &value);
        }
        match wizard.next() {
            Ok(_) => break,
            Err(e) => println!("{e}\n"),
        }
    }

    // Dynamic questions
    let questions = wizard.questions().to_vec();
    for question in &questions {
        println!("\n{}", question.label);
        match &question.kind {
            QuestionKind::Text => {
                let value = prompt(&mut lines, "Answer").await?;
                if !value.is_empty() {
                    wizard.set_text(&question.id, &value);
                }
            }
            QuestionKind::Number { min, max } => {
                if let (Some(min), Some(max)) = (min, max) {
                    println!("  ({min}–{max})");
                }
                let value = prompt(&mut lines, "Answer").await?;
                wizard.set_number_input(&question.id, &value)?;
            }
            QuestionKind::Select { .. } => {
                let options = wizard.offered_options(question).to_vec();
                for (i, option) in options.iter().enumerate() {
                    println!("  {}. {option}", i + 1);
                }
                let choice = prompt(&mut lines, "Choice").await?;
                if let Some(option) = pick(&options, &choice) {
                    wizard.set_text(&question.id, option);
                }
            }
            QuestionKind::Multiselect { .. } => {
                let options = wizard.offered_options(question).to_vec();
                if options.is_empty() {
                    continue;
                }
                for (i, option) in options.iter().enumerate() {
                    println!("  {}. {option}", i + 1);
                }
                let choices = prompt(&mut lines, "Choices (comma-separated)").await?;
                for choice in choices.split(',') {
                    if let Some(option) = pick(&options, choice.trim()) {
                        wizard.toggle_option(&question.id, option)?;
                    }
                }
            }
        }
    }
    wizard.next()?;

    // Review
    println!("\nReview your information:");
    for (label, value) in wizard.review_entries() {
        println!("  {label}: {value}");
    }
    if let Some(summary) = wizard.render_summary() {
        println!("\n{summary}");
    }

    let confirm = prompt(&mut lines, "\nCreate account? [y/N]").await?;
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Aborted.");
        return Ok(());
    }

    let submission = wizard.build_submission()?;
    let session = client.submit_signup(&submission).await?;
    println!(
        "Account created. Welcome to LearnFrame, {}! ({})",
        session.user.name, session.user_type
    );
    Ok(())
}

// ── Terminal helpers ────────────────────────────────────────────────

fn stdin_lines() -> Lines<BufReader<Stdin>> {
    BufReader::new(tokio::io::stdin()).lines()
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    use std::io::Write;
    print!("{label}: ");
    std::io::stdout().flush()?;
    let line = lines.next_line().await?.context("stdin closed")?;
    Ok(line.trim().to_string())
}

/// Resolve a 1-based numeric choice against an option list.
fn pick<'a>(options: &'a [String], choice: &str) -> Option<&'a str> {
    choice
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| options.get(i))
        .map(String::as_str)
}
