//! services/portal/src/bin/portal.rs

use chrono::{Local, NaiveDateTime, Weekday};
use clap::{Parser, Subcommand};
use portal_lib::{
    adapters::FileStore,
    config::Config,
    dashboard::{Collaborators, Dashboard, Tab},
    error::AppError,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutor_portal_core::availability::WeeklySchedule;
use tutor_portal_core::domain::{weekday_name, Session};
use tutor_portal_core::views::{
    allocation_board, card_badge, history, toggle_subject, upcoming, CatalogFilter, Countdown,
    SessionOverview,
};
use tutor_portal_core::{PortalError, SyncOutcome};

#[derive(Parser, Debug)]
#[command(name = "portal", version, about = "Tutor dashboard over the remote session sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in with a contact number. Prompts for the password when omitted.
    Login {
        contact: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and clear the saved state.
    Logout,
    /// Summary counts and the next session.
    Overview,
    /// Upcoming sessions, or completed ones with `--history`.
    Sessions {
        #[arg(long)]
        history: bool,
    },
    /// Record attendance for a session and complete it.
    Attend {
        session_id: String,
        /// Students present; everyone when omitted.
        #[arg(long = "present")]
        present: Vec<String>,
        /// Rating (1-5) applied to every present student.
        #[arg(long, default_value_t = 0)]
        rating: u8,
        #[arg(long, default_value = "")]
        review: String,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        started: Option<String>,
        #[arg(long)]
        ended: Option<String>,
        /// Re-read attached files first, e.g. after uploading a session proof.
        #[arg(long)]
        refresh_files: bool,
    },
    /// Allocations grouped by status.
    Allocations {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show or edit the weekly availability.
    Availability {
        /// A slot to add, as `mon=09:00-10:00`.
        #[arg(long)]
        add: Vec<String>,
        /// A slot to remove, as `mon=0` (day and slot index).
        #[arg(long)]
        remove: Vec<String>,
    },
    /// Browse the subject catalog or change the selected subjects.
    Subjects {
        #[arg(long, default_value = "")]
        search: String,
        /// Subject ids to select or deselect.
        #[arg(long)]
        toggle: Vec<String>,
    },
    /// Change the sign-in password.
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Flip between Active and Inactive.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    info!("Configuration loaded. State file: {}", config.state_path.display());

    // --- 2. Wire the Remote Adapters & Restore State ---
    let client = reqwest::Client::builder().build()?;
    let remote = Collaborators::from_endpoints(&config.endpoints, client);
    let store = Arc::new(FileStore::open(&config.state_path));
    let mut dashboard = Dashboard::restore(remote, store, config.failure_policy);

    // --- 3. Run the Command ---
    match cli.command {
        Commands::Login { contact, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            dashboard.login(&contact, &password).await?;
            println!("Welcome, {}.", dashboard.profile().name);
        }
        Commands::Logout => {
            dashboard.logout();
            println!("Signed out.");
        }
        Commands::Overview => {
            load(&mut dashboard, Tab::Dashboard).await?;
            let now = Local::now().naive_local();
            let overview = SessionOverview::compute(dashboard.sessions(), dashboard.allocations(), now);
            println!("Pending sessions:    {}", overview.pending);
            println!("Completed today:     {}", overview.completed_today);
            println!("Next 7 days:         {}", overview.next_week);
            println!("Active students:     {}", overview.active_students);
            match overview.next_session {
                Some(session) => println!("Next: {}", session_line(session, now)),
                None => println!("No upcoming sessions."),
            }
        }
        Commands::Sessions { history: completed } => {
            let tab = if completed { Tab::History } else { Tab::Upcoming };
            load(&mut dashboard, tab).await?;
            let now = Local::now().naive_local();
            let listed = if completed {
                history(dashboard.sessions())
            } else {
                upcoming(dashboard.sessions())
            };
            if listed.is_empty() {
                println!("No sessions.");
            }
            for session in listed {
                println!("{}", session_line(session, now));
            }
        }
        Commands::Attend {
            session_id,
            present,
            rating,
            review,
            topic,
            started,
            ended,
            refresh_files,
        } => {
            load(&mut dashboard, Tab::Upcoming).await?;
            let mut sheet = dashboard.open_attendance(&session_id).await?;
            if refresh_files {
                dashboard.refresh_session_files(&mut sheet).await?;
            }
            if !sheet.is_locked() {
                if present.is_empty() {
                    sheet.set_all_attendance(true).map_err(PortalError::from)?;
                } else {
                    sheet.set_all_attendance(false).map_err(PortalError::from)?;
                    for id in &present {
                        sheet.set_attendance(id, true).map_err(PortalError::from)?;
                    }
                }
                sheet.apply_bulk(rating, &review).map_err(PortalError::from)?;
                if let Some(topic) = topic {
                    sheet.set_topic(&topic).map_err(PortalError::from)?;
                }
                let started = started.unwrap_or_else(|| sheet.started_time.clone());
                let ended = ended.unwrap_or_else(|| sheet.ended_time.clone());
                sheet.set_times(&started, &ended).map_err(PortalError::from)?;
            }
            let outcome = dashboard.save_attendance(&sheet).await?;
            report(&outcome, "Session completed.");
        }
        Commands::Allocations { search } => {
            load(&mut dashboard, Tab::Allocation).await?;
            for group in allocation_board(dashboard.allocations(), &search) {
                println!("{} ({})", group.status, group.allocations.len());
                for allocation in group.allocations {
                    println!(
                        "  {}  {}  {} {}-{}  {}",
                        allocation.assign_id,
                        allocation.subject_label.as_deref().unwrap_or(&allocation.subject_id),
                        allocation.days,
                        allocation.start_time,
                        allocation.end_time,
                        allocation.student_display_names().join(", "),
                    );
                }
            }
        }
        Commands::Availability { add, remove } => {
            require_sign_in(&dashboard)?;
            dashboard.set_active_tab(Tab::Availability);
            let original = dashboard.load_availability().await;
            let mut schedule = original.clone();
            for slot in &remove {
                let (day, index) = parse_removal(slot)?;
                schedule.remove_slot(day, index);
            }
            for slot in &add {
                let (day, start, end) = parse_addition(slot)?;
                schedule.add_slot(day);
                let index = schedule.day(day).len().saturating_sub(1);
                schedule
                    .update_slot(day, index, &start, &end)
                    .map_err(PortalError::from)?;
            }
            let schedule = if add.is_empty() && remove.is_empty() {
                original
            } else {
                dashboard.save_availability(&original, &schedule).await?
            };
            print_schedule(&schedule);
        }
        Commands::Subjects { search, toggle } => {
            require_sign_in(&dashboard)?;
            let catalog = dashboard.subject_catalog().await;
            if !toggle.is_empty() {
                let mut selection = dashboard.profile().subjects.clone();
                for id in &toggle {
                    toggle_subject(&mut selection, id);
                }
                let outcome = dashboard.update_subjects(selection).await;
                report(&outcome, "Subjects saved.");
            }
            let selected = &dashboard.profile().subjects;
            for item in CatalogFilter::searching(search).apply(&catalog) {
                let mark = if selected.contains(&item.id) { "*" } else { " " };
                println!("{} {}  {}  {} / {} / {}", mark, item.id, item.name, item.category, item.board, item.level);
            }
        }
        Commands::Password { current, new, confirm } => {
            require_sign_in(&dashboard)?;
            dashboard.change_password(&current, &new, &confirm).await?;
            println!("Password changed.");
        }
        Commands::Status => {
            require_sign_in(&dashboard)?;
            let status = dashboard.toggle_status();
            println!("Status is now {:?}.", status);
        }
    }

    Ok(())
}

fn require_sign_in(dashboard: &Dashboard) -> Result<(), AppError> {
    if dashboard.is_authenticated() {
        Ok(())
    } else {
        Err(PortalError::ValidationFailure("Please sign in first with `portal login`.".to_string()).into())
    }
}

async fn load(dashboard: &mut Dashboard, tab: Tab) -> Result<(), AppError> {
    require_sign_in(dashboard)?;
    dashboard.set_active_tab(tab);
    dashboard.bootstrap().await;
    Ok(())
}

fn prompt(label: &str) -> Result<String, AppError> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", label)?;
    stderr.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn session_line(session: &Session, now: NaiveDateTime) -> String {
    let badge = card_badge(session, now);
    let id = if badge.id_visible { session.id.as_str() } else { "(hidden)" };
    let countdown = match badge.countdown {
        Some(Countdown::UntilReveal(minutes)) => format!("  starts in {} min", minutes),
        Some(Countdown::ActiveNow) => "  in progress".to_string(),
        None => String::new(),
    };
    format!(
        "{}  {}  {} ({} min)  {}  [{}]{}",
        session.start_time,
        id,
        session.subject,
        session.duration_minutes,
        session.class_name,
        session.status,
        countdown
    )
}

fn report(outcome: &SyncOutcome, done: &str) {
    match outcome {
        SyncOutcome::Synced | SyncOutcome::Skipped => println!("{}", done),
        SyncOutcome::KeptLocal { error } => println!("{} Saved locally only: {}", done, error),
        SyncOutcome::Reverted { error } => println!("Change reverted: {}", error),
    }
}

fn print_schedule(schedule: &WeeklySchedule) {
    for day in &schedule.days {
        let slots: Vec<String> = day.slots.iter().map(|s| format!("{}-{}", s.start, s.end)).collect();
        let slots = if slots.is_empty() { "-".to_string() } else { slots.join(", ") };
        println!("{:<10} {}", weekday_name(day.day), slots);
    }
}

fn invalid(slot: &str, expected: &str) -> AppError {
    PortalError::ValidationFailure(format!("Invalid slot '{}', expected {}", slot, expected)).into()
}

fn parse_day(raw: &str, slot: &str, expected: &str) -> Result<Weekday, AppError> {
    raw.trim().parse::<Weekday>().map_err(|_| invalid(slot, expected))
}

fn parse_addition(slot: &str) -> Result<(Weekday, String, String), AppError> {
    const EXPECTED: &str = "DAY=HH:MM-HH:MM";
    let (day, range) = slot.split_once('=').ok_or_else(|| invalid(slot, EXPECTED))?;
    let (start, end) = range.split_once('-').ok_or_else(|| invalid(slot, EXPECTED))?;
    Ok((parse_day(day, slot, EXPECTED)?, start.trim().to_string(), end.trim().to_string()))
}

fn parse_removal(slot: &str) -> Result<(Weekday, usize), AppError> {
    const EXPECTED: &str = "DAY=INDEX";
    let (day, index) = slot.split_once('=').ok_or_else(|| invalid(slot, EXPECTED))?;
    let index = index.trim().parse().map_err(|_| invalid(slot, EXPECTED))?;
    Ok((parse_day(day, slot, EXPECTED)?, index))
}
