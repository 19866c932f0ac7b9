use clap::Subcommand;
use logbook_core::ReminderConfiguration;
use logbook_nag::scheduler::{DEFAULT_SNOOZE_MINUTES, MAX_SNOOZE_MINUTES};
use logbook_nag::{
    load_configuration, HistoryLog, KvHistoryStorage, NagDecision, NagScheduler, OutboxNotifier,
    SystemClock,
};
use logbook_store::{with_lock, EntryLog, KvFile, LogbookPaths};
use std::path::Path;
use std::sync::Arc;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum NagCmd {
    /// Check whether today needs a reminder and schedule it
    Check,
    /// Dismiss the in-app reminder (scheduled notifications still fire)
    Dismiss,
    /// Replace pending reminders with a single one later
    Snooze {
        /// Minutes from now
        #[arg(long, default_value_t = DEFAULT_SNOOZE_MINUTES)]
        minutes: u32,
    },
    /// Show recent reminder events, newest first
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List notifications waiting to fire
    Pending,
}

// ── Dispatch ──

pub fn run(cmd: NagCmd, root: &Path) -> anyhow::Result<()> {
    let paths = LogbookPaths::discover(root);
    if !paths.is_initialized() {
        anyhow::bail!("No .logbook/ store found. Run `logbook init` first.");
    }
    match cmd {
        NagCmd::Check => check(&paths),
        NagCmd::Dismiss => dismiss(&paths),
        NagCmd::Snooze { minutes } => snooze(&paths, minutes),
        NagCmd::History { json } => history(&paths, json),
        NagCmd::Pending => pending(&paths),
    }
}

// ── Composition ──

/// The one scheduler instance for this process, wired to the store.
pub(crate) fn open_scheduler(paths: &LogbookPaths) -> NagScheduler {
    let history = HistoryLog::load(KvHistoryStorage::new(KvFile::new(&paths.state_json)));
    NagScheduler::new(
        Arc::new(OutboxNotifier::new(&paths.outbox_json)),
        history,
        Arc::new(SystemClock),
    )
}

fn load_config(paths: &LogbookPaths) -> ReminderConfiguration {
    load_configuration(&KvFile::new(&paths.settings_json))
}

// ── Command Implementations ──

fn check(paths: &LogbookPaths) -> anyhow::Result<()> {
    let config = load_config(paths);
    let (decision, banner) = with_lock(paths, || {
        let mut nag = open_scheduler(paths);
        let entries = EntryLog::new(paths.clone());
        let decision = nag.evaluate_with_entries(&entries, &config);
        Ok((decision, nag.banner().clone()))
    })?;

    match decision {
        None => println!("Could not read today's entries; nothing changed."),
        Some(NagDecision::Disabled) => println!("Reminders are off."),
        Some(NagDecision::AlreadyLogged) => println!("Already logged today. No reminders."),
        Some(NagDecision::BeforeCutoff) => {
            println!("Not yet {:02}:00; checking again later.", config.cutoff_hour)
        }
        Some(NagDecision::Scheduled { count }) => {
            println!("Scheduled {count} reminder(s) ({}).", config.intensity);
            if banner.visible {
                println!();
                println!("  {}", banner.message);
            }
        }
    }
    Ok(())
}

fn dismiss(paths: &LogbookPaths) -> anyhow::Result<()> {
    let still_pending = with_lock(paths, || {
        let mut nag = open_scheduler(paths);
        nag.user_dismissed_nag();
        Ok(nag.pending().len())
    })?;
    println!("Dismissed. {still_pending} scheduled reminder(s) still pending.");
    Ok(())
}

fn snooze(paths: &LogbookPaths, minutes: u32) -> anyhow::Result<()> {
    let config = load_config(paths);
    with_lock(paths, || {
        let mut nag = open_scheduler(paths);
        nag.set_voice(&config);
        nag.user_snoozed_nag(minutes);
        Ok(())
    })?;
    println!(
        "Snoozed for {} minute(s).",
        minutes.clamp(1, MAX_SNOOZE_MINUTES)
    );
    Ok(())
}

fn history(paths: &LogbookPaths, json: bool) -> anyhow::Result<()> {
    let nag = open_scheduler(paths);
    let events = nag.history();
    if json {
        println!("{}", serde_json::to_string_pretty(events)?);
        return Ok(());
    }
    let Some(last) = nag.last_event() else {
        println!("No reminder history.");
        return Ok(());
    };
    println!("Last: {} ({}) at {}\n", last.event_type, last.response, last.timestamp);
    for e in events {
        println!("{}  {:<10} {}", e.timestamp, e.event_type.to_string(), e.response);
    }
    println!("\n({} events)", events.len());
    Ok(())
}

fn pending(paths: &LogbookPaths) -> anyhow::Result<()> {
    let outbox = OutboxNotifier::new(&paths.outbox_json);
    let upcoming = outbox.upcoming()?;
    if upcoming.is_empty() {
        println!("No pending reminders.");
        return Ok(());
    }
    for r in &upcoming {
        println!(
            "{}  {}  {}",
            logbook_core::format_rfc3339(r.fire_at),
            r.id,
            r.body
        );
    }
    Ok(())
}
