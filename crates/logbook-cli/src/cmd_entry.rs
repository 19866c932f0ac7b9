use clap::Subcommand;
use logbook_core::entry::{new_entry, Entry, EntryKind, NewEntry};
use logbook_core::summary::summarize_payments;
use logbook_nag::{Clock, SystemClock};
use logbook_store::{with_lock, EntryLog, LogbookPaths};
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum EntryCmd {
    /// Log a task, note or payment
    Add {
        /// Entry text; #hashtags are picked up automatically
        text: String,
        /// task, note or payment
        #[arg(long, default_value = "note")]
        kind: String,
        /// Client the entry belongs to
        #[arg(long)]
        client: Option<String>,
        /// Amount (payments only)
        #[arg(long)]
        amount: Option<f64>,
    },
    /// List entries, newest first
    List {
        /// Only entries for this client
        #[arg(long)]
        client: Option<String>,
        /// Only entries carrying this hashtag (with or without '#')
        #[arg(long)]
        tag: Option<String>,
        /// Maximum number of entries to show (0 = unlimited)
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Payment totals, overall and per client
    Summary,
}

pub struct ListParams<'a> {
    pub client: Option<&'a str>,
    pub tag: Option<&'a str>,
    pub limit: usize,
    pub json: bool,
}

// ── Dispatch ──

pub fn run(cmd: EntryCmd, root: &Path) -> anyhow::Result<()> {
    let paths = LogbookPaths::discover(root);
    if !paths.is_initialized() {
        anyhow::bail!("No .logbook/ store found. Run `logbook init` first.");
    }
    match cmd {
        EntryCmd::Add {
            text,
            kind,
            client,
            amount,
        } => add(&paths, &text, &kind, client.as_deref(), amount).map(|_| ()),
        EntryCmd::List {
            client,
            tag,
            limit,
            json,
        } => list(
            &paths,
            &ListParams {
                client: client.as_deref(),
                tag: tag.as_deref(),
                limit,
                json,
            },
        ),
        EntryCmd::Summary => summary(&paths),
    }
}

// ── Command Implementations ──

pub fn add(
    paths: &LogbookPaths,
    text: &str,
    kind: &str,
    client: Option<&str>,
    amount: Option<f64>,
) -> anyhow::Result<Entry> {
    let kind: EntryKind = kind.parse()?;
    let entry = new_entry(
        &NewEntry {
            kind,
            client,
            text,
            amount,
        },
        SystemClock.now(),
    )?;

    with_lock(paths, || {
        EntryLog::new(paths.clone()).append(&entry)?;
        // Logging anything settles today's reminders.
        crate::cmd_nag::open_scheduler(paths).user_logged_entry();
        Ok(())
    })?;

    println!("Logged {} {}", entry.kind.to_string().to_uppercase(), entry.id);
    if !entry.tags.is_empty() {
        println!("  tags: {}", entry.tag_list().join(" "));
    }
    Ok(entry)
}

fn matches_filter(entry: &Entry, params: &ListParams<'_>) -> bool {
    if let Some(c) = params.client {
        if !entry
            .client
            .as_deref()
            .is_some_and(|ec| ec.eq_ignore_ascii_case(c))
        {
            return false;
        }
    }
    if let Some(t) = params.tag {
        let wanted = if t.starts_with('#') {
            t.to_string()
        } else {
            format!("#{t}")
        };
        if !entry.tag_list().contains(&wanted) {
            return false;
        }
    }
    true
}

pub fn list(paths: &LogbookPaths, params: &ListParams<'_>) -> anyhow::Result<()> {
    let entries = EntryLog::new(paths.clone()).list()?;
    let mut matched: Vec<&Entry> = entries
        .iter()
        .rev() // newest first
        .filter(|e| matches_filter(e, params))
        .collect();

    if params.limit > 0 {
        matched.truncate(params.limit);
    }

    if matched.is_empty() {
        println!("No entries match the filter.");
        return Ok(());
    }

    if params.json {
        for e in &matched {
            println!("{}", serde_json::to_string(e)?);
        }
    } else {
        for e in &matched {
            print_entry_line(e);
        }
        println!("\n({} entries shown)", matched.len());
    }
    Ok(())
}

fn print_entry_line(e: &Entry) {
    let client = e.client.as_deref().unwrap_or("-");
    let amount = e.amount.map(|a| format!(" {a:.2}")).unwrap_or_default();
    println!(
        "{}  {:<8} {:<14} {}{}",
        e.created_at,
        e.kind.to_string(),
        client,
        e.text,
        amount
    );
}

fn summary(paths: &LogbookPaths) -> anyhow::Result<()> {
    let entries = EntryLog::new(paths.clone()).list()?;
    let s = summarize_payments(&entries);
    if s.count == 0 {
        println!("No payments logged.");
        return Ok(());
    }
    println!("{} payment(s), total {:.2}", s.count, s.total);
    for (client, total) in &s.by_client {
        println!("  {client:<20} {total:>12.2}");
    }
    if let Some((client, total)) = s.top_client() {
        println!("Top client: {client} ({total:.2})");
    }
    Ok(())
}
