use clap::Subcommand;
use logbook_core::hashtag::{extract_hashtags, unique_hashtags};
use logbook_store::{EntryLog, LogbookPaths};
use std::path::Path;

#[derive(Subcommand)]
pub enum TagsCmd {
    /// Print the hashtags found in a piece of text
    Extract {
        /// Text to scan
        text: String,
    },
    /// Every distinct hashtag used across all entries, sorted
    List,
}

pub fn run(cmd: TagsCmd, root: &Path) -> anyhow::Result<()> {
    match cmd {
        TagsCmd::Extract { text } => {
            for tag in extract_hashtags(&text) {
                println!("{tag}");
            }
            Ok(())
        }
        TagsCmd::List => list(root),
    }
}

fn list(root: &Path) -> anyhow::Result<()> {
    let paths = LogbookPaths::discover(root);
    let entries = EntryLog::new(paths).list()?;
    let tags = unique_hashtags(entries.iter().map(|e| e.text.as_str()));
    if tags.is_empty() {
        println!("No hashtags yet.");
        return Ok(());
    }
    for tag in &tags {
        let uses = entries
            .iter()
            .filter(|e| e.tag_list().contains(tag))
            .count();
        println!("{tag:<24} {uses}");
    }
    Ok(())
}
