//! One-shot subcommands that call the backend directly and print plain text.

use crate::api::{Gateway, Post, SortBy};
use crate::util::single_line;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List subscribed channels with subscriber counts
    Channels,
    /// Subscribe to a channel and start ingesting it
    Subscribe {
        name: String,
        /// Ingestion window: day or month
        #[arg(long, short, default_value = "day")]
        sort: SortBy,
    },
    /// Ingest every subscribed channel
    IngestAll {
        #[arg(long, short, default_value = "day")]
        sort: SortBy,
    },
    /// Show ingested posts of one channel
    Posts { channel: String },
    /// Search ingested posts across all channels
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

/// Run `command` against `gateway`, writing results to stdout.
pub async fn run(command: Command, gateway: &Gateway) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(command, gateway, &mut out).await
}

async fn execute(command: Command, gateway: &Gateway, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Channels => {
            let channels = gateway
                .list_channels()
                .await
                .context("Failed to load subscriptions")?;
            if channels.is_empty() {
                writeln!(out, "No subscriptions yet.")?;
            }
            for channel in channels {
                writeln!(
                    out,
                    "r/{}\t{} subscribers",
                    single_line(&channel.name),
                    channel.subscriber_count
                )?;
            }
        }
        Command::Subscribe { name, sort } => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Channel name must not be empty");
            }
            let channel = gateway
                .subscribe_and_ingest(name, sort)
                .await
                .with_context(|| format!("Failed to subscribe to r/{name}"))?;
            writeln!(
                out,
                "Subscribed to r/{} ({} subscribers), ingesting top posts of the {}",
                single_line(&channel.name),
                channel.subscriber_count,
                sort
            )?;
        }
        Command::IngestAll { sort } => {
            gateway
                .ingest_all(sort)
                .await
                .context("Failed to ingest all subscriptions")?;
            writeln!(out, "Ingesting all subscriptions ({sort})")?;
        }
        Command::Posts { channel } => {
            let posts = gateway
                .fetch_posts(&channel)
                .await
                .with_context(|| format!("Failed to fetch posts from r/{channel}"))?;
            write_posts(out, &posts)?;
        }
        Command::Search { query } => {
            let query = query.join(" ");
            let posts = gateway
                .search(&query)
                .await
                .context("Failed to search posts")?;
            write_posts(out, &posts)?;
        }
    }
    Ok(())
}

fn write_posts(out: &mut impl Write, posts: &[Post]) -> Result<()> {
    if posts.is_empty() {
        writeln!(out, "No posts found.")?;
        return Ok(());
    }
    for post in posts {
        writeln!(out, "{}", single_line(&post.title))?;
        let channel = post
            .channel
            .as_deref()
            .map(|c| format!("r/{} • ", single_line(c)))
            .unwrap_or_default();
        writeln!(
            out,
            "  {}{} upvotes • {} comments • {}",
            channel,
            post.upvotes,
            post.comment_count,
            single_line(&post.discussion_url)
        )?;
    }
    Ok(())
}
