use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{Conversation, Message, SlackClient};
use crate::cache::RunCache;
use crate::render::{self, Entry, Thread};
use crate::utils::{self, Credential, ExportConfig, OutputFormat};

/// The main entry point for the export run.
///
/// Scans the credentials in order; every workspace where the requested channel
/// is found produces one output file. A workspace without the channel gets a
/// diagnostic line and the scan moves on.
pub fn execute(config: &ExportConfig, credentials: &[Credential]) -> Result<()> {
    let mut files_written = 0usize;

    for credential in credentials {
        let client = SlackClient::new(&credential.token)?;
        if export_workspace(config, credential, &client)?.is_some() {
            files_written += 1;
        }
    }

    if !config.quiet {
        eprintln!(
            "Done. {} workspace(s) scanned, {} file(s) written.",
            credentials.len(),
            files_written
        );
    }
    Ok(())
}

/// Export the configured channel from one workspace.
/// Returns the written path, or `None` if nothing was written here.
fn export_workspace(
    config: &ExportConfig,
    credential: &Credential,
    client: &SlackClient,
) -> Result<Option<PathBuf>> {
    // Lookups within one workspace are memoized for the rest of this scan.
    let mut cache = RunCache::new();

    let workspace = client
        .team_name()
        .unwrap_or_else(|_| "default_workspace".to_string());

    let Some(conversation) = resolve_conversation(client, &config.channel) else {
        eprintln!(
            "Channel '{}' not found in workspace '{}' ({}).",
            config.channel, workspace, credential.source
        );
        return Ok(None);
    };

    let conversation_name = conversation_display_name(client, &mut cache, &conversation);

    if config.verbose {
        eprintln!(
            "Processing {} (ID: {}) in workspace '{}'",
            conversation_name, conversation.id, workspace
        );
    }

    let messages = client
        .channel_messages(&conversation.id, config.page_limit)
        .unwrap_or_default();
    if messages.is_empty() {
        eprintln!(
            "No messages found for {} or an error occurred.",
            conversation_name
        );
        return Ok(None);
    }

    let pb = progress_bar(config, &conversation_name, messages.len() as u64);

    // History arrives newest first; export oldest to newest.
    let threads = collect_threads(
        client,
        &mut cache,
        &conversation.id,
        messages.iter().rev(),
        &pb,
    );

    let dir = config
        .target_dir
        .join(utils::workspace_dir_name(&workspace));
    fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("Failed to create workspace directory: {}", dir.display()))?;

    let path = dir.join(format!(
        "{}.{}",
        utils::sanitize_name(&conversation_name),
        config.format.extension()
    ));
    let file =
        File::create(&path).wrap_err_with(|| format!("Failed to create: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match config.format {
        OutputFormat::Txt => render::write_txt(&mut writer, &threads),
        OutputFormat::Html => render::write_html(&mut writer, &conversation_name, &threads),
    }
    .wrap_err_with(|| format!("Failed to write: {}", path.display()))?;
    writer.flush().wrap_err("Failed to flush output file")?;

    pb.finish_and_clear();
    pb.println(format!("Messages saved to {}", path.display()));

    Ok(Some(path))
}

/// Resolve the channel argument against this workspace. Slack channel and DM
/// ids start with `C`/`D`; anything else is treated as a name. Lookup failures
/// are reported and treated as "not found here".
fn resolve_conversation(client: &SlackClient, channel: &str) -> Option<Conversation> {
    if channel.starts_with('C') || channel.starts_with('D') {
        match client.conversation_info(channel) {
            Ok(conversation) => Some(conversation),
            Err(e) => {
                eprintln!("Error fetching channel info by ID: {e:#}");
                None
            }
        }
    } else {
        match client.find_conversation_by_name(channel) {
            Ok(found) => found,
            Err(e) => {
                eprintln!("Error fetching channels: {e:#}");
                None
            }
        }
    }
}

/// Channels and multi-party DMs carry their own name; a DM is named after the
/// peer.
fn conversation_display_name(
    client: &SlackClient,
    cache: &mut RunCache,
    conversation: &Conversation,
) -> String {
    if conversation.is_im {
        let peer = cache.display_name(&conversation.user, || {
            client.user_display_name(&conversation.user)
        });
        format!("DM with {}", peer)
    } else {
        conversation.name.clone()
    }
}

/// Resolve authors and thread replies for each message, oldest first, ticking
/// the progress bar once per top-level message.
fn collect_threads<'a>(
    client: &SlackClient,
    cache: &mut RunCache,
    channel_id: &str,
    messages: impl Iterator<Item = &'a Message>,
    pb: &ProgressBar,
) -> Vec<Thread> {
    let mut threads = Vec::new();
    for message in messages {
        let replies = match &message.thread_ts {
            Some(thread_ts) => cache
                .replies(thread_ts, || client.thread_replies(channel_id, thread_ts))
                .to_vec(),
            None => Vec::new(),
        };

        let reply_entries = replies
            .iter()
            .map(|reply| resolve_entry(client, cache, reply))
            .collect();

        threads.push(Thread {
            message: resolve_entry(client, cache, message),
            replies: reply_entries,
        });
        pb.inc(1);
    }
    threads
}

fn resolve_entry(client: &SlackClient, cache: &mut RunCache, message: &Message) -> Entry {
    let author = cache
        .display_name(&message.user, || client.user_display_name(&message.user))
        .to_string();
    Entry {
        when: utils::format_slack_ts(&message.ts),
        author,
        body: message.text.clone(),
    }
}

fn progress_bar(config: &ExportConfig, conversation_name: &str, total: u64) -> ProgressBar {
    if config.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
            )
            .unwrap()
            .progress_chars("=>-"),
        );
        bar.println(format!(
            "Processing {} ({} messages).",
            conversation_name, total
        ));
        bar
    }
}
