//! # slack-chat-export
//!
//! A CLI tool that exports Slack conversation history to local text or HTML files.
//!
//! ## What it does
//!
//! Given a channel name or id, the tool asks the Slack Web API for one page of
//! that conversation's history, resolves author names and thread replies, and
//! writes the messages to `<target>/<workspace>/<channel>.txt` (or `.html`).
//! Slack's inline link markup (`<url|label>`) is rewritten into readable text
//! or real anchor tags on the way out.
//!
//! ## Multiple workspaces
//!
//! Every `SLACK_BOT_TOKEN` / `SLACK_BOT_TOKEN_<suffix>` environment variable is
//! treated as one workspace credential. The workspaces are scanned in order and
//! each one that can see the channel produces its own file, under its own
//! workspace directory. A `.env` file in the working directory is honored.
//!
//! ## Usage
//!
//! ```sh
//! # Export #general as text into the current directory
//! slack-chat-export -n general
//!
//! # Export a channel by id as HTML into ~/slack-archive
//! slack-chat-export -n C0123456789 -t html ~/slack-archive
//! ```
//!
//! Preferences can be persisted in `~/.config/slack-chat-export/config.toml`.
//!
//! ## Limitations
//!
//! Exports a single history page (up to 1000 messages) per conversation; there
//! is no pagination, no retry, and nothing is persisted between runs.

pub mod api;
pub mod cache;
pub mod export;
pub mod links;
pub mod render;
pub mod utils;
