use std::time::Duration;

use eyre::{Context, Result, eyre};
use serde::Deserialize;
use serde_json::{Value, json};

const API_BASE: &str = "https://slack.com/api";
const PAGE_LIMIT_MAX: u32 = 1000;

/// One message as returned by `conversations.history` / `conversations.replies`.
///
/// Fields Slack omits (bot posts have no `user`, some events no `text`) default
/// to empty so rendering never has to care.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub text: String,
    pub thread_ts: Option<String>,
    /// Present on automatic/system messages (joins, topic changes, ...).
    pub subtype: Option<String>,
}

/// A channel, DM or multi-party DM as returned by `conversations.list` / `.info`.
#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub is_mpim: bool,
    /// The peer's user id, only meaningful for DMs.
    #[serde(default)]
    pub user: String,
}

#[derive(Deserialize)]
struct ConversationsList {
    #[serde(default)]
    channels: Vec<Conversation>,
}

#[derive(Deserialize)]
struct ConversationInfo {
    channel: Conversation,
}

#[derive(Deserialize)]
struct MessagePage {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct UsersInfo {
    user: UserRecord,
}

#[derive(Deserialize)]
struct UserRecord {
    real_name: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct TeamInfo {
    team: TeamRecord,
}

#[derive(Deserialize)]
struct TeamRecord {
    name: String,
}

/// Thin blocking client for the handful of Slack Web API methods the exporter
/// needs. One instance per workspace credential.
pub struct SlackClient {
    http: reqwest::blocking::Client,
    token: String,
}

impl SlackClient {
    pub fn new(token: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self {
            http,
            token: token.to_string(),
        })
    }

    /// POST to `https://slack.com/api/<method>`, check HTTP status and Slack's
    /// `ok` field, then deserialize the body into the expected shape.
    fn call<T: serde::de::DeserializeOwned>(&self, method: &str, args: &Value) -> Result<T> {
        let resp = self
            .http
            .post(format!("{API_BASE}/{method}"))
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .wrap_err_with(|| format!("{method} request failed"))?;

        if !resp.status().is_success() {
            return Err(eyre!("{method} HTTP {}", resp.status()));
        }

        let body: Value = resp
            .json()
            .wrap_err_with(|| format!("{method} returned invalid JSON"))?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            let code = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            return Err(eyre!("{method} error: {code}"));
        }

        serde_json::from_value(body)
            .wrap_err_with(|| format!("{method} response had an unexpected shape"))
    }

    /// Resolve a user id to a human-readable name:
    /// real name, falling back to display name, falling back to the login name.
    pub fn user_display_name(&self, user_id: &str) -> Result<String> {
        let resp: UsersInfo = self.call("users.info", &json!({ "user": user_id }))?;
        let user = resp.user;
        Ok(user
            .real_name
            .filter(|n| !n.is_empty())
            .or(user.display_name.filter(|n| !n.is_empty()))
            .unwrap_or(user.name))
    }

    /// The workspace (team) display name.
    pub fn team_name(&self) -> Result<String> {
        let resp: TeamInfo = self.call("team.info", &json!({}))?;
        Ok(resp.team.name)
    }

    fn list_page(&self, types: &str) -> Result<Vec<Conversation>> {
        let resp: ConversationsList = self.call(
            "conversations.list",
            &json!({
                "types": types,
                "limit": PAGE_LIMIT_MAX,
                "exclude_archived": false,
            }),
        )?;
        Ok(resp.channels)
    }

    /// Look a conversation up directly by its id.
    pub fn conversation_info(&self, channel_id: &str) -> Result<Conversation> {
        let resp: ConversationInfo =
            self.call("conversations.info", &json!({ "channel": channel_id }))?;
        Ok(resp.channel)
    }

    /// Scan channels and multi-party DMs for an exact name match.
    pub fn find_conversation_by_name(&self, name: &str) -> Result<Option<Conversation>> {
        let channels = self.list_page("public_channel,private_channel,mpim")?;
        Ok(channels.into_iter().find(|c| c.name == name))
    }

    /// One page of channel history, newest first, system messages dropped.
    pub fn channel_messages(&self, channel_id: &str, limit: u32) -> Result<Vec<Message>> {
        let resp: MessagePage = self.call(
            "conversations.history",
            &json!({
                "channel": channel_id,
                "limit": limit.min(PAGE_LIMIT_MAX),
            }),
        )?;
        Ok(without_system_messages(resp.messages))
    }

    /// Replies for one thread, oldest first, without the thread starter and
    /// without system messages.
    pub fn thread_replies(&self, channel_id: &str, thread_ts: &str) -> Result<Vec<Message>> {
        let resp: MessagePage = self.call(
            "conversations.replies",
            &json!({
                "channel": channel_id,
                "ts": thread_ts,
            }),
        )?;
        // First entry is the parent message itself.
        Ok(without_system_messages(
            resp.messages.into_iter().skip(1).collect(),
        ))
    }
}

fn without_system_messages(messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|m| m.subtype.is_none())
        .collect()
}
