//! End-to-end checks for the file-writing side of an export: directory layout,
//! filename sanitization, and the rendered bodies, using a throwaway directory.

use std::fs::{self, File};
use std::io::BufWriter;

use slack_chat_export::render::{self, Entry, Thread};
use slack_chat_export::utils::{self, OutputFormat};

fn sample_threads() -> Vec<Thread> {
    vec![
        Thread {
            message: Entry {
                when: "2023-11-14 22:13:20 UTC".to_string(),
                author: "Ada Lovelace".to_string(),
                body: "kickoff notes: <https://docs.example.com/plan|the plan>".to_string(),
            },
            replies: vec![Entry {
                when: "2023-11-14 22:20:00 UTC".to_string(),
                author: "Grace Hopper".to_string(),
                body: "on it".to_string(),
            }],
        },
        Thread {
            message: Entry {
                when: "2023-11-15 09:00:00 UTC".to_string(),
                author: "Unknown User".to_string(),
                body: "see <https://a.b>".to_string(),
            },
            replies: vec![],
        },
    ]
}

#[test]
fn txt_export_lands_under_sanitized_workspace_and_channel_names() {
    let tmp = tempfile::tempdir().unwrap();

    let dir = tmp
        .path()
        .join(utils::workspace_dir_name("Acme Corp"));
    fs::create_dir_all(&dir).unwrap();

    let filename = format!(
        "{}.{}",
        utils::sanitize_name("proj/launch: v2"),
        OutputFormat::Txt.extension()
    );
    let path = dir.join(&filename);

    let mut writer = BufWriter::new(File::create(&path).unwrap());
    render::write_txt(&mut writer, &sample_threads()).unwrap();
    drop(writer);

    assert!(tmp.path().join("Acme_Corp/projlaunch v2.txt").exists());

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains(
        "[2023-11-14 22:13:20 UTC] Ada Lovelace: kickoff notes: the plan (https://docs.example.com/plan)"
    ));
    assert!(content.contains("    [2023-11-14 22:20:00 UTC] Grace Hopper: on it"));
    assert!(content.contains("[2023-11-15 09:00:00 UTC] Unknown User: see https://a.b (https://a.b)"));
}

#[test]
fn html_export_wraps_messages_in_nested_lists() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("general.html");

    let mut writer = BufWriter::new(File::create(&path).unwrap());
    render::write_html(&mut writer, "general", &sample_threads()).unwrap();
    drop(writer);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("<html><body><h1>Messages from general</h1><ul>"));
    assert!(content.contains(
        "<a href=\"https://docs.example.com/plan\">the plan</a>"
    ));
    assert!(content.contains("<li><strong>[2023-11-14 22:20:00 UTC] Grace Hopper:</strong> on it</li>"));
    assert!(content.ends_with("</ul></body></html>"));
}

#[test]
fn empty_history_writes_no_message_lines() {
    // The exporter skips file creation entirely for empty conversations; the
    // renderer itself also emits nothing for an empty thread list.
    let mut out = Vec::new();
    render::write_txt(&mut out, &[]).unwrap();
    assert!(out.is_empty());
}
