use std::io::Write;

use crate::links;
use crate::utils::OutputFormat;

/// One rendered line: a message or a reply, with its metadata already resolved
/// (timestamp formatted, author name looked up through the run cache).
#[derive(Debug, Clone)]
pub struct Entry {
    pub when: String,
    pub author: String,
    pub body: String,
}

/// A top-level message together with its thread replies, oldest reply first.
#[derive(Debug, Clone)]
pub struct Thread {
    pub message: Entry,
    pub replies: Vec<Entry>,
}

/// Plain-text layout: one line per message, replies indented four spaces,
/// a blank line after each reply block.
pub fn write_txt<W: Write>(writer: &mut W, threads: &[Thread]) -> std::io::Result<()> {
    for thread in threads {
        let msg = &thread.message;
        writeln!(
            writer,
            "[{}] {}: {}",
            msg.when,
            msg.author,
            links::rewrite(&msg.body, OutputFormat::Txt)
        )?;
        if !thread.replies.is_empty() {
            for reply in &thread.replies {
                writeln!(
                    writer,
                    "    [{}] {}: {}",
                    reply.when,
                    reply.author,
                    links::rewrite(&reply.body, OutputFormat::Txt)
                )?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// HTML layout: one `<li>` per message inside a single `<ul>`, replies in a
/// nested `<ul>` directly after their parent.
pub fn write_html<W: Write>(
    writer: &mut W,
    conversation_name: &str,
    threads: &[Thread],
) -> std::io::Result<()> {
    writeln!(
        writer,
        "<html><body><h1>Messages from {}</h1><ul>",
        conversation_name
    )?;
    for thread in threads {
        let msg = &thread.message;
        writeln!(
            writer,
            "<li><strong>[{}] {}:</strong> {}</li>",
            msg.when,
            msg.author,
            links::rewrite(&msg.body, OutputFormat::Html)
        )?;
        if !thread.replies.is_empty() {
            writeln!(writer, "<ul>")?;
            for reply in &thread.replies {
                writeln!(
                    writer,
                    "<li><strong>[{}] {}:</strong> {}</li>",
                    reply.when,
                    reply.author,
                    links::rewrite(&reply.body, OutputFormat::Html)
                )?;
            }
            writeln!(writer, "</ul>")?;
        }
    }
    write!(writer, "</ul></body></html>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(when: &str, author: &str, body: &str) -> Entry {
        Entry {
            when: when.to_string(),
            author: author.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn txt_lines_and_reply_indentation() {
        let threads = vec![
            Thread {
                message: entry("2023-11-14 22:13:20 UTC", "Ada", "hello"),
                replies: vec![
                    entry("2023-11-14 22:14:00 UTC", "Grace", "hi back"),
                    entry("2023-11-14 22:15:00 UTC", "Ada", "ok"),
                ],
            },
            Thread {
                message: entry("2023-11-14 22:16:00 UTC", "Grace", "unthreaded"),
                replies: vec![],
            },
        ];

        let mut out = Vec::new();
        write_txt(&mut out, &threads).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "[2023-11-14 22:13:20 UTC] Ada: hello\n\
             \u{20}   [2023-11-14 22:14:00 UTC] Grace: hi back\n\
             \u{20}   [2023-11-14 22:15:00 UTC] Ada: ok\n\
             \n\
             [2023-11-14 22:16:00 UTC] Grace: unthreaded\n"
        );
    }

    #[test]
    fn txt_rewrites_links_in_bodies() {
        let threads = vec![Thread {
            message: entry("t", "Ada", "see <https://a.b|label>"),
            replies: vec![],
        }];

        let mut out = Vec::new();
        write_txt(&mut out, &threads).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("label (https://a.b)"));
    }

    #[test]
    fn html_nests_replies_and_rewrites_links() {
        let threads = vec![Thread {
            message: entry("t1", "Ada", "root <https://a.b>"),
            replies: vec![entry("t2", "Grace", "child")],
        }];

        let mut out = Vec::new();
        write_html(&mut out, "general", &threads).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert!(html.starts_with("<html><body><h1>Messages from general</h1><ul>"));
        assert!(html.contains("<li><strong>[t1] Ada:</strong> root <a href=\"https://a.b\">https://a.b</a></li>"));
        assert!(html.contains("<ul>\n<li><strong>[t2] Grace:</strong> child</li>\n</ul>"));
        assert!(html.ends_with("</ul></body></html>"));
    }

    #[test]
    fn empty_thread_list_renders_empty_skeletons() {
        let mut out = Vec::new();
        write_txt(&mut out, &[]).unwrap();
        assert!(out.is_empty());

        let mut out = Vec::new();
        write_html(&mut out, "x", &[]).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert_eq!(
            html,
            "<html><body><h1>Messages from x</h1><ul>\n</ul></body></html>"
        );
    }
}
