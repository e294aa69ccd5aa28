//! Terminal trace output and report rendering.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use scout_core::display::format_date_posted;
use scout_core::{JobEntry, LogEntry, ScoutReport};
use scout_session::{SessionObserver, SessionPhase, Toast, ToastKind};

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]\n]+)\]\(([^)\s]+)\)").expect("valid markdown link regex")
});

const SAFE_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Streams the session's log and toasts to stderr while a search runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalTrace;

impl SessionObserver for TerminalTrace {
    fn log_appended(&mut self, entry: &LogEntry) {
        eprintln!("{}", log_line(entry));
    }

    fn toast_shown(&mut self, toast: &Toast) {
        let tag = match toast.kind {
            ToastKind::Error => "!",
            ToastKind::Info => "i",
        };
        eprintln!("[{tag}] {}", toast.message);
    }

    fn phase_changed(&mut self, phase: SessionPhase) {
        tracing::debug!(?phase, "session phase changed");
    }
}

pub fn log_line(entry: &LogEntry) -> String {
    format!(
        "[{}] {:<6} {}",
        entry.timestamp,
        entry.kind.to_string().to_uppercase(),
        entry.content
    )
}

// --- plain text -------------------------------------------------------------

/// Render the report for a terminal.
pub fn report_text(report: &ScoutReport, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let summary = MARKDOWN_LINK.replace_all(report.summary.trim(), "$1 ($2)");
    if !summary.is_empty() {
        out.push_str(&summary);
        out.push_str("\n\n");
    }

    if report.jobs.is_empty() {
        out.push_str("No matching roles.\n");
        return out;
    }

    for job in &report.jobs {
        write_job_text(&mut out, job, now);
    }
    out
}

fn write_job_text(out: &mut String, job: &JobEntry, now: DateTime<Utc>) {
    let _ = writeln!(out, "[{:>3}%] {} @ {}", job.match_percent(), job.title, job.company);

    let attributes = job.visible_attributes();
    if !attributes.is_empty() {
        let _ = writeln!(out, "       {}", attributes.join(" | "));
    }
    let _ = writeln!(
        out,
        "       Posted: {}",
        format_date_posted(job.date_posted.as_deref(), now)
    );
    if !job.match_reason.trim().is_empty() {
        let _ = writeln!(out, "       \"{}\"", job.match_reason.trim());
    }
    if !job.link.trim().is_empty() {
        let _ = writeln!(out, "       Apply: {}", job.link.trim());
    }
    out.push('\n');
}

// --- html -------------------------------------------------------------------

/// Render the report as a standalone HTML document.
pub fn report_html(report: &ScoutReport, now: DateTime<Utc>) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Scout report</title>\n</head>\n<body>\n",
    );

    out.push_str("<section class=\"summary\">\n");
    out.push_str(&markdown_to_html(&report.summary));
    out.push_str("</section>\n");

    out.push_str("<section class=\"jobs\">\n");
    if report.jobs.is_empty() {
        out.push_str("<p>No matching roles.</p>\n");
    }
    for job in &report.jobs {
        write_job_html(&mut out, job, now);
    }
    out.push_str("</section>\n</body>\n</html>\n");
    out
}

fn write_job_html(out: &mut String, job: &JobEntry, now: DateTime<Utc>) {
    out.push_str("<article class=\"job\">\n");

    match job.logo.as_deref().map(str::trim).filter(|l| is_safe_url(l)) {
        Some(logo) => {
            let _ = writeln!(
                out,
                "<img class=\"logo\" src=\"{}\" alt=\"{}\">",
                escape_html(logo),
                escape_html(&job.company)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "<div class=\"logo\">{}</div>",
                escape_html(&job.company_initial().to_string())
            );
        }
    }

    let _ = writeln!(
        out,
        "<span class=\"score\">{}% match</span>",
        job.match_percent()
    );
    let _ = writeln!(out, "<h2>{}</h2>", escape_html(&job.title));
    let _ = writeln!(out, "<p class=\"company\">{}</p>", escape_html(&job.company));

    let attributes = job.visible_attributes();
    if !attributes.is_empty() {
        out.push_str("<ul class=\"attributes\">\n");
        for attribute in attributes {
            let _ = writeln!(out, "<li>{}</li>", escape_html(attribute));
        }
        out.push_str("</ul>\n");
    }

    let _ = writeln!(
        out,
        "<p class=\"posted\">Posted: {}</p>",
        escape_html(&format_date_posted(job.date_posted.as_deref(), now))
    );

    if !job.match_reason.trim().is_empty() {
        let _ = writeln!(
            out,
            "<blockquote>&quot;{}&quot;</blockquote>",
            escape_html(job.match_reason.trim())
        );
    }

    let link = job.link.trim();
    if is_safe_url(link) {
        let _ = writeln!(
            out,
            "<a class=\"apply\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Apply</a>",
            escape_html(link)
        );
    }

    out.push_str("</article>\n");
}

/// Render the markdown summary. Raw HTML is shown as text, links keep only
/// safe schemes and open in a new tab.
fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut dropped_link = false;
    let mut dropped_image = false;
    let events = Parser::new_ext(markdown, options).filter_map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link { dest_url, .. }) => {
            dropped_link = !is_safe_url(&dest_url);
            (!dropped_link).then(|| {
                Event::InlineHtml(
                    format!(
                        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
                        escape_html(&dest_url)
                    )
                    .into(),
                )
            })
        }
        Event::End(TagEnd::Link) => {
            (!std::mem::take(&mut dropped_link)).then(|| Event::InlineHtml("</a>".into()))
        }
        Event::Start(Tag::Image { ref dest_url, .. }) => {
            dropped_image = !is_safe_url(dest_url);
            (!dropped_image).then_some(event)
        }
        Event::End(TagEnd::Image) => (!std::mem::take(&mut dropped_image)).then_some(event),
        other => Some(other),
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn is_safe_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    SAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use scout_core::LogKind;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn job() -> JobEntry {
        JobEntry {
            title: "Backend Engineer".to_owned(),
            company: "Acme".to_owned(),
            location: "Remote".to_owned(),
            salary: "Not specified".to_owned(),
            match_score: 92,
            match_reason: "Payments experience".to_owned(),
            link: "https://jobs.example.com/acme".to_owned(),
            date_posted: Some("2026-03-10T09:00:00Z".to_owned()),
            seniority: Some("Senior".to_owned()),
            ..JobEntry::default()
        }
    }

    fn report() -> ScoutReport {
        ScoutReport {
            summary: "Found 1 role. See [Acme](https://acme.example.com).".to_owned(),
            jobs: vec![job()],
        }
    }

    #[test]
    fn log_line_has_timestamp_kind_and_content() {
        let entry = LogEntry {
            timestamp: "09:15:02".to_owned(),
            content: "Scoring matches".to_owned(),
            kind: LogKind::Step,
        };
        assert_eq!(log_line(&entry), "[09:15:02] STEP   Scoring matches");
    }

    #[test]
    fn text_report_lists_job_card() {
        let text = report_text(&report(), now());
        assert!(text.starts_with("Found 1 role. See Acme (https://acme.example.com)."));
        assert!(text.contains("[ 92%] Backend Engineer @ Acme"));
        assert!(text.contains("Remote | Senior"));
        assert!(!text.contains("Not specified"));
        assert!(text.contains("Posted: 3h ago"));
        assert!(text.contains("\"Payments experience\""));
        assert!(text.contains("Apply: https://jobs.example.com/acme"));
    }

    #[test]
    fn text_report_without_jobs_says_so() {
        let empty = ScoutReport {
            summary: String::new(),
            jobs: Vec::new(),
        };
        assert_eq!(report_text(&empty, now()), "No matching roles.\n");
    }

    #[test]
    fn html_report_links_open_in_new_tab() {
        let html = report_html(&report(), now());
        assert!(html.contains(
            "<a href=\"https://acme.example.com\" target=\"_blank\" rel=\"noopener noreferrer\">Acme</a>"
        ));
        assert!(html.contains("<div class=\"logo\">A</div>"));
        assert!(html.contains("92% match"));
    }

    #[test]
    fn html_report_escapes_text() {
        let mut hostile = job();
        hostile.title = "<script>alert(1)</script>".to_owned();
        let html = report_html(
            &ScoutReport {
                summary: "a & b".to_owned(),
                jobs: vec![hostile],
            },
            now(),
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<p>a &amp; b</p>"));
    }

    #[test]
    fn unsafe_link_schemes_render_as_text() {
        let html = markdown_to_html("[click](javascript:alert(1))");
        assert!(!html.contains("href"));
        assert!(html.contains("click"));
    }

    #[test]
    fn summary_markdown_renders_structure() {
        let html = markdown_to_html("## Top matches\n\n**Acme** fits best:\n- remote\n- Rust");
        assert!(html.contains("<h2>Top matches</h2>"), "{html}");
        assert!(html.contains("<strong>Acme</strong>"), "{html}");
        assert!(html.contains("<li>remote</li>"), "{html}");
        assert!(html.contains("<li>Rust</li>"), "{html}");
        assert!(!html.contains("**"));
        assert!(!html.contains("##"));
    }

    #[test]
    fn raw_html_in_summary_is_shown_as_text() {
        let html = markdown_to_html("<script>alert(1)</script>\n\nHello <b>there</b>");
        assert!(!html.contains("<script>"), "{html}");
        assert!(!html.contains("<b>"), "{html}");
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;there&lt;/b&gt;"));
    }

    #[test]
    fn unsafe_image_sources_are_dropped() {
        let html = markdown_to_html("![logo](javascript:alert(1)) and ![ok](https://cdn.example.com/a.png)");
        assert!(!html.contains("javascript:"), "{html}");
        assert!(html.contains("<img src=\"https://cdn.example.com/a.png\""), "{html}");
    }

    #[test]
    fn logo_url_renders_image() {
        let mut with_logo = job();
        with_logo.logo = Some("https://cdn.example.com/acme.png".to_owned());
        let html = report_html(
            &ScoutReport {
                summary: String::new(),
                jobs: vec![with_logo],
            },
            now(),
        );
        assert!(html.contains("<img class=\"logo\" src=\"https://cdn.example.com/acme.png\" alt=\"Acme\">"));
    }
}
