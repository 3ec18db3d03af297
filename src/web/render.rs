use crate::core::Alert;
use crate::dashboard::DashboardPage;
use std::fmt::Write;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // Keeps alert text from ever forming a template placeholder.
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

fn alert_rows(alerts: &[Alert]) -> String {
    let mut rows = String::new();
    for alert in alerts {
        let priority = alert.priority.as_str();
        // Writing into a String cannot fail.
        let _ = writeln!(
            rows,
            "                <tr><td>{}</td><td class=\"priority-{}\">{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&alert.name),
            escape_html(&priority.to_ascii_lowercase()),
            escape_html(priority),
            alert.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            if alert.cleared { "Yes" } else { "No" },
        );
    }
    rows
}

/// Renders the dashboard page from the compiled-in template.
pub fn render_dashboard(page: &DashboardPage) -> String {
    let substitutions = [
        ("{{page_load_time}}", escape_html(&page.page_load_time)),
        ("{{recent_query_time}}", escape_html(&page.recent_query_time)),
        ("{{priority_query_time}}", escape_html(&page.priority_query_time)),
        (
            "{{total_priority_load_time}}",
            escape_html(&page.total_priority_load_time),
        ),
        ("{{priority_count}}", page.priority_count.to_string()),
        ("{{priority_bucket_count}}", page.priority_bucket_count.to_string()),
        ("{{next_bucket_index}}", page.next_bucket_index.to_string()),
        ("{{recent_rows}}", alert_rows(&page.recent_alerts)),
        ("{{priority_rows}}", alert_rows(&page.priority_alerts)),
    ];

    substitutions
        .iter()
        .fold(INDEX_TEMPLATE.to_string(), |html, (placeholder, value)| {
            html.replace(placeholder, value)
        })
}
