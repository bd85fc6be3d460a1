//! Standalone HTML report

use crate::extractor::{PortRecord, ReportSummary};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

pub const REPORT_TITLE: &str = "Network Recon Report";

const EMPTY_MESSAGE: &str = "No open ports found or scan returned no data.";

const STYLE: &str = "\
body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Arial,sans-serif;background:#f7f9fc;margin:24px}
h1{color:#13294b;margin:0 0 8px}
small{color:#5b6876}
table{border-collapse:collapse;width:100%;margin-top:16px;background:#fff}
th,td{border:1px solid #e6e9ef;padding:8px 10px;font-size:14px}
th{background:#eef2f8;text-align:left}
tr:nth-child(even){background:#fbfdff}
.badge{display:inline-block;padding:2px 8px;border-radius:999px;background:#eef2f8;color:#13294b;font-size:12px}
";

const COLUMNS: [&str; 7] = ["IP", "Port", "Proto", "State", "Service", "Product", "Version"];

/// Render the report page for `records`.
///
/// Every value taken from the scan or the command line is escaped.
pub fn render_html(records: &[PortRecord], targets: &[String], generated_at: DateTime<Utc>) -> String {
    let mut html = String::new();

    html.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", REPORT_TITLE));
    html.push_str(&format!("<style>\n{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("<h1>{}</h1>\n", REPORT_TITLE));
    let generated = generated_at.format("%Y-%m-%d %H:%M UTC");
    if targets.is_empty() {
        html.push_str(&format!("<small>Generated: {}</small>\n", generated));
    } else {
        let target_list = targets
            .iter()
            .map(|t| escape(t.as_str()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            "<small>Targets: <b>{}</b> &bull; Generated: {}</small>\n",
            target_list, generated
        ));
    }

    if records.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", EMPTY_MESSAGE));
        html.push_str("</body>\n</html>\n");
        return html;
    }

    let summary = ReportSummary::from_records(records);
    html.push_str(&format!(
        "<p><span class=\"badge\">{} host(s)</span> <span class=\"badge\">{} open/service entries</span></p>\n",
        summary.hosts, summary.entries
    ));

    html.push_str("<table>\n<tr>");
    for column in COLUMNS {
        html.push_str(&format!("<th>{}</th>", column));
    }
    html.push_str("</tr>\n");

    for record in records {
        html.push_str("<tr>");
        for value in [
            &record.ip,
            &record.port,
            &record.protocol,
            &record.state,
            &record.service,
            &record.product,
            &record.version,
        ] {
            html.push_str(&format!("<td>{}</td>", escape(value.as_str())));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}
