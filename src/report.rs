//! Report Renderer: JSON and self-contained HTML output, plus the console
//! summary printed at the end of every run.

use crate::error::ScoutError;
use crate::finding::Finding;
use crate::stats::ScanSummary;
use colored::Colorize;
use std::fs;

/// Writes `findings` as pretty-printed JSON to `path`.
pub fn write_json(findings: &[Finding], path: &str) -> Result<(), ScoutError> {
    let json = serde_json::to_string_pretty(findings).map_err(ScoutError::Serialize)?;
    fs::write(path, json).map_err(|source| ScoutError::ReportWrite {
        path: path.to_string(),
        source,
    })
}

/// Writes a single self-contained HTML document: stat cards, a searchable
/// findings table, and a copy-curl button per row. No external assets.
pub fn write_html(
    findings: &[Finding],
    summary: &ScanSummary,
    path: &str,
) -> Result<(), ScoutError> {
    let html = render_html(findings, summary);
    fs::write(path, html).map_err(|source| ScoutError::ReportWrite {
        path: path.to_string(),
        source,
    })
}

fn render_html(findings: &[Finding], summary: &ScanSummary) -> String {
    let count_2xx = findings.iter().filter(|f| (200..300).contains(&f.status)).count();
    let count_3xx = findings.iter().filter(|f| (300..400).contains(&f.status)).count();
    let count_critical = findings.iter().filter(|f| f.critical).count();
    let count_secrets = findings.iter().filter(|f| f.secret_found).count();
    let count_waf = findings.iter().filter(|f| !f.waf_detected.is_empty()).count();

    let rows: String = findings
        .iter()
        .map(|f| {
            let badges = row_badges(f);
            format!(
                r#"<tr data-url="{url}" data-status="{status}">
  <td>{url}</td><td>{status}</td><td>{size}</td><td>{badges}</td>
  <td><button class="copy-curl" data-curl="{curl}">copy curl</button></td>
</tr>"#,
                url = html_escape(&f.url),
                status = f.status,
                size = f.size,
                badges = badges,
                curl = html_escape(&f.curl_command),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>dirscout report</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 2rem; background: #0b0f14; color: #e6edf3; }}
.cards {{ display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 1.5rem; }}
.card {{ background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 0.75rem 1.25rem; }}
.card .n {{ font-size: 1.5rem; font-weight: 700; }}
.card .l {{ font-size: 0.75rem; color: #8b949e; text-transform: uppercase; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ padding: 0.4rem 0.6rem; border-bottom: 1px solid #30363d; text-align: left; font-size: 0.9rem; }}
.badge {{ display: inline-block; padding: 0.1rem 0.4rem; border-radius: 4px; font-size: 0.75rem; margin-right: 0.25rem; }}
.badge.critical {{ background: #3d1d1d; color: #ff7b72; }}
.badge.secret {{ background: #3d2f1d; color: #e3b341; }}
.badge.waf {{ background: #1d2f3d; color: #58a6ff; }}
#search {{ margin-bottom: 1rem; width: 100%; padding: 0.5rem; background: #0d1117; color: #e6edf3; border: 1px solid #30363d; border-radius: 6px; }}
</style>
</head>
<body>
<h1>dirscout report</h1>
<div class="cards">
<div class="card"><div class="n">{total}</div><div class="l">total</div></div>
<div class="card"><div class="n">{found}</div><div class="l">found</div></div>
<div class="card"><div class="n">{count_2xx}</div><div class="l">2xx</div></div>
<div class="card"><div class="n">{count_3xx}</div><div class="l">3xx</div></div>
<div class="card"><div class="n">{count_critical}</div><div class="l">critical</div></div>
<div class="card"><div class="n">{count_secrets}</div><div class="l">secrets</div></div>
<div class="card"><div class="n">{count_waf}</div><div class="l">waf</div></div>
</div>
<input id="search" type="text" placeholder="filter by url or status...">
<table id="findings">
<thead><tr><th>URL</th><th>Status</th><th>Size</th><th>Flags</th><th></th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
<script>
document.getElementById('search').addEventListener('input', function (e) {{
  var q = e.target.value.toLowerCase();
  document.querySelectorAll('#findings tbody tr').forEach(function (row) {{
    var hay = (row.dataset.url + ' ' + row.dataset.status).toLowerCase();
    row.style.display = hay.includes(q) ? '' : 'none';
  }});
}});
document.querySelectorAll('.copy-curl').forEach(function (btn) {{
  btn.addEventListener('click', function () {{
    navigator.clipboard.writeText(btn.dataset.curl);
    btn.textContent = 'copied!';
    setTimeout(function () {{ btn.textContent = 'copy curl'; }}, 1200);
  }});
}});
</script>
</body>
</html>
"#,
        total = summary.total,
        found = summary.found,
    )
}

fn row_badges(f: &Finding) -> String {
    let mut badges = String::new();
    if f.critical {
        badges.push_str(r#"<span class="badge critical">critical</span>"#);
    }
    if f.secret_found {
        badges.push_str(r#"<span class="badge secret">secret</span>"#);
    }
    if !f.waf_detected.is_empty() {
        badges.push_str(&format!(
            r#"<span class="badge waf">{}</span>"#,
            html_escape(&f.waf_detected)
        ));
    }
    badges
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Prints the end-of-run summary to the console, in the teacher's
/// label-then-colored-value style.
pub fn print_summary(summary: &ScanSummary) {
    println!("\n{}", "Summary:".bold().underline().blue());
    println!("{:<15}{}", "Total:".bold(), summary.total.to_string().white());
    println!("{:<15}{}", "Processed:".bold(), summary.processed.to_string().white());
    println!("{:<15}{}", "Found:".bold(), summary.found.to_string().green());
    println!("{:<15}{}", "Errors:".bold(), summary.errors.to_string().red());
    println!("{:<15}{}", "Secrets:".bold(), summary.secrets.to_string().yellow());
    println!("{:<15}{}", "WAF hits:".bold(), summary.waf_hits.to_string().cyan());
    println!("{:<15}{:?}", "Elapsed:".bold(), summary.elapsed);
}
