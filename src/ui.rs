use crate::models::{LogEntry, MonthSummary, Subject, SubjectSummary};
use serde::Serialize;

pub fn render_index(subjects: &[Subject], logs: &[LogEntry]) -> String {
    let options = if subjects.is_empty() {
        r#"<option value="" disabled selected>No subjects yet</option>"#.to_string()
    } else {
        subjects
            .iter()
            .map(|subject| {
                format!(
                    r#"<option value="{}">{}</option>"#,
                    subject.id,
                    escape(&subject.name)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let table = if logs.is_empty() {
        r#"<p class="empty">No record</p>"#.to_string()
    } else {
        let rows = logs
            .iter()
            .map(|log| {
                format!(
                    r#"<tr class="log-row"><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    escape(&log.subject),
                    log.duration,
                    escape(&log.created_at)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "<table><thead><tr><th>Subject</th><th>Duration</th><th>Recorded</th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };

    INDEX_HTML
        .replace("{{SUBJECT_OPTIONS}}", &options)
        .replace("{{LOG_COUNT}}", &logs.len().to_string())
        .replace("{{LOG_TABLE}}", &table)
}

pub fn render_summary(by_subject: &[SubjectSummary], by_month: &[MonthSummary]) -> String {
    let subject_table = if by_subject.is_empty() {
        r#"<p class="empty">No record</p>"#.to_string()
    } else {
        let rows = by_subject
            .iter()
            .map(|row| {
                format!(
                    r#"<tr class="subject-row"><td>{}</td><td>{} hours</td><td>{} hours</td></tr>"#,
                    escape(&row.subject),
                    row.sum,
                    row.average()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "<table><thead><tr><th>Subject</th><th>Total</th><th>Average</th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };

    let month_table = if by_month.is_empty() {
        r#"<p class="empty">No record</p>"#.to_string()
    } else {
        let rows = by_month
            .iter()
            .map(|row| {
                format!(
                    r#"<tr class="month-row"><td>{}</td><td>{}</td><td>{} hours</td></tr>"#,
                    escape(&row.month),
                    row.count,
                    row.sum
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "<table><thead><tr><th>Month</th><th>Sessions</th><th>Total</th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };

    SUMMARY_HTML
        .replace("{{SUBJECT_TABLE}}", &subject_table)
        .replace("{{MONTH_TABLE}}", &month_table)
        .replace("{{SUBJECT_DATA}}", &json_blob(&by_subject))
        .replace("{{MONTH_DATA}}", &json_blob(&by_month))
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Embedded inside a <script> block, so '<' must not survive as-is.
fn json_blob<T: Serialize>(values: &T) -> String {
    serde_json::to_string(values)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c")
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Study Log</title>
  <style>
    :root {
      --bg-1: #f3f6f8;
      --bg-2: #d9e6ef;
      --ink: #28323a;
      --accent: #3478b0;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 20px 48px rgba(47, 72, 88, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e8f0f5 60%, #f4f7f9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(780px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 0;
      color: #5c6a75;
    }

    .forms {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 16px;
    }

    .card {
      background: white;
      border-radius: 16px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.1);
      display: grid;
      gap: 10px;
    }

    .card h2 {
      margin: 0;
      font-size: 1.1rem;
    }

    label {
      font-size: 0.85rem;
      color: #5c6a75;
    }

    input, select {
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.25);
      font-size: 1rem;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-size: 1rem;
      font-weight: 600;
      color: white;
      background: var(--accent);
      cursor: pointer;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.12);
    }

    th {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #7a858e;
    }

    .empty {
      color: #7a858e;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Study Log</h1>
      <p class="subtitle">Record what you studied and for how long.</p>
    </header>

    <section class="forms">
      <form class="card" method="post" action="/save-subject">
        <h2>Add subject</h2>
        <label for="subject-name">Subject</label>
        <input id="subject-name" name="subject" type="text" />
        <button type="submit">Add</button>
      </form>

      <form class="card" method="post" action="/save-log">
        <h2>Add log</h2>
        <label for="log-subject">Subject</label>
        <select id="log-subject" name="subject">
          {{SUBJECT_OPTIONS}}
        </select>
        <label for="log-duration">Duration (hours)</label>
        <input id="log-duration" name="duration" type="number" />
        <button type="submit">Add</button>
      </form>
    </section>

    <section>
      <h2>Latest logs: {{LOG_COUNT}} (<a href="/summary">Summary</a>)</h2>
      {{LOG_TABLE}}
    </section>
  </main>
</body>
</html>
"##;

const SUMMARY_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Study Log Summary</title>
  <style>
    :root {
      --bg-1: #f3f6f8;
      --bg-2: #d9e6ef;
      --ink: #28323a;
      --accent: #3478b0;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 20px 48px rgba(47, 72, 88, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e8f0f5 60%, #f4f7f9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(780px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    .chart-card {
      background: white;
      border-radius: 16px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.1);
    }

    svg {
      width: 100%;
      height: 220px;
      display: block;
    }

    .chart-bar {
      fill: var(--accent);
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #7a858e;
      font-size: 11px;
      font-family: "Trebuchet MS", sans-serif;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.12);
    }

    th {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #7a858e;
    }

    .empty {
      color: #7a858e;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Summary</h1>
    </header>

    <section>
      <h2>By subject</h2>
      <div class="chart-card">
        <svg id="subject-chart" viewBox="0 0 600 220" role="img" aria-label="Hours by subject"></svg>
      </div>
      {{SUBJECT_TABLE}}
    </section>

    <section>
      <h2>By month</h2>
      <div class="chart-card">
        <svg id="month-chart" viewBox="0 0 600 220" role="img" aria-label="Hours by month"></svg>
      </div>
      {{MONTH_TABLE}}
    </section>

    <div><a href="/">Back</a></div>
  </main>

  <script>
    const subjectData = {{SUBJECT_DATA}};
    const monthData = {{MONTH_DATA}};

    const renderBarChart = (svg, points) => {
      if (!points.length) {
        svg.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No record</text>';
        return;
      }

      const width = 600;
      const height = 220;
      const paddingX = 44;
      const paddingY = 30;
      const top = 16;

      const max = Math.max(...points.map((point) => point.value), 1);
      const slot = (width - paddingX * 2) / points.length;
      const barWidth = Math.min(slot * 0.6, 64);
      const scaleY = (height - top - paddingY) / max;

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = (max * i) / ticks;
        const yPos = height - paddingY - value * scaleY;
        grid += '<line class="chart-grid" x1="' + paddingX + '" y1="' + yPos + '" x2="' + (width - paddingX) + '" y2="' + yPos + '" />';
        grid += '<text class="chart-label" x="' + (paddingX - 8) + '" y="' + (yPos + 4) + '" text-anchor="end">' + Math.round(value) + '</text>';
      }

      const bars = points
        .map((point, index) => {
          const x = paddingX + index * slot + (slot - barWidth) / 2;
          const barHeight = point.value * scaleY;
          const y = height - paddingY - barHeight;
          const label = '<text class="chart-label" x="' + (x + barWidth / 2) + '" y="' + (height - paddingY + 16) + '" text-anchor="middle">' + point.label + '</text>';
          return '<rect class="chart-bar" x="' + x + '" y="' + y + '" width="' + barWidth + '" height="' + barHeight + '" rx="4" />' + label;
        })
        .join('');

      svg.innerHTML = grid + bars;
    };

    renderBarChart(
      document.getElementById('subject-chart'),
      subjectData.map((row) => ({ label: row.subject, value: row.sum }))
    );
    renderBarChart(
      document.getElementById('month-chart'),
      monthData.map((row) => ({ label: row.month, value: row.sum }))
    );
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_without_logs_shows_placeholder() {
        let page = render_index(&[], &[]);
        assert!(page.contains("No record"));
        assert!(page.contains("Latest logs: 0"));
        assert!(page.contains("No subjects yet"));
    }

    #[test]
    fn index_escapes_subject_names() {
        let subjects = vec![Subject {
            id: 1,
            name: "<b>Math</b>".to_string(),
            created_at: "2026-01-01 00:00:00".to_string(),
        }];
        let page = render_index(&subjects, &[]);
        assert!(page.contains("&lt;b&gt;Math&lt;/b&gt;"));
        assert!(!page.contains("<b>Math</b>"));
    }

    #[test]
    fn summary_renders_totals_and_averages() {
        let by_subject = vec![SubjectSummary {
            subject: "Math".to_string(),
            count: 1,
            sum: 3,
        }];
        let by_month = vec![MonthSummary {
            month: "2026-01".to_string(),
            count: 1,
            sum: 3,
        }];
        let page = render_summary(&by_subject, &by_month);
        assert!(page.contains("<td>Math</td><td>3 hours</td><td>3 hours</td>"));
        assert!(page.contains("<td>2026-01</td><td>1</td><td>3 hours</td>"));
    }

    #[test]
    fn summary_without_data_shows_placeholder() {
        let page = render_summary(&[], &[]);
        assert!(page.contains("No record"));
    }
}
