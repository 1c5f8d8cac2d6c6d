use colored::Colorize;
use serde::Serialize;

use crate::page::memory::strip_tags;
use crate::page::Page;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PaneField {
    pub target: String,
    pub visible: bool,
    pub text: String,
    pub html: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PaneReport {
    pub subject: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub fields: Vec<PaneField>,
}

pub fn readable(html: &str) -> String {
    let marked = html
        .replace("<br>", "\n")
        .replace("</li>", "\n")
        .replace("</div></div>", "\n")
        .replace("</div><div", " | <div");
    strip_tags(&marked)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn capture<P: Page>(page: &P, targets: &[&str]) -> Vec<PaneField> {
    targets
        .iter()
        .filter_map(|target| {
            let node = page.query(target).into_iter().next()?;
            let html = page.inner_html(&node);
            Some(PaneField {
                target: target.to_string(),
                visible: page.is_visible(&node),
                text: readable(&html),
                html,
            })
        })
        .collect()
}

pub fn render_text(reports: &[PaneReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let status = if report.ok {
            "OK".bold().green()
        } else {
            "ERR".bold().red()
        };
        out.push_str(&format!(
            "{}{}{} {}\n",
            "[".bold().white(),
            status,
            "]".bold().white(),
            report.subject.bold()
        ));
        if let Some(error) = report.error.as_deref() {
            out.push_str(&format!("   {}\n", error.yellow()));
        }
        for field in report.fields.iter().filter(|f| f.visible) {
            let mut lines = field.text.lines();
            let first = lines.next().unwrap_or("");
            out.push_str(&format!(":: {:<22}: {}\n", field.target.cyan(), first));
            for line in lines {
                out.push_str(&format!("   {:<22}  {}\n", "", line));
            }
        }
    }
    out
}

pub fn render_json(reports: &[PaneReport]) -> Vec<u8> {
    serde_json::to_vec_pretty(reports).unwrap_or_else(|_| b"[]\n".to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Element, MemoryPage};

    #[test]
    fn parse_accepts_known_formats() {
        assert_eq!(OutputFormat::parse(" JSON "), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("txt"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn readable_splits_rows_and_cells() {
        let html = concat!(
            "<div class=\"row\"><div>1</div><div>Valve</div><div>5</div></div>",
            "<div class=\"row\"><div>2</div><div>Pump &amp; seal</div><div>1</div></div>"
        );
        assert_eq!(readable(html), "1 | Valve | 5\n2 | Pump & seal | 1");
        assert_eq!(
            readable("<li id=\"1\">Acme</li><li id=\"2\">Bolt Co</li>"),
            "Acme\nBolt Co"
        );
        assert_eq!(readable("NA"), "NA");
    }

    #[test]
    fn capture_skips_missing_targets() {
        let page = MemoryPage::new("http://localhost/");
        page.append(None, Element::new("div").id("date-data").html("12 Sept 2023"));
        page.append(None, Element::new("div").id("status-data").hidden());
        let fields = capture(&page, &["#date-data", "#nope", "#status-data"]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].text, "12 Sept 2023");
        assert!(fields[0].visible);
        assert!(!fields[1].visible);
    }

    #[test]
    fn text_output_lists_visible_fields_only() {
        colored::control::set_override(false);
        let reports = vec![PaneReport {
            subject: "order 4".to_string(),
            ok: false,
            error: Some("status 404".to_string()),
            fields: vec![
                PaneField {
                    target: "#po_number-data".to_string(),
                    visible: true,
                    text: String::new(),
                    html: String::new(),
                },
                PaneField {
                    target: ".email-hide".to_string(),
                    visible: false,
                    text: "x".to_string(),
                    html: "x".to_string(),
                },
            ],
        }];
        let text = render_text(&reports);
        assert!(text.starts_with("[ERR] order 4\n"));
        assert!(text.contains("status 404"));
        assert!(text.contains("#po_number-data"));
        assert!(!text.contains(".email-hide"));

        let json: serde_json::Value = serde_json::from_slice(&render_json(&reports)).unwrap();
        assert_eq!(json[0]["fields"][1]["visible"], false);
    }
}
