use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::api::models::{field_text, CustomerHit, OrderDetail, QuotationDetail};
use crate::page::{Page, Transition};

pub const MISSING: &str = "NA";
pub const NO_PRODUCTS: &str = "No Data!";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

pub const SEARCH_TRANSITION: Transition = Transition::Blind(Duration::from_millis(200));

pub mod targets {
    pub const ENQUIRY: &str = "#enquiry-data";
    pub const VIEW_ORDER_LINK: &str = "#quattion-view-order-link";
    pub const DATE: &str = "#date-data";
    pub const PRODUCTS: &str = "#product-data";
    pub const DELIVERY: &str = "#delivery-data";
    pub const FREIGHT: &str = "#freight-data";
    pub const OTHERS: &str = "#other-data";
    pub const PAYMENT: &str = "#payment-data";
    pub const TAXES: &str = "#taxes-data";

    pub const PO_NUMBER: &str = "#po_number-data";
    pub const MATERIAL: &str = "#material-data";
    pub const SPECIAL: &str = "#special-data";
    pub const STATUS: &str = "#status-data";

    pub const COMPANY_EMAILS: &str = "#company-emails";
    pub const EMAIL_BLOCK: &str = ".email-hide";

    pub const SEARCH_PANEL: &str = "#search-result";
    pub const SEARCH_LIST: &str = "#search-result ul";

    pub const QUOTATION: [&str; 9] = [
        ENQUIRY,
        VIEW_ORDER_LINK,
        DATE,
        PRODUCTS,
        DELIVERY,
        FREIGHT,
        OTHERS,
        PAYMENT,
        TAXES,
    ];

    pub const ORDER: [&str; 5] = [PO_NUMBER, DATE, MATERIAL, SPECIAL, STATUS];
}

const EMPTY_PRODUCTS_CLASS: &str = "padding-10px";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOp {
    Html { target: &'static str, html: String },
    AddClass { target: &'static str, class: &'static str },
    RemoveClass { target: &'static str, class: &'static str },
    Show { target: &'static str, transition: Transition },
    Hide { target: &'static str, transition: Transition },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Render {
    pub ops: Vec<RenderOp>,
}

impl Render {
    fn html(&mut self, target: &'static str, html: impl Into<String>) -> &mut Self {
        self.ops.push(RenderOp::Html {
            target,
            html: html.into(),
        });
        self
    }

    fn add_class(&mut self, target: &'static str, class: &'static str) -> &mut Self {
        self.ops.push(RenderOp::AddClass { target, class });
        self
    }

    fn remove_class(&mut self, target: &'static str, class: &'static str) -> &mut Self {
        self.ops.push(RenderOp::RemoveClass { target, class });
        self
    }

    fn show(&mut self, target: &'static str, transition: Transition) -> &mut Self {
        self.ops.push(RenderOp::Show { target, transition });
        self
    }

    fn hide(&mut self, target: &'static str, transition: Transition) -> &mut Self {
        self.ops.push(RenderOp::Hide { target, transition });
        self
    }

    pub fn html_for(&self, target: &str) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            RenderOp::Html { target: t, html } if *t == target => Some(html.as_str()),
            _ => None,
        })
    }

    pub fn apply<P: Page>(&self, page: &P) {
        for op in self.ops.iter() {
            match op {
                RenderOp::Html { target, html } => page.set_html_all(target, html),
                RenderOp::AddClass { target, class } => page.add_class_all(target, class),
                RenderOp::RemoveClass { target, class } => page.remove_class_all(target, class),
                RenderOp::Show { target, transition } => page.show_all(target, *transition),
                RenderOp::Hide { target, transition } => page.hide_all(target, *transition),
            }
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn format_date(dt: &NaiveDateTime) -> String {
    format!(
        "{} {}, {}",
        MONTHS[dt.month0() as usize],
        dt.day(),
        dt.year()
    )
}

pub fn format_time(dt: &NaiveDateTime) -> String {
    let (pm, hour) = dt.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        dt.minute(),
        if pm { "PM" } else { "AM" }
    )
}

pub fn parse_server_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn date_text(raw: Option<&str>) -> String {
    raw.and_then(parse_server_datetime)
        .map(|dt| format_date(&dt))
        .unwrap_or_else(|| MISSING.to_string())
}

fn field_html(value: &serde_json::Value) -> String {
    field_text(value)
        .map(|text| escape_html(&text))
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn quotation(detail: &QuotationDetail) -> Render {
    let summary = detail.summary();
    let mut render = Render::default();
    render.html(targets::ENQUIRY, field_html(&summary.enquiry));
    match field_text(&summary.id) {
        Some(id) => render.html(
            targets::VIEW_ORDER_LINK,
            format!(
                "<a href=\"/enquiry/quotation/{}/detail/\">View orders</a>",
                escape_html(&id)
            ),
        ),
        None => render.html(targets::VIEW_ORDER_LINK, ""),
    };
    render.html(targets::DATE, date_text(summary.date.as_deref()));

    let products = detail.products();
    if products.is_empty() {
        render
            .html(targets::PRODUCTS, NO_PRODUCTS)
            .add_class(targets::PRODUCTS, EMPTY_PRODUCTS_CLASS);
    } else {
        let rows: String = products
            .iter()
            .enumerate()
            .map(|(i, product)| {
                format!(
                    concat!(
                        "<div class=\"col-lg-12 no-padding complete-gray-border white-back center\">",
                        "<div class=\"col-lg-1 gray-left-right-border center padding-5px\">{}</div>",
                        "<div class=\"col-lg-4 gray-left-right-border row-padding center no-padding table-over-flow-coloum textOverflowPopup\">{}</div>",
                        "<div class=\"col-lg-3 gray-left-right-border row-padding center no-padding\">{}</div>",
                        "<div class=\"col-lg-2 gray-left-right-border row-padding center no-padding table-over-flow-coloum textOverflowPopup\">{}</div>",
                        "<div class=\"col-lg-2 gray-left-right-border row-padding center no-padding\">{}</div>",
                        "</div>"
                    ),
                    i + 1,
                    field_html(&product.name),
                    field_html(&product.quantity),
                    field_html(&product.prices_each),
                    field_html(&product.net_price),
                )
            })
            .collect();
        render
            .remove_class(targets::PRODUCTS, EMPTY_PRODUCTS_CLASS)
            .html(targets::PRODUCTS, rows);
    }

    render
        .html(targets::DELIVERY, field_html(&summary.delivery))
        .html(targets::FREIGHT, field_html(&summary.freight))
        .html(targets::OTHERS, field_html(&summary.others))
        .html(targets::PAYMENT, field_html(&summary.payment_terms))
        .html(targets::TAXES, field_html(&summary.taxes));
    render
}

pub fn quotation_cleared() -> Render {
    let mut render = Render::default();
    for target in targets::QUOTATION {
        render.html(target, "");
    }
    render
}

pub fn order(detail: &OrderDetail) -> Render {
    let mut render = Render::default();
    render
        .html(targets::PO_NUMBER, field_html(&detail.po_number))
        .html(targets::DATE, date_text(detail.delivery_date.as_deref()))
        .html(targets::MATERIAL, field_html(&detail.material))
        .html(targets::SPECIAL, field_html(&detail.is_special))
        .html(targets::STATUS, field_html(&detail.get_status_display));
    render
}

pub fn order_cleared() -> Render {
    let mut render = Render::default();
    for target in targets::ORDER {
        render.html(target, "");
    }
    render
}

pub fn customer_emails(emails: &[String]) -> Render {
    if emails.is_empty() {
        return customer_emails_cleared();
    }
    let mut render = Render::default();
    let html: String = emails
        .iter()
        .map(|email| {
            let email = escape_html(email);
            format!("<input type=\"checkbox\" name=\"emails\" value=\"{email}\">{email}<br>")
        })
        .collect();
    render
        .html(targets::COMPANY_EMAILS, html)
        .show(targets::EMAIL_BLOCK, Transition::Instant);
    render
}

pub fn customer_emails_cleared() -> Render {
    let mut render = Render::default();
    render
        .html(targets::COMPANY_EMAILS, "")
        .hide(targets::EMAIL_BLOCK, Transition::Instant);
    render
}

pub fn search_results(hits: &[CustomerHit]) -> Render {
    let mut render = Render::default();
    let html: String = hits
        .iter()
        .map(|hit| {
            format!(
                "<li id=\"{}\" class=\"cursor-pointer search-list-val\">{}</li>",
                escape_html(&field_text(&hit.id).unwrap_or_default()),
                escape_html(&field_text(&hit.company_name).unwrap_or_default()),
            )
        })
        .collect();
    render.html(targets::SEARCH_LIST, html);
    if hits.is_empty() {
        render.hide(targets::SEARCH_PANEL, SEARCH_TRANSITION);
    } else {
        render.show(targets::SEARCH_PANEL, SEARCH_TRANSITION);
    }
    render
}

pub fn search_results_hidden() -> Render {
    let mut render = Render::default();
    render.hide(targets::SEARCH_PANEL, SEARCH_TRANSITION);
    render
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Product, QuotationLines, QuotationSummary};
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn date_format_matches_page_style() {
        assert_eq!(format_date(&at(1994, 6, 13, 0, 0)), "Jun 13, 1994");
        assert_eq!(format_date(&at(2017, 9, 1, 0, 0)), "Sept 1, 2017");
    }

    #[test]
    fn time_format_uses_twelve_hour_clock() {
        assert_eq!(format_time(&at(1994, 6, 13, 14, 5)), "2:05 PM");
        assert_eq!(format_time(&at(1994, 6, 13, 0, 0)), "12:00 AM");
        assert_eq!(format_time(&at(1994, 6, 13, 12, 30)), "12:30 PM");
        assert_eq!(format_time(&at(1994, 6, 13, 9, 59)), "9:59 AM");
    }

    #[test]
    fn parses_server_date_shapes() {
        assert_eq!(
            parse_server_datetime("1994-06-13T14:05:00+05:30"),
            Some(at(1994, 6, 13, 14, 5))
        );
        assert_eq!(
            parse_server_datetime("1994-06-13T14:05:00.123"),
            Some(at(1994, 6, 13, 14, 5)).map(|d| d.with_nanosecond(123_000_000).unwrap())
        );
        assert_eq!(
            parse_server_datetime("1994-06-13 14:05:00"),
            Some(at(1994, 6, 13, 14, 5))
        );
        assert_eq!(parse_server_datetime("1994-06-13"), Some(at(1994, 6, 13, 0, 0)));
        assert_eq!(parse_server_datetime("soon"), None);
        assert_eq!(parse_server_datetime(""), None);
    }

    #[test]
    fn quotation_fills_every_target() {
        let detail = QuotationDetail(
            QuotationSummary {
                id: json!(12),
                enquiry: json!("ENQ <12>"),
                date: Some("1994-06-13T10:00:00Z".to_string()),
                delivery: json!("Ex works"),
                freight: json!(null),
                others: json!(""),
                payment_terms: json!("30 days"),
                taxes: json!(18),
            },
            QuotationLines {
                products: vec![
                    Product {
                        name: json!("Valve"),
                        quantity: json!(2),
                        prices_each: json!("10.00"),
                        net_price: json!("20.00"),
                    },
                    Product {
                        name: json!("Pipe"),
                        quantity: json!(1),
                        prices_each: json!("5.00"),
                        net_price: json!("5.00"),
                    },
                ],
            },
        );
        let render = quotation(&detail);
        assert_eq!(render.html_for(targets::ENQUIRY), Some("ENQ &lt;12&gt;"));
        assert_eq!(
            render.html_for(targets::VIEW_ORDER_LINK),
            Some("<a href=\"/enquiry/quotation/12/detail/\">View orders</a>")
        );
        assert_eq!(render.html_for(targets::DATE), Some("Jun 13, 1994"));
        assert_eq!(render.html_for(targets::FREIGHT), Some(MISSING));
        assert_eq!(render.html_for(targets::OTHERS), Some(MISSING));
        assert_eq!(render.html_for(targets::TAXES), Some("18"));
        let products = render.html_for(targets::PRODUCTS).unwrap();
        assert_eq!(products.matches("complete-gray-border").count(), 2);
        assert!(products.contains(">1</div>"));
        assert!(products.contains(">2</div>"));
        assert!(render.ops.contains(&RenderOp::RemoveClass {
            target: targets::PRODUCTS,
            class: "padding-10px"
        }));
    }

    #[test]
    fn quotation_without_products_says_so() {
        let detail = QuotationDetail(QuotationSummary::default(), QuotationLines::default());
        let render = quotation(&detail);
        assert_eq!(render.html_for(targets::PRODUCTS), Some(NO_PRODUCTS));
        assert_eq!(render.html_for(targets::DATE), Some(MISSING));
        assert!(render.ops.contains(&RenderOp::AddClass {
            target: targets::PRODUCTS,
            class: "padding-10px"
        }));
    }

    #[test]
    fn order_renders_missing_fields_as_na() {
        let detail = OrderDetail {
            po_number: json!("PO-9"),
            delivery_date: None,
            material: json!(null),
            is_special: json!(true),
            get_status_display: json!("Dispatched"),
        };
        let render = order(&detail);
        assert_eq!(render.html_for(targets::PO_NUMBER), Some("PO-9"));
        assert_eq!(render.html_for(targets::DATE), Some(MISSING));
        assert_eq!(render.html_for(targets::MATERIAL), Some(MISSING));
        assert_eq!(render.html_for(targets::SPECIAL), Some("Yes"));
        assert_eq!(render.html_for(targets::STATUS), Some("Dispatched"));
    }

    #[test]
    fn emails_render_as_checkboxes() {
        let render = customer_emails(&["a@b.co".to_string(), "c@d.co".to_string()]);
        let html = render.html_for(targets::COMPANY_EMAILS).unwrap();
        assert_eq!(html.matches("type=\"checkbox\" name=\"emails\"").count(), 2);
        assert!(html.contains("value=\"c@d.co\">c@d.co<br>"));
        assert!(render.ops.contains(&RenderOp::Show {
            target: targets::EMAIL_BLOCK,
            transition: Transition::Instant
        }));
        assert_eq!(customer_emails(&[]), customer_emails_cleared());
    }

    #[test]
    fn search_results_one_item_per_hit() {
        let hits = vec![
            CustomerHit {
                id: json!(4),
                company_name: json!("Acme"),
            },
            CustomerHit {
                id: json!(9),
                company_name: json!("Globex & Co"),
            },
        ];
        let render = search_results(&hits);
        let html = render.html_for(targets::SEARCH_LIST).unwrap();
        assert_eq!(html.matches("<li ").count(), 2);
        assert!(html.contains("<li id=\"9\" class=\"cursor-pointer search-list-val\">Globex &amp; Co</li>"));
        assert!(render.ops.contains(&RenderOp::Show {
            target: targets::SEARCH_PANEL,
            transition: SEARCH_TRANSITION
        }));

        let empty = search_results(&[]);
        assert_eq!(empty.html_for(targets::SEARCH_LIST), Some(""));
        assert!(empty.ops.contains(&RenderOp::Hide {
            target: targets::SEARCH_PANEL,
            transition: SEARCH_TRANSITION
        }));
    }

    #[test]
    fn cleared_renders_blank_all_targets() {
        assert_eq!(quotation_cleared().ops.len(), targets::QUOTATION.len());
        assert!(order_cleared()
            .ops
            .iter()
            .all(|op| matches!(op, RenderOp::Html { html, .. } if html.is_empty())));
    }
}
