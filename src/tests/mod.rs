use std::net::SocketAddr;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::{Json, Router};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::actions;
use crate::api::{ApiClient, ApiError, ClientOptions};
use crate::config::PageContext;
use crate::csrf::{CookieSource, CSRF_HEADER};
use crate::page::{Element, MemoryPage, Page, LOADER};
use crate::render::targets;

async fn quotation(Path(id): Path<String>) -> impl IntoResponse {
    if id != "7" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})));
    }
    (
        StatusCode::OK,
        Json(json!([
            {
                "id": 7,
                "enquiry": "Hydraulic <b>press</b> spares",
                "date": "2023-09-12T14:30:00Z",
                "delivery": "4 weeks",
                "freight": null,
                "others": "",
                "payment_terms": "30 days",
                "taxes": "GST 18%"
            },
            {
                "products": [
                    {"name": "Seal kit", "quantity": 5, "prices_each": "120.00", "net_price": "600.00"},
                    {"name": "Piston rod", "quantity": 1, "prices_each": "900.00", "net_price": "900.00"}
                ]
            }
        ])),
    )
}

async fn order(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "3" => (
            StatusCode::OK,
            Json(json!({
                "po_number": "PO-2211",
                "delivery_date": "2023-01-05",
                "material": "SS304",
                "is_special": true,
                "get_status_display": "Dispatched"
            })),
        )
            .into_response(),
        "broken" => (StatusCode::OK, "{not json").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn emails(Path(file): Path<String>) -> Json<Value> {
    match file.trim_end_matches(".json") {
        "11" => Json(json!(["buyer@acme.test", "accounts@acme.test"])),
        _ => Json(json!([])),
    }
}

async fn customers(Path(file): Path<String>) -> Json<Value> {
    let query = file.trim_end_matches(".json").to_lowercase();
    let all = [(1, "Acme & Sons"), (2, "Acme Tools"), (3, "Bolt Co")];
    let hits: Vec<Value> = all
        .iter()
        .filter(|(_, name)| name.to_lowercase().contains(&query))
        .map(|(id, name)| json!({"id": id, "company_name": name}))
        .collect();
    Json(Value::Array(hits))
}

async fn echo(headers: HeaderMap) -> Json<Value> {
    let token = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let cookie = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({"token": token, "cookie": cookie}))
}

async fn serve() -> SocketAddr {
    let router = Router::new()
        .route("/enquiry/api/v1/quotation/:id/detail.json", get(quotation))
        .route("/enquiry/api/v1/order/:id/detail.json", get(order))
        .route("/customer/api/v1/emails/:file", get(emails))
        .route("/customer/api/v1/customers/:file", get(customers))
        .route("/echo", any(echo));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn origin(addr: SocketAddr) -> String {
    format!("http://{addr}/enquiry/list/")
}

fn client(addr: SocketAddr, cookie: &str) -> ApiClient {
    let context = PageContext::from_location(&origin(addr), None).unwrap();
    let options = ClientOptions {
        cookies: CookieSource::new(cookie),
        timeout_seconds: 5,
        user_agent: None,
    };
    ApiClient::new(context, options).unwrap()
}

fn page(addr: SocketAddr) -> MemoryPage {
    let page = MemoryPage::new(&origin(addr));
    page.append(None, Element::new("div").class(&LOADER[1..]).hidden());
    for target in targets::QUOTATION.iter().chain(targets::ORDER.iter()) {
        if page.first(target).is_none() {
            page.append(None, Element::new("div").id(&target[1..]).html("stale"));
        }
    }
    let block = page.append(None, Element::new("div").class("email-hide").hidden());
    page.append(Some(block), Element::new("div").id("company-emails"));
    let search = page.append(None, Element::new("div").id("search-input"));
    page.append(Some(search), Element::new("input"));
    page.append(None, Element::new("input").id("id_customer").value("99"));
    let panel = page.append(None, Element::new("div").id("search-result").hidden());
    page.append(Some(panel), Element::new("ul"));
    page
}

fn html(page: &MemoryPage, selector: &str) -> String {
    page.inner_html(&page.first(selector).unwrap())
}

fn visible(page: &MemoryPage, selector: &str) -> bool {
    page.is_visible(&page.first(selector).unwrap())
}

#[tokio::test]
async fn quotation_renders_every_pane() {
    let addr = serve().await;
    let (page, api) = (page(addr), client(addr, ""));

    actions::show_quotation(&page, &api, "7").await.unwrap();

    assert_eq!(
        html(&page, targets::ENQUIRY),
        "Hydraulic &lt;b&gt;press&lt;/b&gt; spares"
    );
    assert_eq!(
        html(&page, targets::VIEW_ORDER_LINK),
        "<a href=\"/enquiry/quotation/7/detail/\">View orders</a>"
    );
    assert_eq!(html(&page, targets::DATE), "Sept 12, 2023");
    assert_eq!(html(&page, targets::FREIGHT), "NA");
    assert_eq!(html(&page, targets::OTHERS), "NA");
    assert_eq!(html(&page, targets::TAXES), "GST 18%");
    let products = html(&page, targets::PRODUCTS);
    assert!(products.contains("Seal kit"));
    assert!(products.contains("Piston rod"));
    assert!(!visible(&page, LOADER));
}

#[tokio::test]
async fn missing_quotation_clears_panes() {
    let addr = serve().await;
    let (page, api) = (page(addr), client(addr, ""));

    let err = actions::show_quotation(&page, &api, "404").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    for target in targets::QUOTATION {
        assert_eq!(html(&page, target), "", "{target}");
    }
    assert!(!visible(&page, LOADER));
}

#[tokio::test]
async fn order_renders_and_failures_clear() {
    let addr = serve().await;
    let (page, api) = (page(addr), client(addr, ""));

    actions::show_order(&page, &api, "3").await.unwrap();
    assert_eq!(html(&page, targets::PO_NUMBER), "PO-2211");
    assert_eq!(html(&page, targets::DATE), "Jan 5, 2023");
    assert_eq!(html(&page, targets::SPECIAL), "Yes");
    assert_eq!(html(&page, targets::STATUS), "Dispatched");

    let err = actions::show_order(&page, &api, "broken").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    for target in targets::ORDER {
        assert_eq!(html(&page, target), "", "{target}");
    }
}

#[tokio::test]
async fn customer_emails_toggle_the_block() {
    let addr = serve().await;
    let (page, api) = (page(addr), client(addr, ""));

    assert_eq!(actions::show_customer_emails(&page, &api, "11").await.unwrap(), 2);
    assert!(visible(&page, targets::EMAIL_BLOCK));
    let list = html(&page, targets::COMPANY_EMAILS);
    assert!(list.contains("value=\"buyer@acme.test\""));
    assert!(list.contains("name=\"emails\""));

    assert_eq!(actions::show_customer_emails(&page, &api, "12").await.unwrap(), 0);
    assert!(!visible(&page, targets::EMAIL_BLOCK));
    assert_eq!(html(&page, targets::COMPANY_EMAILS), "");
}

#[tokio::test]
async fn search_shows_panel_only_with_hits() {
    let addr = serve().await;
    let (page, api) = (page(addr), client(addr, ""));

    page.set_value_all(actions::SEARCH_INPUT, "acme & ");
    assert_eq!(actions::search_customers(&page, &api).await.unwrap(), 1);
    assert!(visible(&page, targets::SEARCH_PANEL));
    assert_eq!(page.first_value(actions::SELECTED_CUSTOMER), "");
    assert!(html(&page, targets::SEARCH_LIST).contains("Acme &amp; Sons"));

    page.set_value_all(actions::SEARCH_INPUT, "zzz");
    assert_eq!(actions::search_customers(&page, &api).await.unwrap(), 0);
    assert!(!visible(&page, targets::SEARCH_PANEL));
}

async fn echoed(api: &ApiClient, method: Method, url: &str) -> Value {
    api.request(method, url)
        .unwrap()
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn token_header_follows_origin_and_method() {
    let addr = serve().await;
    let other = serve().await;
    let api = client(addr, "sessionid=abc; csrftoken=tok%2B1");

    let same = echoed(&api, Method::POST, "/echo").await;
    assert_eq!(same["token"], "tok+1");
    assert_eq!(same["cookie"], "sessionid=abc; csrftoken=tok%2B1");

    let get = echoed(&api, Method::GET, "/echo").await;
    assert_eq!(get["token"], "tok+1");

    let options = echoed(&api, Method::OPTIONS, "/echo").await;
    assert_eq!(options["token"], Value::Null);

    let cross = echoed(&api, Method::POST, &format!("http://{other}/echo")).await;
    assert_eq!(cross["token"], Value::Null);
}

#[tokio::test]
async fn no_token_cookie_means_no_header() {
    let addr = serve().await;
    let api = client(addr, "sessionid=abc");
    let body = echoed(&api, Method::POST, "/echo").await;
    assert_eq!(body["token"], Value::Null);
}
