pub mod dom;
pub mod events;
pub mod jquery;

use std::cell::OnceCell;
use std::rc::Rc;

use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::actions;
use crate::api::{ApiClient, ClientOptions};
use crate::config::{self, PageContext};
use crate::csrf::CookieSource;
use crate::page::Page;

use dom::{WebPage, WebSession};

pub struct Browser {
    pub page: WebPage,
    pub api: ApiClient,
    pub session: Option<WebSession>,
}

thread_local! {
    static BROWSER: OnceCell<Rc<Browser>> = const { OnceCell::new() };
}

fn browser() -> Option<Rc<Browser>> {
    BROWSER.with(|cell| cell.get().cloned())
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

impl Browser {
    fn open(page: WebPage) -> Result<Self, JsValue> {
        let context = config::page_context().ok_or("page context not initialised")?;
        debug!(host = %context.host, static_path = ?context.static_path, "page context");
        let options = ClientOptions {
            cookies: CookieSource::new(page.cookie_header()),
            ..ClientOptions::default()
        };
        let api = ApiClient::new(context.clone(), options).map_err(js_error)?;
        let session = WebSession::open(page.window());
        Ok(Self { page, api, session })
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let page = WebPage::new()?;
    let context = PageContext::from_location(&page.location(), page.last_script_src().as_deref())
        .map_err(js_error)?;
    config::init_page_context(context).map_err(js_error)?;

    let browser = Rc::new(Browser::open(page)?);
    BROWSER.with(|cell| cell.set(Rc::clone(&browser)))
        .map_err(|_| JsValue::from_str("page already started"))?;
    events::bind(&browser)
}

fn id_arg(value: &JsValue) -> Option<String> {
    let id = actions::record_id(value.as_string(), value.as_f64());
    if id.is_none() {
        debug!("ignoring non-scalar record id");
    }
    id
}

#[wasm_bindgen(js_name = quotationDetails)]
pub fn quotation_details(quotation_id: JsValue) {
    let (Some(b), Some(id)) = (browser(), id_arg(&quotation_id)) else {
        return;
    };
    spawn_local(async move {
        let _ = actions::show_quotation(&b.page, &b.api, &id).await;
    });
}

#[wasm_bindgen(js_name = orderDetails)]
pub fn order_details(order_id: JsValue) {
    let (Some(b), Some(id)) = (browser(), id_arg(&order_id)) else {
        return;
    };
    spawn_local(async move {
        let _ = actions::show_order(&b.page, &b.api, &id).await;
    });
}

#[wasm_bindgen(js_name = getEmails)]
pub fn get_emails(customer_id: JsValue) {
    let (Some(b), Some(id)) = (browser(), id_arg(&customer_id)) else {
        return;
    };
    spawn_local(async move {
        let _ = actions::show_customer_emails(&b.page, &b.api, &id).await;
    });
}

#[wasm_bindgen(js_name = customerSerachApi)]
pub fn search_customers() {
    let Some(b) = browser() else {
        return;
    };
    spawn_local(async move {
        let _ = actions::search_customers(&b.page, &b.api).await;
    });
}
