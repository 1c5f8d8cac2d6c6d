use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, FileReader, HtmlFormElement, HtmlInputElement};

use crate::page::interactions::{self, SearchSelection};
use crate::page::{Page, SessionStore};
use crate::validation::{self, PageMessages};
use crate::widgets;

use super::dom::FormControls;
use super::{jquery, Browser};

fn listen<T: AsRef<EventTarget>>(target: &T, event: &str, handler: impl FnMut(Event) + 'static) {
    let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
    let _ = target
        .as_ref()
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
    callback.forget();
}

fn on_each<H>(browser: &Rc<Browser>, selector: &str, event: &str, handler: H)
where
    H: Fn(&Browser, &Element, &Event) + Clone + 'static,
{
    for element in browser.page.query(selector) {
        let browser = Rc::clone(browser);
        let handler = handler.clone();
        let node = element.clone();
        listen(&element, event, move |ev| handler(&browser, &node, &ev));
    }
}

fn delegate<H>(browser: &Rc<Browser>, event: &str, selector: String, handler: H)
where
    H: Fn(&Browser, &Element, &Event) + 'static,
{
    let owner = Rc::clone(browser);
    listen(browser.page.document(), event, move |ev| {
        let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        if let Ok(Some(hit)) = target.closest(&selector) {
            handler(&owner, &hit, &ev);
        }
    });
}

fn after(browser: &Rc<Browser>, delay: Duration, task: impl FnOnce(&Browser) + 'static) {
    let owner = Rc::clone(browser);
    let callback = Closure::once_into_js(move || task(&owner));
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let _ = browser
        .page
        .window()
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis);
}

fn session(browser: &Browser) -> Option<&dyn SessionStore> {
    browser.session.as_ref().map(|s| s as &dyn SessionStore)
}

fn bind_pickers() -> Result<(), JsValue> {
    for binding in widgets::bindings() {
        let options = js_sys::JSON::parse(&binding.options.to_json().to_string())?;
        jquery::select(binding.selector).datetimepicker(&options);
    }
    Ok(())
}

fn read_preview(input: &Element) {
    let Some(file) = input
        .dyn_ref::<HtmlInputElement>()
        .and_then(|i| i.files())
        .and_then(|files| files.get(0))
    else {
        return;
    };
    let Ok(reader) = FileReader::new() else {
        return;
    };
    let loaded = reader.clone();
    let onload = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event| {
        let Some(data_url) = loaded.result().ok().and_then(|r| r.as_string()) else {
            return;
        };
        if let Some(browser) = super::browser() {
            interactions::preview_image(&browser.page, &data_url);
        }
    }));
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();
    let _ = reader.read_as_data_url(&file);
}

fn bind_forms(browser: &Rc<Browser>) {
    for form in validation::FORMS {
        on_each(browser, form.element, "submit", move |b, node, ev| {
            let Some(element) = node.dyn_ref::<HtmlFormElement>() else {
                return;
            };
            let fields = FormControls(element.clone());
            let mut messages = PageMessages::new(&b.page);
            if !validation::validate(form, &fields, &mut messages).allows_submit() {
                ev.prevent_default();
            }
        });
    }
}

pub fn bind(browser: &Rc<Browser>) -> Result<(), JsValue> {
    let page = &browser.page;

    bind_pickers()?;

    if page.document().ready_state() == "complete" {
        interactions::hide_loader(page);
    } else {
        let owner = Rc::clone(browser);
        listen(page.window(), "load", move |_| interactions::hide_loader(&owner.page));
    }

    after(browser, interactions::BANNER_DISMISS_DELAY, |b| {
        interactions::dismiss_banners(&b.page)
    });

    interactions::mark_overflowing(
        page,
        interactions::TABLE_OVERFLOW_CANDIDATE,
        interactions::TABLE_OVERFLOW_MARKER,
    );
    interactions::mark_overflowing(
        page,
        interactions::TITLE_OVERFLOW_CANDIDATE,
        interactions::TITLE_OVERFLOW_MARKER,
    );
    delegate(
        browser,
        "click",
        format!(".{}", interactions::TABLE_OVERFLOW_MARKER),
        |b, node, _| interactions::open_overflow_popup(&b.page, node),
    );

    interactions::restore_user_menu(page, session(browser));
    on_each(browser, interactions::USER_MENU_TOGGLE, "click", |b, _, _| {
        interactions::toggle_user_menu(&b.page, session(b));
    });

    on_each(browser, interactions::FORM_INPUTS, "click", |b, node, ev| {
        ev.stop_propagation();
        interactions::focus_form_input(&b.page, node);
    });

    on_each(browser, interactions::DELETE_TRIGGER, "click", |b, _, _| {
        interactions::confirm_bulk_delete(&b.page);
    });
    on_each(browser, interactions::SELECT_ALL, "click", |b, node, _| {
        interactions::set_all_listed(&b.page, b.page.is_checked(node));
    });
    on_each(browser, interactions::PASSWORD_EYE, "click", |b, _, _| {
        interactions::reveal_password(&b.page)
    });
    on_each(browser, interactions::CLEAR_FILTERS, "click", |b, _, _| {
        interactions::clear_filters(&b.page)
    });

    on_each(browser, interactions::IMAGE_INPUT, "change", |_, node, _| read_preview(node));
    let pickers = format!("{}, {}", interactions::IMAGE_PROXY, interactions::IMAGE_PREVIEW);
    on_each(browser, &pickers, "click", |b, _, _| {
        interactions::open_image_picker(&b.page)
    });

    interactions::highlight_active_menu(page);

    interactions::highlight_first_quotation_card(page);
    on_each(browser, interactions::QUOTATION_CARDS, "click", |b, node, _| {
        interactions::select_quotation_card(&b.page, node)
    });

    on_each(browser, interactions::PERMISSION_MASTER, "change", |b, node, _| {
        interactions::sync_permission_master(&b.page, b.page.is_checked(node))
    });

    listen(page.document(), "click", {
        let owner = Rc::clone(browser);
        move |_| interactions::hide_search_results(&owner.page)
    });
    for event in ["click", "touchstart"] {
        delegate(
            browser,
            event,
            interactions::SEARCH_RESULT_ITEM.to_string(),
            |b, node, ev| {
                ev.prevent_default();
                let selection = SearchSelection::from_node(&b.page, node);
                interactions::select_search_result(&b.page, &selection);
            },
        );
    }

    on_each(browser, interactions::CUSTOMER_EMAIL_SELECT, "change", |b, node, _| {
        super::get_emails(b.page.value(node));
    });

    bind_forms(browser);
    Ok(())
}
