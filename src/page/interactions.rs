use std::time::Duration;

use super::{Page, SessionStore, Transition, LOADER};
use crate::render::{targets, SEARCH_TRANSITION};

pub const BANNER_DISMISS_DELAY: Duration = Duration::from_millis(5000);
pub const BANNERS: &str = ".success-message, .error-message, .successbox";

pub const TABLE_OVERFLOW_CANDIDATE: &str = ".table-over-flow-coloum";
pub const TABLE_OVERFLOW_MARKER: &str = "textOverflowPopup";
pub const TITLE_OVERFLOW_CANDIDATE: &str = ".title-over-flow-coloum";
pub const TITLE_OVERFLOW_MARKER: &str = "titleOverflowPopup";
pub const OVERFLOW_MODAL: &str = "#textOverflowPopup";
pub const OVERFLOW_MODAL_BODY: &str = "#textOverflowPopup #textOverflowPopup-container";

pub const USER_MENU_TOGGLE: &str = "#user-menu";
pub const USER_MENU_PANEL: &str = "#user-sub-menu";
pub const USER_MENU_KEY: &str = "noticeStatus";

pub const LIST_CHECKBOXES: &str = ".list-checkbox input:checkbox";
pub const LIST_CHECKED: &str = ".list-checkbox input:checked";
pub const SELECT_ALL: &str = "#checked-all > input";
pub const DELETE_TRIGGER: &str = "#ask-to-delete";
pub const DELETE_MODAL: &str = "#delete-confirm-modal";

pub const IMAGE_INPUT: &str = "#id_image";
pub const IMAGE_PREVIEW: &str = "#customer-profile-img-prv > img";
pub const IMAGE_PROXY: &str = "#customer-file-img";

pub const MENU_LINKS: &str = "#menu-list a";
pub const ACTIVE_MENU: &str = "active-menu";

pub const FILTER_NAMES: [&str; 6] = [
    "status",
    "through",
    "company",
    "is_special",
    "customer_code",
    "company_type",
];
pub const CLEAR_FILTERS: &str = ".clear-radio";

pub const PERMISSION_MASTER: &str = ".permission-input-master input";
pub const PERMISSIONS: &str = ".permission-input input";

pub const QUOTATION_CARDS: &str = "#quotation-outer-box > div";
pub const FIRST_QUOTATION_CARD: &str = "#quotation-details-id-0";
pub const ACTIVE_CARD: &str = "blue-active";

pub const PASSWORD_EYE: &str = "#password-eye";
pub const PASSWORD_INPUT: &str = "#id_password";

pub const FORM_INPUTS: &str = ".gray-form-border > input";
pub const FOCUSED_INPUT: &str = "form-input-shadow";

pub const SEARCH_RESULT_ITEM: &str = ".search-list-val";
pub const CUSTOMER_EMAIL_SELECT: &str = "#customer-list select";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchSelection {
    pub id: String,
    pub label: String,
}

impl SearchSelection {
    pub fn from_node<P: Page>(page: &P, node: &P::Node) -> Self {
        Self {
            id: page.id(node),
            label: page.text(node),
        }
    }
}

pub fn hide_loader<P: Page>(page: &P) {
    page.hide_all(LOADER, Transition::Fade);
}

pub fn dismiss_banners<P: Page>(page: &P) {
    page.hide_all(BANNERS, Transition::Slide(Duration::from_millis(500)));
}

pub fn mark_overflowing<P: Page>(page: &P, candidate: &str, marker: &str) -> usize {
    let mut marked = 0;
    for node in page.query(candidate) {
        if page.metrics(&node).overflows() {
            page.add_class(&node, marker);
            marked += 1;
        }
    }
    marked
}

pub fn open_overflow_popup<P: Page>(page: &P, node: &P::Node) {
    let html = page.inner_html(node);
    page.set_html_all(OVERFLOW_MODAL_BODY, &html);
    page.open_modal(OVERFLOW_MODAL);
}

pub fn toggle_user_menu<P: Page>(page: &P, session: Option<&dyn SessionStore>) -> bool {
    let Some(panel) = page.query(USER_MENU_PANEL).into_iter().next() else {
        return false;
    };
    let open = !page.is_visible(&panel);
    page.set_visible(&panel, open, Transition::Slide(Duration::from_millis(400)));
    if let Some(store) = session {
        store.set(USER_MENU_KEY, if open { "1" } else { "0" });
    }
    open
}

pub fn restore_user_menu<P: Page>(page: &P, session: Option<&dyn SessionStore>) {
    let Some(store) = session else {
        return;
    };
    if store.get(USER_MENU_KEY).as_deref() == Some("1") {
        page.show_all(USER_MENU_PANEL, Transition::Instant);
    }
}

pub fn set_all_listed<P: Page>(page: &P, checked: bool) {
    page.set_checked_all(LIST_CHECKBOXES, checked);
}

pub fn confirm_bulk_delete<P: Page>(page: &P) -> bool {
    if page.query(LIST_CHECKED).is_empty() {
        return false;
    }
    page.open_modal(DELETE_MODAL);
    true
}

pub fn preview_image<P: Page>(page: &P, data_url: &str) {
    for node in page.query(IMAGE_PREVIEW) {
        page.set_attr(&node, "src", data_url);
    }
}

pub fn open_image_picker<P: Page>(page: &P) {
    for node in page.query(IMAGE_INPUT) {
        page.click(&node);
    }
}

pub fn highlight_active_menu<P: Page>(page: &P) -> usize {
    let location = page.location();
    let mut highlighted = 0;
    for link in page.query(MENU_LINKS) {
        if page.resolved_href(&link).as_deref() == Some(location.as_str()) {
            for item in page.children(&link, "li") {
                page.add_class(&item, ACTIVE_MENU);
            }
            highlighted += 1;
        }
    }
    highlighted
}

pub fn hide_search_results<P: Page>(page: &P) {
    page.hide_all(targets::SEARCH_PANEL, SEARCH_TRANSITION);
}

pub fn select_search_result<P: Page>(page: &P, selection: &SearchSelection) {
    page.set_value_all(crate::actions::SEARCH_INPUT, &selection.label);
    hide_search_results(page);
    page.set_value_all(crate::actions::SELECTED_CUSTOMER, &selection.id);
}

pub fn clear_filters<P: Page>(page: &P) {
    for name in FILTER_NAMES {
        page.set_checked_all(&format!("input[name={name}]"), false);
    }
}

pub fn sync_permission_master<P: Page>(page: &P, checked: bool) {
    for node in page.query(PERMISSIONS) {
        page.set_checked(&node, checked);
        page.set_disabled(&node, checked);
    }
}

pub fn select_quotation_card<P: Page>(page: &P, card: &P::Node) {
    page.remove_class_all(QUOTATION_CARDS, ACTIVE_CARD);
    page.add_class(card, ACTIVE_CARD);
}

pub fn highlight_first_quotation_card<P: Page>(page: &P) {
    page.add_class_all(FIRST_QUOTATION_CARD, ACTIVE_CARD);
}

pub fn reveal_password<P: Page>(page: &P) {
    for node in page.query(PASSWORD_INPUT) {
        page.set_attr(&node, "type", "text");
    }
}

pub fn focus_form_input<P: Page>(page: &P, input: &P::Node) {
    page.remove_class_all(&format!(".{FOCUSED_INPUT}"), FOCUSED_INPUT);
    page.add_class(input, FOCUSED_INPUT);
}
