use wasm_bindgen::prelude::*;

use crate::page::Transition;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type JQuery;

    #[wasm_bindgen(js_name = "$")]
    pub fn jq(target: &JsValue) -> JQuery;

    #[wasm_bindgen(method)]
    fn show(this: &JQuery);

    #[wasm_bindgen(method, js_name = show)]
    fn show_effect(this: &JQuery, effect: &str, millis: u32);

    #[wasm_bindgen(method)]
    fn hide(this: &JQuery);

    #[wasm_bindgen(method, js_name = hide)]
    fn hide_effect(this: &JQuery, effect: &str, millis: u32);

    #[wasm_bindgen(method, js_name = fadeIn)]
    fn fade_in(this: &JQuery);

    #[wasm_bindgen(method, js_name = fadeOut)]
    fn fade_out(this: &JQuery);

    #[wasm_bindgen(method, js_name = slideDown)]
    fn slide_down(this: &JQuery, millis: u32);

    #[wasm_bindgen(method, js_name = slideUp)]
    fn slide_up(this: &JQuery, millis: u32);

    #[wasm_bindgen(method, js_name = is)]
    pub fn matches(this: &JQuery, selector: &str) -> bool;

    #[wasm_bindgen(method)]
    pub fn modal(this: &JQuery, command: &str);

    #[wasm_bindgen(method)]
    pub fn datetimepicker(this: &JQuery, options: &JsValue);
}

pub fn select(selector: &str) -> JQuery {
    jq(&JsValue::from_str(selector))
}

pub fn set_visible(target: &JQuery, visible: bool, transition: Transition) {
    let millis = |d: std::time::Duration| u32::try_from(d.as_millis()).unwrap_or(u32::MAX);
    match (transition, visible) {
        (Transition::Instant, true) => target.show(),
        (Transition::Instant, false) => target.hide(),
        (Transition::Fade, true) => target.fade_in(),
        (Transition::Fade, false) => target.fade_out(),
        (Transition::Slide(d), true) => target.slide_down(millis(d)),
        (Transition::Slide(d), false) => target.slide_up(millis(d)),
        (Transition::Blind(d), true) => target.show_effect("blind", millis(d)),
        (Transition::Blind(d), false) => target.hide_effect("blind", millis(d)),
    }
}
