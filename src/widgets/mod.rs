use serde::Serialize;

pub const DATE_TIME_FORMAT: &str = "YYYY-MM-DD hh:mm A";
pub const DATE_FORMAT: &str = "YYYY-MM-DD";

pub const LAST_CALLED_INPUT: &str = "#datetimepicker-last_called";
pub const DATE_INPUTS: &str = "#delivery-date, #order-delivery-date, #gr-date, #billing-date";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PickerIcons {
    pub time: &'static str,
    pub date: &'static str,
    pub up: &'static str,
    pub down: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub today: &'static str,
    pub clear: &'static str,
    pub close: &'static str,
}

impl Default for PickerIcons {
    fn default() -> Self {
        Self {
            time: "fa fa-clock-o",
            date: "fa-calendar",
            up: "fa fa-chevron-up",
            down: "fa fa-chevron-down",
            previous: "fa fa fa-chevron-left",
            next: "fa fa-chevron-right",
            today: "fa fa-crosshairs",
            clear: "fa fa-trash",
            close: "fa fa-times",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatePickerOptions {
    pub format: &'static str,
    pub icons: PickerIcons,
}

impl DatePickerOptions {
    pub fn date_time() -> Self {
        Self {
            format: DATE_TIME_FORMAT,
            icons: PickerIcons::default(),
        }
    }

    pub fn date_only() -> Self {
        Self {
            format: DATE_FORMAT,
            icons: PickerIcons::default(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerBinding {
    pub selector: &'static str,
    pub options: DatePickerOptions,
}

pub fn bindings() -> Vec<PickerBinding> {
    vec![
        PickerBinding {
            selector: LAST_CALLED_INPUT,
            options: DatePickerOptions::date_time(),
        },
        PickerBinding {
            selector: DATE_INPUTS,
            options: DatePickerOptions::date_only(),
        },
    ]
}
