pub mod forms;

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::page::Page;

pub use forms::{form, FORMS};

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$";
const PHONE_PATTERN: &str = r"^[0-9]{9,12}$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

pub fn is_email(value: &str) -> bool {
    email_regex().is_match(value)
}

pub fn is_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field Required")]
    Required,

    #[error("Enter a proper no.")]
    InvalidPhone,

    #[error("Enter a proper Email Id.")]
    InvalidEmail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    NonEmpty,
    Phone(Presence),
    Email(Presence),
}

impl Rule {
    pub fn check(&self, value: &str) -> Result<(), FieldError> {
        let (presence, valid, invalid) = match self {
            Rule::NonEmpty => (Presence::Required, true, FieldError::Required),
            Rule::Phone(p) => (*p, is_phone(value), FieldError::InvalidPhone),
            Rule::Email(p) => (*p, is_email(value), FieldError::InvalidEmail),
        };
        if value.is_empty() {
            return match presence {
                Presence::Required => Err(FieldError::Required),
                Presence::Optional => Ok(()),
            };
        }
        if valid {
            Ok(())
        } else {
            Err(invalid)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldCheck {
    pub field: &'static str,
    pub message: &'static str,
    pub rule: Rule,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormSpec {
    pub name: &'static str,
    pub element: &'static str,
    pub checks: &'static [FieldCheck],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Submit,
    Block {
        field: &'static str,
        error: FieldError,
    },
}

impl Verdict {
    pub fn allows_submit(&self) -> bool {
        matches!(self, Verdict::Submit)
    }
}

pub trait FormFields {
    fn field(&self, name: &str) -> Option<String>;
}

// Items are `(is_radio, checked, value)`; only a checked radio contributes.
pub fn group_value<I>(controls: I) -> String
where
    I: IntoIterator<Item = (bool, bool, String)>,
{
    controls
        .into_iter()
        .find(|(radio, checked, _)| *radio && *checked)
        .map(|(_, _, value)| value)
        .unwrap_or_default()
}

impl FormFields for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl FormFields for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

pub trait MessageSink {
    fn show(&mut self, target: &'static str, message: &str);
}

impl MessageSink for BTreeMap<&'static str, String> {
    fn show(&mut self, target: &'static str, message: &str) {
        self.insert(target, message.to_string());
    }
}

pub struct PageMessages<'a, P: Page> {
    page: &'a P,
}

impl<'a, P: Page> PageMessages<'a, P> {
    pub fn new(page: &'a P) -> Self {
        Self { page }
    }
}

impl<P: Page> MessageSink for PageMessages<'_, P> {
    fn show(&mut self, target: &'static str, message: &str) {
        self.page.set_text_all(target, message);
    }
}

pub fn validate<F, S>(form: &FormSpec, fields: &F, sink: &mut S) -> Verdict
where
    F: FormFields + ?Sized,
    S: MessageSink + ?Sized,
{
    for check in form.checks.iter() {
        let value = fields.field(check.field).unwrap_or_default();
        match check.rule.check(&value) {
            Ok(()) => sink.show(check.message, ""),
            Err(error) => {
                sink.show(check.message, &error.to_string());
                return Verdict::Block {
                    field: check.field,
                    error,
                };
            }
        }
    }
    Verdict::Submit
}
