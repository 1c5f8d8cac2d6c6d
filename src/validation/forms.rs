use super::{FieldCheck, FormSpec, Presence, Rule};

const fn check(field: &'static str, message: &'static str, rule: Rule) -> FieldCheck {
    FieldCheck {
        field,
        message,
        rule,
    }
}

const OPTIONAL_PHONE: Rule = Rule::Phone(Presence::Optional);
const OPTIONAL_EMAIL: Rule = Rule::Email(Presence::Optional);
const CUSTOMER_REQUIRED: FieldCheck = check("customer", "#customer-error", Rule::NonEmpty);

pub const COMPANY_FORM: FormSpec = FormSpec {
    name: "company-form",
    element: "#company-form-id",
    checks: &[
        check("s_contact", "#s_contact-error", OPTIONAL_PHONE),
        check("p_email", "#p_email-error", Rule::Email(Presence::Required)),
        check("s_email", "#s_email-error", OPTIONAL_EMAIL),
        check("t_email", "#t_email-error", OPTIONAL_EMAIL),
    ],
};

pub const STAFF_FORM: FormSpec = FormSpec {
    name: "staff-form",
    element: "#staff-form-id",
    checks: &[
        // the username is the primary phone number
        check("username", "#p_number-error", Rule::Phone(Presence::Required)),
        check("email", "#p_email-error", OPTIONAL_EMAIL),
        check("s_mobile", "#s_mobile-error", OPTIONAL_PHONE),
    ],
};

pub const CUSTOMER_FORM: FormSpec = FormSpec {
    name: "customer-form",
    element: "#customer-form-id",
    checks: &[
        check("p_mobile", "#p-mobile-error", OPTIONAL_PHONE),
        check("s_mobile", "#s_mobile-error", OPTIONAL_PHONE),
        check("t_mobile", "#t_mobile-error", OPTIONAL_PHONE),
        check("p_email", "#p_email-error", Rule::Email(Presence::Required)),
        check("s_email", "#s_email-error", OPTIONAL_EMAIL),
        check("t_email", "#t_email-error", OPTIONAL_EMAIL),
        check("q_email", "#q_email-error", OPTIONAL_EMAIL),
    ],
};

pub const ENQUIRY_FORM: FormSpec = FormSpec {
    name: "enquiry-form",
    element: "#enquiry-form-id",
    checks: &[
        CUSTOMER_REQUIRED,
        check("contact", "#contact-error", OPTIONAL_PHONE),
    ],
};

pub const ORDER_FORM: FormSpec = FormSpec {
    name: "order-form",
    element: "#order-form-id",
    checks: &[CUSTOMER_REQUIRED],
};

pub const COMPLAIN_FORM: FormSpec = FormSpec {
    name: "complain-form",
    element: "#complian-form-id",
    checks: &[CUSTOMER_REQUIRED],
};

pub const FEEDBACK_FORM: FormSpec = FormSpec {
    name: "feedback-form",
    element: "#feedback-form-id",
    checks: &[CUSTOMER_REQUIRED],
};

pub const FORMS: [&FormSpec; 7] = [
    &COMPANY_FORM,
    &STAFF_FORM,
    &CUSTOMER_FORM,
    &ENQUIRY_FORM,
    &ORDER_FORM,
    &COMPLAIN_FORM,
    &FEEDBACK_FORM,
];

pub fn form(name: &str) -> Option<&'static FormSpec> {
    FORMS.iter().copied().find(|f| f.name == name)
}
