use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::page::{Loader, Page};
use crate::render;

pub const SEARCH_INPUT: &str = "#search-input > input";
pub const SELECTED_CUSTOMER: &str = "#id_customer";

pub fn record_id(text: Option<String>, number: Option<f64>) -> Option<String> {
    text.or_else(|| number.filter(|n| n.is_finite()).map(|n| n.to_string()))
}

pub async fn show_quotation<P: Page>(
    page: &P,
    api: &ApiClient,
    quotation_id: &str,
) -> Result<(), ApiError> {
    let _loader = Loader::show(page);
    match api.quotation_details(quotation_id).await {
        Ok(detail) => {
            render::quotation(&detail).apply(page);
            Ok(())
        }
        Err(e) => {
            debug!("quotation {quotation_id}: {e}");
            render::quotation_cleared().apply(page);
            Err(e)
        }
    }
}

pub async fn show_order<P: Page>(page: &P, api: &ApiClient, order_id: &str) -> Result<(), ApiError> {
    let _loader = Loader::show(page);
    match api.order_details(order_id).await {
        Ok(detail) => {
            render::order(&detail).apply(page);
            Ok(())
        }
        Err(e) => {
            debug!("order {order_id}: {e}");
            render::order_cleared().apply(page);
            Err(e)
        }
    }
}

pub async fn show_customer_emails<P: Page>(
    page: &P,
    api: &ApiClient,
    customer_id: &str,
) -> Result<usize, ApiError> {
    let _loader = Loader::show(page);
    match api.customer_emails(customer_id).await {
        Ok(emails) => {
            render::customer_emails(&emails).apply(page);
            Ok(emails.len())
        }
        Err(e) => {
            debug!("emails for customer {customer_id}: {e}");
            render::customer_emails_cleared().apply(page);
            Err(e)
        }
    }
}

pub async fn search_customers<P: Page>(page: &P, api: &ApiClient) -> Result<usize, ApiError> {
    page.set_value_all(SELECTED_CUSTOMER, "");
    let query = page.first_value(SEARCH_INPUT);
    match api.search_customers(&query).await {
        Ok(hits) => {
            render::search_results(&hits).apply(page);
            Ok(hits.len())
        }
        Err(e) => {
            debug!("customer search {query:?}: {e}");
            render::search_results_hidden().apply(page);
            Err(e)
        }
    }
}
