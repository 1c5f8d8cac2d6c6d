use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct QuotationDetail(pub QuotationSummary, pub QuotationLines);

impl QuotationDetail {
    pub fn summary(&self) -> &QuotationSummary {
        &self.0
    }

    pub fn products(&self) -> &[Product] {
        &self.1.products
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct QuotationSummary {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub enquiry: Value,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub delivery: Value,
    #[serde(default)]
    pub freight: Value,
    #[serde(default)]
    pub others: Value,
    #[serde(default)]
    pub payment_terms: Value,
    #[serde(default)]
    pub taxes: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct QuotationLines {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Product {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub prices_each: Value,
    #[serde(default)]
    pub net_price: Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct OrderDetail {
    #[serde(default)]
    pub po_number: Value,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub material: Value,
    #[serde(default)]
    pub is_special: Value,
    #[serde(default)]
    pub get_status_display: Value,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CustomerHit {
    pub id: Value,
    #[serde(default)]
    pub company_name: Value,
}

pub fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Bool(true) => Some("Yes".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quotation_detail_reads_two_part_array() {
        let raw = json!([
            {"id": 7, "enquiry": "ENQ-7", "date": "2017-06-13T14:05:00Z", "taxes": "18%"},
            {"products": [{"name": "Valve", "quantity": 2, "prices_each": "10.00", "net_price": "20.00"}]}
        ]);
        let detail: QuotationDetail = serde_json::from_value(raw).unwrap();
        assert_eq!(detail.summary().id, json!(7));
        assert_eq!(detail.summary().delivery, Value::Null);
        assert_eq!(detail.products().len(), 1);
        assert_eq!(detail.products()[0].quantity, json!(2));
    }

    #[test]
    fn quotation_detail_rejects_object_shape() {
        let raw = json!({"id": 7, "products": []});
        assert!(serde_json::from_value::<QuotationDetail>(raw).is_err());
    }

    #[test]
    fn field_text_treats_falsy_values_as_missing() {
        assert_eq!(field_text(&Value::Null), None);
        assert_eq!(field_text(&json!("")), None);
        assert_eq!(field_text(&json!(false)), None);
        assert_eq!(field_text(&json!(0)).as_deref(), Some("0"));
        assert_eq!(field_text(&json!(true)).as_deref(), Some("Yes"));
        assert_eq!(field_text(&json!("PO-1")).as_deref(), Some("PO-1"));
    }
}
