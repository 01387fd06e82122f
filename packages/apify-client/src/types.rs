use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input for the epctex/amazon-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct AmazonScraperInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
}

/// A single start URL entry, as the actors expect it.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// Input for the apify/google-shopping-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleShoppingInput {
    #[serde(rename = "productUrls")]
    pub product_urls: Vec<String>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
}

/// A product item from the Amazon scraper dataset.
///
/// The actor emits `price` in several shapes (bare number, formatted
/// string, `{value, currency}` object), so it is kept as raw JSON and
/// rendered via [`price_text`](Self::price_text).
#[derive(Debug, Clone, Deserialize)]
pub struct AmazonProductItem {
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    pub url: Option<String>,
}

impl AmazonProductItem {
    /// Best-effort textual rendering of the price field.
    pub fn price_text(&self) -> Option<String> {
        self.price.as_ref().map(render_price)
    }
}

/// A product item from the Google Shopping scraper dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleShoppingItem {
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    pub seller: Option<String>,
    pub url: Option<String>,
}

impl GoogleShoppingItem {
    /// Best-effort textual rendering of the price field.
    pub fn price_text(&self) -> Option<String> {
        self.price.as_ref().map(render_price)
    }
}

fn render_price(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => map
            .get("value")
            .map(render_price)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_text_handles_number_string_and_object() {
        let mut item = AmazonProductItem {
            title: Some("Chair".into()),
            price: Some(json!(49.99)),
            url: None,
        };
        assert_eq!(item.price_text().as_deref(), Some("49.99"));

        item.price = Some(json!("$49.99"));
        assert_eq!(item.price_text().as_deref(), Some("$49.99"));

        item.price = Some(json!({"value": 49.99, "currency": "USD"}));
        assert_eq!(item.price_text().as_deref(), Some("49.99"));

        item.price = None;
        assert_eq!(item.price_text(), None);
    }
}
