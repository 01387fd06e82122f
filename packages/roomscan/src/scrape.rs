//! Product scraping via Apify actors, with URL-based routing.

use apify_client::ApifyClient;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::SecretString;
use crate::error::{PipelineError, Result};
use crate::traits::ProductScraper;
use crate::types::ProductRow;

/// Substring that routes a URL to the Amazon-specific actor.
const AMAZON_MARKER: &str = "amazon.";

/// Whether a product URL should go to the Amazon actor.
pub(crate) fn is_amazon_url(url: &str) -> bool {
    url.contains(AMAZON_MARKER)
}

/// Scrapes product detail through Apify actors.
///
/// URLs containing `amazon.` are dispatched to the Amazon actor; anything
/// else goes to the generic Google Shopping actor.
pub struct ApifyProductScraper {
    client: ApifyClient,
}

impl ApifyProductScraper {
    pub fn new(token: &SecretString) -> Self {
        Self {
            client: ApifyClient::new(token.expose().to_string()),
        }
    }

    async fn scrape_amazon(&self, url: &str) -> Result<Option<ProductRow>> {
        let items = self
            .client
            .scrape_amazon_product(url)
            .await
            .map_err(|e| PipelineError::remote("amazon-scraper", e))?;

        let Some(item) = items.into_iter().next() else {
            debug!(url, "Amazon actor returned no items");
            return Ok(None);
        };

        Ok(Some(amazon_row(item, url)))
    }

    async fn scrape_google(&self, url: &str) -> Result<Option<ProductRow>> {
        let items = self
            .client
            .scrape_google_shopping(url)
            .await
            .map_err(|e| PipelineError::remote("google-shopping-scraper", e))?;

        let Some(item) = items.into_iter().next() else {
            debug!(url, "Google Shopping actor returned no items");
            return Ok(None);
        };

        Ok(Some(google_row(item, url)))
    }
}

fn amazon_row(item: apify_client::AmazonProductItem, url: &str) -> ProductRow {
    let price = item.price_text().unwrap_or_else(|| "N/A".to_string());
    ProductRow::new(
        item.title.unwrap_or_else(|| "unknown".to_string()),
        price,
        "amazon.com",
        url,
    )
}

fn google_row(item: apify_client::GoogleShoppingItem, url: &str) -> ProductRow {
    let price = item.price_text().unwrap_or_else(|| "N/A".to_string());
    ProductRow::new(
        item.title.unwrap_or_else(|| "unknown".to_string()),
        price,
        item.seller.unwrap_or_else(|| "unknown".to_string()),
        url,
    )
}

#[async_trait]
impl ProductScraper for ApifyProductScraper {
    async fn scrape(&self, url: &str) -> Result<Option<ProductRow>> {
        info!(url, amazon = is_amazon_url(url), "scraping product link");
        if is_amazon_url(url) {
            self.scrape_amazon(url).await
        } else {
            self.scrape_google(url).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amazon_urls_route_to_amazon_actor() {
        assert!(is_amazon_url("https://www.amazon.com/dp/B0EXAMPLE"));
        assert!(is_amazon_url("https://amazon.de/gp/product/123"));
    }

    #[test]
    fn other_urls_route_to_google_shopping() {
        assert!(!is_amazon_url("https://www.wayfair.com/p/123"));
        assert!(!is_amazon_url("https://shopping.google.com/product/1"));
    }

    #[test]
    fn amazon_items_map_price_and_title_into_rows() {
        let url = "https://www.amazon.com/dp/X";
        let item = apify_client::AmazonProductItem {
            title: Some("Chair".to_string()),
            price: Some(serde_json::json!("49.99")),
            url: Some(url.to_string()),
        };

        let row = amazon_row(item, url);
        assert_eq!(row.item_name, "Chair");
        assert_eq!(row.price, "49.99");
        assert_eq!(row.website, "amazon.com");
        assert_eq!(row.product_link, url);
    }

    #[test]
    fn missing_amazon_fields_fall_back_to_defaults() {
        let item = apify_client::AmazonProductItem {
            title: None,
            price: None,
            url: None,
        };

        let row = amazon_row(item, "https://amazon.de/gp/product/1");
        assert_eq!(row.item_name, "unknown");
        assert_eq!(row.price, "N/A");
    }

    #[test]
    fn google_items_take_website_from_seller() {
        let url = "https://shop.example/p/9";
        let item = apify_client::GoogleShoppingItem {
            title: Some("Table".to_string()),
            price: Some(serde_json::json!(89.0)),
            seller: Some("shop.example".to_string()),
            url: Some(url.to_string()),
        };

        let row = google_row(item, url);
        assert_eq!(row.item_name, "Table");
        assert_eq!(row.price, "89.0");
        assert_eq!(row.website, "shop.example");
    }
}
