//! Sales endpoints.

use bazaar_core::{Sale, SaleRequest, SalesSummary};
use reqwest::Method;
use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(untagged)]
enum SaleList {
    Bare(Vec<Sale>),
    Keyed { sales: Vec<Sale> },
}

impl ApiClient {
    /// `POST /sales/sell`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the sale (e.g. stock changed
    /// since the form was rendered) or the request fails.
    #[instrument(skip(self, request), fields(product_id = %request.product_id, quantity = request.quantity_sold))]
    pub async fn sell(&self, request: &SaleRequest) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .send(self.request(Method::POST, "/sales/sell").json(request))
            .await?;
        Ok(())
    }

    /// `GET /sales/summary`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn sales_summary(&self) -> Result<SalesSummary, ApiError> {
        self.send(self.request(Method::GET, "/sales/summary")).await
    }

    /// `GET /sales/history`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn sales_history(&self) -> Result<Vec<Sale>, ApiError> {
        let list: SaleList = self.send(self.request(Method::GET, "/sales/history")).await?;
        let mut sales = match list {
            SaleList::Bare(sales) | SaleList::Keyed { sales } => sales,
        };
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sales)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::client::tests::client_for;
    use bazaar_core::{ProductId, SaleRequest};
    use rust_decimal::dec;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_sell_posts_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sales/sell"))
            .and(body_json(json!({"productId": "p1", "quantitySold": 5})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let request = SaleRequest {
            product_id: ProductId::new("p1"),
            quantity_sold: 5,
            custom_selling_price: None,
        };
        client_for(&server).sell(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_history_sorted_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sales/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {"_id": "s1", "productId": "p1", "quantitySold": 1, "totalSaleValue": 150,
                     "totalPurchaseValue": 100, "profit": 50, "createdAt": "2024-05-01T10:00:00Z"},
                    {"_id": "s2", "productId": "p1", "quantitySold": 2, "totalSaleValue": 300,
                     "totalPurchaseValue": 200, "profit": 100, "createdAt": "2024-05-02T10:00:00Z"}
                ]
            })))
            .mount(&server)
            .await;

        let sales = client_for(&server).sales_history().await.unwrap();
        assert_eq!(sales[0].id.as_str(), "s2");
    }

    #[tokio::test]
    async fn test_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sales/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"totalSales": 4, "totalQuantity": 9, "totalRevenue": 1350, "totalProfit": 450}
            })))
            .mount(&server)
            .await;

        let summary = client_for(&server).sales_summary().await.unwrap();
        assert_eq!(summary.total_profit, dec!(450));
        assert_eq!(summary.today_sales, None);
    }
}
