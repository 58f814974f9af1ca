//! Product endpoints.

use bazaar_core::{Product, ProductId, ProductInput};
use reqwest::Method;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::instrument;

use crate::client::{ApiClient, Upload};
use crate::error::ApiError;

/// Result of a delete attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The product has recorded sales; deleting needs `force=true`.
    RequiresConfirmation {
        sales_count: Option<u64>,
        message: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductList {
    Bare(Vec<Product>),
    Keyed { products: Vec<Product> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductOne {
    Keyed { product: Product },
    Bare(Product),
}

impl ApiClient {
    /// `GET /products`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let list: ProductList = self.send(self.request(Method::GET, "/products")).await?;
        Ok(match list {
            ProductList::Bare(products) | ProductList::Keyed { products } => products,
        })
    }

    /// `GET /products/:id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; a missing product is a 404
    /// [`ApiError::Http`].
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let path = format!("/products/{}", urlencoding::encode(id.as_str()));
        let one: ProductOne = self.send(self.request(Method::GET, &path)).await?;
        Ok(match one {
            ProductOne::Keyed { product } | ProductOne::Bare(product) => product,
        })
    }

    /// `POST /products/add` as multipart, with an optional image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image part is invalid or the request fails.
    #[instrument(skip(self, input, image), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        input: &ProductInput,
        image: Option<Upload>,
    ) -> Result<(), ApiError> {
        let form = product_form(input, image)?;
        let _: IgnoredAny = self
            .send(self.request(Method::POST, "/products/add").multipart(form))
            .await?;
        Ok(())
    }

    /// `PUT /products/update/:id` as multipart. Without an image the existing
    /// one is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the image part is invalid or the request fails.
    #[instrument(skip(self, input, image), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
        image: Option<Upload>,
    ) -> Result<(), ApiError> {
        let form = product_form(input, image)?;
        let path = format!("/products/update/{}", urlencoding::encode(id.as_str()));
        let _: IgnoredAny = self
            .send(self.request(Method::PUT, &path).multipart(form))
            .await?;
        Ok(())
    }

    /// `DELETE /products/delete/:id?force=`
    ///
    /// Without `force`, a product with recorded sales is not deleted and
    /// [`DeleteOutcome::RequiresConfirmation`] is returned instead of an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns any other failure, including a refusal when `force` is set.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        id: &ProductId,
        force: bool,
    ) -> Result<DeleteOutcome, ApiError> {
        let path = format!(
            "/products/delete/{}?force={force}",
            urlencoding::encode(id.as_str())
        );
        match self
            .send::<IgnoredAny>(self.request(Method::DELETE, &path))
            .await
        {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(err) if !force && requires_confirmation(&err) => {
                tracing::info!("Delete blocked by dependent sales");
                Ok(DeleteOutcome::RequiresConfirmation {
                    sales_count: sales_count(&err),
                    message: err.message(),
                })
            }
            Err(err) => Err(err),
        }
    }
}

fn product_form(input: &ProductInput, image: Option<Upload>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in input.form_fields() {
        form = form.text(name, value);
    }
    if let Some(image) = image {
        form = form.part("image", image.into_part()?);
    }
    Ok(form)
}

/// The backend signals dependent sales with 409, or with a positive
/// `salesCount` on any error.
fn requires_confirmation(err: &ApiError) -> bool {
    err.status() == Some(409) || sales_count(err).is_some_and(|n| n > 0)
}

fn sales_count(err: &ApiError) -> Option<u64> {
    err.data()
        .and_then(|data| data.get("salesCount"))
        .and_then(Value::as_u64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use rust_decimal::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn product_json(id: &str) -> Value {
        json!({"_id": id, "name": "Kurta", "purchaseRate": 100, "sellingRate": 150, "quantity": 20})
    }

    #[tokio::test]
    async fn test_list_products_envelope_or_keyed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [product_json("p1"), product_json("p2")]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "products": [product_json("p3")]})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.list_products().await.unwrap();
        assert_eq!(first.len(), 2);
        let second = client.list_products().await.unwrap();
        assert_eq!(second[0].id.as_str(), "p3");
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Product not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_product(&ProductId::new("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Product not found");
    }

    #[tokio::test]
    async fn test_create_product_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/products/add"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let input = ProductInput {
            name: "Kurta".into(),
            barcode: "K1".into(),
            purchase_rate: dec!(100),
            selling_rate: dec!(150),
            quantity: 20,
            gst: dec!(5),
            category: None,
            description: None,
        };
        let image = Upload {
            file_name: "k.png".into(),
            content_type: "image/png".into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        client_for(&server)
            .create_product(&input, Some(image))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"sellingRate\""));
        assert!(body.contains("filename=\"k.png\""));
    }

    #[tokio::test]
    async fn test_delete_without_sales() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/products/delete/p1"))
            .and(query_param("force", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .delete_product(&ProductId::new("p1"), false)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
    }

    #[tokio::test]
    async fn test_delete_with_sales_needs_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/products/delete/p1"))
            .and(query_param("force", "false"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "Product has 3 sales",
                "data": {"salesCount": 3, "requiresForce": true}
            })))
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .delete_product(&ProductId::new("p1"), false)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome::RequiresConfirmation {
                sales_count: Some(3),
                message: "Product has 3 sales".into()
            }
        );
    }

    #[tokio::test]
    async fn test_forced_conflict_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/products/delete/p1"))
            .and(query_param("force", "true"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .delete_product(&ProductId::new("p1"), true)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
    }
}
