//! Product listing intake with nested arguments.

use runtime::{Schema, Tool, ToolDeclaration, ToolError};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Color {
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Product {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub colors: Vec<Color>,
}

#[derive(Debug, Deserialize)]
pub struct ListingArgs {
    #[serde(default)]
    pub product: Vec<Product>,
}

/// `createProductListing`: accepts a list of products and acknowledges them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateProductListing;

impl Tool for CreateProductListing {
    type Args = ListingArgs;
    type Output = String;

    fn declaration(&self) -> ToolDeclaration {
        let color = Schema::object().property("color", Schema::string());
        let product = Schema::object()
            .property("name", Schema::string())
            .property("brand", Schema::string())
            .property("price", Schema::number())
            .property("category", Schema::string())
            .property("description", Schema::string())
            .property("colors", Schema::array(color));

        ToolDeclaration::new(
            "createProductListing",
            "Create a product listing using the details provided by the user",
        )
        .with_parameters(Schema::object().property("product", Schema::array(product)))
    }

    async fn call(&self, args: ListingArgs) -> Result<String, ToolError> {
        for product in &args.product {
            info!(
                name = product.name.as_deref().unwrap_or("-"),
                price = product.price,
                colors = product.colors.len(),
                "product listed"
            );
        }
        Ok(format!(
            "Product listing created for {} products",
            args.product.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtime::{Registry, ToolCall, ToolHost};
    use serde_json::json;

    #[tokio::test]
    async fn counts_products() {
        let out = CreateProductListing
            .call(ListingArgs {
                product: vec![Product::default(), Product::default()],
            })
            .await
            .unwrap();
        assert_eq!(out, "Product listing created for 2 products");
    }

    #[tokio::test]
    async fn decodes_nested_arguments() {
        let registry = Registry::new().with_tool(CreateProductListing).unwrap();
        let out = registry
            .execute(&ToolCall::new(
                "createProductListing",
                json!({"product": [{
                    "name": "Noise-canceling headphones",
                    "price": 149.99,
                    "description": "A distraction-free environment",
                    "colors": [{"color": "black"}, {"color": "white"}, {"color": "red"}]
                }]}),
            ))
            .await
            .unwrap();
        assert_eq!(out, json!("Product listing created for 1 products"));
    }

    #[tokio::test]
    async fn accepts_color_without_name() {
        let args: ListingArgs =
            serde_json::from_value(json!({"product": [{"colors": [{}]}]})).unwrap();
        assert_eq!(args.product[0].colors.len(), 1);
        assert_eq!(args.product[0].colors[0].color, None);

        let registry = Registry::new().with_tool(CreateProductListing).unwrap();
        let out = registry
            .execute(&ToolCall::new(
                "createProductListing",
                json!({"product": [{"name": "x", "colors": [{}]}]}),
            ))
            .await
            .unwrap();
        assert_eq!(out, json!("Product listing created for 1 products"));
    }

    #[tokio::test]
    async fn rejects_wrongly_typed_nesting() {
        let registry = Registry::new().with_tool(CreateProductListing).unwrap();
        let err = registry
            .execute(&ToolCall::new(
                "createProductListing",
                json!({"product": [{"colors": "red"}]}),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
