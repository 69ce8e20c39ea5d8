//! Shop orders placed from the app.
//!
//! An order names either a single product or a cart of products. The
//! points spent on it are spread over the line items in proportion to
//! each item's discounted price.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

pub const CUSTOMER_INFO_REQUIRED: &str = "Customer information is required.";
pub const PRODUCT_INFO_REQUIRED: &str = "Product information is required.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub note: Option<String>,
}

impl CustomerInfo {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    /// Everything after the first word.
    pub fn last_name(&self) -> String {
        self.name.split_whitespace().skip(1).collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub product_id: i64,
    pub product_name: Option<String>,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub price_per_item: f64,
    #[serde(default)]
    pub original_price: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub discount_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_info: Option<CustomerInfo>,
    /// Single-product order
    pub product_name: Option<String>,
    pub product_id: Option<i64>,
    pub quantity: Option<u32>,
    /// Cart order
    pub products: Option<Vec<OrderProduct>>,
    /// KM paid from the loyalty balance
    #[serde(default)]
    pub points_used: f64,
    /// KM total that earns cashback
    #[serde(default)]
    pub order_total: f64,
    /// Cart total after the loyalty discount
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub final_price_after_points: f64,
}

/// One priced line handed to the shop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub product_id: i64,
    pub quantity: u32,
    /// Two-decimal string, as the shop expects
    pub total: String,
}

fn one() -> u32 {
    1
}

impl OrderRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.customer_info.is_none() {
            return Err(DomainError::validation(CUSTOMER_INFO_REQUIRED));
        }
        if self.product_name.is_none() && self.products.is_none() {
            return Err(DomainError::validation(PRODUCT_INFO_REQUIRED));
        }
        Ok(())
    }

    /// Line items priced at what the customer still pays.
    pub fn line_items(&self) -> Vec<LineItem> {
        let final_price = self.final_price_after_points;
        match &self.products {
            Some(products) => products
                .iter()
                .map(|p| {
                    let product_total = p.price_per_item * f64::from(p.quantity);
                    let share = if self.total_price > 0.0 {
                        product_total / self.total_price
                    } else {
                        0.0
                    };
                    LineItem {
                        product_id: p.product_id,
                        quantity: p.quantity,
                        total: format!("{:.2}", share * final_price),
                    }
                })
                .collect(),
            None => vec![LineItem {
                product_id: self.product_id.unwrap_or_default(),
                quantity: self.quantity.unwrap_or(1),
                total: format!("{final_price:.2}"),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> OrderRequest {
        OrderRequest {
            customer_info: Some(CustomerInfo {
                name: "Amra Hodžić Begić".into(),
                ..Default::default()
            }),
            products: Some(vec![
                OrderProduct {
                    product_id: 11,
                    product_name: Some("Ray-Ban".into()),
                    quantity: 1,
                    price_per_item: 150.0,
                    original_price: 0.0,
                    discount_amount: 0.0,
                    discount_percentage: 0.0,
                },
                OrderProduct {
                    product_id: 12,
                    product_name: Some("Futrola".into()),
                    quantity: 2,
                    price_per_item: 25.0,
                    original_price: 0.0,
                    discount_amount: 0.0,
                    discount_percentage: 0.0,
                },
            ]),
            total_price: 200.0,
            final_price_after_points: 180.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_customer_info() {
        let order = OrderRequest {
            product_name: Some("Okvir".into()),
            ..Default::default()
        };
        assert_eq!(
            order.validate(),
            Err(DomainError::Validation(CUSTOMER_INFO_REQUIRED.into()))
        );
    }

    #[test]
    fn test_requires_product() {
        let order = OrderRequest {
            customer_info: Some(CustomerInfo::default()),
            ..Default::default()
        };
        assert_eq!(
            order.validate(),
            Err(DomainError::Validation(PRODUCT_INFO_REQUIRED.into()))
        );
        assert!(cart().validate().is_ok());
    }

    #[test]
    fn test_cart_spreads_final_price_by_share() {
        let items = cart().line_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].total, "135.00");
        assert_eq!(items[1].total, "45.00");
        assert_eq!(items[1].quantity, 2);
    }

    #[test]
    fn test_single_product_line() {
        let order = OrderRequest {
            product_name: Some("Okvir".into()),
            product_id: Some(7),
            final_price_after_points: 89.5,
            ..Default::default()
        };
        let items = order.line_items();
        assert_eq!(items, vec![LineItem { product_id: 7, quantity: 1, total: "89.50".into() }]);
    }

    #[test]
    fn test_name_split() {
        let info = cart().customer_info.unwrap_or_default();
        assert_eq!(info.first_name(), "Amra");
        assert_eq!(info.last_name(), "Hodžić Begić");
    }
}
