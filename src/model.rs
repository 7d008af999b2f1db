//! Wire shapes shared by the storefront API's list endpoints.

// std
use std::collections::BTreeMap;
// self
use crate::_prelude::*;

/// Pagination metadata attached to list responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
	/// One-based page index.
	pub page: u32,
	/// Page size.
	pub limit: u32,
	/// Total number of items across all pages.
	pub total: u64,
	/// Total number of pages.
	pub total_pages: u32,
}
impl Meta {
	/// Builds metadata for `total` items split into pages of `limit`.
	pub fn for_total(page: u32, limit: u32, total: u64) -> Self {
		let total_pages = if limit == 0 {
			0
		} else {
			u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
		};

		Self { page, limit, total, total_pages }
	}

	/// Returns `true` when a later page exists.
	pub fn has_next(&self) -> bool {
		self.page < self.total_pages
	}

	/// Returns `true` when an earlier page exists.
	pub fn has_previous(&self) -> bool {
		self.page > 1
	}
}

/// A page of items as returned by `{ data, meta }` list endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
	/// Items on this page.
	pub data: Vec<T>,
	/// Pagination metadata.
	pub meta: Meta,
}

/// Back-office role of a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
	/// Full back-office access.
	Admin,
	/// Storefront customer.
	Customer,
	/// Support staff.
	Support,
}

/// User as listed in the back office.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
	/// User identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Login email.
	pub email: String,
	/// Back-office role.
	pub role: Role,
	/// Creation timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// Product as listed in the back office.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	/// Product identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Brand label.
	pub tag: String,
	/// Current price.
	pub price: f64,
	/// Category name.
	pub category: String,
	/// Discount percentage, if on sale.
	#[serde(default)]
	pub discount_percentage: Option<f64>,
	/// Image URLs.
	#[serde(default)]
	pub images: Vec<String>,
	/// Whether the product is flagged as new.
	#[serde(default)]
	pub is_new: bool,
	/// Whether the product can be ordered.
	pub in_stock: bool,
}

/// Product with description and specification table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
	/// Summary fields.
	#[serde(flatten)]
	pub product: Product,
	/// Long description.
	pub description: String,
	/// Specification table.
	#[serde(default)]
	pub specs: BTreeMap<String, String>,
}

/// Product category.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
	/// Category identifier.
	pub id: String,
	/// Display name.
	pub name: String,
}

/// Fulfilment state of an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	/// Delivered to the customer.
	Delivered,
	/// Shipped, not yet delivered.
	InTransit,
	/// Cancelled.
	Cancelled,
}

/// Line item of an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
	/// Product identifier.
	pub id: String,
	/// Product name at purchase time.
	pub name: String,
	/// Units purchased.
	pub quantity: u32,
	/// Unit price at purchase time.
	pub price: f64,
}

/// Order as listed in the back office.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Order identifier.
	pub id: String,
	/// Order date as sent by the API.
	pub date: String,
	/// Order total.
	pub total: f64,
	/// Fulfilment state.
	pub status: OrderStatus,
	/// Line items.
	pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn meta_rounds_page_count_up() {
		assert_eq!(Meta::for_total(1, 10, 0).total_pages, 0);
		assert_eq!(Meta::for_total(1, 10, 10).total_pages, 1);
		assert_eq!(Meta::for_total(1, 10, 11).total_pages, 2);
		assert_eq!(Meta::for_total(1, 0, 11).total_pages, 0);
		assert!(Meta::for_total(1, 10, 11).has_next());
		assert!(!Meta::for_total(2, 10, 11).has_next());
		assert!(Meta::for_total(2, 10, 11).has_previous());
	}

	#[test]
	fn paginated_users_decode_from_camel_case() {
		let page: Paginated<AdminUser> = serde_json::from_value(json!({
			"data": [{
				"id": "u1",
				"name": "Ana",
				"email": "ana@example.com",
				"role": "SUPPORT",
				"createdAt": "2025-01-02T03:04:05Z",
				"updatedAt": "2025-01-03T03:04:05Z"
			}],
			"meta": { "page": 1, "limit": 10, "total": 1, "totalPages": 1 }
		}))
		.expect("Paginated users fixture should decode.");

		assert_eq!(page.data[0].role, Role::Support);
		assert_eq!(page.meta.total_pages, 1);
	}

	#[test]
	fn order_status_uses_lowercase_labels() {
		let status: OrderStatus =
			serde_json::from_value(json!("intransit")).expect("Status label should decode.");

		assert_eq!(status, OrderStatus::InTransit);
	}

	#[test]
	fn product_details_flatten_summary_fields() {
		let details: ProductDetails = serde_json::from_value(json!({
			"id": "p1",
			"name": "Fone",
			"tag": "Acme",
			"price": 199.9,
			"category": "audio",
			"discountPercentage": null,
			"inStock": true,
			"description": "Sem fio",
			"specs": { "bateria": "20h" }
		}))
		.expect("Product details fixture should decode.");

		assert_eq!(details.product.discount_percentage, None);
		assert!(details.product.images.is_empty());
		assert_eq!(details.specs.get("bateria").map(String::as_str), Some("20h"));
	}
}
