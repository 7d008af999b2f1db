//! In-memory product catalog used by storefront pages that render from bundled data.

// std
use std::cmp::Ordering;
// self
use crate::{_prelude::*, model::Meta};

/// Default page size for [`CatalogQuery`].
pub const DEFAULT_CATALOG_LIMIT: u32 = 12;

/// Product as shown in listings and product cards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
	/// Product identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Brand label.
	pub tag: String,
	/// Category name.
	pub category: String,
	/// Current price.
	pub price: f64,
	/// Discount percentage, if on sale.
	#[serde(default)]
	pub discount_percentage: Option<f64>,
	/// Image URLs.
	#[serde(default)]
	pub images: Vec<String>,
	/// Average rating.
	#[serde(default)]
	pub rating: f64,
	/// Number of reviews.
	#[serde(default)]
	pub reviews_count: u32,
	/// Whether the product is flagged as new.
	#[serde(default)]
	pub is_new: bool,
	/// Whether the product can be ordered.
	#[serde(default = "in_stock_default")]
	pub in_stock: bool,
	/// Units sold so far.
	#[serde(default)]
	pub quantity_sold: u64,
}
impl ProductSummary {
	/// Returns `true` when the product carries a positive discount.
	pub fn is_on_sale(&self) -> bool {
		self.discount_percentage.is_some_and(|discount| discount > 0.)
	}

	/// Price before the discount was applied.
	pub fn old_price(&self) -> f64 {
		old_price(self.price, self.discount_percentage)
	}
}

/// Ordering applied by [`Catalog::query`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
	/// Cheapest first.
	PriceAsc,
	/// Most expensive first.
	PriceDesc,
	/// Most units sold first.
	BestSelling,
}

/// Filters and pagination for [`Catalog::query`].
///
/// Filters are case-insensitive substring matches; `None` or blank terms match everything.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CatalogQuery {
	/// Product name term.
	pub name: Option<String>,
	/// Category term.
	pub category: Option<String>,
	/// Brand term.
	pub brand: Option<String>,
	/// Ordering; catalog order when `None`.
	pub sort: Option<CatalogSort>,
	/// One-based page.
	pub page: u32,
	/// Page size; `0` returns everything on one page.
	pub limit: u32,
}
impl CatalogQuery {
	/// Query matching everything, first page.
	pub fn new() -> Self {
		Self::default()
	}

	/// Filters by product name.
	pub fn name(mut self, term: impl Into<String>) -> Self {
		self.name = Some(term.into());

		self
	}

	/// Filters by category.
	pub fn category(mut self, term: impl Into<String>) -> Self {
		self.category = Some(term.into());

		self
	}

	/// Filters by brand.
	pub fn brand(mut self, term: impl Into<String>) -> Self {
		self.brand = Some(term.into());

		self
	}

	/// Sets the ordering.
	pub fn sort(mut self, sort: CatalogSort) -> Self {
		self.sort = Some(sort);

		self
	}

	/// Selects a page (clamped to at least 1) and page size.
	pub fn page(mut self, page: u32, limit: u32) -> Self {
		self.page = page.max(1);
		self.limit = limit;

		self
	}
}
impl Default for CatalogQuery {
	fn default() -> Self {
		Self {
			name: None,
			category: None,
			brand: None,
			sort: None,
			page: 1,
			limit: DEFAULT_CATALOG_LIMIT,
		}
	}
}

/// One page of [`Catalog::query`] results.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogPage<'a> {
	/// Products on this page.
	pub data: Vec<&'a ProductSummary>,
	/// Pagination over the filtered set.
	pub meta: Meta,
}

/// Inclusive price bounds, rounded outward to whole units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceRange {
	/// Floor of the lowest price.
	pub min: f64,
	/// Ceiling of the highest price.
	pub max: f64,
}

/// Read-only product list with the queries the storefront pages need.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
	products: Vec<ProductSummary>,
}
impl Catalog {
	/// Wraps `products`, keeping their order.
	pub fn new(products: Vec<ProductSummary>) -> Self {
		Self { products }
	}

	/// Decodes a JSON array of products.
	pub fn from_json(raw: &str) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		let deserializer = &mut serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(deserializer).map(Self::new)
	}

	/// All products in catalog order.
	pub fn products(&self) -> &[ProductSummary] {
		&self.products
	}

	/// Products ordered by units sold, highest first; `None` or `0` returns all.
	pub fn best_sellers(&self, count: Option<usize>) -> Vec<&ProductSummary> {
		let mut ranked = self.products.iter().collect::<Vec<_>>();

		ranked.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));

		take(ranked, count)
	}

	/// Discounted products in catalog order; `None` or `0` returns all.
	pub fn offers(&self, count: Option<usize>) -> Vec<&ProductSummary> {
		take(self.products.iter().filter(|product| product.is_on_sale()).collect(), count)
	}

	/// Products whose name contains `name`, ignoring case; a blank term returns all.
	pub fn search(&self, name: Option<&str>) -> Vec<&ProductSummary> {
		let term = normalize(name);

		self.products
			.iter()
			.filter(|product| contains_term(&product.name, term.as_deref()))
			.collect()
	}

	/// Looks a product up by identifier.
	pub fn find(&self, id: &str) -> Option<&ProductSummary> {
		self.products.iter().find(|product| product.id == id)
	}

	/// Filters, sorts, and paginates the catalog.
	pub fn query(&self, query: &CatalogQuery) -> CatalogPage<'_> {
		let name = normalize(query.name.as_deref());
		let category = normalize(query.category.as_deref());
		let brand = normalize(query.brand.as_deref());
		let mut hits = self
			.products
			.iter()
			.filter(|product| {
				contains_term(&product.name, name.as_deref())
					&& contains_term(&product.category, category.as_deref())
					&& contains_term(&product.tag, brand.as_deref())
			})
			.collect::<Vec<_>>();

		match query.sort {
			Some(CatalogSort::PriceAsc) => hits.sort_by(|a, b| compare_prices(a, b)),
			Some(CatalogSort::PriceDesc) => hits.sort_by(|a, b| compare_prices(b, a)),
			Some(CatalogSort::BestSelling) =>
				hits.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold)),
			None => (),
		}

		let total = hits.len() as u64;
		let page = query.page.max(1);

		if query.limit == 0 {
			return CatalogPage {
				meta: Meta { page: 1, limit: 0, total, total_pages: u32::from(total > 0) },
				data: hits,
			};
		}

		let limit = query.limit as usize;
		let data = hits.into_iter().skip((page as usize - 1) * limit).take(limit).collect();

		CatalogPage { data, meta: Meta::for_total(page, query.limit, total) }
	}

	/// Distinct brands in first-seen order.
	pub fn brands(&self) -> Vec<&str> {
		distinct(self.products.iter().map(|product| product.tag.as_str()))
	}

	/// Distinct categories in first-seen order.
	pub fn categories(&self) -> Vec<&str> {
		distinct(self.products.iter().map(|product| product.category.as_str()))
	}

	/// Price bounds across the whole catalog; `None` when it is empty.
	pub fn price_range(&self) -> Option<PriceRange> {
		let mut prices = self.products.iter().map(|product| product.price);
		let first = prices.next()?;
		let (min, max) =
			prices.fold((first, first), |(min, max), price| (min.min(price), max.max(price)));

		Some(PriceRange { min: min.floor(), max: max.ceil() })
	}
}
impl FromIterator<ProductSummary> for Catalog {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = ProductSummary>,
	{
		Self::new(iter.into_iter().collect())
	}
}

/// Price before a `discount` percentage was applied; no discount returns `price` unchanged.
pub fn old_price(price: f64, discount: Option<f64>) -> f64 {
	match discount {
		Some(discount) if discount != 0. => price / (1. - discount / 100.),
		_ => price,
	}
}

fn in_stock_default() -> bool {
	true
}

fn take(items: Vec<&ProductSummary>, count: Option<usize>) -> Vec<&ProductSummary> {
	match count {
		Some(count) if count > 0 => items.into_iter().take(count).collect(),
		_ => items,
	}
}

fn normalize(term: Option<&str>) -> Option<String> {
	term.map(str::trim).filter(|term| !term.is_empty()).map(str::to_lowercase)
}

fn contains_term(field: &str, term: Option<&str>) -> bool {
	term.is_none_or(|term| field.to_lowercase().contains(term))
}

fn compare_prices(a: &ProductSummary, b: &ProductSummary) -> Ordering {
	a.price.total_cmp(&b.price)
}

fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
	let mut seen = BTreeSet::new();

	labels.filter(|label| seen.insert(*label)).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn product(id: &str, name: &str, tag: &str, category: &str, price: f64) -> ProductSummary {
		ProductSummary {
			id: id.into(),
			name: name.into(),
			tag: tag.into(),
			category: category.into(),
			price,
			discount_percentage: None,
			images: Vec::new(),
			rating: 4.5,
			reviews_count: 10,
			is_new: false,
			in_stock: true,
			quantity_sold: 0,
		}
	}

	fn catalog() -> Catalog {
		let mut fone = product("audio-1", "Fone Bluetooth", "Acme", "Áudio", 199.9);
		let mut caixa = product("audio-2", "Caixa de Som", "Sonora", "Áudio", 349.5);
		let mut mouse = product("perif-1", "Mouse Gamer", "Acme", "Periféricos", 89.99);
		let teclado = product("perif-2", "Teclado Mecânico", "Tecla", "Periféricos", 420.);

		fone.quantity_sold = 50;
		fone.discount_percentage = Some(20.);
		caixa.quantity_sold = 80;
		mouse.quantity_sold = 10;
		mouse.discount_percentage = Some(0.);

		[fone, caixa, mouse, teclado].into_iter().collect()
	}

	fn ids(products: &[&ProductSummary]) -> Vec<String> {
		products.iter().map(|product| product.id.clone()).collect()
	}

	#[test]
	fn best_sellers_and_offers_treat_zero_count_as_all() {
		let catalog = catalog();

		assert_eq!(ids(&catalog.best_sellers(Some(2))), ["audio-2", "audio-1"]);
		assert_eq!(catalog.best_sellers(Some(0)).len(), 4);
		assert_eq!(catalog.best_sellers(None).len(), 4);
		assert_eq!(ids(&catalog.offers(None)), ["audio-1"]);
	}

	#[test]
	fn search_is_trimmed_and_case_insensitive() {
		let catalog = catalog();

		assert_eq!(ids(&catalog.search(Some("  MOUSE "))), ["perif-1"]);
		assert_eq!(catalog.search(Some("   ")).len(), 4);
		assert_eq!(catalog.search(None).len(), 4);
		assert!(catalog.find("perif-2").is_some());
		assert!(catalog.find("perif-3").is_none());
	}

	#[test]
	fn query_combines_filters_sorting_and_pagination() {
		let catalog = catalog();
		let page = catalog.query(&CatalogQuery::new().brand("acme").sort(CatalogSort::PriceAsc));

		assert_eq!(ids(&page.data), ["perif-1", "audio-1"]);
		assert_eq!(page.meta.total, 2);

		let page = catalog.query(&CatalogQuery::new().sort(CatalogSort::PriceDesc).page(2, 3));

		assert_eq!(ids(&page.data), ["perif-1"]);
		assert_eq!(page.meta, Meta { page: 2, limit: 3, total: 4, total_pages: 2 });

		let page = catalog.query(&CatalogQuery::new().category("áudio").page(1, 0));

		assert_eq!(page.data.len(), 2);
		assert_eq!(page.meta.total_pages, 1);
	}

	#[test]
	fn facets_cover_the_whole_catalog() {
		let catalog = catalog();

		assert_eq!(catalog.brands(), ["Acme", "Sonora", "Tecla"]);
		assert_eq!(catalog.categories(), ["Áudio", "Periféricos"]);
		assert_eq!(catalog.price_range(), Some(PriceRange { min: 89., max: 420. }));
		assert_eq!(Catalog::default().price_range(), None);
	}

	#[test]
	fn old_price_reverses_the_discount() {
		assert_eq!(old_price(80., Some(20.)), 100.);
		assert_eq!(old_price(80., Some(0.)), 80.);
		assert_eq!(old_price(80., None), 80.);
	}

	#[test]
	fn products_decode_with_defaults() {
		let catalog = Catalog::from_json(
			r#"[{"id":"a","name":"A","tag":"T","category":"C","price":1.5,"quantitySold":3}]"#,
		)
		.expect("Catalog fixture should decode.");

		assert!(catalog.products()[0].in_stock);
		assert_eq!(catalog.products()[0].quantity_sold, 3);
		assert!(!catalog.products()[0].is_on_sale());
	}
}
