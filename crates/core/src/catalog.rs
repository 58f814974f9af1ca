//! Catalog views: search, filter, sort, and "load more" slicing.
//!
//! All of this runs on the product list fetched for the current request.
//! Filters combine with AND; an empty filter value means "no constraint".

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enrich::{self, DemoAttributes};
use crate::types::Product;

/// Products shown per "load more" step.
pub const PAGE_SIZE: usize = 12;

/// Catalog sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Backend order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    /// Byte-wise by name; no locale collation.
    Name,
    /// Most recently created first.
    Newest,
}

impl SortOrder {
    pub const ALL: [Self; 5] = [
        Self::Featured,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Name,
        Self::Newest,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Name => "name",
            Self::Newest => "newest",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::Name => "Name",
            Self::Newest => "Newest",
        }
    }

    /// Parse a query value, falling back to [`SortOrder::Featured`].
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or(())
    }
}

/// Catalog query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    /// Search term matched against name and barcode.
    pub q: String,
    pub category: String,
    pub size: String,
    pub color: String,
    pub sort: String,
    /// Number of items to show; grows by [`PAGE_SIZE`] on "load more".
    pub visible: Option<usize>,
}

impl CatalogQuery {
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::parse_lenient(&self.sort)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.filter(|v| *v > 0).unwrap_or(PAGE_SIZE)
    }

    /// Whether any filter (not sort or paging) is set.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        [&self.q, &self.category, &self.size, &self.color]
            .into_iter()
            .any(|v| !v.trim().is_empty())
    }

    /// Query string for the same view with `visible` replaced.
    #[must_use]
    pub fn with_visible(&self, visible: usize) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        for (key, value) in [
            ("q", &self.q),
            ("category", &self.category),
            ("size", &self.size),
            ("color", &self.color),
            ("sort", &self.sort),
        ] {
            if !value.trim().is_empty() {
                pairs.push((key, value.trim().to_string()));
            }
        }
        pairs.push(("visible", visible.to_string()));
        pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A product plus its optional demo attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub product: Product,
    pub attributes: Option<DemoAttributes>,
}

impl CatalogItem {
    /// Wrap products, attaching demo attributes when `enrich` is set.
    #[must_use]
    pub fn from_products(products: Vec<Product>, enrich: bool) -> Vec<Self> {
        products
            .into_iter()
            .map(|product| {
                let attributes = enrich.then(|| enrich::demo_attributes(&product.id));
                Self {
                    product,
                    attributes,
                }
            })
            .collect()
    }

    fn matches(&self, query: &CatalogQuery, needle: &str) -> bool {
        let category = query.category.trim();
        let size = query.size.trim();
        let color = query.color.trim();

        (needle.is_empty() || self.product.matches_term(needle))
            && (category.is_empty() || self.product.in_category(category))
            && (size.is_empty() || self.attributes.as_ref().is_none_or(|a| a.has_size(size)))
            && (color.is_empty() || self.attributes.as_ref().is_none_or(|a| a.has_color(color)))
    }
}

/// One rendered slice of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    /// Matches before slicing.
    pub total_matches: usize,
    pub has_more: bool,
    /// `visible` value for the "load more" link.
    pub next_visible: usize,
}

/// Products whose name or barcode contains `term`, ignoring case.
///
/// An empty or whitespace-only term returns every product.
#[must_use]
pub fn search<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    products
        .iter()
        .filter(|p| needle.is_empty() || p.matches_term(&needle))
        .collect()
}

/// Sort in place. Stable, so equal keys keep backend order.
pub fn sort(items: &mut [CatalogItem], order: SortOrder) {
    match order {
        SortOrder::Featured => {}
        SortOrder::PriceAsc => {
            items.sort_by(|a, b| a.product.selling_rate.cmp(&b.product.selling_rate));
        }
        SortOrder::PriceDesc => {
            items.sort_by(|a, b| b.product.selling_rate.cmp(&a.product.selling_rate));
        }
        SortOrder::Name => items.sort_by(|a, b| a.product.name.cmp(&b.product.name)),
        // None sorts below Some, so undated products go last.
        SortOrder::Newest => items.sort_by(|a, b| b.product.created_at.cmp(&a.product.created_at)),
    }
}

/// Filter, sort, and slice `items` for `query`.
#[must_use]
pub fn apply(items: Vec<CatalogItem>, query: &CatalogQuery) -> CatalogPage {
    let needle = query.q.trim().to_lowercase();
    let mut matched: Vec<CatalogItem> = items
        .into_iter()
        .filter(|item| item.matches(query, &needle))
        .collect();
    sort(&mut matched, query.sort_order());

    let total_matches = matched.len();
    let visible = query.visible_count();
    matched.truncate(visible);

    CatalogPage {
        items: matched,
        total_matches,
        has_more: total_matches > visible,
        next_visible: visible.min(total_matches).saturating_add(PAGE_SIZE),
    }
}

/// Distinct categories present in `products`, sorted.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .filter_map(|p| p.category.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: &str, name: &str, price: u32, category: &str, created: &str) -> Product {
        serde_json::from_value(json!({
            "_id": id,
            "name": name,
            "barcode": format!("BC-{id}"),
            "purchaseRate": 1,
            "sellingRate": price,
            "quantity": 10,
            "category": category,
            "createdAt": created,
        }))
        .unwrap()
    }

    fn fixture() -> Vec<Product> {
        vec![
            product("1", "cotton saree", 900, "Women", "2024-01-01T00:00:00Z"),
            product("2", "Silk Saree", 2500, "Women", "2024-03-01T00:00:00Z"),
            product("3", "Linen Kurta", 900, "Men", "2024-02-01T00:00:00Z"),
            product("4", "Zari Dupatta", 400, "Women", "2024-04-01T00:00:00Z"),
        ]
    }

    fn names(page: &CatalogPage) -> Vec<&str> {
        page.items.iter().map(|i| i.product.name.as_str()).collect()
    }

    #[test]
    fn test_search_case_insensitive_name_or_barcode() {
        let products = fixture();
        assert_eq!(search(&products, "SAREE").len(), 2);
        assert_eq!(search(&products, "bc-3")[0].name, "Linen Kurta");
        assert_eq!(search(&products, "  ").len(), 4);
        assert!(search(&products, "velvet").is_empty());
    }

    #[test]
    fn test_filters_combine_with_and() {
        let items = CatalogItem::from_products(fixture(), false);
        let query = CatalogQuery {
            q: "saree".into(),
            category: "women".into(),
            ..CatalogQuery::default()
        };
        let page = apply(items.clone(), &query);
        assert_eq!(page.total_matches, 2);

        let query = CatalogQuery {
            q: "saree".into(),
            category: "Men".into(),
            ..CatalogQuery::default()
        };
        assert_eq!(apply(items, &query).total_matches, 0);
    }

    #[test]
    fn test_size_and_color_need_attributes_to_match() {
        let items = CatalogItem::from_products(fixture(), true);
        let first = items[0].attributes.clone().unwrap();
        let query = CatalogQuery {
            size: first.sizes[0].to_string(),
            color: first.colors[0].to_string(),
            ..CatalogQuery::default()
        };
        let page = apply(items, &query);
        assert!(page.items.iter().all(|i| {
            let a = i.attributes.as_ref().unwrap();
            a.has_size(&query.size) && a.has_color(&query.color)
        }));
        assert!(names(&page).contains(&"cotton saree"));
    }

    #[test]
    fn test_price_sorts_are_monotonic_and_stable() {
        let items = CatalogItem::from_products(fixture(), false);
        let asc = apply(
            items.clone(),
            &CatalogQuery {
                sort: "price_asc".into(),
                ..CatalogQuery::default()
            },
        );
        // equal prices keep backend order: "cotton saree" before "Linen Kurta"
        assert_eq!(
            names(&asc),
            vec!["Zari Dupatta", "cotton saree", "Linen Kurta", "Silk Saree"]
        );

        let desc = apply(
            items,
            &CatalogQuery {
                sort: "price_desc".into(),
                ..CatalogQuery::default()
            },
        );
        let prices: Vec<_> = desc.items.iter().map(|i| i.product.selling_rate).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_name_sort_is_bytewise() {
        let items = CatalogItem::from_products(fixture(), false);
        let page = apply(
            items,
            &CatalogQuery {
                sort: "name".into(),
                ..CatalogQuery::default()
            },
        );
        // uppercase sorts before lowercase
        assert_eq!(
            names(&page),
            vec!["Linen Kurta", "Silk Saree", "Zari Dupatta", "cotton saree"]
        );
    }

    #[test]
    fn test_newest_first() {
        let items = CatalogItem::from_products(fixture(), false);
        let page = apply(
            items,
            &CatalogQuery {
                sort: "newest".into(),
                ..CatalogQuery::default()
            },
        );
        assert_eq!(names(&page)[0], "Zari Dupatta");
    }

    #[test]
    fn test_huge_visible_count_does_not_overflow() {
        let page = apply(
            Vec::new(),
            &CatalogQuery {
                visible: Some(usize::MAX),
                ..CatalogQuery::default()
            },
        );
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.next_visible, PAGE_SIZE);
    }

    #[test]
    fn test_load_more_slicing() {
        let products: Vec<Product> = (0..30)
            .map(|n| product(&n.to_string(), "Kurta", 100, "Men", "2024-01-01T00:00:00Z"))
            .collect();
        let items = CatalogItem::from_products(products, false);

        let first = apply(items.clone(), &CatalogQuery::default());
        assert_eq!(first.items.len(), PAGE_SIZE);
        assert!(first.has_more);
        assert_eq!(first.next_visible, 24);

        let all = apply(
            items,
            &CatalogQuery {
                visible: Some(36),
                ..CatalogQuery::default()
            },
        );
        assert_eq!(all.items.len(), 30);
        assert!(!all.has_more);
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        assert_eq!(SortOrder::parse_lenient("cheapest"), SortOrder::Featured);
        assert_eq!(SortOrder::parse_lenient("price_desc"), SortOrder::PriceDesc);
    }

    #[test]
    fn test_with_visible_keeps_filters() {
        let query = CatalogQuery {
            q: "silk saree".into(),
            sort: "name".into(),
            ..CatalogQuery::default()
        };
        assert_eq!(query.with_visible(24), "q=silk%20saree&sort=name&visible=24");
    }

    #[test]
    fn test_categories_distinct_sorted() {
        assert_eq!(categories(&fixture()), vec!["Men", "Women"]);
    }
}
