//! Catalog query commands.

use std::path::Path;

use bazaar_storefront::fixtures::{FixtureError, Fixtures};
use bazaar_storefront::models::{Product, RecipeBundle};
use bazaar_storefront::services::products::{DEFAULT_SEARCH_LIMIT, DEFAULT_TRENDING_LIMIT};
use bazaar_storefront::services::recipe_bundles;
use bazaar_storefront::services::{Catalog, LocationContext};
use serde::Serialize;

/// Build a catalog from `dir`, or from the embedded fixtures.
///
/// # Errors
///
/// Returns an error if the fixtures cannot be read or parsed.
pub fn load(dir: Option<&Path>) -> Result<Catalog, FixtureError> {
    Ok(Catalog::new(Fixtures::load(dir)?))
}

/// Location from CLI flags; `None` when no flag carries a value.
#[must_use]
pub fn location(
    city: Option<String>,
    region: Option<String>,
    weather: Option<String>,
) -> Option<LocationContext> {
    let location = LocationContext {
        city,
        region,
        weather,
    };
    (!location.is_empty()).then_some(location)
}

pub fn search_products(
    catalog: &Catalog,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<(), serde_json::Error> {
    let products = catalog
        .products
        .search(query, limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
    print_rows(&products, json, product_line)
}

pub fn trending_products(
    catalog: &Catalog,
    location: Option<&LocationContext>,
    limit: Option<usize>,
    json: bool,
) -> Result<(), serde_json::Error> {
    let products = catalog
        .products
        .trending_by_location(location, limit.unwrap_or(DEFAULT_TRENDING_LIMIT));
    print_rows(&products, json, product_line)
}

pub fn search_bundles(
    catalog: &Catalog,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<(), serde_json::Error> {
    let bundles = catalog
        .bundles
        .search(query, limit.unwrap_or(recipe_bundles::DEFAULT_SEARCH_LIMIT));
    print_rows(&bundles, json, bundle_line)
}

pub fn featured_bundles(
    catalog: &Catalog,
    limit: Option<usize>,
    json: bool,
) -> Result<(), serde_json::Error> {
    let bundles = catalog
        .bundles
        .featured(limit.unwrap_or(recipe_bundles::DEFAULT_FEATURED_LIMIT));
    print_rows(&bundles, json, bundle_line)
}

fn print_rows<T, F>(rows: &[T], json: bool, line: F) -> Result<(), serde_json::Error>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    let output = if json {
        serde_json::to_string_pretty(rows)?
    } else if rows.is_empty() {
        "No results".to_string()
    } else {
        rows.iter().map(line).collect::<Vec<_>>().join("\n")
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

fn rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}"))
}

fn product_line(product: &Product) -> String {
    let stock = product
        .stock
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    format!(
        "{:>4}  {:<32}  rating {:>3}  stock {:>4}",
        product.id,
        product.name,
        rating(product.rating),
        stock
    )
}

fn bundle_line(bundle: &RecipeBundle) -> String {
    format!(
        "{:>4}  {:<28}  {:<12}  {:>3} min  rating {:>3}  {}",
        bundle.id,
        bundle.name,
        bundle.category,
        bundle.prep_time,
        rating(bundle.rating),
        bundle.status
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_location_requires_a_value() {
        assert!(location(None, None, None).is_none());
        assert!(location(Some(" ".to_string()), None, None).is_none());

        let loc = location(None, Some("Punjab".to_string()), None).unwrap();
        assert_eq!(loc.region.as_deref(), Some("Punjab"));
    }

    #[test]
    fn test_lines_show_missing_values_as_dash() {
        let catalog = load(None).unwrap();

        let pomfret = catalog
            .bundles
            .all()
            .into_iter()
            .find(|b| b.name == "Grilled Pomfret")
            .unwrap();
        let line = bundle_line(&pomfret);
        assert!(line.contains("rating   -"));
        assert!(line.ends_with("inactive"));

        let mango = catalog.products.search("chaunsa", 1);
        let line = product_line(mango.first().unwrap());
        assert!(line.contains("rating 4.8"));
        assert!(line.contains("stock  120"));
    }
}
