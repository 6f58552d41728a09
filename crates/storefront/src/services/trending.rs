//! Location-aware trending recommendations.
//!
//! Candidates are gathered in stages: weather keywords, then place keywords
//! (the city and region names plus a regional keyword table), then merchandising
//! badges, then every product by rating. Each stage only adds products not
//! already picked, and gathering stops once `limit` products are held.

use std::collections::HashSet;

use bazaar_core::ProductId;
use serde::Deserialize;
use tracing::debug;

use crate::models::{Product, Searchable};

/// Badges that mark a product as generally trending.
pub const TRENDING_BADGES: &[&str] = &["trending", "bestseller", "best seller", "popular", "hot"];

/// Weather condition substring → product keywords.
const WEATHER_KEYWORDS: &[(&str, &[&str])] = &[
    ("rain", &["pakora", "samosa", "chai", "tea", "soup"]),
    ("monsoon", &["pakora", "samosa", "chai", "tea"]),
    ("drizzle", &["pakora", "chai", "tea"]),
    ("hot", &["mango", "lassi", "sharbat", "juice", "chilled"]),
    ("sunny", &["mango", "lassi", "sharbat", "juice"]),
    ("summer", &["mango", "lassi", "sharbat"]),
    ("cold", &["chai", "tea", "soup", "dry fruit", "warm"]),
    ("winter", &["chai", "tea", "dry fruit", "warm"]),
    ("snow", &["chai", "tea", "soup", "dry fruit"]),
];

/// City or region name → regional product keywords.
const REGIONAL_KEYWORDS: &[(&str, &[&str])] = &[
    ("karachi", &["biryani", "seafood", "pomfret"]),
    ("lahore", &["nihari", "lassi", "paratha"]),
    ("islamabad", &["organic", "dry fruit"]),
    ("peshawar", &["dry fruit", "chapli", "karahi"]),
    ("multan", &["mango", "sohan halwa"]),
    ("quetta", &["dry fruit", "sajji"]),
    ("sindh", &["biryani", "seafood"]),
    ("punjab", &["lassi", "mango", "saag"]),
    ("khyber pakhtunkhwa", &["dry fruit", "karahi"]),
    ("balochistan", &["sajji", "dry fruit"]),
];

/// Where and in what conditions the shopper is browsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationContext {
    pub city: Option<String>,
    pub region: Option<String>,
    pub weather: Option<String>,
}

impl LocationContext {
    /// Whether no field carries a usable value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.city, &self.region, &self.weather]
            .iter()
            .all(|field| normalized(field.as_deref()).is_none())
    }

    fn weather_keywords(&self) -> Vec<&'static str> {
        let Some(weather) = normalized(self.weather.as_deref()) else {
            return Vec::new();
        };
        WEATHER_KEYWORDS
            .iter()
            .filter(|(condition, _)| weather.contains(condition))
            .flat_map(|(_, keywords)| keywords.iter().copied())
            .collect()
    }

    fn place_keywords(&self) -> Vec<String> {
        let mut keywords = Vec::new();
        for place in [&self.city, &self.region] {
            let Some(place) = normalized(place.as_deref()) else {
                continue;
            };
            if let Some((_, regional)) = REGIONAL_KEYWORDS.iter().find(|(name, _)| *name == place) {
                keywords.extend(regional.iter().map(|k| (*k).to_owned()));
            }
            keywords.push(place);
        }
        keywords
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn mentions_any<K: AsRef<str>>(product: &Product, keywords: &[K]) -> bool {
    keywords
        .iter()
        .any(|keyword| product.matches_lowercase(keyword.as_ref()))
}

struct Picks<'a> {
    products: Vec<&'a Product>,
    seen: HashSet<ProductId>,
    limit: usize,
}

impl<'a> Picks<'a> {
    fn new(limit: usize, available: usize) -> Self {
        Self {
            products: Vec::with_capacity(limit.min(available)),
            seen: HashSet::new(),
            limit,
        }
    }

    fn is_full(&self) -> bool {
        self.products.len() >= self.limit
    }

    /// Add unseen candidates until full; returns how many were added.
    fn extend<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let before = self.products.len();
        for product in candidates {
            if self.is_full() {
                break;
            }
            if self.seen.insert(product.id) {
                self.products.push(product);
            }
        }
        self.products.len() - before
    }
}

/// Rank `products` for a shopper at `location`, returning at most `limit`.
#[must_use]
pub fn rank(products: &[Product], location: Option<&LocationContext>, limit: usize) -> Vec<Product> {
    let mut picks = Picks::new(limit, products.len());

    if let Some(location) = location {
        let weather = location.weather_keywords();
        if !weather.is_empty() {
            let added = picks.extend(products.iter().filter(|p| mentions_any(p, &weather)));
            debug!(added, "Weather matches");
        }

        let places = location.place_keywords();
        if !places.is_empty() && !picks.is_full() {
            let added = picks.extend(products.iter().filter(|p| mentions_any(p, &places)));
            debug!(added, "Place matches");
        }
    }

    if !picks.is_full() {
        let added = picks.extend(
            products
                .iter()
                .filter(|p| TRENDING_BADGES.iter().any(|badge| p.has_badge(badge))),
        );
        debug!(added, "Badge matches");
    }

    if !picks.is_full() {
        let mut by_rating: Vec<&Product> = products.iter().collect();
        by_rating.sort_by(|a, b| b.rating_or_zero().total_cmp(&a.rating_or_zero()));
        picks.extend(by_rating);
    }

    picks.products.into_iter().cloned().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog() -> Vec<Product> {
        serde_json::from_value(json!([
            { "Id": 1, "name": "Onions", "rating": 4.0 },
            { "Id": 2, "name": "Pakora Mix", "description": "Crispy in the rain", "rating": 3.5 },
            { "Id": 3, "name": "Biryani Masala", "badges": ["Trending"], "rating": 4.7 },
            { "Id": 4, "name": "Sweet Lassi", "badges": ["Hot"], "rating": 4.6 },
            { "Id": 5, "name": "Pink Tea", "rating": 4.9 },
            { "Id": 6, "name": "Salt" }
        ]))
        .unwrap()
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    fn location(city: Option<&str>, region: Option<&str>, weather: Option<&str>) -> LocationContext {
        LocationContext {
            city: city.map(str::to_owned),
            region: region.map(str::to_owned),
            weather: weather.map(str::to_owned),
        }
    }

    #[test]
    fn test_without_location_uses_badges_then_rating() {
        let ranked = rank(&catalog(), None, 4);
        assert_eq!(ids(&ranked), vec![3, 4, 5, 1]);
    }

    #[test]
    fn test_weather_matches_come_first() {
        let loc = location(None, None, Some("Light Rain"));
        let ranked = rank(&catalog(), Some(&loc), 3);
        // Pakora and tea match rain; badges fill the rest.
        assert_eq!(ids(&ranked), vec![2, 5, 3]);
    }

    #[test]
    fn test_city_uses_regional_table() {
        let loc = location(Some("Karachi"), None, None);
        let ranked = rank(&catalog(), Some(&loc), 2);
        assert_eq!(ids(&ranked), vec![3, 4]);

        let loc = location(Some("lahore"), None, None);
        assert_eq!(ids(&rank(&catalog(), Some(&loc), 1)), vec![4]);
    }

    #[test]
    fn test_results_are_unique_and_capped() {
        let loc = location(Some("Lahore"), Some("Punjab"), Some("hot and sunny"));
        let ranked = rank(&catalog(), Some(&loc), 10);

        assert_eq!(ranked.len(), 6);
        let unique: HashSet<_> = ranked.iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), ranked.len());
        assert_eq!(ranked.first().map(|p| p.id.as_i32()), Some(4));
    }

    #[test]
    fn test_rating_fallback_keeps_fixture_order_on_ties() {
        let products: Vec<Product> = serde_json::from_value(json!([
            { "Id": 1, "name": "A" },
            { "Id": 2, "name": "B", "rating": 2.0 },
            { "Id": 3, "name": "C" }
        ]))
        .unwrap();
        assert_eq!(ids(&rank(&products, None, 3)), vec![2, 1, 3]);
    }

    #[test]
    fn test_zero_limit_and_blank_location() {
        assert!(rank(&catalog(), None, 0).is_empty());

        let blank = location(Some("  "), None, Some(""));
        assert!(blank.is_empty());
        assert_eq!(rank(&catalog(), Some(&blank), 2), rank(&catalog(), None, 2));
    }

    #[test]
    fn test_huge_limit_returns_whole_catalog() {
        assert!(rank(&[], None, usize::MAX).is_empty());

        let loc = location(Some("Karachi"), None, Some("rain"));
        let ranked = rank(&catalog(), Some(&loc), usize::MAX);
        assert_eq!(ranked.len(), catalog().len());
    }
}
