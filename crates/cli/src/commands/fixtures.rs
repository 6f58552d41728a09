//! Fixture validation command.
//!
//! Parsing already rejects malformed JSON and duplicate ids; this adds the
//! cross-reference checks that need all three collections at once.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use bazaar_storefront::fixtures::Fixtures;
use thiserror::Error;
use tracing::info;

/// Cross-reference problems found in a fixture set.
#[derive(Debug, Error)]
#[error("{} fixture problem(s) found", .0.len())]
pub struct FixtureProblems(pub Vec<String>);

/// Load fixtures and report every cross-reference problem.
///
/// # Errors
///
/// Returns an error if the fixtures fail to load or any problem is found.
pub fn check(dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = Fixtures::load(dir)?;
    let problems = cross_reference(&fixtures);

    #[allow(clippy::print_stdout)]
    {
        println!(
            "{} products, {} categories, {} bundles",
            fixtures.products.len(),
            fixtures.categories.len(),
            fixtures.bundles.len()
        );
        for problem in &problems {
            println!("  problem: {problem}");
        }
    }

    if problems.is_empty() {
        info!("All fixture checks passed");
        Ok(())
    } else {
        Err(FixtureProblems(problems).into())
    }
}

/// Find references that do not resolve within the fixture set.
#[must_use]
pub fn cross_reference(fixtures: &Fixtures) -> Vec<String> {
    let mut problems = Vec::new();

    let product_ids: HashSet<_> = fixtures.products.iter().map(|p| p.id).collect();
    for bundle in &fixtures.bundles {
        let mut component_ids = HashSet::new();
        for component in &bundle.components {
            if !product_ids.contains(&component.product.id) {
                problems.push(format!(
                    "bundle {} component {} references missing product {}",
                    bundle.id, component.id, component.product.id
                ));
            }
            if !component_ids.insert(component.id) {
                problems.push(format!(
                    "bundle {} repeats component id {}",
                    bundle.id, component.id
                ));
            }
        }
    }

    let category_names: HashSet<&str> = fixtures
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for product in &fixtures.products {
        let Some(category) = product.extra.get("category").and_then(|v| v.as_str()) else {
            continue;
        };
        *counts.entry(category).or_default() += 1;
        if !category_names.contains(category) {
            problems.push(format!(
                "product {} has unknown category {category:?}",
                product.id
            ));
        }
    }

    for category in &fixtures.categories {
        let Some(declared) = category.extra.get("productCount").and_then(|v| v.as_u64()) else {
            continue;
        };
        let actual = counts.get(category.name.as_str()).copied().unwrap_or(0);
        if declared != actual {
            problems.push(format!(
                "category {} declares {declared} products but has {actual}",
                category.id
            ));
        }
    }

    problems
}
