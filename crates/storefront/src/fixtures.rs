//! Seed data for the catalog.
//!
//! The fixture set ships inside the binary; a directory holding
//! `products.json`, `categories.json`, and `recipeBundles.json` can replace it
//! at startup.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::models::{Category, Entity, Product, RecipeBundle};

pub const PRODUCTS_FILE: &str = "products.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const BUNDLES_FILE: &str = "recipeBundles.json";

const EMBEDDED_PRODUCTS: &str = include_str!("../fixtures/products.json");
const EMBEDDED_CATEGORIES: &str = include_str!("../fixtures/categories.json");
const EMBEDDED_BUNDLES: &str = include_str!("../fixtures/recipeBundles.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {entity} Id {id} in {file}")]
    DuplicateId {
        file: &'static str,
        entity: &'static str,
        id: i32,
    },
}

/// The three fixture collections.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub bundles: Vec<RecipeBundle>,
}

impl Fixtures {
    /// Parse the fixture set compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded file is malformed.
    pub fn embedded() -> Result<Self, FixtureError> {
        Self::parse(EMBEDDED_PRODUCTS, EMBEDDED_CATEGORIES, EMBEDDED_BUNDLES)
    }

    /// Read and parse the fixture files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing, unreadable, or malformed.
    pub fn from_dir(dir: &Path) -> Result<Self, FixtureError> {
        let products = read(dir, PRODUCTS_FILE)?;
        let categories = read(dir, CATEGORIES_FILE)?;
        let bundles = read(dir, BUNDLES_FILE)?;
        Self::parse(&products, &categories, &bundles)
    }

    /// Load from `dir` when given, otherwise use the embedded set.
    ///
    /// # Errors
    ///
    /// See [`Self::from_dir`] and [`Self::embedded`].
    pub fn load(dir: Option<&Path>) -> Result<Self, FixtureError> {
        let fixtures = match dir {
            Some(dir) => Self::from_dir(dir)?,
            None => Self::embedded()?,
        };
        info!(
            source = dir.map_or_else(|| "embedded".to_owned(), |d| d.display().to_string()),
            products = fixtures.products.len(),
            categories = fixtures.categories.len(),
            bundles = fixtures.bundles.len(),
            "Fixtures loaded"
        );
        Ok(fixtures)
    }

    fn parse(products: &str, categories: &str, bundles: &str) -> Result<Self, FixtureError> {
        Ok(Self {
            products: parse_collection(PRODUCTS_FILE, products)?,
            categories: parse_collection(CATEGORIES_FILE, categories)?,
            bundles: parse_collection(BUNDLES_FILE, bundles)?,
        })
    }
}

fn read(dir: &Path, file: &str) -> Result<String, FixtureError> {
    let path = dir.join(file);
    std::fs::read_to_string(&path).map_err(|source| FixtureError::Io { path, source })
}

fn parse_collection<E: Entity>(file: &'static str, raw: &str) -> Result<Vec<E>, FixtureError> {
    let records: Vec<E> =
        serde_json::from_str(raw).map_err(|source| FixtureError::Parse { file, source })?;

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id()) {
            return Err(FixtureError::DuplicateId {
                file,
                entity: E::NAME,
                id: record.id().into(),
            });
        }
    }
    Ok(records)
}
