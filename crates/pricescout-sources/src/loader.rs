//! Source definition loading from TOML files.
//!
//! Each `*.toml` file under the definitions directory holds one `[source]`
//! table. Subdirectories are walked recursively.

use crate::{
    definition::SourceDefinition,
    error::{Result, SourceError},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// On-disk layout of a definition file.
#[derive(Debug, Deserialize)]
struct SourceFile {
    source: SourceDefinition,
}

/// Loader for source definitions from TOML files.
pub struct SourceLoader {
    /// Base directory containing source definitions
    definitions_dir: PathBuf,
}

impl SourceLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(SourceError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Load all source definitions from the definitions directory.
    ///
    /// Invalid definitions are logged as warnings and skipped. Files are read
    /// in path order so overrides are deterministic.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<SourceDefinition>> {
        let mut definitions = Vec::new();

        Self::walk_and_load_recursive(&self.definitions_dir, &mut definitions)?;

        info!(
            count = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded source definitions"
        );

        Ok(definitions)
    }

    /// Recursively walk directory and load all TOML files.
    fn walk_and_load_recursive(dir: &Path, definitions: &mut Vec<SourceDefinition>) -> Result<()> {
        let mut paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            if path.is_dir() {
                Self::walk_and_load_recursive(&path, definitions)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                match Self::load_from_path(&path) {
                    Ok(definition) => {
                        if let Err(e) = definition.validate() {
                            warn!(
                                path = %path.display(),
                                error = %e,
                                "skipping invalid source definition"
                            );
                            continue;
                        }
                        debug!(
                            path = %path.display(),
                            marketplace = %definition.marketplace,
                            "loaded source definition"
                        );
                        definitions.push(definition);
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to load source definition"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Load a source definition from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<SourceDefinition> {
        let contents = std::fs::read_to_string(path).map_err(|e| SourceError::LoadError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str::<SourceFile>(&contents)
            .map(|file| file.source)
            .map_err(|e| SourceError::ParseError {
                path: path.display().to_string(),
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::PriceStrategy;
    use pricescout_core::Marketplace;
    use tempfile::TempDir;

    fn write_definition(dir: &Path, name: &str, marketplace: &str, template: &str) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create dir");
        let path = dir.join(format!("{name}.toml"));
        let content = format!(
            r#"
[source]
marketplace = "{marketplace}"
search_url_template = "{template}"
price_strategy = "digits-only"
max_items = 3

[source.selectors]
result_item = ".card"
title = ".title"
price = ".price"
link = "a"
image = "img"
"#
        );
        std::fs::write(&path, content).expect("write definition");
        path
    }

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().expect("create temp dir");
        let result = SourceLoader::new(tmp.path().join("nope"));
        assert!(matches!(result, Err(SourceError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_load_from_path_applies_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_definition(
            tmp.path(),
            "ozon",
            "ozon",
            "https://www.ozon.ru/search/?text={query}",
        );

        let definition = SourceLoader::load_from_path(&path).expect("load definition");
        assert_eq!(definition.marketplace, Marketplace::Ozon);
        assert_eq!(definition.price_strategy, PriceStrategy::DigitsOnly);
        assert_eq!(definition.max_items, 3);
        assert_eq!(definition.navigation_timeout_ms, 15_000);
        assert_eq!(definition.result_wait_timeout_ms, 10_000);
    }

    #[test]
    fn test_load_all_recursive_skips_invalid() {
        let tmp = TempDir::new().expect("create temp dir");
        write_definition(
            tmp.path(),
            "wildberries",
            "wildberries",
            "https://www.wildberries.ru/catalog/0/search.aspx?search={query}",
        );
        write_definition(
            &tmp.path().join("nested"),
            "yandex",
            "yandex-market",
            "https://market.yandex.ru/search?text={query}",
        );
        // No placeholder: fails validation
        write_definition(tmp.path(), "broken", "ozon", "https://www.ozon.ru/search/");
        std::fs::write(tmp.path().join("garbage.toml"), "not = [valid").expect("write garbage");
        std::fs::write(tmp.path().join("README.md"), "ignored").expect("write readme");

        let loader = SourceLoader::new(tmp.path()).expect("create loader");
        let definitions = loader.load_all().expect("load all");

        let mut marketplaces: Vec<_> = definitions.iter().map(|d| d.marketplace).collect();
        marketplaces.sort();
        assert_eq!(
            marketplaces,
            vec![Marketplace::Wildberries, Marketplace::YandexMarket]
        );
    }

    #[test]
    fn test_parse_error_reports_path() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[source]\nmarketplace = \"aliexpress\"").expect("write file");

        let err = SourceLoader::load_from_path(&path).expect_err("unknown marketplace");
        assert!(matches!(err, SourceError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_shipped_definitions_load_and_match_builtins() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../source-definitions");
        let loader = SourceLoader::new(dir).expect("shipped definitions directory");
        let definitions = loader.load_all().expect("load all");

        // Path order: ozon, wildberries, yandex-market
        let marketplaces: Vec<_> = definitions.iter().map(|d| d.marketplace).collect();
        assert_eq!(
            marketplaces,
            vec![Marketplace::Ozon, Marketplace::Wildberries, Marketplace::YandexMarket]
        );
        for definition in &definitions {
            assert!(definition.validate().is_ok());
            assert_eq!(definition, &SourceDefinition::builtin(definition.marketplace));
        }
    }
}
