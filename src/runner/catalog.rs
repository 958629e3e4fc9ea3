use std::collections::BTreeMap;

use crate::models::common::TestRef;
use crate::models::errors::CatalogError;
use crate::utils::short_source_name;

// A test source file, shown by its file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSource {
    pub label: String,
    pub full: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCatalog {
    tests: BTreeMap<String, Vec<String>>,
}

impl TestCatalog {
    pub fn new(tests: BTreeMap<String, Vec<String>>) -> Self {
        Self { tests }
    }

    pub fn is_empty(&self) -> bool {
        self.tests.values().all(Vec::is_empty)
    }

    // Sources ordered case-insensitively by label
    pub fn sources(&self) -> Vec<TestSource> {
        let mut sources: Vec<TestSource> = self
            .tests
            .keys()
            .map(|full| TestSource {
                label: short_source_name(full).to_string(),
                full: full.clone(),
            })
            .collect();
        sources.sort_by_key(|source| source.label.to_uppercase());
        sources
    }

    // Tests of one source ordered case-insensitively; `src` may be the full path or its label
    pub fn tests_for(&self, src: &str) -> Vec<&str> {
        let Some(full) = self.find_source(src) else {
            return Vec::new();
        };
        let mut tests: Vec<&str> = self.tests[full].iter().map(String::as_str).collect();
        tests.sort_by_key(|test| test.to_uppercase());
        tests.dedup();
        tests
    }

    pub fn resolve(&self, src: &str, test: &str) -> Result<TestRef, CatalogError> {
        let full = self
            .find_source(src)
            .ok_or_else(|| CatalogError::UnknownSource {
                src: src.to_string(),
            })?;
        if !self.tests[full].iter().any(|t| t == test) {
            return Err(CatalogError::UnknownTest {
                src: full.to_string(),
                test: test.to_string(),
            });
        }
        Ok(TestRef {
            src: full.to_string(),
            test: test.to_string(),
        })
    }

    fn find_source(&self, src: &str) -> Option<&str> {
        if let Some((full, _)) = self.tests.get_key_value(src) {
            return Some(full);
        }
        self.tests
            .keys()
            .find(|full| short_source_name(full) == src)
            .map(String::as_str)
    }
}

impl TestRef {
    // Request selector `{"<src>": ["<test>"]}`
    pub fn selector(&self) -> serde_json::Value {
        let mut selector = serde_json::Map::new();
        selector.insert(self.src.clone(), serde_json::json!([self.test]));
        serde_json::Value::Object(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TestCatalog {
        let mut tests = BTreeMap::new();
        tests.insert(
            "src/test/vault.t.sol:VaultTest".to_string(),
            vec!["testWithdraw".to_string(), "testDeposit".to_string()],
        );
        tests.insert(
            "src/test/Auction.t.sol:AuctionTest".to_string(),
            vec!["test_bid".to_string(), "testBidTooLow".to_string()],
        );
        TestCatalog::new(tests)
    }

    #[test]
    fn sources_sorted_by_label() {
        let labels: Vec<String> = catalog().sources().into_iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Auction.t.sol:AuctionTest", "vault.t.sol:VaultTest"]);
    }

    #[test]
    fn tests_sorted_case_insensitively() {
        let catalog = catalog();
        assert_eq!(
            catalog.tests_for("Auction.t.sol:AuctionTest"),
            vec!["testBidTooLow", "test_bid"]
        );
        assert_eq!(
            catalog.tests_for("src/test/vault.t.sol:VaultTest"),
            vec!["testDeposit", "testWithdraw"]
        );
        assert!(catalog.tests_for("Missing.t.sol").is_empty());
    }

    #[test]
    fn resolve_builds_selector() {
        let test = catalog().resolve("vault.t.sol:VaultTest", "testDeposit").unwrap();
        assert_eq!(test.src, "src/test/vault.t.sol:VaultTest");
        assert_eq!(
            test.selector(),
            serde_json::json!({"src/test/vault.t.sol:VaultTest": ["testDeposit"]})
        );

        assert!(matches!(
            catalog().resolve("vault.t.sol:VaultTest", "testNope"),
            Err(CatalogError::UnknownTest { .. })
        ));
    }
}
