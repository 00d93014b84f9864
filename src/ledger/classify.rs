// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keyword table that sorts free-text ledger categories into contractor and
//! supplier buckets for the dashboard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryClass {
    Contractor,
    Supplier,
}

impl CategoryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryClass::Contractor => "contractor",
            CategoryClass::Supplier => "supplier",
        }
    }
}

impl fmt::Display for CategoryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryClass {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contractor" | "contractors" => Ok(CategoryClass::Contractor),
            "supplier" | "suppliers" => Ok(CategoryClass::Supplier),
            other => Err(LedgerError::UnknownKeywordClass(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub class: CategoryClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub version: u32,
    pub rules: Vec<KeywordRule>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        KeywordTable {
            version: 1,
            rules: vec![
                KeywordRule::new("contractor", CategoryClass::Contractor),
                KeywordRule::new("labour", CategoryClass::Contractor),
                KeywordRule::new("material", CategoryClass::Supplier),
                KeywordRule::new("freight", CategoryClass::Supplier),
            ],
        }
    }
}

impl KeywordRule {
    pub fn new(keyword: &str, class: CategoryClass) -> Self {
        KeywordRule {
            keyword: keyword.trim().to_lowercase(),
            class,
        }
    }
}

impl KeywordTable {
    pub fn new(version: u32, rules: Vec<KeywordRule>) -> Self {
        KeywordTable { version, rules }
    }

    pub fn keywords(&self, class: CategoryClass) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(move |r| r.class == class)
            .map(|r| r.keyword.as_str())
    }

    /// True when the lowercased category contains any keyword of `class`.
    pub fn is(&self, class: CategoryClass, category: &str) -> bool {
        let lower = category.to_lowercase();
        self.keywords(class).any(|k| !k.is_empty() && lower.contains(k))
    }

    /// Every class the category falls into; may be empty or hold both.
    pub fn classify(&self, category: &str) -> Vec<CategoryClass> {
        [CategoryClass::Contractor, CategoryClass::Supplier]
            .into_iter()
            .filter(|c| self.is(*c, category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_substrings() {
        let t = KeywordTable::default();
        assert_eq!(t.classify("LabourWork"), vec![CategoryClass::Contractor]);
        assert_eq!(t.classify("Freights"), vec![CategoryClass::Supplier]);
        assert!(t.classify("Refreshments").is_empty());
        assert_eq!(
            t.classify("Contractor Material"),
            vec![CategoryClass::Contractor, CategoryClass::Supplier]
        );
    }

    #[test]
    fn custom_rules_extend_the_table() {
        let mut t = KeywordTable::default();
        t.rules.push(KeywordRule::new(" Steel ", CategoryClass::Supplier));
        assert!(!t.is(CategoryClass::Supplier, "StealFixer"));
        assert!(t.is(CategoryClass::Supplier, "Steel bars"));
    }

    #[test]
    fn class_parses_plural() {
        assert_eq!(
            "Suppliers".parse::<CategoryClass>().unwrap(),
            CategoryClass::Supplier
        );
        assert!("vendor".parse::<CategoryClass>().is_err());
    }
}
