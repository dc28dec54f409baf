//! Category / sub-category selection state.
//!
//! A `Selection` can only be built through constructors that validate it
//! against the record set, so a sub-category that does not belong to the
//! selected category is never representable.

use crate::analysis::filter::{distinct_categories, subcategories_in};
use crate::models::SalesRecord;
use serde::Serialize;
use thiserror::Error;

/// Errors raised when a requested selection does not fit the dataset.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("The dataset contains no records to select from")]
    EmptyDataset,

    #[error("Unknown category '{requested}'. Available: {}", .available.join(", "))]
    UnknownCategory {
        requested: String,
        available: Vec<String>,
    },

    #[error(
        "Sub-category '{requested}' does not belong to '{category}'. Available: {}",
        .available.join(", ")
    )]
    UnknownSubCategory {
        requested: String,
        category: String,
        available: Vec<String>,
    },
}

/// The user's current drill-down choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    category: String,
    subcategories: Vec<String>,
}

impl Selection {
    /// Selects `category` with all of its sub-categories.
    pub fn for_category(records: &[SalesRecord], category: &str) -> Result<Self, SelectionError> {
        let available = subcategories_in(records, category);
        if available.is_empty() {
            return Err(SelectionError::UnknownCategory {
                requested: category.to_string(),
                available: distinct_categories(records),
            });
        }

        Ok(Self {
            category: category.to_string(),
            subcategories: available,
        })
    }

    /// Selects the first category in the dataset with all of its sub-categories.
    pub fn first(records: &[SalesRecord]) -> Result<Self, SelectionError> {
        let first = records.first().ok_or(SelectionError::EmptyDataset)?;
        Self::for_category(records, &first.category)
    }

    /// Builds a selection from optional user choices.
    ///
    /// Without a category the first one in the dataset is used; without
    /// sub-categories every option under the category is selected.
    pub fn resolve(
        records: &[SalesRecord],
        category: Option<&str>,
        subcategories: Option<&[String]>,
    ) -> Result<Self, SelectionError> {
        let selection = Self::first(records)?;
        let selection = match category {
            Some(category) if category != selection.category() => {
                selection.change_category(records, category)?
            }
            _ => selection,
        };

        match subcategories {
            Some(requested) => selection.with_subcategories(records, requested),
            None => Ok(selection),
        }
    }

    /// Switches to another category, consuming the current selection.
    ///
    /// Nothing carries over: the sub-category choice is reset to everything
    /// available under the new category, never intersected with the old one.
    pub fn change_category(self, records: &[SalesRecord], category: &str) -> Result<Self, SelectionError> {
        Self::for_category(records, category)
    }

    /// Narrows the selection to `requested` sub-categories.
    ///
    /// Order follows the available options; duplicates collapse. An empty
    /// request is valid and selects nothing.
    pub fn with_subcategories(
        self,
        records: &[SalesRecord],
        requested: &[String],
    ) -> Result<Self, SelectionError> {
        let available = subcategories_in(records, &self.category);

        if let Some(unknown) = requested.iter().find(|r| !available.contains(r)) {
            return Err(SelectionError::UnknownSubCategory {
                requested: unknown.clone(),
                category: self.category,
                available,
            });
        }

        let subcategories = available
            .into_iter()
            .filter(|s| requested.contains(s))
            .collect();

        Ok(Self {
            category: self.category,
            subcategories,
        })
    }

    /// The selected category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The selected sub-categories.
    pub fn subcategories(&self) -> &[String] {
        &self.subcategories
    }

    /// Whether `record` falls inside this selection.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        record.category == self.category && self.subcategories.contains(&record.sub_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn create_test_record(category: &str, sub_category: &str) -> SalesRecord {
        SalesRecord {
            order_date: NaiveDate::from_ymd_opt(2016, 11, 8).unwrap(),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            sales: dec!(10),
            profit: dec!(1),
        }
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            create_test_record("Furniture", "Chairs"),
            create_test_record("Furniture", "Tables"),
            create_test_record("Technology", "Phones"),
            create_test_record("Technology", "Copiers"),
        ]
    }

    #[test]
    fn test_default_selects_all_subcategories() {
        let selection = Selection::for_category(&sample(), "Furniture").unwrap();
        assert_eq!(selection.category(), "Furniture");
        assert_eq!(selection.subcategories(), ["Chairs", "Tables"]);
    }

    #[test]
    fn test_first_category() {
        let selection = Selection::first(&sample()).unwrap();
        assert_eq!(selection.category(), "Furniture");
        assert_eq!(Selection::first(&[]), Err(SelectionError::EmptyDataset));
    }

    #[test]
    fn test_change_category_resets_subcategories() {
        let records = sample();
        let narrowed = Selection::for_category(&records, "Furniture")
            .unwrap()
            .with_subcategories(&records, &["Tables".to_string()])
            .unwrap();

        let switched = narrowed.change_category(&records, "Technology").unwrap();
        assert_eq!(switched.category(), "Technology");
        assert_eq!(switched.subcategories(), ["Phones", "Copiers"]);

        // Switching back restores every option, not the earlier narrowing.
        let back = switched.change_category(&records, "Furniture").unwrap();
        assert_eq!(back.subcategories(), ["Chairs", "Tables"]);
    }

    #[test]
    fn test_unknown_category() {
        let err = Selection::for_category(&sample(), "Toys").unwrap_err();
        assert!(matches!(err, SelectionError::UnknownCategory { .. }));
        assert!(err.to_string().contains("Furniture, Technology"));
    }

    #[test]
    fn test_subcategory_from_other_category_rejected() {
        let records = sample();
        let err = Selection::for_category(&records, "Furniture")
            .unwrap()
            .with_subcategories(&records, &["Phones".to_string()])
            .unwrap_err();

        assert_eq!(
            err,
            SelectionError::UnknownSubCategory {
                requested: "Phones".to_string(),
                category: "Furniture".to_string(),
                available: vec!["Chairs".to_string(), "Tables".to_string()],
            }
        );
    }

    #[test]
    fn test_with_subcategories_follows_option_order() {
        let records = sample();
        let selection = Selection::for_category(&records, "Furniture")
            .unwrap()
            .with_subcategories(
                &records,
                &["Tables".to_string(), "Chairs".to_string(), "Tables".to_string()],
            )
            .unwrap();
        assert_eq!(selection.subcategories(), ["Chairs", "Tables"]);
    }

    #[test]
    fn test_resolve() {
        let records = sample();

        let default = Selection::resolve(&records, None, None).unwrap();
        assert_eq!(default, Selection::for_category(&records, "Furniture").unwrap());

        let phones = ["Phones".to_string()];
        let narrowed = Selection::resolve(&records, Some("Technology"), Some(&phones[..])).unwrap();
        assert_eq!(narrowed.subcategories(), ["Phones"]);

        let empty = Selection::resolve(&records, Some("Technology"), Some(&[][..])).unwrap();
        assert!(empty.subcategories().is_empty());

        assert!(Selection::resolve(&records, None, Some(&phones[..])).is_err());
    }

    #[test]
    fn test_matches() {
        let records = sample();
        let selection = Selection::for_category(&records, "Furniture")
            .unwrap()
            .with_subcategories(&records, &["Chairs".to_string()])
            .unwrap();
        assert!(selection.matches(&records[0]));
        assert!(!selection.matches(&records[1]));
        assert!(!selection.matches(&records[2]));
    }
}
