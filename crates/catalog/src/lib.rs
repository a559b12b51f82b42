//! Static marketplace catalogue for the FitCoin demo environment.
//!
//! The catalogue is a fixed, read-only set of redeemable offers. Items never
//! change at runtime; screens filter them by category and the session layer
//! looks them up by id when recording a purchase. The crate carries data
//! only — pricing checks and ledger mutation live with the session service.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Redeemable offer categories surfaced by the marketplace screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Health-insurance premium discounts.
    Insurance,
    /// Partner advertising offers.
    Advertising,
    /// Environmental-impact offers such as tree planting.
    Eco,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insurance => f.write_str("insurance"),
            Self::Advertising => f.write_str("advertising"),
            Self::Eco => f.write_str("eco"),
        }
    }
}

/// A single redeemable marketplace offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceItem {
    /// Stable catalogue identifier.
    pub id: String,
    /// Short offer title shown in listings.
    pub title: String,
    /// One-sentence offer description.
    pub description: String,
    /// Price in FitCoins.
    pub coin_cost: u64,
    /// Offer category used for screen filtering.
    pub category: ItemCategory,
    /// Whether the offer can currently be redeemed.
    pub available: bool,
}

/// Error returned when a catalogue lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No item with the requested id exists in the catalogue.
    #[error("no marketplace item with id {id}")]
    UnknownItem {
        /// The id that failed to resolve.
        id: String,
    },
}

fn build_item(
    id: &str,
    title: &str,
    description: &str,
    coin_cost: u64,
    category: ItemCategory,
) -> MarketplaceItem {
    MarketplaceItem {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        coin_cost,
        category,
        available: true,
    }
}

static CATALOG: OnceLock<Vec<MarketplaceItem>> = OnceLock::new();

/// Returns the full catalogue in stable display order.
///
/// # Examples
///
/// ```
/// let items = fitcoin_catalog::catalog();
/// assert_eq!(items.len(), 6);
/// ```
#[must_use]
pub fn catalog() -> &'static [MarketplaceItem] {
    CATALOG
        .get_or_init(|| {
            vec![
                build_item(
                    "1",
                    "Insurance Discount 10%",
                    "Get 10% discount on your health insurance premium",
                    500,
                    ItemCategory::Insurance,
                ),
                build_item(
                    "2",
                    "Insurance Discount 25%",
                    "Get 25% discount on your health insurance premium",
                    1200,
                    ItemCategory::Insurance,
                ),
                build_item(
                    "3",
                    "Partner Ad Revenue",
                    "Earn from viewing partner advertisements",
                    200,
                    ItemCategory::Advertising,
                ),
                build_item(
                    "4",
                    "Premium Ad Slots",
                    "Access to premium advertising opportunities",
                    800,
                    ItemCategory::Advertising,
                ),
                build_item(
                    "5",
                    "Plant 1 Tree",
                    "Fund planting of 1 tree for environmental impact",
                    100,
                    ItemCategory::Eco,
                ),
                build_item(
                    "6",
                    "Plant 10 Trees",
                    "Fund planting of 10 trees for greater environmental impact",
                    900,
                    ItemCategory::Eco,
                ),
            ]
        })
        .as_slice()
}

/// Looks up a catalogue item by its stable id.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownItem`] when no item carries the id.
///
/// # Examples
///
/// ```
/// let item = fitcoin_catalog::find("5")?;
/// assert_eq!(item.coin_cost, 100);
/// # Ok::<(), fitcoin_catalog::CatalogError>(())
/// ```
pub fn find(id: &str) -> Result<&'static MarketplaceItem, CatalogError> {
    catalog()
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| CatalogError::UnknownItem { id: id.to_owned() })
}

/// Returns the catalogue items belonging to `category`, in catalogue order.
///
/// # Examples
///
/// ```
/// use fitcoin_catalog::ItemCategory;
///
/// let eco = fitcoin_catalog::by_category(ItemCategory::Eco);
/// assert_eq!(eco.len(), 2);
/// ```
#[must_use]
pub fn by_category(category: ItemCategory) -> Vec<&'static MarketplaceItem> {
    catalog()
        .iter()
        .filter(|item| item.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the static catalogue.

    use rstest::rstest;

    use super::{CatalogError, ItemCategory, by_category, catalog, find};

    #[rstest]
    fn catalogue_is_deterministic_and_complete() {
        let first = catalog();
        let second = catalog();
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
        assert!(first.iter().all(|item| item.available));
    }

    #[rstest]
    #[case(ItemCategory::Insurance, 2)]
    #[case(ItemCategory::Advertising, 2)]
    #[case(ItemCategory::Eco, 2)]
    fn categories_each_carry_two_items(#[case] category: ItemCategory, #[case] expected: usize) {
        assert_eq!(by_category(category).len(), expected);
    }

    #[rstest]
    fn find_resolves_known_ids() {
        let item = match find("3") {
            Ok(item) => item,
            Err(err) => panic!("catalogue id 3 must resolve: {err}"),
        };
        assert_eq!(item.title, "Partner Ad Revenue");
        assert_eq!(item.category, ItemCategory::Advertising);
    }

    #[rstest]
    fn find_rejects_unknown_ids() {
        let err = match find("99") {
            Ok(item) => panic!("unexpected catalogue item {item:?}"),
            Err(err) => err,
        };
        assert_eq!(
            err,
            CatalogError::UnknownItem {
                id: "99".to_owned()
            }
        );
    }

    #[rstest]
    fn items_serialize_with_camel_case_keys() {
        let Some(first) = catalog().first() else {
            panic!("catalogue must not be empty");
        };
        let rendered = match serde_json::to_string(first) {
            Ok(rendered) => rendered,
            Err(err) => panic!("catalogue serializes: {err}"),
        };
        assert!(rendered.contains("\"coinCost\":500"));
        assert!(rendered.contains("\"category\":\"insurance\""));
    }
}
