//! The grocery store directory.

use serde::Serialize;
use shopit_core::state::{FavoritesStore, StorageError};

/// A grocery store in the directory.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryStore {
    /// Unique id, used for favorites.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Street address.
    pub address: &'static str,
    /// City.
    pub city: &'static str,
    /// State code.
    pub state: &'static str,
    /// Postal code.
    pub zip_code: &'static str,
    /// Phone number.
    pub phone: &'static str,
    /// Opening hours.
    pub hours: &'static str,
    /// Average rating out of five.
    pub rating: f32,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

macro_rules! store {
    (
        $id:literal, $name:literal, $address:literal, $zip:literal,
        $phone:literal, $hours:literal, $rating:literal, $lat:literal,
        $lng:literal $(,)?
    ) => {
        GroceryStore {
            id: $id,
            name: $name,
            address: $address,
            city: "San Francisco",
            state: "CA",
            zip_code: $zip,
            phone: $phone,
            hours: $hours,
            rating: $rating,
            latitude: $lat,
            longitude: $lng,
        }
    };
}

static STORES: [GroceryStore; 6] = [
    store!(
        "1",
        "Fresh Market",
        "123 Main St",
        "94105",
        "(415) 555-1234",
        "8:00 AM - 10:00 PM",
        4.5,
        37.7749,
        -122.4194,
    ),
    store!(
        "2",
        "Organic Grocers",
        "456 Market St",
        "94103",
        "(415) 555-5678",
        "7:00 AM - 9:00 PM",
        4.2,
        37.7831,
        -122.4039,
    ),
    store!(
        "3",
        "City Supermarket",
        "789 Mission St",
        "94103",
        "(415) 555-9012",
        "24 hours",
        3.8,
        37.7841,
        -122.4075,
    ),
    store!(
        "4",
        "Neighborhood Grocery",
        "321 Valencia St",
        "94110",
        "(415) 555-3456",
        "8:00 AM - 11:00 PM",
        4.7,
        37.7583,
        -122.4212,
    ),
    store!(
        "5",
        "Downtown Market",
        "555 Howard St",
        "94105",
        "(415) 555-7890",
        "7:00 AM - 10:00 PM",
        4.0,
        37.7873,
        -122.3964,
    ),
    store!(
        "6",
        "Sunset Grocers",
        "1234 Irving St",
        "94122",
        "(415) 555-2345",
        "8:00 AM - 9:00 PM",
        4.3,
        37.7638,
        -122.4686,
    ),
];

/// Returns every store in the directory.
#[inline]
pub fn stores() -> &'static [GroceryStore] {
    &STORES
}

/// Finds a store by id.
pub fn find(id: &str) -> Option<&'static GroceryStore> {
    STORES.iter().find(|store| store.id == id)
}

/// Returns the stores whose name, address or city contains `term`,
/// ignoring case. A blank term matches nothing.
pub fn search(term: &str) -> Vec<&'static GroceryStore> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return vec![];
    }
    STORES
        .iter()
        .filter(|store| {
            [store.name, store.address, store.city]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}

/// Returns the user's favorite stores, in the order they were added.
///
/// Ids that aren't in the directory are skipped.
pub fn favorite_stores(
    favorites: &FavoritesStore,
) -> Result<Vec<&'static GroceryStore>, StorageError> {
    Ok(favorites
        .ids()?
        .iter()
        .filter_map(|id| find(id))
        .collect())
}
