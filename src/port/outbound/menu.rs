//! Menu catalog port.

use chrono::NaiveDateTime;

use crate::domain::id::RestaurantNumber;
use crate::domain::menu::{MenuListing, MenuVersion};
use crate::error::Result;

/// Menus and their edit-session timestamps.
pub trait MenuCatalog: Send + Sync {
    /// Load a restaurant's menu by name together with its current version.
    ///
    /// Returns `None` when no restaurant has that name.
    fn load_menu(&self, restaurant_name: &str) -> Result<Option<MenuListing>>;

    /// Current menu version, or `None` for an unknown restaurant.
    fn menu_version(&self, restaurant: RestaurantNumber) -> Result<Option<MenuVersion>>;

    /// Record the start of an edit session. Returns false for an unknown restaurant.
    fn mark_edit_begin(&self, restaurant: RestaurantNumber, at: NaiveDateTime) -> Result<bool>;

    /// Record the end of an edit session. Returns false for an unknown restaurant.
    fn mark_edit_end(&self, restaurant: RestaurantNumber, at: NaiveDateTime) -> Result<bool>;
}
