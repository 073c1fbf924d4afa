//! Identifier aliases shared by the ledger and the reports.
//!
//! These mirror the integer keys of the backing store.

/// Restaurant (branch) number.
pub type RestaurantNumber = i32;

/// Customer account number.
pub type CustomerNumber = i32;

/// Dish identifier within the menu tables.
pub type DishId = i32;

/// Identifier assigned to an order when its header row is written.
pub type OrderId = i32;
