//! Menu versions, the snapshots orders are assembled against, and menu rows.
//!
//! A restaurant's [`MenuVersion`] is the window of its most recent edit
//! session. Orders capture it as a [`MenuSnapshot`] when the menu is loaded
//! and may only commit while the live version still equals the snapshot.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::{DishId, RestaurantNumber};
use super::order::DishCategory;

/// Size whose price is the dish's base price.
pub const REGULAR_SIZE: &str = "regular";

/// Values offered for a `cooking_level` option.
pub const DONENESS_LEVELS: [&str; 3] = ["Medium", "Medium Well", "Well Done"];

/// Timestamps of a restaurant's last menu-edit session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuVersion {
    #[serde(default, with = "super::timestamp::text::option")]
    pub begin_update: Option<NaiveDateTime>,
    #[serde(default, with = "super::timestamp::text::option")]
    pub end_update: Option<NaiveDateTime>,
}

/// Whether a menu-edit session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    Idle,
    Editing,
}

impl MenuVersion {
    #[must_use]
    pub fn new(begin_update: Option<NaiveDateTime>, end_update: Option<NaiveDateTime>) -> Self {
        Self {
            begin_update,
            end_update,
        }
    }

    /// Never edited, or the last session closed no earlier than it opened.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        match (self.begin_update, self.end_update) {
            (None, None) => true,
            (Some(begin), Some(end)) => begin <= end,
            _ => false,
        }
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        match (self.begin_update, self.end_update) {
            (Some(_), None) => MenuState::Editing,
            (Some(begin), Some(end)) if end < begin => MenuState::Editing,
            _ => MenuState::Idle,
        }
    }

    /// Open an edit session at `at`.
    pub fn begin_edit(&mut self, at: NaiveDateTime) {
        self.begin_update = Some(at);
    }

    /// Close the edit session at `at`.
    pub fn end_edit(&mut self, at: NaiveDateTime) {
        self.end_update = Some(at);
    }
}

/// Menu version captured for one restaurant at menu load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub restaurant: RestaurantNumber,
    #[serde(flatten)]
    pub version: MenuVersion,
}

impl MenuSnapshot {
    /// An order built on this snapshot may commit against `live` only when
    /// nothing changed since load and no edit session is open.
    #[must_use]
    pub fn permits_commit(&self, live: &MenuVersion) -> bool {
        self.version == *live && live.is_settled()
    }
}

/// A priced size other than regular.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    pub size: String,
    pub price: i32,
}

/// One dish as offered to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub dish_id: DishId,
    pub name: String,
    pub category: DishCategory,
    /// Base (regular size) price.
    pub price: i32,
    pub sizes: Vec<SizeOption>,
    pub options: BTreeMap<String, Vec<String>>,
}

impl MenuItem {
    #[must_use]
    pub fn new(dish_id: DishId, name: impl Into<String>, category: DishCategory) -> Self {
        Self {
            dish_id,
            name: name.into(),
            category,
            price: 0,
            sizes: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    /// Record a price row; the regular size sets the base price.
    pub fn add_price(&mut self, size: &str, price: i32) {
        if size.eq_ignore_ascii_case(REGULAR_SIZE) {
            self.price = price;
        } else {
            self.sizes.push(SizeOption {
                size: size.to_string(),
                price,
            });
        }
    }

    /// Record a raw option row under its normalized group.
    pub fn add_option(&mut self, option_type: &str, value: &str) {
        let (group, values) = normalize_option(option_type, value);
        let entry = self.options.entry(group).or_default();
        for value in values {
            if !entry.contains(&value) {
                entry.push(value);
            }
        }
    }
}

/// A loaded menu plus the version to commit against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuListing {
    pub restaurant_name: String,
    pub snapshot: MenuSnapshot,
    pub items: Vec<MenuItem>,
}

/// Map a raw option row to its display group and values.
///
/// `cooking_level` rows that list `M, MW, WD` become the `Doneness` group,
/// `ingredient` rows of the form `no X` become `Remove` with `X`, and
/// everything else is grouped under its option type.
#[must_use]
pub fn normalize_option(option_type: &str, value: &str) -> (String, Vec<String>) {
    let value = value.trim();
    if option_type.eq_ignore_ascii_case("cooking_level") && value.starts_with("M, MW, WD") {
        return (
            "Doneness".to_string(),
            DONENESS_LEVELS.iter().map(|s| (*s).to_string()).collect(),
        );
    }
    if option_type.eq_ignore_ascii_case("ingredient") {
        if let Some(rest) = value.strip_prefix("no ").or_else(|| value.strip_prefix("No ")) {
            return ("Remove".to_string(), vec![rest.trim().to_string()]);
        }
    }
    (option_type.to_string(), vec![value.to_string()])
}
