//! Orders under assembly and the rows a committed order turns into.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{CustomerNumber, DishId, OrderId, RestaurantNumber};
use super::menu::{MenuSnapshot, REGULAR_SIZE};
use super::pricing::{DeliveryKind, Settlement};

/// Menu section a dish belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishCategory {
    Salad,
    MainCourse,
    Dessert,
    Drink,
}

impl DishCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Salad => "salad",
            Self::MainCourse => "main_course",
            Self::Dessert => "dessert",
            Self::Drink => "drink",
        }
    }
}

impl fmt::Display for DishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DishCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "salad" => Ok(Self::Salad),
            "main_course" | "main" => Ok(Self::MainCourse),
            "dessert" => Ok(Self::Dessert),
            "drink" => Ok(Self::Drink),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

/// Per-category dish quantities of one order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuantities {
    pub salad: i32,
    pub main_course: i32,
    pub dessert: i32,
    pub drink: i32,
}

impl CategoryQuantities {
    /// Add `quantity` dishes of `category`.
    ///
    /// # Errors
    /// [`DomainError::AmountOutOfRange`] when the tally no longer fits a column.
    pub fn add(&mut self, category: DishCategory, quantity: i32) -> Result<(), DomainError> {
        let slot = match category {
            DishCategory::Salad => &mut self.salad,
            DishCategory::MainCourse => &mut self.main_course,
            DishCategory::Dessert => &mut self.dessert,
            DishCategory::Drink => &mut self.drink,
        };
        let current = *slot;
        *slot = current.checked_add(quantity).ok_or_else(|| {
            DomainError::AmountOutOfRange(format!("{current} + {quantity} {category}"))
        })?;
        Ok(())
    }

    /// Tally the categories of a set of order lines.
    ///
    /// # Errors
    /// [`DomainError::AmountOutOfRange`] when a category total overflows.
    pub fn from_lines(lines: &[OrderLine]) -> Result<Self, DomainError> {
        let mut quantities = Self::default();
        for line in lines {
            quantities.add(line.category, line.quantity)?;
        }
        Ok(quantities)
    }
}

/// One dish of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub dish_id: DishId,
    pub category: DishCategory,
    /// Chosen size; `None` means the regular size.
    #[serde(default)]
    pub size: Option<String>,
    /// Free-form choices such as doneness or removed ingredients.
    #[serde(default)]
    pub specification: Option<String>,
    pub quantity: i32,
    /// Price of one unit in whole currency units.
    pub unit_price: i32,
}

impl OrderLine {
    #[must_use]
    pub fn size(&self) -> &str {
        self.size.as_deref().unwrap_or(REGULAR_SIZE)
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.unit_price) * Decimal::from(self.quantity)
    }
}

/// How the order leaves the restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    #[serde(flatten)]
    pub kind: DeliveryKind,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl DeliveryRequest {
    #[must_use]
    pub fn pickup() -> Self {
        Self {
            kind: DeliveryKind::Pickup,
            address: None,
            phone: None,
        }
    }
}

fn default_use_credit() -> bool {
    true
}

/// An order assembled against a loaded menu, not yet committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub customer: CustomerNumber,
    pub restaurant: RestaurantNumber,
    pub lines: Vec<OrderLine>,
    pub delivery: DeliveryRequest,
    /// When the customer wants the order.
    #[serde(with = "super::timestamp::text")]
    pub requested_at: NaiveDateTime,
    #[serde(default = "default_use_credit")]
    pub use_credit: bool,
    /// Menu version captured when the menu was loaded.
    pub snapshot: MenuSnapshot,
}

impl PendingOrder {
    /// Check the order before any pricing or I/O.
    ///
    /// # Errors
    /// Returns the first [`DomainError`] found.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lines.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        for line in &self.lines {
            if line.quantity <= 0 {
                return Err(DomainError::NonPositiveQuantity {
                    dish_id: line.dish_id,
                    quantity: line.quantity,
                });
            }
            if line.unit_price < 0 {
                return Err(DomainError::NegativePrice {
                    dish_id: line.dish_id,
                    price: line.unit_price,
                });
            }
        }
        if let DeliveryKind::Shared { participants } = self.delivery.kind {
            if participants < 2 {
                return Err(DomainError::TooFewParticipants(participants));
            }
        }
        if self.delivery.kind.is_delivery() {
            if is_blank(self.delivery.address.as_deref()) {
                return Err(DomainError::MissingDeliveryField("address"));
            }
            if is_blank(self.delivery.phone.as_deref()) {
                return Err(DomainError::MissingDeliveryField("phone"));
            }
        }
        if self.snapshot.restaurant != self.restaurant {
            return Err(DomainError::SnapshotMismatch {
                snapshot: self.snapshot.restaurant,
                order: self.restaurant,
            });
        }
        CategoryQuantities::from_lines(&self.lines)?;
        Ok(())
    }

    /// Sum of all lines before delivery, credit, and discount.
    #[must_use]
    pub fn items_total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::line_total).sum()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Delivery row written alongside a delivered order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDetails {
    pub kind: DeliveryKind,
    pub address: String,
    pub phone: String,
}

/// Everything the ledger needs to write one order atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedOrder {
    pub customer: CustomerNumber,
    pub restaurant: RestaurantNumber,
    pub lines: Vec<OrderLine>,
    pub quantities: CategoryQuantities,
    pub delivery: Option<DeliveryDetails>,
    pub settlement: Settlement,
    /// Credit balance read before pricing; the write is refused if it moved.
    pub credit_before: i32,
    pub requested_at: NaiveDateTime,
    pub ordered_at: NaiveDateTime,
}

impl PreparedOrder {
    #[must_use]
    pub fn credit_after(&self) -> i32 {
        self.credit_before - self.settlement.credit_used
    }
}

/// A customer as needed for pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerAccount {
    pub number: CustomerNumber,
    pub district: String,
    pub status: String,
    pub credit: i32,
}

impl CustomerAccount {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    pub order_id: OrderId,
    #[serde(flatten)]
    pub settlement: Settlement,
    pub remaining_credit: i32,
}
