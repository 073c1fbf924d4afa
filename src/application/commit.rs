//! Order commit coordination: snapshot, compare, commit.
//!
//! No lock is held against menu edits while an order is assembled. The
//! coordinator re-reads the live menu version right before writing and
//! refuses the commit if it differs from the snapshot taken at menu load.
//! The gap between that re-read and the ledger write is not protected.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::domain::id::RestaurantNumber;
use crate::domain::menu::MenuListing;
use crate::domain::order::{
    CategoryQuantities, CommitReceipt, DeliveryDetails, PendingOrder, PreparedOrder,
};
use crate::domain::pricing::{is_early_order, settle};
use crate::error::{CommitError, Result};
use crate::port::outbound::ledger::OrderLedger;
use crate::port::outbound::menu::MenuCatalog;

/// Guards order commits with the optimistic menu-version check.
pub struct OrderCommitCoordinator {
    menus: Arc<dyn MenuCatalog>,
    ledger: Arc<dyn OrderLedger>,
}

impl OrderCommitCoordinator {
    pub fn new(menus: Arc<dyn MenuCatalog>, ledger: Arc<dyn OrderLedger>) -> Self {
        Self { menus, ledger }
    }

    /// Load a menu for order assembly. The returned snapshot must travel with
    /// the order to [`commit`](Self::commit).
    ///
    /// # Errors
    /// Returns [`CommitError::UnknownRestaurant`] for an unknown name.
    pub fn load_menu(&self, restaurant_name: &str) -> Result<MenuListing> {
        let listing = self
            .menus
            .load_menu(restaurant_name)?
            .ok_or_else(|| CommitError::UnknownRestaurant(restaurant_name.to_string()))?;
        info!(
            restaurant = listing.snapshot.restaurant,
            items = listing.items.len(),
            "Menu loaded"
        );
        Ok(listing)
    }

    /// Mark the start of a menu-edit session.
    ///
    /// # Errors
    /// Returns [`CommitError::UnknownRestaurant`] for an unknown restaurant.
    pub fn begin_menu_edit(&self, restaurant: RestaurantNumber, at: NaiveDateTime) -> Result<()> {
        if !self.menus.mark_edit_begin(restaurant, at)? {
            return Err(CommitError::UnknownRestaurant(restaurant.to_string()).into());
        }
        info!(restaurant, at = %at, "Menu edit started");
        Ok(())
    }

    /// Mark the end of a menu-edit session.
    ///
    /// # Errors
    /// Returns [`CommitError::UnknownRestaurant`] for an unknown restaurant.
    pub fn end_menu_edit(&self, restaurant: RestaurantNumber, at: NaiveDateTime) -> Result<()> {
        if !self.menus.mark_edit_end(restaurant, at)? {
            return Err(CommitError::UnknownRestaurant(restaurant.to_string()).into());
        }
        info!(restaurant, at = %at, "Menu edit finished");
        Ok(())
    }

    /// Validate, price, and persist an order placed at `now`.
    ///
    /// # Errors
    /// - [`DomainError`](crate::domain::error::DomainError) for malformed orders
    /// - [`CommitError::MenuChanged`] when the menu moved since it was loaded
    /// - [`CommitError::RolledBack`] when the write failed and nothing was kept
    pub fn commit(&self, order: &PendingOrder, now: NaiveDateTime) -> Result<CommitReceipt> {
        order.validate()?;

        let live = self
            .menus
            .menu_version(order.restaurant)?
            .ok_or_else(|| CommitError::UnknownRestaurant(order.restaurant.to_string()))?;
        if !order.snapshot.permits_commit(&live) {
            warn!(
                restaurant = order.restaurant,
                customer = order.customer,
                snapshot = ?order.snapshot.version,
                live = ?live,
                "Menu changed since load, refusing commit"
            );
            return Err(CommitError::MenuChanged {
                restaurant: order.restaurant,
                snapshot: order.snapshot.version,
                live,
            }
            .into());
        }

        let customer = self
            .ledger
            .customer(order.customer)?
            .ok_or(CommitError::UnknownCustomer(order.customer))?;

        let early = is_early_order(now, order.requested_at);
        let settlement = settle(
            order.items_total(),
            &order.delivery.kind,
            customer.credit,
            order.use_credit,
            early,
        )?;

        let delivery = order.delivery.kind.is_delivery().then(|| DeliveryDetails {
            kind: order.delivery.kind,
            address: order.delivery.address.clone().unwrap_or_default(),
            phone: order.delivery.phone.clone().unwrap_or_default(),
        });
        let prepared = PreparedOrder {
            customer: order.customer,
            restaurant: order.restaurant,
            lines: order.lines.clone(),
            quantities: CategoryQuantities::from_lines(&order.lines)?,
            delivery,
            settlement,
            credit_before: customer.credit,
            requested_at: order.requested_at,
            ordered_at: now,
        };

        let order_id = self.ledger.commit(&prepared)?;
        info!(
            order_id,
            restaurant = order.restaurant,
            customer = order.customer,
            total_price = settlement.total_price,
            credit_used = settlement.credit_used,
            early,
            "Order committed"
        );

        Ok(CommitReceipt {
            order_id,
            settlement,
            remaining_credit: prepared.credit_after(),
        })
    }
}
