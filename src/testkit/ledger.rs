//! In-memory menu catalog and order ledger.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use parking_lot::{Mutex, RwLock};

use crate::domain::id::{CustomerNumber, OrderId, RestaurantNumber};
use crate::domain::menu::{MenuItem, MenuListing, MenuSnapshot, MenuVersion};
use crate::domain::order::{CustomerAccount, PreparedOrder};
use crate::domain::receipt::{DeliveredOrder, LatenessVerdict};
use crate::error::{CommitError, Result};
use crate::port::outbound::ledger::OrderLedger;
use crate::port::outbound::menu::MenuCatalog;

struct MenuEntry {
    name: String,
    version: MenuVersion,
    items: Vec<MenuItem>,
}

/// Menu catalog backed by a map.
#[derive(Default)]
pub struct MemoryMenuCatalog {
    menus: RwLock<HashMap<RestaurantNumber, MenuEntry>>,
}

impl MemoryMenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_restaurant(&self, restaurant: RestaurantNumber, name: &str) {
        self.menus.write().insert(
            restaurant,
            MenuEntry {
                name: name.to_string(),
                version: MenuVersion::default(),
                items: Vec::new(),
            },
        );
    }

    pub fn add_item(&self, restaurant: RestaurantNumber, item: MenuItem) {
        if let Some(entry) = self.menus.write().get_mut(&restaurant) {
            entry.items.push(item);
        }
    }

    /// Overwrite the live version, as a concurrent editor would.
    pub fn set_version(&self, restaurant: RestaurantNumber, version: MenuVersion) {
        if let Some(entry) = self.menus.write().get_mut(&restaurant) {
            entry.version = version;
        }
    }
}

impl MenuCatalog for MemoryMenuCatalog {
    fn load_menu(&self, restaurant_name: &str) -> Result<Option<MenuListing>> {
        let menus = self.menus.read();
        Ok(menus
            .iter()
            .find(|(_, entry)| entry.name == restaurant_name)
            .map(|(restaurant, entry)| MenuListing {
                restaurant_name: entry.name.clone(),
                snapshot: MenuSnapshot {
                    restaurant: *restaurant,
                    version: entry.version,
                },
                items: entry.items.clone(),
            }))
    }

    fn menu_version(&self, restaurant: RestaurantNumber) -> Result<Option<MenuVersion>> {
        Ok(self.menus.read().get(&restaurant).map(|entry| entry.version))
    }

    fn mark_edit_begin(&self, restaurant: RestaurantNumber, at: NaiveDateTime) -> Result<bool> {
        Ok(self
            .menus
            .write()
            .get_mut(&restaurant)
            .map(|entry| entry.version.begin_edit(at))
            .is_some())
    }

    fn mark_edit_end(&self, restaurant: RestaurantNumber, at: NaiveDateTime) -> Result<bool> {
        Ok(self
            .menus
            .write()
            .get_mut(&restaurant)
            .map(|entry| entry.version.end_edit(at))
            .is_some())
    }
}

#[derive(Default)]
struct LedgerState {
    customers: HashMap<CustomerNumber, CustomerAccount>,
    committed: Vec<PreparedOrder>,
    deliveries: HashMap<OrderId, DeliveredOrder>,
    next_id: OrderId,
    fail_commits: bool,
}

/// Order ledger backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_customer(&self, number: CustomerNumber, district: &str, credit: i32) {
        self.state.lock().customers.insert(
            number,
            CustomerAccount {
                number,
                district: district.to_string(),
                status: "active".to_string(),
                credit,
            },
        );
    }

    /// Insert an already committed order awaiting receipt; it was requested
    /// one hour after `ordered_at`.
    pub fn add_delivered(
        &self,
        customer: CustomerNumber,
        total_price: i32,
        is_early: bool,
        ordered_at: NaiveDateTime,
    ) -> OrderId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let order_id = state.next_id;
        state.deliveries.insert(
            order_id,
            DeliveredOrder {
                order_id,
                customer,
                total_price,
                is_early,
                requested_at: ordered_at + Duration::hours(1),
                ordered_at,
                received_at: None,
            },
        );
        order_id
    }

    /// Make every following commit fail as a rolled-back write.
    pub fn fail_commits(&self) {
        self.state.lock().fail_commits = true;
    }

    pub fn committed(&self) -> Vec<PreparedOrder> {
        self.state.lock().committed.clone()
    }

    pub fn credit_of(&self, number: CustomerNumber) -> Option<i32> {
        self.state.lock().customers.get(&number).map(|c| c.credit)
    }
}

impl OrderLedger for MemoryLedger {
    fn customer(&self, number: CustomerNumber) -> Result<Option<CustomerAccount>> {
        Ok(self.state.lock().customers.get(&number).cloned())
    }

    fn commit(&self, order: &PreparedOrder) -> Result<OrderId> {
        let mut state = self.state.lock();
        if state.fail_commits {
            return Err(CommitError::RolledBack {
                reason: "scripted failure".to_string(),
            }
            .into());
        }
        let customer = state
            .customers
            .get_mut(&order.customer)
            .ok_or(CommitError::UnknownCustomer(order.customer))?;
        if customer.credit != order.credit_before {
            return Err(CommitError::CreditChanged {
                customer: order.customer,
            }
            .into());
        }
        customer.credit = order.credit_after();

        state.next_id += 1;
        let order_id = state.next_id;
        state.committed.push(order.clone());
        state.deliveries.insert(
            order_id,
            DeliveredOrder {
                order_id,
                customer: order.customer,
                total_price: order.settlement.total_price,
                is_early: order.settlement.early,
                requested_at: order.requested_at,
                ordered_at: order.ordered_at,
                received_at: None,
            },
        );
        Ok(order_id)
    }

    fn record_receipt(
        &self,
        order_id: OrderId,
        received_at: NaiveDateTime,
        assess: &dyn Fn(&DeliveredOrder) -> LatenessVerdict,
    ) -> Result<LatenessVerdict> {
        let mut state = self.state.lock();
        let order = state
            .deliveries
            .get_mut(&order_id)
            .ok_or(CommitError::UnknownOrder(order_id))?;
        if order.received_at.is_some() {
            return Err(CommitError::AlreadyReceived(order_id).into());
        }
        let verdict = assess(order);
        order.received_at = Some(received_at);
        let customer = order.customer;
        if verdict.late {
            if let Some(account) = state.customers.get_mut(&customer) {
                account.credit += verdict.credit_awarded;
            }
        }
        Ok(verdict)
    }
}
