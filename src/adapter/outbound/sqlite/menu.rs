//! SQLite menu catalog.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    DishOptionRow, DishPriceRow, DishRow, RestaurantRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    dish_options, dish_prices, dishes, restaurants,
};
use crate::domain::id::{DishId, RestaurantNumber};
use crate::domain::menu::{MenuItem, MenuListing, MenuSnapshot, MenuVersion};
use crate::domain::order::DishCategory;
use crate::domain::timestamp::{format_timestamp, parse_timestamp};
use crate::error::{Error, Result};
use crate::port::outbound::menu::MenuCatalog;

/// SQLite-backed menu catalog.
pub struct SqliteMenuCatalog {
    pool: DbPool,
}

fn version_of(begin_update: Option<&str>, end_update: Option<&str>) -> Result<MenuVersion> {
    Ok(MenuVersion::new(
        begin_update.map(parse_timestamp).transpose()?,
        end_update.map(parse_timestamp).transpose()?,
    ))
}

impl SqliteMenuCatalog {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn set_edit_timestamp(
        &self,
        restaurant: RestaurantNumber,
        at: NaiveDateTime,
        begin: bool,
    ) -> Result<bool> {
        let mut conn = self.connection()?;
        let stamp = Some(format_timestamp(&at));
        let target = restaurants::table.find(restaurant);
        let result = if begin {
            diesel::update(target)
                .set(restaurants::begin_update.eq(stamp))
                .execute(&mut conn)
        } else {
            diesel::update(target)
                .set(restaurants::end_update.eq(stamp))
                .execute(&mut conn)
        };
        let updated = result.map_err(|e| Error::Database(e.to_string()))?;
        Ok(updated > 0)
    }
}

impl MenuCatalog for SqliteMenuCatalog {
    fn load_menu(&self, restaurant_name: &str) -> Result<Option<MenuListing>> {
        let mut conn = self.connection()?;

        let Some(restaurant) = restaurants::table
            .filter(restaurants::name.eq(restaurant_name))
            .select(RestaurantRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let dish_rows: Vec<DishRow> = dishes::table
            .filter(dishes::restaurant_number.eq(restaurant.restaurant_number))
            .order(dishes::dish_id.asc())
            .select(DishRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        let dish_ids: Vec<DishId> = dish_rows.iter().map(|d| d.dish_id).collect();

        let prices: Vec<DishPriceRow> = dish_prices::table
            .filter(dish_prices::dish_id.eq_any(&dish_ids))
            .select(DishPriceRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        let options: Vec<DishOptionRow> = dish_options::table
            .filter(dish_options::dish_id.eq_any(&dish_ids))
            .order(dish_options::option_id.asc())
            .select(DishOptionRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut items: BTreeMap<DishId, MenuItem> = BTreeMap::new();
        for dish in dish_rows {
            let category: DishCategory = dish.category.parse()?;
            items.insert(dish.dish_id, MenuItem::new(dish.dish_id, dish.name, category));
        }
        for price in prices {
            if let Some(item) = items.get_mut(&price.dish_id) {
                item.add_price(&price.size, price.price);
            }
        }
        for option in options {
            if let Some(item) = items.get_mut(&option.dish_id) {
                item.add_option(&option.option_type, &option.option_value);
            }
        }

        let version = version_of(
            restaurant.begin_update.as_deref(),
            restaurant.end_update.as_deref(),
        )?;
        Ok(Some(MenuListing {
            restaurant_name: restaurant.name,
            snapshot: MenuSnapshot {
                restaurant: restaurant.restaurant_number,
                version,
            },
            items: items.into_values().collect(),
        }))
    }

    fn menu_version(&self, restaurant: RestaurantNumber) -> Result<Option<MenuVersion>> {
        let mut conn = self.connection()?;
        let row: Option<(Option<String>, Option<String>)> = restaurants::table
            .find(restaurant)
            .select((restaurants::begin_update, restaurants::end_update))
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(|(begin, end)| version_of(begin.as_deref(), end.as_deref()))
            .transpose()
    }

    fn mark_edit_begin(&self, restaurant: RestaurantNumber, at: NaiveDateTime) -> Result<bool> {
        self.set_edit_timestamp(restaurant, at, true)
    }

    fn mark_edit_end(&self, restaurant: RestaurantNumber, at: NaiveDateTime) -> Result<bool> {
        self.set_edit_timestamp(restaurant, at, false)
    }
}
