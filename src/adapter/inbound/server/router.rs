//! Request dispatch.

use chrono::NaiveDateTime;
use tracing::{debug, error};

use super::wire::{Payload, Request, Response};
use crate::application::service::Service;
use crate::domain::period::{MonthYear, QuarterPeriod};
use crate::domain::report::ReportKey;
use crate::error::{CommitError, Error, Result};

/// Parse one request line and dispatch it.
pub fn dispatch_line(service: &Service, line: &str, now: NaiveDateTime) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(service, request, now),
        Err(e) => {
            debug!(error = %e, "Malformed request");
            Response::invalid(format!("malformed request: {e}"))
        }
    }
}

/// Run one request against the service.
pub fn dispatch(service: &Service, request: Request, now: NaiveDateTime) -> Response {
    match route(service, request, now) {
        Ok(payload) => Response::Ok(payload),
        Err(e) => failure(e),
    }
}

fn route(service: &Service, request: Request, now: NaiveDateTime) -> Result<Payload> {
    match request {
        Request::OrderMix {
            district,
            restaurant,
            month_year,
            refresh,
        } => {
            let key = ReportKey::OrderMix {
                district,
                restaurant,
                period: month_year.parse::<MonthYear>()?,
            };
            report(service, &key, refresh)
        }
        Request::Income {
            restaurant,
            month_year,
            district,
            refresh,
        } => {
            let key = ReportKey::Income {
                restaurant,
                period: month_year.parse::<MonthYear>()?,
                district,
            };
            report(service, &key, refresh)
        }
        Request::Performance {
            district,
            month_year,
            refresh,
        } => {
            let key = ReportKey::Performance {
                district,
                period: month_year.parse::<MonthYear>()?,
            };
            report(service, &key, refresh)
        }
        Request::QuarterDistribution {
            restaurant,
            quarter,
            refresh,
        } => {
            let key = ReportKey::QuarterDistribution {
                restaurant,
                period: quarter.parse::<QuarterPeriod>()?,
            };
            report(service, &key, refresh)
        }
        Request::QuarterIncome {
            restaurant,
            quarter,
            refresh,
        } => {
            let key = ReportKey::QuarterIncome {
                restaurant,
                period: quarter.parse::<QuarterPeriod>()?,
            };
            report(service, &key, refresh)
        }
        Request::BeginMenuEdit { restaurant, at } => {
            service
                .orders()
                .begin_menu_edit(restaurant, at.unwrap_or(now))?;
            Ok(Payload::Ack)
        }
        Request::EndMenuEdit { restaurant, at } => {
            service
                .orders()
                .end_menu_edit(restaurant, at.unwrap_or(now))?;
            Ok(Payload::Ack)
        }
        Request::LoadMenu { restaurant_name } => {
            Ok(Payload::Menu(service.orders().load_menu(&restaurant_name)?))
        }
        Request::CommitOrder { order, now: placed } => Ok(Payload::Committed(
            service.orders().commit(&order, placed.unwrap_or(now))?,
        )),
        Request::ConfirmReceipt {
            order_id,
            received_at,
        } => Ok(Payload::Receipt(
            service
                .receipts()
                .confirm_receipt(order_id, received_at.unwrap_or(now))?,
        )),
    }
}

fn report(service: &Service, key: &ReportKey, refresh: bool) -> Result<Payload> {
    Ok(Payload::Report(service.reports().materialize(key, refresh)?))
}

/// Map an error to the response status a client acts on.
#[must_use]
pub fn failure(err: Error) -> Response {
    let message = err.to_string();
    match err {
        Error::Domain(_) | Error::Json(_) => Response::InvalidArgument { message },
        Error::Commit(CommitError::MenuChanged { restaurant, .. }) => {
            Response::MenuChanged { restaurant, message }
        }
        Error::Commit(
            CommitError::UnknownRestaurant(_)
            | CommitError::UnknownCustomer(_)
            | CommitError::UnknownOrder(_),
        ) => Response::NotFound { message },
        Error::Commit(CommitError::AlreadyReceived(_)) => Response::InvalidArgument { message },
        Error::Commit(CommitError::CreditChanged { .. } | CommitError::RolledBack { .. })
        | Error::Config(_)
        | Error::Io(_)
        | Error::Connection(_)
        | Error::Database(_)
        | Error::Parse(_) => {
            error!(error = %message, "Request failed");
            Response::Error { message }
        }
    }
}
