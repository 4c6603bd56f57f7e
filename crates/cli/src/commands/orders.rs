//! Order management commands: status transitions and data repair.

use paperleaf_core::{OrderId, OrderStatus};
use paperleaf_storefront::db::orders::OrderRepository;
use paperleaf_storefront::services::OrderService;

use super::CommandError;

/// Apply an order status transition.
///
/// # Errors
///
/// Returns `CommandError::InvalidStatus` for an unknown status value and
/// `CommandError::Order` for a missing order or an illegal transition.
pub async fn set_status(order: i32, status: &str) -> Result<(), CommandError> {
    let next = status
        .parse::<OrderStatus>()
        .map_err(|e| CommandError::InvalidStatus(e.to_string()))?;

    let pool = super::connect().await?;
    OrderService::new(&pool).set_status(OrderId::new(order), next).await?;

    tracing::info!(order, status = %next, "Order status updated");
    Ok(())
}

/// Repair order lines with missing price or quantity.
///
/// Historic bugs left some order lines with a NULL price or quantity.
/// This backfills the price from the current product price and defaults
/// the quantity to one, mirroring how those orders were originally sold.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the repair
/// transaction fails.
pub async fn fix_order_lines() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let repaired = OrderRepository::new(&pool).repair_lines().await?;

    if repaired == 0 {
        tracing::info!("No malformed order lines found");
    } else {
        tracing::info!(repaired, "Repaired malformed order lines");
    }

    Ok(())
}
