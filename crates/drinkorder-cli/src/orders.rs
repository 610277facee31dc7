//! Order queue command handlers for the CLI.

use clap::Subcommand;

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrdersCommands {
    /// Show pending orders, oldest first
    Pending,
    /// Mark a pending order as served
    Serve {
        /// Order id
        order_id: i64,
    },
}

/// Dispatch an `orders` sub-command.
///
/// # Errors
///
/// Returns an error if the database query fails or the order is not pending.
pub(crate) async fn run(pool: &sqlx::PgPool, command: OrdersCommands) -> anyhow::Result<()> {
    match command {
        OrdersCommands::Pending => {
            let orders = drinkorder_db::list_pending_orders(pool).await?;
            if orders.is_empty() {
                println!("no pending orders");
                return Ok(());
            }
            println!("{:<8}{:<20}{:<8}{:<10}PLACED", "ID", "CUSTOMER", "ITEMS", "TOTAL");
            for order in &orders {
                println!(
                    "{:<8}{:<20}{:<8}{:<10}{}",
                    order.id,
                    order.customer_username,
                    order.item_count,
                    order.total_price,
                    order.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        OrdersCommands::Serve { order_id } => match drinkorder_db::serve_order(pool, order_id).await
        {
            Ok(order) => println!("order {} served", order.id),
            Err(drinkorder_db::DbError::NotFound) => {
                anyhow::bail!("no pending order with id {order_id}")
            }
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}
