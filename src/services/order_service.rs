use std::collections::HashMap;

use crate::models::order::{Order, OrderCreateRequest, OrderRow};
use crate::models::ticket::Ticket;
use crate::models::Resource;
use crate::services::ticket_service::{insert_ticket, SELECT_TICKET};
use crate::utils::error::AppResult;
use chrono::{Timelike, Utc};
use log::{info, warn};
use sqlx::{MySql, MySqlPool, QueryBuilder};

const SELECT_ORDER: &str = "SELECT id, created_at, user_id AS `user` FROM orders";

/// Orders are only ever read or written on behalf of their owner
#[derive(Clone)]
pub struct OrderService {
    pool: MySqlPool,
}

impl OrderService {
    pub fn new(pool: MySqlPool) -> Self {
        OrderService { pool }
    }

    /// Resolves an order by (id, owner). Someone else's order is reported as
    /// missing, never as forbidden, so ids of other users' orders don't leak.
    pub async fn find_owned_order(&self, user_id: i32, order_id: i32) -> AppResult<OrderRow> {
        sqlx::query_as::<_, OrderRow>(&format!("{} WHERE id = ? AND user_id = ?", SELECT_ORDER))
            .bind(order_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Order.not_found())
    }

    async fn tickets_by_order(&self, order_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Ticket>>> {
        let mut tickets: HashMap<i32, Vec<Ticket>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(tickets);
        }

        let mut builder = QueryBuilder::<MySql>::new(SELECT_TICKET);
        builder.push(" WHERE order_id IN (");
        let mut separated = builder.separated(", ");
        for id in order_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let rows = builder.build_query_as::<Ticket>().fetch_all(&self.pool).await?;
        for ticket in rows {
            tickets.entry(ticket.order).or_default().push(ticket);
        }
        Ok(tickets)
    }

    pub async fn list_orders(&self, user_id: i32) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, OrderRow>(&format!(
            "{} WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            SELECT_ORDER
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i32> = orders.iter().map(|order| order.id).collect();
        let mut tickets = self.tickets_by_order(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let order_tickets = tickets.remove(&order.id).unwrap_or_default();
                order.with_tickets(order_tickets)
            })
            .collect())
    }

    pub async fn get_order(&self, user_id: i32, order_id: i32) -> AppResult<Order> {
        let order = self.find_owned_order(user_id, order_id).await?;
        let mut tickets = self.tickets_by_order(&[order_id]).await?;
        Ok(order.with_tickets(tickets.remove(&order_id).unwrap_or_default()))
    }

    /// Creates the order and all of its tickets in one transaction: a single
    /// rejected ticket rolls back the whole order
    pub async fn create_order(&self, user_id: i32, request: OrderCreateRequest) -> AppResult<Order> {
        let now = Utc::now().naive_utc();
        // DATETIME keeps whole seconds
        let created_at = now.with_nanosecond(0).unwrap_or(now);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO orders (user_id, created_at) VALUES (?, ?)")
            .bind(user_id)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        let order_id = result.last_insert_id() as i32;

        let mut tickets = Vec::with_capacity(request.tickets.len());
        for ticket in &request.tickets {
            match insert_ticket(&mut *tx, order_id, ticket).await {
                Ok(ticket) => tickets.push(ticket),
                Err(e) => {
                    // dropping the transaction rolls back the order and earlier tickets
                    warn!(
                        "Order for user {} rejected at flight {} row {} seat {}: {}",
                        user_id, ticket.flight, ticket.row, ticket.seat, e
                    );
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        info!(
            "Created order {} for user {} with {} tickets",
            order_id,
            user_id,
            tickets.len()
        );

        Ok(Order {
            id: order_id,
            created_at,
            user: user_id,
            tickets,
        })
    }
}
