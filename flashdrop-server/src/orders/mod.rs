//! Order lifecycle manager
//!
//! ```text
//! create ──▶ PENDING ──┬──▶ CONFIRMED   (confirm: stock decremented, one transaction)
//!                      ├──▶ REJECTED    (reject: staff, reason required)
//!                      └──▶ EXPIRED     (deadline passed, applied lazily on read)
//! ```
//!
//! [`OrderService::confirm`] is the only code path that writes
//! `products.stock_quantity` for an order. Every operation takes `now`
//! explicitly so expiry is a pure comparison against the caller's clock.

pub mod status;

use std::collections::BTreeMap;

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

use crate::auth::{Action, CurrentUser, Resource, authorize};
use crate::db;
use crate::db::orders::OrderRow;
use crate::error::ServiceResult;
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, non_blank, validate_email, validate_phone,
    validate_required_text,
};

pub use status::{can_transition, check_transition, effective_status, needs_expiry};

/// Upper bound on a single line, far above any real flash-sale basket
const MAX_LINE_QUANTITY: i64 = 10_000;

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    expiry_ms: i64,
}

impl OrderService {
    pub fn new(pool: SqlitePool, expiry_ms: i64) -> Self {
        Self { pool, expiry_ms }
    }

    pub fn expiry_ms(&self) -> i64 {
        self.expiry_ms
    }

    // ========== Create ==========

    /// Validate the cart against current stock and store a PENDING order
    ///
    /// Prices are captured now; stock is left untouched until confirmation.
    pub async fn create(
        &self,
        actor: &CurrentUser,
        input: OrderCreate,
        now: i64,
    ) -> ServiceResult<Order> {
        let lines = merge_lines(&input)?;
        validate_customer(&input)?;

        let order_id = snowflake_id();
        let mut tx = db::begin_write(&self.pool).await?;

        let mut items = Vec::with_capacity(lines.len());
        let mut total: i64 = 0;
        for (&product_id, &quantity) in &lines {
            let Some(product) = db::products::find_stock(&mut *tx, product_id).await? else {
                return Err(AppError::unknown_product(product_id).into());
            };
            if !product.in_stock || product.stock_quantity < quantity {
                return Err(AppError::insufficient_stock(
                    product.id,
                    &product.name,
                    quantity,
                    product.stock_quantity,
                )
                .into());
            }

            let item = OrderItem {
                id: snowflake_id(),
                order_id,
                product_id,
                quantity,
                price: product.price,
                product: None,
            };
            total = item
                .line_total()
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| AppError::validation("Montant de la commande trop élevé"))?;
            items.push(item);
        }

        let order = Order {
            id: order_id,
            user_id: actor.id,
            total,
            status: OrderStatus::Pending,
            customer_name: input.customer_name.trim().to_string(),
            customer_email: input.customer_email.trim().to_string(),
            customer_phone: input.customer_phone.trim().to_string(),
            customer_address: input.customer_address.trim().to_string(),
            payment_ref: None,
            rejection_reason: None,
            expires_at: now + self.expiry_ms,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
            user: None,
        };

        db::orders::insert_order(&mut *tx, &order).await?;
        for item in &items {
            db::orders::insert_item(&mut *tx, item).await?;
        }
        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            user_id = actor.id,
            total = order.total,
            items = items.len(),
            "Order created"
        );

        self.load(order_id, actor.role.is_staff()).await
    }

    // ========== Read ==========

    /// Fetch one order, applying lazy expiry
    pub async fn get(&self, actor: &CurrentUser, order_id: i64, now: i64) -> ServiceResult<Order> {
        let mut row = self.find_row(order_id).await?;
        authorize(
            actor,
            Action::ViewOrder,
            Resource::Order {
                owner_id: row.user_id,
            },
        )
        .require()?;

        self.apply_expiry(&mut row, now).await?;
        let items = db::orders::items_for_order(&self.pool, row.id).await?;
        Ok(row.into_order(items, actor.role.is_staff()))
    }

    /// Role-scoped list, newest first: staff see every order, users their own
    pub async fn list(&self, actor: &CurrentUser, now: i64) -> ServiceResult<Vec<Order>> {
        let owner = if authorize(actor, Action::ListAllOrders, Resource::AllOrders).is_allowed() {
            None
        } else {
            Some(actor.id)
        };

        let mut rows = db::orders::list(&self.pool, owner).await?;
        for row in rows.iter_mut() {
            self.apply_expiry(row, now).await?;
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut items = db::orders::items_for_orders(&self.pool, &ids).await?;
        let with_owner = actor.role.is_staff();

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items, with_owner)
            })
            .collect())
    }

    // ========== Transitions ==========

    /// PENDING → CONFIRMED with the stock decrement, all in one transaction
    ///
    /// Any failure (state changed, product gone, stock short) rolls back the
    /// status write and every decrement already applied.
    pub async fn confirm(
        &self,
        actor: &CurrentUser,
        order_id: i64,
        payment_ref: Option<String>,
        now: i64,
    ) -> ServiceResult<Order> {
        let mut row = self.find_row(order_id).await?;
        authorize(
            actor,
            Action::ConfirmOrder,
            Resource::Order {
                owner_id: row.user_id,
            },
        )
        .require()?;

        self.apply_expiry(&mut row, now).await?;
        check_transition(row.status(), OrderStatus::Confirmed)?;

        let payment_ref = non_blank(payment_ref.as_deref());
        if let Some(reference) = &payment_ref
            && reference.chars().count() > MAX_NOTE_LEN
        {
            return Err(AppError::validation("Référence de paiement trop longue").into());
        }
        if payment_ref.is_none() && !actor.role.is_staff() {
            return Err(AppError::new(ErrorCode::PaymentRefRequired).into());
        }

        let mut tx = db::begin_write(&self.pool).await?;

        // Status first: loses cleanly to a concurrent transition
        if !db::orders::mark_confirmed(&mut *tx, order_id, payment_ref.as_deref(), now).await? {
            return Err(AppError::new(ErrorCode::OrderNotPending).into());
        }

        let lines = db::orders::items_in_tx(&mut *tx, order_id).await?;
        for (product_id, quantity) in lines {
            let Some(product) = db::products::find_stock(&mut *tx, product_id).await? else {
                return Err(AppError::unknown_product(product_id).into());
            };
            if product.stock_quantity < quantity
                || !db::products::decrement_stock(&mut *tx, product_id, quantity, now).await?
            {
                tracing::info!(
                    order_id,
                    product_id,
                    requested = quantity,
                    available = product.stock_quantity,
                    "Order confirmation refused: insufficient stock"
                );
                return Err(AppError::insufficient_stock(
                    product.id,
                    &product.name,
                    quantity,
                    product.stock_quantity,
                )
                .into());
            }
        }

        tx.commit().await?;

        tracing::info!(order_id, actor_id = actor.id, role = actor.role.as_str(), "Order confirmed");
        self.load(order_id, actor.role.is_staff()).await
    }

    /// PENDING → REJECTED with a mandatory reason; stock is not touched
    pub async fn reject(
        &self,
        actor: &CurrentUser,
        order_id: i64,
        reason: Option<String>,
        now: i64,
    ) -> ServiceResult<Order> {
        let mut row = self.find_row(order_id).await?;
        authorize(
            actor,
            Action::RejectOrder,
            Resource::Order {
                owner_id: row.user_id,
            },
        )
        .require()?;

        let Some(reason) = non_blank(reason.as_deref()) else {
            return Err(AppError::new(ErrorCode::RejectionReasonRequired).into());
        };
        validate_required_text(&reason, "rejectionReason", MAX_NOTE_LEN)?;

        self.apply_expiry(&mut row, now).await?;
        check_transition(row.status(), OrderStatus::Rejected)?;

        if !db::orders::mark_rejected(&self.pool, order_id, &reason, now).await? {
            return Err(AppError::new(ErrorCode::OrderNotPending).into());
        }

        tracing::info!(order_id, actor_id = actor.id, "Order rejected");
        self.load(order_id, true).await
    }

    // ========== Internals ==========

    async fn find_row(&self, order_id: i64) -> ServiceResult<OrderRow> {
        db::orders::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).into())
    }

    async fn load(&self, order_id: i64, with_owner: bool) -> ServiceResult<Order> {
        let row = self.find_row(order_id).await?;
        let items = db::orders::items_for_order(&self.pool, order_id).await?;
        Ok(row.into_order(items, with_owner))
    }

    /// Persist EXPIRED for an overdue PENDING row and update it in place
    async fn apply_expiry(&self, row: &mut OrderRow, now: i64) -> ServiceResult<()> {
        if !needs_expiry(row.status(), row.expires_at, now) {
            return Ok(());
        }

        if db::orders::mark_expired(&self.pool, row.id, now).await? {
            tracing::info!(order_id = row.id, expires_at = row.expires_at, "Order expired");
            row.status = OrderStatus::Expired.as_str().to_string();
            row.updated_at = now;
        } else {
            // Someone else moved it first; report what storage holds
            *row = self.find_row(row.id).await?;
        }
        Ok(())
    }
}

/// Sum quantities per product, rejecting empty carts and non-positive lines
fn merge_lines(input: &OrderCreate) -> Result<BTreeMap<i64, i64>, AppError> {
    if input.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let mut lines: BTreeMap<i64, i64> = BTreeMap::new();
    for item in &input.items {
        if item.quantity <= 0 || item.quantity > MAX_LINE_QUANTITY {
            return Err(AppError::validation("Quantité invalide")
                .with_detail("product_id", item.product_id)
                .with_detail("quantity", item.quantity));
        }
        let quantity = lines.entry(item.product_id).or_insert(0);
        *quantity = quantity
            .checked_add(item.quantity)
            .filter(|q| *q <= MAX_LINE_QUANTITY)
            .ok_or_else(|| {
                AppError::validation("Quantité invalide").with_detail("product_id", item.product_id)
            })?;
    }
    Ok(lines)
}

fn validate_customer(input: &OrderCreate) -> Result<(), AppError> {
    validate_required_text(&input.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_email(&input.customer_email, "customerEmail")?;
    validate_phone(&input.customer_phone, "customerPhone")?;
    validate_required_text(&input.customer_address, "customerAddress", MAX_ADDRESS_LEN)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderItemInput;

    fn cart(items: &[(i64, i64)]) -> OrderCreate {
        OrderCreate {
            items: items
                .iter()
                .map(|&(product_id, quantity)| OrderItemInput {
                    product_id,
                    quantity,
                })
                .collect(),
            customer_name: "Moussa Keïta".to_string(),
            customer_email: "moussa@example.ml".to_string(),
            customer_phone: "+223 76 12 34 56".to_string(),
            customer_address: "Hamdallaye ACI 2000, Bamako".to_string(),
        }
    }

    #[test]
    fn test_merge_lines_sums_duplicates() {
        let lines = merge_lines(&cart(&[(7, 2), (3, 1), (7, 3)])).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[&7], 5);
        assert_eq!(lines[&3], 1);
    }

    #[test]
    fn test_merge_lines_rejects_empty_cart() {
        let err = merge_lines(&cart(&[])).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_merge_lines_rejects_bad_quantities() {
        assert!(merge_lines(&cart(&[(1, 0)])).is_err());
        assert!(merge_lines(&cart(&[(1, -2)])).is_err());
        assert!(merge_lines(&cart(&[(1, MAX_LINE_QUANTITY), (1, 1)])).is_err());
    }

    #[test]
    fn test_validate_customer() {
        assert!(validate_customer(&cart(&[(1, 1)])).is_ok());

        let mut input = cart(&[(1, 1)]);
        input.customer_phone = "1234".to_string();
        let err = validate_customer(&input).unwrap_err();
        assert_eq!(err.details.unwrap().get("field").unwrap(), "customerPhone");

        let mut input = cart(&[(1, 1)]);
        input.customer_email = "pas-un-email".to_string();
        assert!(validate_customer(&input).is_err());

        let mut input = cart(&[(1, 1)]);
        input.customer_address = "  ".to_string();
        assert!(validate_customer(&input).is_err());
    }
}
