//! Checkout: turn the cart into an order draft for the backend

use super::store::CartStore;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CheckoutDetails, OrderDraft, OrderItemDraft, OrderStatus};
use shared::util::now_millis;

pub const ORDER_CURRENCY: &str = "INR";

/// `EST-` followed by the last 8 digits of the timestamp
pub fn order_number(timestamp_millis: i64) -> String {
    let digits = timestamp_millis.unsigned_abs().to_string();
    let tail = &digits[digits.len().saturating_sub(8)..];
    format!("EST-{}", tail)
}

/// Build a pending order from every cart item
///
/// Each item becomes one line at its frozen price; fabric and upgrade costs
/// come from the breakdown captured at add time, or zero without one.
pub fn build_order(cart: &CartStore, details: CheckoutDetails) -> AppResult<OrderDraft> {
    if cart.is_empty() {
        return Err(AppError::new(ErrorCode::CartEmpty));
    }

    let items = cart
        .items()
        .iter()
        .map(|item| {
            let (fabric_cost, upgrade_cost) = item
                .breakdown
                .as_ref()
                .map(|b| (b.fabric_cost, b.upgrade_cost))
                .unwrap_or_default();
            OrderItemDraft {
                model_name: item.model_name.clone(),
                configuration_data: item.config.clone(),
                item_price: item.price,
                quantity: 1,
                fabric_cost,
                upgrade_cost,
            }
        })
        .collect();

    let created_at = now_millis();
    let order = OrderDraft {
        order_number: order_number(created_at),
        status: OrderStatus::Pending,
        currency: ORDER_CURRENCY.to_string(),
        total_amount: cart.total_price(),
        customer_notes: details.customer_notes.filter(|s| !s.trim().is_empty()),
        delivery_address: details.delivery_address.filter(|s| !s.trim().is_empty()),
        items,
        created_at,
    };

    tracing::info!(
        order_number = %order.order_number,
        items = order.items.len(),
        total = order.total_amount,
        "Order draft built"
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Configuration, PriceBreakdown};

    #[test]
    fn test_order_number_uses_last_eight_digits() {
        assert_eq!(order_number(1_700_000_123_456), "EST-00123456");
        assert_eq!(order_number(42), "EST-42");
    }

    #[test]
    fn test_empty_cart_fails() {
        let err = build_order(&CartStore::in_memory(), CheckoutDetails::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartEmpty);
    }

    #[test]
    fn test_order_matches_cart() {
        let mut cart = CartStore::in_memory();
        let breakdown = PriceBreakdown {
            base_price: 45000.0,
            modifier_total: 3000.0,
            fabric_cost: 10000.0,
            upgrade_cost: 1500.0,
            total: 59500,
            applied: vec![],
        };
        cart.add_priced("Aurelia", Configuration::new(), breakdown)
            .unwrap();
        cart.add("Noir", Configuration::new(), 85000).unwrap();

        let order = build_order(
            &cart,
            CheckoutDetails {
                customer_notes: Some("  ".to_string()),
                delivery_address: Some("12 MG Road, Bengaluru".to_string()),
            },
        )
        .unwrap();

        assert!(order.order_number.starts_with("EST-"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.currency, "INR");
        assert_eq!(order.total_amount, 144500);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].fabric_cost, 10000.0);
        assert_eq!(order.items[1].upgrade_cost, 0.0);
        assert!(order.items.iter().all(|i| i.quantity == 1));
        assert_eq!(order.customer_notes, None);
        assert!(order.delivery_address.is_some());
    }
}
