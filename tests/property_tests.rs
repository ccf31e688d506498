//! Property-based tests for pricing and reference invariants.

use kids_store::{
    entities::{CartProductModel, ContentType, OrderStatus},
    media::sanitize_segment,
    services::{
        carts::CartTotals,
        validation::{line_total, validate_money, MAX_MONEY},
    },
    ContentRef,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_00).prop_map(|cents| Decimal::new(cents, 2))
}

fn line_strategy() -> impl Strategy<Value = (Decimal, i32)> {
    (price_strategy(), 1i32..50)
}

fn content_type_strategy() -> impl Strategy<Value = ContentType> {
    prop_oneof![
        Just(ContentType::Product),
        Just(ContentType::Manufacturer),
        Just(ContentType::Season),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn line_total_is_price_times_qty(price in price_strategy(), qty in 1i32..100) {
        let total = line_total(price, qty).unwrap();
        prop_assert_eq!(total, price * Decimal::from(qty));
        prop_assert!(validate_money(&total).is_ok());
    }

    #[test]
    fn non_positive_quantities_never_price(price in price_strategy(), qty in -100i32..=0) {
        prop_assert!(line_total(price, qty).is_err());
    }

    #[test]
    fn cart_totals_sum_lines(lines in proptest::collection::vec(line_strategy(), 0..10)) {
        let models: Vec<CartProductModel> = lines
            .iter()
            .enumerate()
            .map(|(i, (price, qty))| CartProductModel {
                id: i as i32 + 1,
                user_id: 1,
                cart_id: 1,
                final_price: line_total(*price, *qty).unwrap(),
                content_type: ContentType::Product,
                object_id: i as i32 + 1,
                qty: *qty,
            })
            .collect();

        let expected_price: Decimal = models.iter().map(|l| l.final_price).sum();
        let expected_qty: i32 = models.iter().map(|l| l.qty).sum();

        match CartTotals::from_lines(&models) {
            Ok(totals) => {
                prop_assert_eq!(totals.total_products, expected_qty);
                prop_assert_eq!(totals.final_price, expected_price);
                prop_assert_eq!(totals.line_count, models.len());
            }
            Err(_) => prop_assert!(expected_price > MAX_MONEY),
        }
    }

    #[test]
    fn content_refs_survive_their_column_pair(kind in content_type_strategy(), id in 1i32..i32::MAX) {
        let reference = ContentRef::new(kind, id);
        prop_assert_eq!(reference.kind(), kind);
        prop_assert_eq!(reference.object_id(), id);

        let parsed = ContentRef::parse(&kind.to_string(), id).unwrap();
        prop_assert_eq!(parsed, reference);
    }

    #[test]
    fn sanitized_segments_stay_inside_their_directory(raw in ".{0,40}") {
        let segment = sanitize_segment(&raw);
        prop_assert!(!segment.contains('/'));
        prop_assert!(!segment.contains('\\'));
        prop_assert!(!segment.starts_with('.'));
    }

    #[test]
    fn strict_transitions_only_step_forward(steps in 0usize..4) {
        let mut status = OrderStatus::New;
        for _ in 0..steps {
            let next = status.successor().unwrap();
            prop_assert!(status.can_transition_to(next));
            prop_assert!(!next.can_transition_to(status));
            status = next;
        }
        prop_assert!(status.can_transition_to(status));
    }
}
