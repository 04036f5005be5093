use common_http_errors::ApiError;
use pos_service::order_handlers::{validate_order_items, NewOrderItem};
use uuid::Uuid;

fn item(menu_item_id: Option<Uuid>, quantity: Option<i32>) -> NewOrderItem {
    NewOrderItem {
        menu_item_id,
        quantity,
        notes: None,
    }
}

#[test]
fn empty_order_is_rejected() {
    let err = validate_order_items(&[]).expect_err("no items");
    assert!(matches!(err, ApiError::BadRequest { code: "empty_order", .. }));
}

#[test]
fn missing_menu_item_id_is_rejected() {
    let err =
        validate_order_items(&[item(None, Some(1))]).expect_err("item without menu_item_id");
    assert!(matches!(err, ApiError::BadRequest { code: "missing_fields", .. }));
}

#[test]
fn zero_or_negative_quantity_is_rejected() {
    for quantity in [0, -3] {
        let err = validate_order_items(&[item(Some(Uuid::new_v4()), Some(quantity))])
            .expect_err("bad quantity");
        assert!(matches!(
            err,
            ApiError::BadRequest { code: "invalid_quantity", .. }
        ));
    }
}

#[test]
fn quantity_defaults_to_one() {
    let id = Uuid::new_v4();
    let lines = validate_order_items(&[item(Some(id), None)]).expect("valid line");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].menu_item_id, id);
    assert_eq!(lines[0].quantity, 1);
}

#[test]
fn one_bad_line_rejects_the_whole_order() {
    let good = item(Some(Uuid::new_v4()), Some(2));
    let bad = item(Some(Uuid::new_v4()), Some(0));
    validate_order_items(&[good, bad]).expect_err("batch is all-or-nothing");
}
