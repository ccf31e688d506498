mod common;

use assert_matches::assert_matches;
use common::TestApp;
use kids_store::{
    entities::{CartProduct, CustomerOrder, Notification, WishlistItem},
    errors::ServiceError,
    services::{
        customers::{CreateCustomerInput, UpdateCustomerInput},
        orders::PlaceOrderInput,
    },
    ContentRef,
};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn one_customer_per_identity() {
    let app = TestApp::new().await;
    let customer = app.customer(7).await;
    assert_eq!(customer.to_string(), "Customer 7");

    let duplicate = app
        .services
        .customers
        .create_customer(CreateCustomerInput {
            user_id: 7,
            is_active: false,
            phone: "1".to_string(),
            address: String::new(),
        })
        .await;
    assert_matches!(duplicate, Err(ServiceError::Conflict(_)));

    let found = app.services.customers.find_by_user_id(7).await.unwrap();
    assert_eq!(found.id, customer.id);
    assert_matches!(
        app.services.customers.find_by_user_id(8).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn profile_updates() {
    let app = TestApp::new().await;
    let customer = app.customer(1).await;
    let customers = &app.services.customers;

    let updated = customers
        .update_customer(
            customer.id,
            UpdateCustomerInput {
                address: Some("2 New Street".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.address, "2 New Street");
    assert_eq!(updated.phone, customer.phone);

    let deactivated = customers.set_active(customer.id, false).await.unwrap();
    assert!(!deactivated.is_active);

    let too_long = customers
        .update_customer(
            customer.id,
            UpdateCustomerInput {
                phone: Some("9".repeat(25)),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(too_long, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn wishlist_is_a_set() {
    let app = TestApp::new().await;
    let jacket = app.product("Rain jacket", dec!(19.99)).await;
    let hat = app.product("Sun hat", dec!(5.00)).await;
    let customer = app.customer(1).await;
    let customers = &app.services.customers;

    customers.add_to_wishlist(customer.id, jacket.id).await.unwrap();
    customers.add_to_wishlist(customer.id, jacket.id).await.unwrap();
    customers.add_to_wishlist(customer.id, hat.id).await.unwrap();

    let wishlist = customers.wishlist(customer.id).await.unwrap();
    assert_eq!(
        wishlist.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![jacket.id, hat.id]
    );

    assert!(customers.remove_from_wishlist(customer.id, jacket.id).await.unwrap());
    assert!(!customers.remove_from_wishlist(customer.id, jacket.id).await.unwrap());
    assert_eq!(customers.wishlist(customer.id).await.unwrap().len(), 1);

    assert_matches!(
        customers.add_to_wishlist(customer.id, 9999).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn deleting_a_customer_cascades() {
    let app = TestApp::new().await;
    let product = app.product("Rain jacket", dec!(19.99)).await;
    let customer = app.customer(1).await;
    let bystander = app.customer(2).await;

    let cart = app.cart_for(&customer).await;
    app.services
        .carts
        .add_line(cart.id, ContentRef::Product(product.id), 1)
        .await
        .unwrap();
    let order = app
        .services
        .orders
        .place_order(PlaceOrderInput {
            customer_id: customer.id,
            cart_id: cart.id,
            first_name: "Anna".to_string(),
            last_name: "Petrova".to_string(),
            phone: "1".to_string(),
            address: "Lenina 1".to_string(),
            buying_type: None,
            comment: None,
            order_date: None,
        })
        .await
        .unwrap();
    app.services
        .notifications
        .notify(customer.id, "Your order is placed")
        .await
        .unwrap();
    app.services
        .notifications
        .notify(bystander.id, "Welcome")
        .await
        .unwrap();
    app.services
        .customers
        .add_to_wishlist(customer.id, product.id)
        .await
        .unwrap();

    app.services
        .customers
        .delete_customer(customer.id)
        .await
        .unwrap();

    assert_matches!(
        app.services.customers.get_customer(customer.id).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        app.services.carts.get_cart(cart.id).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        app.services.orders.get_order(order.id).await,
        Err(ServiceError::NotFound(_))
    );
    assert_eq!(CartProduct::find().count(&*app.db).await.unwrap(), 0);
    assert_eq!(CustomerOrder::find().count(&*app.db).await.unwrap(), 0);
    assert_eq!(WishlistItem::find().count(&*app.db).await.unwrap(), 0);
    assert_eq!(Notification::find().count(&*app.db).await.unwrap(), 1);

    // catalog rows are not owned by customers
    assert!(app.services.catalog.get_product(product.id).await.is_ok());
    assert!(app.services.customers.get_customer(bystander.id).await.is_ok());
}
