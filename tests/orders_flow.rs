mod common;

use halotekno_api::{
    dto::orders::{
        BookingRequest, RentalOrderRequest, SparepartOrderRequest, UpdateOrderStatusRequest,
    },
    entity::{OrderStatus, Orders, Products, RentalItems, UserRole, orders},
    error::AppError,
    middleware::auth::AuthUser,
    services::{order_service, pricing::DurationType},
    state::AppState,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::{create_product, create_rental_item, create_service, create_technician, create_user};

// Integration flow: sparepart stock guard, rental pricing, service booking and
// the status lifecycle of the booked order.
#[tokio::test]
async fn order_placement_and_status_flow() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    insufficient_stock_leaves_no_trace(&state).await?;
    sparepart_purchase_decrements_stock(&state).await?;
    last_unit_goes_to_exactly_one_buyer(&state).await?;
    rental_order_prices_weekly_discount_and_deposit(&state).await?;
    booking_lifecycle(&state).await?;

    Ok(())
}

async fn orders_of(state: &AppState, user_id: Uuid) -> anyhow::Result<u64> {
    Ok(Orders::find()
        .filter(orders::Column::UserId.eq(user_id))
        .count(&state.orm)
        .await?)
}

fn sparepart(product_id: Uuid, quantity: i32) -> SparepartOrderRequest {
    SparepartOrderRequest {
        product_id: Some(product_id),
        quantity: Some(quantity),
        notes: None,
    }
}

async fn insufficient_stock_leaves_no_trace(state: &AppState) -> anyhow::Result<()> {
    let buyer = create_user(state, UserRole::Customer, None).await?;
    let product = create_product(state, 250_000, 2).await?;

    let err = order_service::create_sparepart_order(state, &buyer, sparepart(product.id, 3))
        .await
        .expect_err("quantity above stock must fail");
    assert!(matches!(&err, AppError::BadRequest(msg) if msg == "Insufficient stock. Available: 2"));

    let stored = Products::find_by_id(product.id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.stock, 2);
    assert_eq!(orders_of(state, buyer.user_id).await?, 0);
    Ok(())
}

async fn sparepart_purchase_decrements_stock(state: &AppState) -> anyhow::Result<()> {
    let buyer = create_user(state, UserRole::Customer, None).await?;
    let product = create_product(state, 250_000, 2).await?;

    let created = order_service::create_sparepart_order(state, &buyer, sparepart(product.id, 2))
        .await?
        .data
        .unwrap();
    assert!(created.order_number.starts_with("SP-"));

    let order = Orders::find_by_id(created.order_id).one(&state.orm).await?.unwrap();
    assert_eq!(order.subtotal, 500_000);
    assert_eq!(order.tax, 0);
    assert_eq!(order.total, 500_000);
    assert_eq!(order.status, OrderStatus::PendingPayment);

    let stored = Products::find_by_id(product.id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.stock, 0);
    Ok(())
}

async fn last_unit_goes_to_exactly_one_buyer(state: &AppState) -> anyhow::Result<()> {
    let first = create_user(state, UserRole::Customer, None).await?;
    let second = create_user(state, UserRole::Customer, None).await?;
    let product = create_product(state, 80_000, 1).await?;

    let (a, b) = tokio::join!(
        order_service::create_sparepart_order(state, &first, sparepart(product.id, 1)),
        order_service::create_sparepart_order(state, &second, sparepart(product.id, 1)),
    );
    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one buyer gets the last unit");
    for result in [a, b] {
        if let Err(err) = result {
            assert!(matches!(err, AppError::BadRequest(_)), "loser sees a stock error: {err}");
        }
    }

    let stored = Products::find_by_id(product.id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.stock, 0);
    assert_eq!(
        orders_of(state, first.user_id).await? + orders_of(state, second.user_id).await?,
        1
    );
    Ok(())
}

async fn rental_order_prices_weekly_discount_and_deposit(state: &AppState) -> anyhow::Result<()> {
    let renter = create_user(state, UserRole::Customer, None).await?;
    let item = create_rental_item(state, 50_000, 2).await?;

    let created = order_service::create_rental_order(
        state,
        &renter,
        RentalOrderRequest {
            rental_item_id: Some(item.id),
            duration: Some(7),
            duration_type: Some(DurationType::Weekly),
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert!(created.order_number.starts_with("RNT-"));
    assert_eq!(created.quote.total, 815_000);

    let order = Orders::find_by_id(created.order_id).one(&state.orm).await?.unwrap();
    assert_eq!(order.total, 815_000);
    assert_eq!(order.discount, 35_000);
    assert_eq!(order.deposit, 500_000);
    assert_eq!(order.total, order.subtotal + order.tax);

    let stored = RentalItems::find_by_id(item.id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.stock, 1);

    let sold_out = create_rental_item(state, 50_000, 0).await?;
    let err = order_service::create_rental_order(
        state,
        &renter,
        RentalOrderRequest {
            rental_item_id: Some(sold_out.id),
            duration: Some(1),
            duration_type: None,
            notes: None,
        },
    )
    .await
    .expect_err("no units left");
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

fn status(value: &str) -> UpdateOrderStatusRequest {
    UpdateOrderStatusRequest {
        status: value.into(),
    }
}

async fn booking_lifecycle(state: &AppState) -> anyhow::Result<()> {
    let customer = create_user(state, UserRole::Customer, None).await?;
    let stranger = create_user(state, UserRole::Customer, None).await?;
    let admin = create_user(state, UserRole::Admin, None).await?;
    let super_admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: UserRole::SuperAdmin,
        mitra_status: None,
    };
    let (technician, technician_id) = create_technician(state).await?;
    let service = create_service(state, technician_id, Some(300_000), Some(100_000)).await?;

    let booked = order_service::create_service_booking(
        state,
        &customer,
        BookingRequest {
            service_id: Some(service.id),
            schedule_type: None,
            date: None,
            description: Some("Layar retak".into()),
            phone_type: Some("iPhone 11".into()),
        },
    )
    .await?
    .data
    .unwrap();
    let order = booked.order;
    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.technician_id, Some(technician_id));
    assert_eq!(order.subtotal, 100_000);
    assert_eq!(order.tax, 11_000);
    assert_eq!(order.total, 111_000);
    assert_eq!(booked.items.iter().map(|i| i.subtotal).sum::<i64>(), order.subtotal);

    // Visibility: owner, admin, assigned technician; nobody else.
    order_service::get_order(state, &customer, order.id).await?;
    order_service::get_order(state, &admin, order.id).await?;
    order_service::get_order(state, &technician, order.id).await?;
    let hidden = order_service::get_order(state, &stranger, order.id).await;
    assert!(matches!(hidden, Err(AppError::NotFound(_))));

    // Payment confirmation is SUPER_ADMIN only.
    for caller in [&customer, &admin, &technician] {
        let denied = order_service::update_order_status(state, caller, order.id, status("PAID")).await;
        assert!(matches!(denied, Err(AppError::Unauthorized)));
    }
    let paid = order_service::update_order_status(state, &super_admin, order.id, status("PAID"))
        .await?
        .data
        .unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);

    let denied = order_service::update_order_status(state, &stranger, order.id, status("IN_PROGRESS")).await;
    assert!(matches!(denied, Err(AppError::Unauthorized)));

    let skipped = order_service::update_order_status(state, &technician, order.id, status("PAID")).await;
    assert!(matches!(skipped, Err(AppError::Unauthorized)));

    for next in ["IN_PROGRESS", "COMPLETED"] {
        order_service::update_order_status(state, &technician, order.id, status(next)).await?;
    }

    let reopened = order_service::update_order_status(state, &admin, order.id, status("CANCELLED")).await;
    assert!(matches!(reopened, Err(AppError::BadRequest(_))));

    let stored = Orders::find_by_id(order.id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    Ok(())
}
