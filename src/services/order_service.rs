use std::future::Future;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    audit,
    db::is_unique_violation,
    dto::orders::{
        BookingRequest, OrderCreated, OrderList, OrderWithItems, RentalBooking, RentalOrderCreated,
        RentalOrderRequest, ServiceBooking, SparepartOrderRequest, SparepartPurchase,
        UpdateOrderStatusRequest,
    },
    entity::{
        OrderItemType, OrderStatus,
        order_items::{self, ActiveModel as OrderItemActive, Entity as OrderItems},
        orders::{self, ActiveModel as OrderActive, Entity as Orders, Model as OrderModel},
        products::{self, Entity as Products},
        rental_items::{self, Entity as RentalItems},
        services::{self as service_entity, Entity as Services},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{
        order_number::{self, MAX_ATTEMPTS, OrderKind},
        order_status::{Actor, authorize_transition, parse_status},
        pricing::{self, RentalQuote, Totals},
        technician_service::technician_of,
    },
    state::AppState,
};

fn insufficient_stock(available: i32) -> AppError {
    AppError::BadRequest(format!("Insufficient stock. Available: {available}"))
}

/// Runs `attempt` with a fresh order number until it stops colliding on the
/// `order_number` unique constraint. Each attempt owns its whole transaction.
async fn with_order_number<T, F, Fut>(kind: OrderKind, mut attempt: F) -> AppResult<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut tries = 0;
    loop {
        tries += 1;
        let number = order_number::generate(kind, Utc::now());
        match attempt(number).await {
            Err(AppError::OrmError(err))
                if tries < MAX_ATTEMPTS && is_unique_violation(&err, "order_number") =>
            {
                tracing::warn!(attempt = tries, prefix = kind.prefix(), "order number collision, retrying");
            }
            other => return other,
        }
    }
}

struct NewOrder<'a> {
    order_number: String,
    user_id: Uuid,
    technician_id: Option<Uuid>,
    totals: Totals,
    notes: Option<String>,
    booking: Option<&'a ServiceBooking>,
}

async fn insert_order<C: ConnectionTrait>(db: &C, new: NewOrder<'_>) -> AppResult<OrderModel> {
    let now = Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(new.order_number),
        user_id: Set(new.user_id),
        technician_id: Set(new.technician_id),
        status: Set(OrderStatus::PendingPayment),
        subtotal: Set(new.totals.subtotal),
        tax: Set(new.totals.tax),
        discount: Set(new.totals.discount),
        deposit: Set(new.totals.deposit),
        total: Set(new.totals.total),
        notes: Set(new.notes),
        phone_type: Set(new.booking.map(|b| b.phone_type.clone())),
        schedule_type: Set(new.booking.map(|b| b.schedule_type.clone())),
        scheduled_date: Set(new.booking.and_then(|b| b.date)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    Ok(order)
}

struct NewItem {
    item_type: OrderItemType,
    service_id: Option<Uuid>,
    product_id: Option<Uuid>,
    rental_item_id: Option<Uuid>,
    quantity: i32,
    rental_days: Option<i32>,
    unit_price: i64,
    subtotal: i64,
}

async fn insert_item<C: ConnectionTrait>(
    db: &C,
    order_id: Uuid,
    item: NewItem,
) -> AppResult<order_items::Model> {
    let item = OrderItemActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        item_type: Set(item.item_type),
        service_id: Set(item.service_id),
        product_id: Set(item.product_id),
        rental_item_id: Set(item.rental_item_id),
        quantity: Set(item.quantity),
        rental_days: Set(item.rental_days),
        unit_price: Set(item.unit_price),
        subtotal: Set(item.subtotal),
        created_at: NotSet,
    }
    .insert(db)
    .await?;
    Ok(item)
}

pub async fn create_service_booking(
    state: &AppState,
    user: &AuthUser,
    payload: BookingRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let booking = payload.validate()?;

    let service = Services::find_by_id(booking.service_id)
        .filter(service_entity::Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Service"))?;
    let unit_price = pricing::service_unit_price(service.price, service.min_price)
        .ok_or_else(|| AppError::BadRequest("Service has no price".into()))?;
    let totals = pricing::service_booking_totals(unit_price);

    let booking = &booking;
    let service = &service;
    let (order, item) = with_order_number(OrderKind::ServiceBooking, |order_number| async move {
        let txn = state.orm.begin().await?;
        let order = insert_order(
            &txn,
            NewOrder {
                order_number,
                user_id: user.user_id,
                technician_id: Some(service.technician_id),
                totals,
                notes: Some(booking.description.clone()),
                booking: Some(booking),
            },
        )
        .await?;
        let item = insert_item(
            &txn,
            order.id,
            NewItem {
                item_type: OrderItemType::Service,
                service_id: Some(service.id),
                product_id: None,
                rental_item_id: None,
                quantity: 1,
                rental_days: None,
                unit_price,
                subtotal: totals.subtotal,
            },
        )
        .await?;
        txn.commit().await?;
        Ok((order, item))
    })
    .await?;

    tracing::info!(order_number = %order.order_number, total = order.total, "service booked");
    audit::record(
        state,
        user.user_id,
        "service_booking",
        "orders",
        serde_json::json!({ "order_id": order.id, "service_id": service.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Booking created",
        OrderWithItems {
            order: Order::from(order),
            items: vec![OrderItem::from(item)],
        },
        Some(Meta::empty()),
    ))
}

async fn place_sparepart_order(
    state: &AppState,
    user: &AuthUser,
    purchase: &SparepartPurchase,
    order_number: String,
) -> AppResult<OrderModel> {
    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(purchase.product_id)
        .filter(products::Column::IsActive.eq(true))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    if product.stock < purchase.quantity {
        return Err(insufficient_stock(product.stock));
    }

    // Guarded decrement: a concurrent buyer that got here first leaves zero rows to update.
    let decremented = Products::update_many()
        .col_expr(
            products::Column::Stock,
            Expr::col(products::Column::Stock).sub(purchase.quantity),
        )
        .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(products::Column::Id.eq(product.id))
        .filter(products::Column::Stock.gte(purchase.quantity))
        .exec(&txn)
        .await?;
    if decremented.rows_affected != 1 {
        return Err(insufficient_stock(product.stock));
    }

    let totals = pricing::sparepart_totals(product.price, purchase.quantity);
    let order = insert_order(
        &txn,
        NewOrder {
            order_number,
            user_id: user.user_id,
            technician_id: None,
            totals,
            notes: purchase.notes.clone(),
            booking: None,
        },
    )
    .await?;
    insert_item(
        &txn,
        order.id,
        NewItem {
            item_type: OrderItemType::Product,
            service_id: None,
            product_id: Some(product.id),
            rental_item_id: None,
            quantity: purchase.quantity,
            rental_days: None,
            unit_price: product.price,
            subtotal: totals.subtotal,
        },
    )
    .await?;

    txn.commit().await?;
    Ok(order)
}

pub async fn create_sparepart_order(
    state: &AppState,
    user: &AuthUser,
    payload: SparepartOrderRequest,
) -> AppResult<ApiResponse<OrderCreated>> {
    let purchase = payload.validate()?;

    let product = Products::find_by_id(purchase.product_id)
        .filter(products::Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    if product.stock < purchase.quantity {
        return Err(insufficient_stock(product.stock));
    }

    let purchase = &purchase;
    let order = with_order_number(OrderKind::Sparepart, |order_number| {
        place_sparepart_order(state, user, purchase, order_number)
    })
    .await?;

    tracing::info!(order_number = %order.order_number, quantity = purchase.quantity, "sparepart ordered");
    audit::record(
        state,
        user.user_id,
        "sparepart_order",
        "orders",
        serde_json::json!({ "order_id": order.id, "product_id": purchase.product_id, "quantity": purchase.quantity }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created",
        OrderCreated {
            order_id: order.id,
            order_number: order.order_number,
        },
        Some(Meta::empty()),
    ))
}

async fn place_rental_order(
    state: &AppState,
    user: &AuthUser,
    rental: &RentalBooking,
    order_number: String,
) -> AppResult<(OrderModel, RentalQuote)> {
    let txn = state.orm.begin().await?;

    let item = RentalItems::find_by_id(rental.rental_item_id)
        .filter(rental_items::Column::IsActive.eq(true))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Rental item"))?;

    // One unit is held for the life of the order, whatever the dates.
    let decremented = RentalItems::update_many()
        .col_expr(
            rental_items::Column::Stock,
            Expr::col(rental_items::Column::Stock).sub(1),
        )
        .col_expr(rental_items::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(rental_items::Column::Id.eq(item.id))
        .filter(rental_items::Column::Stock.gte(1))
        .exec(&txn)
        .await?;
    if decremented.rows_affected != 1 {
        return Err(AppError::BadRequest("Rental item is out of stock".into()));
    }

    let quote = pricing::rental_quote(item.price_per_day, rental.duration, rental.duration_type);
    let totals = pricing::rental_totals(&quote);
    let order = insert_order(
        &txn,
        NewOrder {
            order_number,
            user_id: user.user_id,
            technician_id: None,
            totals,
            notes: rental.notes.clone(),
            booking: None,
        },
    )
    .await?;
    insert_item(
        &txn,
        order.id,
        NewItem {
            item_type: OrderItemType::Rental,
            service_id: None,
            product_id: None,
            rental_item_id: Some(item.id),
            quantity: 1,
            rental_days: Some(rental.duration),
            unit_price: item.price_per_day,
            subtotal: totals.subtotal,
        },
    )
    .await?;

    txn.commit().await?;
    Ok((order, quote))
}

pub async fn create_rental_order(
    state: &AppState,
    user: &AuthUser,
    payload: RentalOrderRequest,
) -> AppResult<ApiResponse<RentalOrderCreated>> {
    let rental = payload.validate()?;

    let item = RentalItems::find_by_id(rental.rental_item_id)
        .filter(rental_items::Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Rental item"))?;
    if item.stock < 1 {
        return Err(AppError::BadRequest("Rental item is out of stock".into()));
    }

    let rental = &rental;
    let (order, quote) = with_order_number(OrderKind::Rental, |order_number| {
        place_rental_order(state, user, rental, order_number)
    })
    .await?;

    tracing::info!(order_number = %order.order_number, days = rental.duration, "rental booked");
    audit::record(
        state,
        user.user_id,
        "rental_order",
        "orders",
        serde_json::json!({ "order_id": order.id, "rental_item_id": rental.rental_item_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Rental created",
        RentalOrderCreated {
            order_id: order.id,
            order_number: order.order_number,
            quote,
        },
        Some(Meta::empty()),
    ))
}

async fn list_with(
    state: &AppState,
    scope: Condition,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = scope;
    if let Some(status) = query.status {
        condition = condition.add(orders::Column::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(orders::Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(orders::Column::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    list_with(
        state,
        Condition::all().add(orders::Column::UserId.eq(user.user_id)),
        query,
    )
    .await
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    list_with(state, Condition::all(), query).await
}

/// Orders assigned to the caller's technician profile.
pub async fn list_technician_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let technician = technician_of(&state.orm, user.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    list_with(
        state,
        Condition::all().add(orders::Column::TechnicianId.eq(technician.id)),
        query,
    )
    .await
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let visible = order.user_id == user.user_id
        || user.is_admin()
        || match order.technician_id {
            Some(assigned) => technician_of(&state.orm, user.user_id)
                .await?
                .is_some_and(|tech| tech.id == assigned),
            None => false,
        };
    if !visible {
        return Err(AppError::NotFound("Order"));
    }

    let items = OrderItems::find()
        .filter(order_items::Column::OrderId.eq(order.id))
        .order_by_asc(order_items::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let target = parse_status(&payload.status)?;

    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let caller_technician = if user.is_admin() {
        None
    } else {
        technician_of(&txn, user.user_id).await?.map(|tech| tech.id)
    };
    let actor = Actor::resolve(user, caller_technician, order.technician_id);
    let from = order.status;
    authorize_transition(actor, from, target)?;

    let mut active: OrderActive = order.into();
    active.status = Set(target);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(order_id = %order.id, ?from, to = ?target, ?actor, "order status changed");
    audit::record(
        state,
        user.user_id,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": from, "to": target }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}
