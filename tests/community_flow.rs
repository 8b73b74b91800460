mod common;

use halotekno_api::{
    dto::{
        admin::{MitraApprovalRequest, UpdateUserRequest},
        chat::{CreateRoomRequest, SendMessageRequest},
        mitra::{MitraProfileRequest, MitraServiceInput},
        orders::{BookingRequest, SparepartOrderRequest},
        catalog::{CreateServiceRequest, UpdateServiceRequest},
        reviews::{ReviewQuery, ReviewRequest},
    },
    entity::{MitraStatus, Mitras, Reviews, UserRole, Users, reviews, users},
    error::AppError,
    middleware::auth::AuthUser,
    services::{
        admin_service, catalog_service, chat_service, mitra_service, order_service,
        review_service, technician_service,
    },
    state::AppState,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::{create_product, create_service, create_technician, create_user};

// Integration flow: mitra storefront and approval, review upserts with the
// aggregate they drive, chat rooms, SUPER_ADMIN protection and technician
// service ownership.
#[tokio::test]
async fn mitra_review_chat_and_admin_flow() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let mitra_id = storefront_and_approval(&state).await?;
    mitra_reviews_drive_the_aggregate(&state, mitra_id).await?;
    order_reviews_rate_the_technician(&state).await?;
    chat_rooms_are_per_pair(&state).await?;
    super_admin_is_untouchable(&state).await?;
    technicians_manage_their_own_services(&state).await?;

    Ok(())
}

fn profile(services: &[&str], images: &[&str]) -> MitraProfileRequest {
    MitraProfileRequest {
        business_name: "Servis Jaya".into(),
        description: None,
        address: "Jl. Merdeka 10".into(),
        city: "Bandung".into(),
        province: "Jawa Barat".into(),
        phone: None,
        whatsapp: None,
        email: None,
        weekday_hours: Some("09:00-18:00".into()),
        weekend_hours: None,
        services: services
            .iter()
            .map(|name| MitraServiceInput {
                name: (*name).into(),
                description: None,
                price: Some(100_000),
            })
            .collect(),
        images: images.iter().map(|url| (*url).into()).collect(),
    }
}

async fn storefront_and_approval(state: &AppState) -> anyhow::Result<Uuid> {
    let mitra = create_user(state, UserRole::Mitra, Some(MitraStatus::Pending)).await?;
    let admin = create_user(state, UserRole::Admin, None).await?;
    let customer = create_user(state, UserRole::Customer, None).await?;

    let denied = mitra_service::get_profile(state, &customer).await;
    assert!(matches!(denied, Err(AppError::Unauthorized)));

    let (created, first) = mitra_service::put_profile(
        state,
        &mitra,
        profile(&["Ganti LCD", "Ganti Baterai"], &["https://cdn.example/1.jpg", "https://cdn.example/2.jpg"]),
    )
    .await?;
    assert!(created);
    let first = first.data.unwrap();
    assert_eq!(first.services.len(), 2);
    assert_eq!(first.images.len(), 2);
    assert!(!first.mitra.is_approved);

    let (created, second) =
        mitra_service::put_profile(state, &mitra, profile(&["Servis Laptop"], &[])).await?;
    assert!(!created);
    let second = second.data.unwrap();
    assert_eq!(second.mitra.id, first.mitra.id);
    assert_eq!(second.services.len(), 1);
    assert_eq!(second.services[0].name, "Servis Laptop");
    assert!(second.images.is_empty());

    admin_service::set_mitra_approval(
        state,
        &admin,
        mitra.user_id,
        MitraApprovalRequest {
            status: MitraStatus::Approved,
        },
    )
    .await?;
    let user = Users::find_by_id(mitra.user_id).one(&state.orm).await?.unwrap();
    assert_eq!(user.mitra_status, Some(MitraStatus::Approved));
    let storefront = Mitras::find_by_id(first.mitra.id).one(&state.orm).await?.unwrap();
    assert!(storefront.is_approved);

    // The owner may not review their own storefront.
    let own = review_service::submit_review(
        state,
        &AuthUser {
            mitra_status: Some(MitraStatus::Approved),
            ..mitra
        },
        mitra_review(storefront.id, 5),
    )
    .await;
    assert!(matches!(own, Err(AppError::Forbidden(_))));

    Ok(storefront.id)
}

fn mitra_review(mitra_id: Uuid, rating: i32) -> ReviewRequest {
    ReviewRequest {
        order_id: None,
        mitra_id: Some(mitra_id),
        rating: Some(rating),
        comment: None,
    }
}

async fn mitra_reviews_drive_the_aggregate(state: &AppState, mitra_id: Uuid) -> anyhow::Result<()> {
    let alice = create_user(state, UserRole::Customer, None).await?;
    let bob = create_user(state, UserRole::Customer, None).await?;

    let (created, _) = review_service::submit_review(state, &alice, mitra_review(mitra_id, 4)).await?;
    assert!(created);
    let (created, _) = review_service::submit_review(state, &alice, mitra_review(mitra_id, 2)).await?;
    assert!(!created, "second review by the same user updates in place");

    let stored = Mitras::find_by_id(mitra_id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.total_review, 1);
    assert_eq!(stored.rating, 2.0);

    let (_, bobs) = review_service::submit_review(state, &bob, mitra_review(mitra_id, 5)).await?;
    let bobs = bobs.data.unwrap();

    let stored = Mitras::find_by_id(mitra_id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.total_review, 2);
    assert_eq!(stored.rating, 3.5);

    let listed = review_service::list_reviews(
        state,
        ReviewQuery {
            mitra_id: Some(mitra_id),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(listed.total_review, 2);
    assert_eq!(listed.average_rating, 3.5);

    let not_owner = review_service::delete_review(state, &alice, bobs.id).await;
    assert!(matches!(not_owner, Err(AppError::Forbidden(_))));

    review_service::delete_review(state, &bob, bobs.id).await?;
    let stored = Mitras::find_by_id(mitra_id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.total_review, 1);
    assert_eq!(stored.rating, 2.0);

    // Order reviews are limited to the order's owner.
    let product = create_product(state, 10_000, 5).await?;
    let created = order_service::create_sparepart_order(
        state,
        &alice,
        SparepartOrderRequest {
            product_id: Some(product.id),
            quantity: None,
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();
    let foreign = review_service::submit_review(
        state,
        &bob,
        ReviewRequest {
            order_id: Some(created.order_id),
            mitra_id: None,
            rating: Some(1),
            comment: None,
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    Ok(())
}

fn order_review(order_id: Uuid, rating: i32) -> ReviewRequest {
    ReviewRequest {
        order_id: Some(order_id),
        mitra_id: None,
        rating: Some(rating),
        comment: Some("Cepat".into()),
    }
}

async fn order_reviews_rate_the_technician(state: &AppState) -> anyhow::Result<()> {
    let customer = create_user(state, UserRole::Customer, None).await?;
    let (_, technician_id) = create_technician(state).await?;
    let service = create_service(state, technician_id, Some(150_000), None).await?;

    let order = order_service::create_service_booking(
        state,
        &customer,
        BookingRequest {
            service_id: Some(service.id),
            schedule_type: None,
            date: None,
            description: Some("Baterai drop".into()),
            phone_type: Some("Redmi Note 10".into()),
        },
    )
    .await?
    .data
    .unwrap()
    .order;

    let (created, _) = review_service::submit_review(state, &customer, order_review(order.id, 3)).await?;
    assert!(created);
    let (created, updated) =
        review_service::submit_review(state, &customer, order_review(order.id, 5)).await?;
    assert!(!created, "second review of the same order updates in place");
    assert_eq!(updated.data.unwrap().rating, 5);

    let rows = Reviews::find()
        .filter(reviews::Column::OrderId.eq(order.id))
        .filter(reviews::Column::UserId.eq(customer.user_id))
        .all(&state.orm)
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rating, 5);

    // Technician rating is derived from reviews of their orders at read time.
    let detail = catalog_service::get_technician(state, technician_id)
        .await?
        .data
        .unwrap();
    assert_eq!(detail.review_count, 1);
    assert_eq!(detail.average_rating, 5.0);

    let listed = review_service::list_reviews(
        state,
        ReviewQuery {
            technician_id: Some(technician_id),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(listed.total_review, 1);
    assert_eq!(listed.average_rating, 5.0);
    assert_eq!(
        Reviews::find()
            .filter(reviews::Column::OrderId.eq(order.id))
            .count(&state.orm)
            .await?,
        1
    );

    Ok(())
}

async fn chat_rooms_are_per_pair(state: &AppState) -> anyhow::Result<()> {
    let customer = create_user(state, UserRole::Customer, None).await?;
    let stranger = create_user(state, UserRole::Customer, None).await?;
    let (technician, technician_id) = create_technician(state).await?;

    let first = chat_service::open_room(state, &customer, CreateRoomRequest { technician_id })
        .await?
        .data
        .unwrap();
    let again = chat_service::open_room(state, &customer, CreateRoomRequest { technician_id })
        .await?
        .data
        .unwrap();
    assert_eq!(first.id, again.id);

    let own = chat_service::open_room(state, &technician, CreateRoomRequest { technician_id }).await;
    assert!(matches!(own, Err(AppError::Validation(_))));

    let sent = chat_service::send_message(
        state,
        &customer,
        first.id,
        SendMessageRequest {
            content: Some("Halo, bisa servis hari ini?".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!sent.is_read);

    let intruder = chat_service::list_messages(state, &stranger, first.id).await;
    assert!(matches!(intruder, Err(AppError::Forbidden(_))));
    let intruder = chat_service::send_message(
        state,
        &stranger,
        first.id,
        SendMessageRequest {
            content: Some("hi".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(intruder, Err(AppError::Forbidden(_))));

    // The sender's own messages are never marked.
    let marked = chat_service::mark_read(state, &customer, first.id).await?.data.unwrap();
    assert_eq!(marked.updated, 0);
    let marked = chat_service::mark_read(state, &technician, first.id).await?.data.unwrap();
    assert_eq!(marked.updated, 1);

    let messages = chat_service::list_messages(state, &technician, first.id)
        .await?
        .data
        .unwrap();
    assert_eq!(messages.items.len(), 1);
    assert!(messages.items[0].is_read);

    let rooms = chat_service::list_rooms(state, &technician).await?.data.unwrap();
    let room = rooms.items.iter().find(|r| r.id == first.id).expect("room listed for technician");
    assert!(room.last_message_at.is_some());

    Ok(())
}

async fn super_admin_is_untouchable(state: &AppState) -> anyhow::Result<()> {
    let admin = create_user(state, UserRole::Admin, None).await?;

    let existing = Users::find()
        .filter(users::Column::Role.eq(UserRole::SuperAdmin))
        .one(&state.orm)
        .await?;
    let super_admin_id = match existing {
        Some(user) => user.id,
        None => create_user(state, UserRole::SuperAdmin, None).await?.user_id,
    };

    let edit = admin_service::update_user(
        state,
        &admin,
        super_admin_id,
        UpdateUserRequest {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(edit, Err(AppError::Forbidden(_))));

    let delete = admin_service::delete_user(state, &admin, super_admin_id).await;
    assert!(matches!(delete, Err(AppError::Forbidden(_))));

    let customer = create_user(state, UserRole::Customer, None).await?;
    let promote = admin_service::update_user(
        state,
        &admin,
        customer.user_id,
        UpdateUserRequest {
            role: Some(UserRole::SuperAdmin),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(promote, Err(AppError::Forbidden(_))));

    let renamed = admin_service::update_user(
        state,
        &admin,
        customer.user_id,
        UpdateUserRequest {
            name: Some("Renamed".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(renamed.name, "Renamed");

    // Users with orders cannot be deleted.
    let product = create_product(state, 10_000, 1).await?;
    order_service::create_sparepart_order(
        state,
        &customer,
        SparepartOrderRequest {
            product_id: Some(product.id),
            quantity: Some(1),
            notes: None,
        },
    )
    .await?;
    let blocked = admin_service::delete_user(state, &admin, customer.user_id).await;
    assert!(matches!(blocked, Err(AppError::BadRequest(_))));

    let disposable = create_user(state, UserRole::Customer, None).await?;
    admin_service::delete_user(state, &admin, disposable.user_id).await?;
    assert!(Users::find_by_id(disposable.user_id).one(&state.orm).await?.is_none());

    let customer_lists = admin_service::list_users(state, &customer, Default::default()).await;
    assert!(matches!(customer_lists, Err(AppError::Unauthorized)));

    Ok(())
}

async fn technicians_manage_their_own_services(state: &AppState) -> anyhow::Result<()> {
    let (owner, owner_technician_id) = create_technician(state).await?;
    let (other, _) = create_technician(state).await?;
    let customer = create_user(state, UserRole::Customer, None).await?;

    let no_price = technician_service::create_service(
        state,
        &owner,
        CreateServiceRequest {
            name: "Ganti LCD".into(),
            description: None,
            category: "screen".into(),
            price: None,
            min_price: Some(500_000),
            max_price: Some(200_000),
            duration: None,
        },
    )
    .await;
    assert!(matches!(no_price, Err(AppError::Validation(_))));

    let created = technician_service::create_service(
        state,
        &owner,
        CreateServiceRequest {
            name: "Ganti LCD".into(),
            description: Some("Original panel".into()),
            category: "screen".into(),
            price: Some(450_000),
            min_price: None,
            max_price: None,
            duration: Some("2 jam".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.technician_id, owner_technician_id);

    // Not a technician at all, and someone else's service: both 401.
    let not_technician = technician_service::list_my_services(state, &customer).await;
    assert!(matches!(not_technician, Err(AppError::Unauthorized)));
    let foreign = technician_service::update_service(
        state,
        &other,
        created.id,
        UpdateServiceRequest {
            price: Some(1),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::Unauthorized)));

    let updated = technician_service::update_service(
        state,
        &owner,
        created.id,
        UpdateServiceRequest {
            price: Some(400_000),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.price, Some(400_000));

    let detail = catalog_service::get_technician(state, owner_technician_id)
        .await?
        .data
        .unwrap();
    assert_eq!(detail.review_count, 0);
    assert!(detail.services.iter().any(|s| s.id == created.id));

    technician_service::delete_service(state, &owner, created.id).await?;
    let gone = catalog_service::get_service(state, created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));

    Ok(())
}
