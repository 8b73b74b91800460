use axum::http::StatusCode;
use chrono::NaiveDate;
use halotekno_api::{
    dto::{
        chat::{OutgoingMessage, SendMessageRequest},
        mitra::{MitraProfileRequest, MitraServiceInput},
        orders::{BookingRequest, RentalOrderRequest, SparepartOrderRequest},
        reviews::{ReviewRequest, ReviewSubject},
    },
    error::AppError,
    services::pricing::DurationType,
};
use uuid::Uuid;

fn message_of(err: AppError) -> String {
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    err.to_string()
}

fn booking() -> BookingRequest {
    BookingRequest {
        service_id: Some(Uuid::new_v4()),
        schedule_type: None,
        date: None,
        description: Some("Layar retak".into()),
        phone_type: Some("iPhone 11".into()),
    }
}

#[test]
fn booking_requires_service_phone_type_and_description() {
    let err = BookingRequest { service_id: None, ..booking() }.validate().unwrap_err();
    assert_eq!(message_of(err), "service_id is required");

    let err = BookingRequest { phone_type: Some("  ".into()), ..booking() }
        .validate()
        .unwrap_err();
    assert_eq!(message_of(err), "phone_type is required");

    let err = BookingRequest { description: None, ..booking() }.validate().unwrap_err();
    assert_eq!(message_of(err), "description is required");
}

#[test]
fn scheduled_booking_needs_a_date() {
    let err = BookingRequest {
        schedule_type: Some("scheduled".into()),
        ..booking()
    }
    .validate()
    .unwrap_err();
    assert_eq!(message_of(err), "date is required for scheduled bookings");

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let ok = BookingRequest {
        schedule_type: Some("Scheduled".into()),
        date: Some(date),
        ..booking()
    }
    .validate()
    .unwrap();
    assert_eq!(ok.schedule_type, "scheduled");
    assert_eq!(ok.date, Some(date));
}

#[test]
fn immediate_booking_drops_any_date() {
    let ok = BookingRequest {
        date: NaiveDate::from_ymd_opt(2024, 5, 1),
        ..booking()
    }
    .validate()
    .unwrap();
    assert_eq!(ok.schedule_type, "now");
    assert_eq!(ok.date, None);
}

#[test]
fn sparepart_quantity_defaults_to_one() {
    let ok = SparepartOrderRequest {
        product_id: Some(Uuid::new_v4()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    assert_eq!(ok.quantity, 1);

    let err = SparepartOrderRequest {
        product_id: Some(Uuid::new_v4()),
        quantity: Some(0),
        notes: None,
    }
    .validate()
    .unwrap_err();
    assert_eq!(message_of(err), "quantity must be at least 1");
}

#[test]
fn rental_duration_bounds() {
    let item = Some(Uuid::new_v4());
    for bad in [0, -1, 366] {
        let err = RentalOrderRequest {
            rental_item_id: item,
            duration: Some(bad),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "duration must be between 1 and 365 days");
    }
    for good in [1, 365] {
        let ok = RentalOrderRequest {
            rental_item_id: item,
            duration: Some(good),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(ok.duration_type, DurationType::Daily);
    }
}

#[test]
fn rental_body_with_unknown_duration_type_books_daily() {
    let body = serde_json::json!({
        "rental_item_id": Uuid::new_v4(),
        "duration": 3,
        "duration_type": "fortnightly",
    });
    let request: RentalOrderRequest = serde_json::from_value(body).unwrap();
    let rental = request.validate().unwrap();
    assert_eq!(rental.duration, 3);
    assert_eq!(rental.duration_type, DurationType::Daily);

    let monthly: RentalOrderRequest = serde_json::from_value(serde_json::json!({
        "rental_item_id": Uuid::new_v4(),
        "duration": 30,
        "duration_type": "monthly",
    }))
    .unwrap();
    assert_eq!(monthly.validate().unwrap().duration_type, DurationType::Monthly);
}

#[test]
fn review_needs_exactly_one_subject_and_rating_in_range() {
    let err = ReviewRequest {
        rating: Some(4),
        ..Default::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(message_of(err), "order_id or mitra_id is required");

    let err = ReviewRequest {
        order_id: Some(Uuid::new_v4()),
        mitra_id: Some(Uuid::new_v4()),
        rating: Some(4),
        comment: None,
    }
    .validate()
    .unwrap_err();
    assert_eq!(message_of(err), "only one of order_id or mitra_id may be given");

    for bad in [0, 6] {
        let err = ReviewRequest {
            mitra_id: Some(Uuid::new_v4()),
            rating: Some(bad),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "rating must be between 1 and 5");
    }

    let mitra_id = Uuid::new_v4();
    let ok = ReviewRequest {
        mitra_id: Some(mitra_id),
        rating: Some(5),
        comment: Some("   ".into()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    assert_eq!(ok.subject, ReviewSubject::Mitra(mitra_id));
    assert_eq!(ok.comment, None);
}

#[test]
fn chat_message_needs_content_or_media() {
    let err = SendMessageRequest {
        content: Some(" ".into()),
        ..Default::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(message_of(err), "content or media is required");

    let ok = SendMessageRequest {
        content: Some("Halo".into()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    assert_eq!(
        ok,
        OutgoingMessage {
            content: Some("Halo".into()),
            media: None
        }
    );
}

#[test]
fn chat_media_is_capped_at_ten_megabytes() {
    let at_limit = SendMessageRequest {
        content: None,
        media_url: Some("https://cdn.example/photo.jpg".into()),
        media_size: Some(10 * 1024 * 1024),
    }
    .validate()
    .unwrap();
    assert!(at_limit.media.is_some());

    let err = SendMessageRequest {
        content: None,
        media_url: Some("https://cdn.example/video.mp4".into()),
        media_size: Some(10 * 1024 * 1024 + 1),
    }
    .validate()
    .unwrap_err();
    assert_eq!(message_of(err), "media must be at most 10MB");

    let err = SendMessageRequest {
        content: None,
        media_url: Some("https://cdn.example/photo.jpg".into()),
        media_size: None,
    }
    .validate()
    .unwrap_err();
    assert_eq!(message_of(err), "media_size is required with media_url");
}

#[test]
fn mitra_profile_requires_location_fields() {
    let profile = MitraProfileRequest {
        business_name: "Servis Jaya".into(),
        description: None,
        address: "Jl. Merdeka 10".into(),
        city: "".into(),
        province: "Jawa Barat".into(),
        phone: None,
        whatsapp: None,
        email: None,
        weekday_hours: None,
        weekend_hours: None,
        services: vec![MitraServiceInput {
            name: "Ganti LCD".into(),
            description: None,
            price: Some(100_000),
        }],
        images: vec![],
    };
    assert_eq!(message_of(profile.validate().unwrap_err()), "city is required");
}
