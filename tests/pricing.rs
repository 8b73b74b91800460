use chrono::{TimeZone, Utc};
use halotekno_api::services::{
    order_number::{OrderKind, generate},
    pricing::{
        DEPOSIT_DAYS, DurationType, percent_of, rental_quote, rental_totals, service_booking_totals,
        service_unit_price, sparepart_totals,
    },
};

#[test]
fn weekly_rental_of_seven_days() {
    let quote = rental_quote(50_000, 7, DurationType::Weekly);
    assert_eq!(quote.base_price, 350_000);
    assert_eq!(quote.discount, 35_000);
    assert_eq!(quote.deposit, 500_000);
    assert_eq!(quote.total, 815_000);
}

#[test]
fn monthly_rental_gets_twenty_percent_off() {
    let quote = rental_quote(10_000, 30, DurationType::Monthly);
    assert_eq!(quote.base_price, 300_000);
    assert_eq!(quote.discount, 60_000);
    assert_eq!(quote.deposit, 10_000 * DEPOSIT_DAYS);
    assert_eq!(quote.total, 340_000);
}

#[test]
fn daily_rental_has_no_discount() {
    let quote = rental_quote(25_000, 3, DurationType::Daily);
    assert_eq!(quote.discount, 0);
    assert_eq!(quote.total, 75_000 + 250_000);
}

#[test]
fn rental_totals_keep_total_equal_to_subtotal_plus_tax() {
    let quote = rental_quote(50_000, 7, DurationType::Weekly);
    let totals = rental_totals(&quote);
    assert_eq!(totals.tax, 0);
    assert_eq!(totals.total, totals.subtotal + totals.tax);
    assert_eq!(totals.total, 815_000);
    assert_eq!(totals.deposit, 500_000);
    assert_eq!(totals.discount, 35_000);
}

#[test]
fn unknown_duration_type_reads_as_daily() {
    let parsed: DurationType = serde_json::from_str("\"fortnightly\"").unwrap();
    assert_eq!(parsed, DurationType::Daily);
    let weekly: DurationType = serde_json::from_str("\"weekly\"").unwrap();
    assert_eq!(weekly, DurationType::Weekly);
}

#[test]
fn service_booking_adds_eleven_percent_tax() {
    let totals = service_booking_totals(100_000);
    assert_eq!(totals.tax, 11_000);
    assert_eq!(totals.total, 111_000);
    assert_eq!(totals.total, totals.subtotal + totals.tax);
}

#[test]
fn tax_rounds_half_up() {
    // 11% of 150 = 16.5
    assert_eq!(percent_of(150, 11), 17);
    // 11% of 140 = 15.4
    assert_eq!(percent_of(140, 11), 15);
}

#[test]
fn ranged_service_is_priced_at_its_minimum() {
    assert_eq!(service_unit_price(Some(300_000), Some(150_000)), Some(150_000));
    assert_eq!(service_unit_price(Some(300_000), None), Some(300_000));
    assert_eq!(service_unit_price(None, None), None);
}

#[test]
fn sparepart_orders_are_untaxed() {
    let totals = sparepart_totals(250_000, 3);
    assert_eq!(totals.subtotal, 750_000);
    assert_eq!(totals.tax, 0);
    assert_eq!(totals.total, 750_000);
}

#[test]
fn order_numbers_follow_their_formats() {
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();

    let booking = generate(OrderKind::ServiceBooking, now);
    let parts: Vec<&str> = booking.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "ORD");
    assert_eq!(parts[1], now.timestamp_millis().to_string());
    assert_eq!(parts[2].len(), 9);
    assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));

    for (kind, prefix) in [(OrderKind::Sparepart, "SP"), (OrderKind::Rental, "RNT")] {
        let number = generate(kind, now);
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts, [prefix, "20240309", parts[2]]);
        let suffix: u16 = parts[2].parse().unwrap();
        assert!((1000..=9999).contains(&suffix));
    }
}
