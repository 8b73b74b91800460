use halotekno_api::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_service() {
    let response = health_check().await;
    assert_eq!(response.0.message, "HaloTekno API is running");
    let data = response.0.data.expect("health payload");
    assert_eq!(data.status, "ok");
    assert_eq!(data.service, "halotekno-api");
}
