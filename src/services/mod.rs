pub mod admin_service;
pub mod auth_service;
pub mod catalog_service;
pub mod chat_service;
pub mod mitra_service;
pub mod order_number;
pub mod order_service;
pub mod order_status;
pub mod pricing;
pub mod review_service;
pub mod technician_service;
