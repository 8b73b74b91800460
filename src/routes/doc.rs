use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{InventoryAdjustRequest, LowStockList, MitraApprovalRequest, UpdateUserRequest, UserList},
        auth::{LoginRequest, LoginResponse, RegisterRequest, SessionInfo},
        catalog::{
            CreateProductRequest, CreateRentalItemRequest, CreateServiceRequest,
            CreateTechnicianRequest, MitraDetail, MitraList, ProductList, RentalItemList,
            ServiceList, TechnicianDetail, TechnicianList, UpdateProductRequest,
            UpdateRentalItemRequest, UpdateServiceRequest,
        },
        chat::{CreateRoomRequest, MarkReadResult, MessageList, RoomList, SendMessageRequest},
        mitra::{MitraProfileRequest, MitraServiceInput},
        orders::{
            BookingRequest, OrderCreated, OrderList, OrderWithItems, RentalOrderCreated,
            RentalOrderRequest, SparepartOrderRequest, UpdateOrderStatusRequest,
        },
        reviews::{ReviewList, ReviewRequest},
    },
    entity::{MitraStatus, OrderItemType, OrderStatus, UserRole},
    models::{
        ChatMessage, ChatRoom, Mitra, MitraImage, MitraService, Order, OrderItem, Product,
        RentalItem, Review, Service, Technician, User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, catalog, chat, health, mitra, orders, reviews, technician},
    services::pricing::{DurationType, RentalQuote},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        catalog::list_products,
        catalog::get_product,
        catalog::list_rental_items,
        catalog::get_rental_item,
        catalog::list_services,
        catalog::get_service,
        catalog::list_technicians,
        catalog::get_technician,
        catalog::list_mitras,
        catalog::get_mitra,
        orders::create_booking,
        orders::create_sparepart_order,
        orders::create_rental_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        reviews::submit_review,
        reviews::list_reviews,
        reviews::delete_review,
        reviews::delete_review_by_query,
        chat::open_room,
        chat::list_rooms,
        chat::list_messages,
        chat::send_message,
        chat::mark_read,
        technician::list_assigned_orders,
        technician::list_my_services,
        technician::create_service,
        technician::update_service,
        technician::delete_service,
        mitra::get_profile,
        mitra::put_profile,
        admin::list_users,
        admin::update_user,
        admin::delete_user,
        admin::set_mitra_approval,
        admin::create_technician,
        admin::create_product,
        admin::update_product,
        admin::create_rental_item,
        admin::update_rental_item,
        admin::list_all_orders,
        admin::list_low_stock,
        admin::adjust_inventory
    ),
    components(
        schemas(
            User,
            UserRole,
            MitraStatus,
            Technician,
            Mitra,
            MitraService,
            MitraImage,
            Product,
            RentalItem,
            Service,
            Order,
            OrderStatus,
            OrderItem,
            OrderItemType,
            Review,
            ChatRoom,
            ChatMessage,
            DurationType,
            RentalQuote,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            SessionInfo,
            ProductList,
            RentalItemList,
            ServiceList,
            TechnicianList,
            TechnicianDetail,
            MitraList,
            MitraDetail,
            CreateProductRequest,
            UpdateProductRequest,
            CreateRentalItemRequest,
            UpdateRentalItemRequest,
            CreateServiceRequest,
            UpdateServiceRequest,
            CreateTechnicianRequest,
            BookingRequest,
            SparepartOrderRequest,
            RentalOrderRequest,
            UpdateOrderStatusRequest,
            OrderCreated,
            RentalOrderCreated,
            OrderList,
            OrderWithItems,
            ReviewRequest,
            ReviewList,
            CreateRoomRequest,
            SendMessageRequest,
            RoomList,
            MessageList,
            MarkReadResult,
            MitraProfileRequest,
            MitraServiceInput,
            UpdateUserRequest,
            MitraApprovalRequest,
            InventoryAdjustRequest,
            UserList,
            LowStockList,
            Meta,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Catalog", description = "Public catalog endpoints"),
        (name = "Orders", description = "Booking, sparepart and rental orders"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "Chat", description = "Customer and technician chat"),
        (name = "Technician", description = "Technician self-service"),
        (name = "Mitra", description = "Mitra storefront"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
