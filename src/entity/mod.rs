pub mod chat_messages;
pub mod chat_rooms;
pub mod mitra_images;
pub mod mitra_services;
pub mod mitras;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod rental_items;
pub mod reviews;
pub mod services;
pub mod technicians;
pub mod users;

pub use chat_messages::Entity as ChatMessages;
pub use chat_rooms::Entity as ChatRooms;
pub use mitra_images::Entity as MitraImages;
pub use mitra_services::Entity as MitraServices;
pub use mitras::Entity as Mitras;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use rental_items::Entity as RentalItems;
pub use reviews::Entity as Reviews;
pub use services::Entity as Services;
pub use technicians::Entity as Technicians;
pub use users::Entity as Users;

pub use order_items::OrderItemType;
pub use orders::OrderStatus;
pub use users::{MitraStatus, UserRole};
