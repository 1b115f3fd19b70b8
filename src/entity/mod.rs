pub mod cart_items;
pub mod products;
pub mod promotional_banners;
pub mod reviews;
pub mod wishlist_items;

pub use cart_items::Entity as CartItems;
pub use products::Entity as Products;
pub use promotional_banners::Entity as PromotionalBanners;
pub use reviews::Entity as Reviews;
pub use wishlist_items::Entity as WishlistItems;
