pub mod banners;
pub mod cart;
pub mod products;
pub mod reviews;
pub mod wishlist;
