use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::SortKey,
    dto::{
        banners::{BannerList, CreateBannerRequest, UpdateBannerRequest},
        cart::{AddToCartRequest, CartItemView, CartSummary, UpdateCartItemRequest},
        products::{CatalogFacets, CreateProductRequest, ProductList, UpdateProductRequest},
        reviews::{ReviewRequest, ReviewSummary},
        wishlist::{AddToWishlistRequest, WishlistItemView},
    },
    models::{CartLineItem, Product, PromotionalBanner, Review, WishlistEntry},
    response::{ApiResponse, Meta},
    routes::{banners, cart, health, params, products, reviews, wishlist},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::catalog_facets,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::list_reviews,
        products::reviews_summary,
        products::add_review,
        reviews::update_review,
        reviews::delete_review,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        banners::list_banners,
        banners::get_banner,
        banners::create_banner,
        banners::update_banner,
        banners::delete_banner
    ),
    components(
        schemas(
            Product,
            CartLineItem,
            WishlistEntry,
            Review,
            PromotionalBanner,
            SortKey,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CatalogFacets,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartItemView,
            CartSummary,
            cart::RemovedData,
            cart::ClearedData,
            AddToWishlistRequest,
            WishlistItemView,
            ReviewRequest,
            ReviewSummary,
            CreateBannerRequest,
            UpdateBannerRequest,
            BannerList,
            params::ProductQuery,
            params::ReviewSort,
            params::ReviewListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartSummary>,
            ApiResponse<ReviewSummary>,
            ApiResponse<BannerList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Reviews", description = "Product review endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Banners", description = "Promotional banner endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
