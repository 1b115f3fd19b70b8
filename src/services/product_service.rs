use std::collections::BTreeSet;

use crate::{
    catalog::{FilterSpec, SortKey},
    dto::products::{CatalogFacets, CreateProductRequest, UpdateProductRequest},
    error::{AppError, AppResult},
    models::{NewProduct, Product},
    services::Fetched,
    state::AppState,
};

/// Filters, orders and truncates the catalog.
///
/// The store may use `spec` to narrow what it returns, but the evaluator
/// here is the one that decides; sorting happens after filtering and the
/// limit after sorting.
pub async fn query_products(
    state: &AppState,
    spec: &FilterSpec,
    sort: SortKey,
    limit: Option<usize>,
) -> Fetched<Vec<Product>> {
    let products = match state.store.list_products(spec).await {
        Ok(products) => products,
        Err(err) => return Fetched::degraded("query_products", err),
    };

    let mut matched: Vec<Product> = products.into_iter().filter(|p| spec.matches(p)).collect();
    sort.apply(&mut matched);
    if let Some(limit) = limit {
        matched.truncate(limit);
    }

    tracing::debug!(count = matched.len(), ?sort, "products queried");
    Fetched::ok(matched)
}

pub async fn get_product(state: &AppState, id: i64) -> Fetched<Option<Product>> {
    Fetched::from_store("get_product", state.store.get_product(id).await)
}

pub async fn catalog_facets(state: &AppState) -> Fetched<CatalogFacets> {
    Fetched::from_store(
        "catalog_facets",
        state.store.list_products(&FilterSpec::new()).await,
    )
    .map(|products| facets_of(&products))
}

pub async fn create_product(state: &AppState, payload: CreateProductRequest) -> AppResult<Product> {
    let product = NewProduct {
        name: payload.name.trim().to_string(),
        brand: payload.brand.trim().to_string(),
        price: payload.price,
        discount_price: payload.discount_price,
        images: payload.images,
        sizes: payload.sizes,
        colors: payload.colors,
        category: payload.category.trim().to_string(),
        subcategory: payload.subcategory,
        in_stock: payload.in_stock.unwrap_or(true),
        description: payload.description,
    };
    validate_fields(
        &product.name,
        &product.brand,
        &product.category,
        product.price,
        product.discount_price,
    )?;

    let product = state.store.insert_product(product).await?;
    tracing::info!(product_id = product.id, "product created");
    Ok(product)
}

pub async fn update_product(
    state: &AppState,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let mut product = state
        .store
        .get_product(id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(name) = payload.name {
        product.name = name.trim().to_string();
    }
    if let Some(brand) = payload.brand {
        product.brand = brand.trim().to_string();
    }
    if let Some(price) = payload.price {
        product.price = price;
    }
    if payload.clear_discount {
        product.discount_price = None;
    } else if let Some(discount_price) = payload.discount_price {
        product.discount_price = Some(discount_price);
    }
    if let Some(images) = payload.images {
        product.images = images;
    }
    if let Some(sizes) = payload.sizes {
        product.sizes = sizes;
    }
    if let Some(colors) = payload.colors {
        product.colors = colors;
    }
    if let Some(category) = payload.category {
        product.category = category.trim().to_string();
    }
    if let Some(subcategory) = payload.subcategory {
        product.subcategory = subcategory;
    }
    if let Some(in_stock) = payload.in_stock {
        product.in_stock = in_stock;
    }
    if let Some(description) = payload.description {
        product.description = description;
    }
    validate_fields(
        &product.name,
        &product.brand,
        &product.category,
        product.price,
        product.discount_price,
    )?;

    let product = state
        .store
        .replace_product(product)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(product_id = product.id, "product updated");
    Ok(product)
}

pub async fn delete_product(state: &AppState, id: i64) -> AppResult<()> {
    if !state.store.delete_product(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id = id, "product deleted");
    Ok(())
}

fn validate_fields(
    name: &str,
    brand: &str,
    category: &str,
    price: i64,
    discount_price: Option<i64>,
) -> AppResult<()> {
    for (field, value) in [("name", name), ("brand", brand), ("category", category)] {
        if value.is_empty() {
            return Err(AppError::Validation(format!("{field} must not be empty")));
        }
    }
    if price <= 0 {
        return Err(AppError::Validation("price must be greater than 0".into()));
    }
    if discount_price.is_some_and(|discount| discount <= 0 || discount >= price) {
        return Err(AppError::Validation(
            "discountPrice must be greater than 0 and less than price".into(),
        ));
    }
    Ok(())
}

fn facets_of(products: &[Product]) -> CatalogFacets {
    let mut categories = BTreeSet::new();
    let mut brands = BTreeSet::new();
    let mut sizes = BTreeSet::new();
    let mut colors = BTreeSet::new();
    for product in products {
        categories.insert(product.category.clone());
        brands.insert(product.brand.clone());
        sizes.extend(product.sizes.iter().cloned());
        colors.extend(product.colors.iter().cloned());
    }
    let prices = products.iter().map(Product::effective_price);

    CatalogFacets {
        categories: categories.into_iter().collect(),
        brands: brands.into_iter().collect(),
        sizes: sizes.into_iter().collect(),
        colors: colors.into_iter().collect(),
        min_price: prices.clone().min(),
        max_price: prices.max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_discount_at_or_above_price() {
        assert!(validate_fields("Tee", "Nova", "Men", 1000, Some(999)).is_ok());
        assert!(matches!(
            validate_fields("Tee", "Nova", "Men", 1000, Some(1000)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_fields("Tee", "Nova", "Men", 0, None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_fields("", "Nova", "Men", 100, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn facets_are_sorted_and_deduplicated() {
        let products: Vec<Product> = crate::seed::demo_products()
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.into_product(i as i64 + 1))
            .collect();
        let facets = facets_of(&products);
        assert_eq!(facets.categories, vec!["Footwear", "Kids", "Men", "Women"]);
        assert!(facets.brands.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(facets.min_price, Some(599));
        assert_eq!(facets.max_price, Some(8999));
    }

    #[test]
    fn facets_of_empty_catalog_have_no_price_bounds() {
        assert_eq!(facets_of(&[]), CatalogFacets::default());
    }
}
