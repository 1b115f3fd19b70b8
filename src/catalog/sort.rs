use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Source order (ascending id).
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Newest,
    Discount,
    /// No popularity metric is tracked; falls back to source order.
    Popularity,
}

impl SortKey {
    /// Orders `products` in place. `sort_by` is stable, so ties keep source order.
    pub fn apply(self, products: &mut [Product]) {
        match self {
            SortKey::Featured | SortKey::Popularity => {}
            SortKey::PriceLow => products.sort_by_key(Product::effective_price),
            SortKey::PriceHigh => {
                products.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()))
            }
            SortKey::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
            // None < Some(_), so reversing puts undiscounted products last.
            SortKey::Discount => products.sort_by(|a, b| b.discount_price.cmp(&a.discount_price)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProduct;

    fn product(id: i64, price: i64, discount: Option<i64>) -> Product {
        NewProduct {
            name: format!("Item {id}"),
            brand: "Nova".into(),
            price,
            discount_price: discount,
            images: vec![],
            sizes: vec![],
            colors: vec![],
            category: "Women".into(),
            subcategory: String::new(),
            in_stock: true,
            description: String::new(),
        }
        .into_product(id)
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, 3000, Some(2000)),
            product(2, 1500, None),
            product(3, 2500, Some(2000)),
            product(4, 4000, Some(3500)),
        ]
    }

    #[test]
    fn featured_keeps_source_order() {
        let mut items = sample();
        SortKey::Featured.apply(&mut items);
        assert_eq!(ids(&items), vec![1, 2, 3, 4]);
    }

    #[test]
    fn price_sorts_on_effective_price_and_are_stable() {
        let mut items = sample();
        SortKey::PriceLow.apply(&mut items);
        assert_eq!(ids(&items), vec![2, 1, 3, 4]);

        let mut items = sample();
        SortKey::PriceHigh.apply(&mut items);
        assert_eq!(ids(&items), vec![4, 1, 3, 2]);
    }

    #[test]
    fn newest_is_descending_id() {
        let mut items = sample();
        SortKey::Newest.apply(&mut items);
        assert_eq!(ids(&items), vec![4, 3, 2, 1]);
    }

    #[test]
    fn discount_puts_missing_discount_last() {
        let mut items = sample();
        SortKey::Discount.apply(&mut items);
        assert_eq!(ids(&items), vec![4, 1, 3, 2]);
        for pair in items.windows(2) {
            assert!(pair[0].discount_price >= pair[1].discount_price);
        }
    }

    #[test]
    fn sort_keys_parse_from_kebab_case() {
        let key: SortKey = serde_json::from_str("\"price-low\"").unwrap();
        assert_eq!(key, SortKey::PriceLow);
        let key: SortKey = serde_json::from_str("\"popularity\"").unwrap();
        assert_eq!(key, SortKey::Popularity);
    }
}
