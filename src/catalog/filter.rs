use crate::models::Product;

/// One filter dimension. Values inside a dimension are OR'd; dimensions are AND'd.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Case-insensitive substring over name, brand and category. Stored lowercased.
    Search(String),
    Categories(Vec<String>),
    Brands(Vec<String>),
    Sizes(Vec<String>),
    Colors(Vec<String>),
    /// Inclusive bounds on the effective price.
    PriceRange { min: Option<i64>, max: Option<i64> },
    /// Minimum discount percentage; products without a discount never pass.
    MinDiscount(i64),
}

/// A set of product filter criteria. Builders drop empty inputs, so an
/// untouched spec matches every product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    criteria: Vec<Criterion>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        if !text.is_empty() {
            self.criteria.push(Criterion::Search(text.to_lowercase()));
        }
        self
    }

    pub fn categories<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_set(values, Criterion::Categories)
    }

    pub fn brands<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_set(values, Criterion::Brands)
    }

    pub fn sizes<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_set(values, Criterion::Sizes)
    }

    pub fn colors<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_set(values, Criterion::Colors)
    }

    pub fn price_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        if min.is_some() || max.is_some() {
            self.criteria.push(Criterion::PriceRange { min, max });
        }
        self
    }

    pub fn min_discount(mut self, threshold: Option<i64>) -> Self {
        if let Some(threshold) = threshold.filter(|t| *t > 0) {
            self.criteria.push(Criterion::MinDiscount(threshold));
        }
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.criteria.iter().all(|c| evaluate(c, product))
    }

    fn push_set<I, S>(mut self, values: I, make: fn(Vec<String>) -> Criterion) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !v.trim().is_empty())
            .collect();
        if !values.is_empty() {
            self.criteria.push(make(values));
        }
        self
    }
}

pub fn evaluate(criterion: &Criterion, product: &Product) -> bool {
    match criterion {
        Criterion::Search(needle) => [&product.name, &product.brand, &product.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle.as_str())),
        Criterion::Categories(wanted) => wanted.contains(&product.category),
        Criterion::Brands(wanted) => wanted.contains(&product.brand),
        Criterion::Sizes(wanted) => intersects(&product.sizes, wanted),
        Criterion::Colors(wanted) => intersects(&product.colors, wanted),
        Criterion::PriceRange { min, max } => {
            let price = product.effective_price();
            min.is_none_or(|min| price >= min) && max.is_none_or(|max| price <= max)
        }
        Criterion::MinDiscount(threshold) => product
            .discount_percentage()
            .is_some_and(|pct| pct >= *threshold),
    }
}

fn intersects(have: &[String], wanted: &[String]) -> bool {
    have.iter().any(|v| wanted.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProduct;

    fn product(name: &str, brand: &str, category: &str, price: i64, discount: Option<i64>) -> Product {
        NewProduct {
            name: name.into(),
            brand: brand.into(),
            price,
            discount_price: discount,
            images: vec![],
            sizes: vec!["S".into(), "M".into()],
            colors: vec!["Black".into()],
            category: category.into(),
            subcategory: String::new(),
            in_stock: true,
            description: String::new(),
        }
        .into_product(1)
    }

    #[test]
    fn empty_inputs_add_no_criteria() {
        let spec = FilterSpec::new()
            .search("   ")
            .brands(Vec::<String>::new())
            .sizes([""])
            .price_range(None, None)
            .min_discount(Some(0));
        assert!(spec.is_empty());
        assert!(spec.matches(&product("Tee", "Nova", "Men", 500, None)));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let p = product("Floral Dress", "Zara", "Women", 2500, None);
        assert!(FilterSpec::new().search("floral").matches(&p));
        assert!(FilterSpec::new().search("ZAR").matches(&p));
        assert!(FilterSpec::new().search("wom").matches(&p));
        assert!(!FilterSpec::new().search("denim").matches(&p));
    }

    #[test]
    fn within_dimension_is_or_across_is_and() {
        let p = product("Chino", "Levis", "Men", 1800, None);
        assert!(FilterSpec::new().brands(["Zara", "Levis"]).matches(&p));
        assert!(
            !FilterSpec::new()
                .brands(["Levis"])
                .colors(["Red"])
                .matches(&p)
        );
        assert!(FilterSpec::new().sizes(["XL", "M"]).matches(&p));
    }

    #[test]
    fn price_range_uses_effective_price_inclusive() {
        let p = product("Jacket", "Nova", "Men", 5000, Some(3000));
        assert!(FilterSpec::new().price_range(Some(3000), Some(3000)).matches(&p));
        assert!(!FilterSpec::new().price_range(Some(3500), None).matches(&p));
        assert!(FilterSpec::new().price_range(None, Some(4000)).matches(&p));
    }

    #[test]
    fn min_discount_requires_a_discount() {
        let discounted = product("Skirt", "Nova", "Women", 1000, Some(700));
        let full_price = product("Skirt", "Nova", "Women", 1000, None);
        assert!(FilterSpec::new().min_discount(Some(30)).matches(&discounted));
        assert!(!FilterSpec::new().min_discount(Some(31)).matches(&discounted));
        assert!(!FilterSpec::new().min_discount(Some(10)).matches(&full_price));
    }
}
