use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    catalog::{FilterSpec, SortKey},
    models::Review,
};

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// Page number (≥ 1), page size (1..=100) and row offset. The offset
    /// saturates, so an absurd page number simply lands past the end.
    pub fn normalize_with(&self, default_per_page: i64) -> (i64, i64, usize) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, usize::try_from(offset).unwrap_or(usize::MAX))
    }
}

/// Catalog query string. List-valued filters are comma-separated.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Matches name, brand or category, case-insensitively.
    pub q: Option<String>,
    pub categories: Option<String>,
    pub brands: Option<String>,
    pub sizes: Option<String>,
    pub colors: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Minimum discount percentage.
    pub min_discount: Option<i64>,
    pub sort: Option<SortKey>,
    pub limit: Option<usize>,
}

impl ProductQuery {
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::new()
            .search(self.q.as_deref().unwrap_or_default())
            .categories(split_list(self.categories.as_deref()))
            .brands(split_list(self.brands.as_deref()))
            .sizes(split_list(self.sizes.as_deref()))
            .colors(split_list(self.colors.as_deref()))
            .price_range(self.min_price, self.max_price)
            .min_discount(self.min_discount)
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewListQuery {
    /// Only reviews with exactly this many stars.
    pub rating: Option<i16>,
    pub sort: Option<ReviewSort>,
    pub page: Option<i64>,
    /// Defaults to 5.
    pub per_page: Option<i64>,
}

impl ReviewListQuery {
    /// Filters, sorts and pages `reviews`. Returns the page, its number and
    /// size, and the filtered total.
    pub fn arrange(&self, reviews: Vec<Review>) -> (Vec<Review>, i64, i64, i64) {
        let mut reviews: Vec<Review> = match self.rating.filter(|r| *r > 0) {
            Some(rating) => reviews.into_iter().filter(|r| r.rating == rating).collect(),
            None => reviews,
        };

        match self.sort.unwrap_or_default() {
            ReviewSort::Newest => reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ReviewSort::Oldest => reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            ReviewSort::Highest => reviews.sort_by(|a, b| b.rating.cmp(&a.rating)),
            ReviewSort::Lowest => reviews.sort_by(|a, b| a.rating.cmp(&b.rating)),
        }

        let pagination = Pagination {
            page: self.page,
            per_page: self.per_page,
        };
        let (page, per_page, offset) = pagination.normalize_with(5);
        let total = reviews.len() as i64;
        let items = reviews
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();
        (items, page, per_page, total)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn review(id: i64, rating: i16, age_days: i64) -> Review {
        let at = Utc::now() - Duration::days(age_days);
        Review {
            id,
            product_id: 1,
            user_name: format!("user{id}"),
            rating,
            comment: "ok".into(),
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(reviews: &[Review]) -> Vec<i64> {
        reviews.iter().map(|r| r.id).collect()
    }

    #[test]
    fn product_query_builds_filter_from_lists() {
        let query = ProductQuery {
            q: Some("dress".into()),
            brands: Some("Zara, Mango,,".into()),
            min_discount: Some(0),
            ..Default::default()
        };
        let spec = query.filter_spec();
        assert_eq!(
            spec,
            FilterSpec::new().search("dress").brands(["Zara", "Mango"])
        );
    }

    #[test]
    fn reviews_filter_sort_and_page() {
        let reviews = vec![review(1, 5, 3), review(2, 3, 1), review(3, 5, 2), review(4, 1, 0)];

        let query = ReviewListQuery {
            rating: Some(5),
            sort: Some(ReviewSort::Oldest),
            ..Default::default()
        };
        let (items, page, per_page, total) = query.arrange(reviews.clone());
        assert_eq!(ids(&items), vec![1, 3]);
        assert_eq!((page, per_page, total), (1, 5, 2));

        let query = ReviewListQuery {
            sort: Some(ReviewSort::Lowest),
            page: Some(2),
            per_page: Some(3),
            ..Default::default()
        };
        let (items, _, _, total) = query.arrange(reviews);
        assert_eq!(total, 4);
        assert_eq!(ids(&items), vec![3]);
    }

    #[test]
    fn huge_page_number_yields_empty_page() {
        let reviews = vec![review(1, 5, 0), review(2, 4, 1)];
        let query = ReviewListQuery {
            page: Some(i64::MAX),
            per_page: Some(100),
            ..Default::default()
        };
        let (items, page, per_page, total) = query.arrange(reviews);
        assert!(items.is_empty());
        assert_eq!((page, per_page, total), (i64::MAX, 100, 2));

        let pagination = Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        };
        let (_, _, offset) = pagination.normalize_with(5);
        assert_eq!(offset, usize::try_from(i64::MAX).unwrap_or(usize::MAX));
    }
}
