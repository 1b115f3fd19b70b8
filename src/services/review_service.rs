use chrono::Utc;

use crate::{
    dto::reviews::{ReviewRequest, ReviewSummary},
    error::{AppError, AppResult},
    models::{NewReview, Review, ReviewEdit},
    services::Fetched,
    state::AppState,
};

/// All reviews of a product, newest first.
pub async fn get_reviews(state: &AppState, product_id: i64) -> Fetched<Vec<Review>> {
    Fetched::from_store("get_reviews", state.store.list_reviews(product_id).await)
}

pub async fn get_reviews_summary(state: &AppState, product_id: i64) -> Fetched<ReviewSummary> {
    get_reviews(state, product_id)
        .await
        .map(|reviews| summarize(&reviews))
}

pub async fn add_review(
    state: &AppState,
    product_id: i64,
    payload: ReviewRequest,
) -> AppResult<Review> {
    let payload = validate(payload)?;
    let review = state
        .store
        .insert_review(NewReview {
            product_id,
            user_name: payload.user_name,
            rating: payload.rating,
            comment: payload.comment,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(review_id = review.id, product_id, rating = review.rating, "review added");
    Ok(review)
}

/// Replaces the review text and rating. `createdAt` is kept, `updatedAt` refreshed.
pub async fn update_review(state: &AppState, id: i64, payload: ReviewRequest) -> AppResult<Review> {
    let payload = validate(payload)?;
    let review = state
        .store
        .update_review(
            id,
            ReviewEdit {
                user_name: payload.user_name,
                rating: payload.rating,
                comment: payload.comment,
                updated_at: Utc::now(),
            },
        )
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(review_id = id, rating = review.rating, "review updated");
    Ok(review)
}

pub async fn delete_review(state: &AppState, id: i64) -> AppResult<()> {
    if !state.store.delete_review(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(review_id = id, "review deleted");
    Ok(())
}

fn validate(payload: ReviewRequest) -> AppResult<ReviewRequest> {
    let user_name = payload.user_name.trim().to_string();
    let comment = payload.comment.trim().to_string();
    if user_name.is_empty() {
        return Err(AppError::Validation("userName must not be empty".into()));
    }
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::Validation("rating must be between 1 and 5".into()));
    }
    if comment.is_empty() {
        return Err(AppError::Validation("comment must not be empty".into()));
    }
    Ok(ReviewRequest {
        user_name,
        rating: payload.rating,
        comment,
    })
}

pub fn summarize(reviews: &[Review]) -> ReviewSummary {
    let mut summary = ReviewSummary::default();
    if reviews.is_empty() {
        return summary;
    }

    let total: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    let mean = total as f64 / reviews.len() as f64;
    summary.total_reviews = reviews.len();
    summary.average_rating = (mean * 10.0).round() / 10.0;
    for review in reviews {
        let Ok(stars) = u8::try_from(review.rating) else {
            continue;
        };
        if let Some(count) = summary.rating_breakdown.get_mut(&stars) {
            *count += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i16) -> Review {
        let now = Utc::now();
        Review {
            id: 1,
            product_id: 1,
            user_name: "Asha".into(),
            rating,
            comment: "Lovely fabric".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_summary_has_every_bucket() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.rating_breakdown.len(), 5);
        assert!(summary.rating_breakdown.values().all(|c| *c == 0));
    }

    #[test]
    fn summary_rounds_mean_to_one_decimal() {
        let summary = summarize(&[review(5), review(5), review(3)]);
        assert_eq!(summary.total_reviews, 3);
        assert_eq!(summary.average_rating, 4.3);
        let counts: Vec<(u8, usize)> = summary.rating_breakdown.into_iter().collect();
        assert_eq!(counts, vec![(1, 0), (2, 0), (3, 1), (4, 0), (5, 2)]);
    }

    #[test]
    fn validation_trims_and_checks_fields() {
        let ok = validate(ReviewRequest {
            user_name: "  Ravi ".into(),
            rating: 4,
            comment: " Fits well ".into(),
        })
        .unwrap();
        assert_eq!(ok.user_name, "Ravi");
        assert_eq!(ok.comment, "Fits well");

        for (name, rating, comment) in [("", 4, "ok"), ("Ravi", 0, "ok"), ("Ravi", 6, "ok"), ("Ravi", 3, "  ")] {
            let result = validate(ReviewRequest {
                user_name: name.into(),
                rating,
                comment: comment.into(),
            });
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }
}
