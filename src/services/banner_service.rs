use chrono::Utc;

use crate::{
    dto::banners::{CreateBannerRequest, UpdateBannerRequest},
    error::{AppError, AppResult},
    models::{NewBanner, PromotionalBanner},
    services::Fetched,
    state::AppState,
};

pub async fn list_active_banners(state: &AppState) -> Fetched<Vec<PromotionalBanner>> {
    Fetched::from_store("list_active_banners", state.store.list_active_banners().await)
}

pub async fn get_banner(state: &AppState, id: i64) -> Fetched<Option<PromotionalBanner>> {
    Fetched::from_store("get_banner", state.store.get_banner(id).await)
}

pub async fn create_banner(
    state: &AppState,
    payload: CreateBannerRequest,
) -> AppResult<PromotionalBanner> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }

    let now = Utc::now();
    let banner = state
        .store
        .insert_banner(NewBanner {
            title,
            description: payload.description,
            cta_text: payload.cta_text,
            cta_link: payload.cta_link,
            background_color: payload.background_color,
            is_active: payload.is_active.unwrap_or(true),
            priority: payload.priority.unwrap_or(1),
            start_date: payload.start_date.unwrap_or(now),
            end_date: payload.end_date,
            created_at: now,
        })
        .await?;

    tracing::info!(banner_id = banner.id, "banner created");
    Ok(banner)
}

pub async fn update_banner(
    state: &AppState,
    id: i64,
    payload: UpdateBannerRequest,
) -> AppResult<PromotionalBanner> {
    let mut banner = state
        .store
        .get_banner(id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(title) = payload.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title must not be empty".into()));
        }
        banner.title = title;
    }
    if let Some(description) = payload.description {
        banner.description = description;
    }
    if let Some(cta_text) = payload.cta_text {
        banner.cta_text = cta_text;
    }
    if let Some(cta_link) = payload.cta_link {
        banner.cta_link = cta_link;
    }
    if let Some(background_color) = payload.background_color {
        banner.background_color = background_color;
    }
    if let Some(is_active) = payload.is_active {
        banner.is_active = is_active;
    }
    if let Some(priority) = payload.priority {
        banner.priority = priority;
    }
    if let Some(start_date) = payload.start_date {
        banner.start_date = start_date;
    }
    if payload.clear_end_date {
        banner.end_date = None;
    } else if payload.end_date.is_some() {
        banner.end_date = payload.end_date;
    }
    banner.updated_at = Utc::now();

    let banner = state
        .store
        .replace_banner(banner)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(banner_id = id, "banner updated");
    Ok(banner)
}

pub async fn delete_banner(state: &AppState, id: i64) -> AppResult<()> {
    if !state.store.delete_banner(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(banner_id = id, "banner deleted");
    Ok(())
}
