use actix_web::web;
use actix_web::HttpResponse;
use sqlx::PgPool;

use super::get_stats;
use super::list_subscribers;
use crate::utils::error_500;

/// `GET /admin/subscribers`
///
/// Same list as the dashboard, as JSON
pub async fn subscribers_json(pool: web::Data<PgPool>) -> Result<HttpResponse, actix_web::Error> {
    let subs = list_subscribers(&pool).await.map_err(error_500)?;
    Ok(HttpResponse::Ok().json(subs))
}

/// `GET /admin/stats`
///
/// `{"totalSubscribers": .., "totalNotifications": ..}`
pub async fn stats_json(pool: web::Data<PgPool>) -> Result<HttpResponse, actix_web::Error> {
    let stats = get_stats(&pool).await.map_err(error_500)?;
    Ok(HttpResponse::Ok().json(stats))
}
