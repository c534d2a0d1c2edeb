//! Persisted assets of one consignment.

use crate::db::assets;
use crate::services::pod::{error_response, with_db, PodContext};
use actix_web::{web, HttpResponse, Responder};

/// `GET /api/pod/assets/{token}`: every row of the token, whatever its status.
pub(crate) async fn list(token: web::Path<String>, ctx: web::Data<PodContext>) -> impl Responder {
    let token = token.into_inner();
    match with_db(&ctx, move |conn| assets::list_assets(conn, &token)).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(err) => error_response(&err),
    }
}

/// `DELETE /api/pod/assets/{token}`: bulk purge, the only way rows disappear.
pub(crate) async fn purge(token: web::Path<String>, ctx: web::Data<PodContext>) -> impl Responder {
    let token = token.into_inner();
    match with_db(&ctx, move |conn| assets::purge_token(conn, &token)).await {
        Ok(deleted) => HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })),
        Err(err) => error_response(&err),
    }
}
