use crate::db::assets;
use crate::pod::evaluate;
use crate::services::pod::{error_response, with_db, PodContext};
use actix_web::{web, HttpResponse, Responder};
use common::model::metrics::DeliveryMetadata;

/// `POST /api/pod/metrics/{token}`: scores a consignment from the assets
/// stored for its tracking token and the carrier fields in the body.
pub(crate) async fn process(
    token: web::Path<String>,
    ctx: web::Data<PodContext>,
    payload: web::Json<DeliveryMetadata>,
) -> impl Responder {
    let token = token.into_inner();
    match with_db(&ctx, move |conn| assets::count_available(conn, &token)).await {
        Ok(counts) => HttpResponse::Ok().json(evaluate(counts, &payload)),
        Err(err) => error_response(&err),
    }
}
