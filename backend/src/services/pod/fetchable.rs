use crate::pod::filter_fetchable_photos;
use actix_web::{web, HttpResponse, Responder};
use common::requests::FetchableRequest;

pub(crate) async fn process(payload: web::Json<FetchableRequest>) -> impl Responder {
    HttpResponse::Ok().json(filter_fetchable_photos(&payload.urls))
}
