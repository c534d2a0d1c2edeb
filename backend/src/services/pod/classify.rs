use crate::pod::extractor::extract;
use actix_web::{web, HttpResponse, Responder};
use common::requests::ClassifyRequest;

pub(crate) async fn process(payload: web::Json<ClassifyRequest>) -> impl Responder {
    let request = payload.into_inner();
    HttpResponse::Ok().json(extract(&request.candidates, request.tier))
}
