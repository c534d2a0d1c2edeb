use crate::pod::score;
use actix_web::{web, HttpResponse, Responder};
use common::model::metrics::ScoreInput;

pub(crate) async fn process(payload: web::Json<ScoreInput>) -> impl Responder {
    HttpResponse::Ok().json(score(&payload))
}
