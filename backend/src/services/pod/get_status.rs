use crate::error::Error;
use crate::job_controller::state::JobsState;
use crate::services::pod::error_response;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(job_id: web::Path<String>, state: web::Data<JobsState>) -> impl Responder {
    match state.status(&job_id).await {
        Some(status) => HttpResponse::Ok().json(status),
        None => error_response(&Error::NotFound(format!("job {} not found", job_id))),
    }
}
