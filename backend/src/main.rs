use actix_web::{web, App, HttpServer};
use backend::config::Config;
use backend::job_controller::state::{self, JobsState};
use backend::services::pod::PodContext;
use backend::{db, services};
use clap::Parser;
use env_logger::Env;
use log::info;
use tokio::sync::mpsc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::parse();

    // Create the schema up front so a bad database path fails at startup.
    if let Err(e) = db::open_database(&config.database) {
        return Err(std::io::Error::other(format!(
            "cannot open database {}: {}",
            config.database.display(),
            e
        )));
    }

    // Initialize job controller state
    let (tx, rx) = mpsc::channel(100);
    let jobs_state = JobsState::new(tx);

    // Start job updater task
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        state::start_job_updater(updater_state, rx).await;
    });

    let pod_context = PodContext::from_config(&config);
    let json_limit = config.json_limit;

    info!("Server running at {}", config.bind_url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(web::Data::new(pod_context.clone()))
            .service(services::pod::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
