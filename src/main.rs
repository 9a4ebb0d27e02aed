mod atmo;
mod db;
mod entry;
mod errors;
mod handlers;
mod logger;
mod models;
mod psychro;
mod swagger;
mod utils;

use db::get_db;
use utoipa::OpenApi;
use warp::{self, Filter};
use warp_rate_limit::{with_rate_limit, RateLimitConfig};

#[tokio::main]
async fn main() -> mongodb::error::Result<()> {
    logger::start_log();

    let config = swagger::doc_config();
    let db = get_db().await?;

    // 60 saves per 60 seconds, the submit button is the real throttle
    let save_rate_limit = RateLimitConfig::max_per_window(60, 60);

    let root = warp::path::end().map(|| "Welcome to the Drylog api");

    let api_doc = warp::path("api-doc.json")
        .and(warp::get())
        .map(|| warp::reply::json(&swagger::DrylogDoc::openapi()));

    let swagger_ui = warp::path("docs")
        .and(warp::get())
        .and(warp::path::full())
        .and(warp::path::tail())
        .and(warp::any().map(move || config.clone()))
        .and_then(swagger::serve_swagger);

    let rooms_route = warp::path!("projects" / String / "rooms")
        .and(warp::get())
        .and(with_db(db.clone()))
        .and_then(handlers::project_handlers::rooms::project_rooms_handler);

    let daily_entry_route = warp::path!("projects" / String / "daily-entry")
        .and(warp::get())
        .and(warp::query::<utils::utils_models::VisitDateQuery>())
        .and(with_db(db.clone()))
        .and_then(handlers::log_handlers::daily_entry::daily_entry_handler);

    let save_daily_entry_route = warp::path!("projects" / String / "daily-entry")
        .and(warp::post())
        .and(with_rate_limit(save_rate_limit.clone()))
        .and(warp::body::json())
        .and(with_db(db.clone()))
        .and_then(handlers::log_handlers::daily_entry::save_daily_entry_handler);

    let equipment_counts_route = warp::path!("projects" / String / "equipment-counts")
        .and(warp::get())
        .and(warp::query::<utils::utils_models::VisitDateQuery>())
        .and(with_db(db.clone()))
        .and_then(handlers::log_handlers::equipment::previous_equipment_counts_handler);

    let logs_route = warp::path!("projects" / String / "logs")
        .and(warp::get())
        .and(with_db(db.clone()))
        .and_then(handlers::log_handlers::logs::project_logs_handler);

    let routes = root
        .or(api_doc)
        .or(swagger_ui)
        .or(rooms_route)
        .or(daily_entry_route)
        .or(save_daily_entry_route)
        .or(equipment_counts_route)
        .or(logs_route)
        .recover(errors::handle_rejection);

    warp::serve(routes).run(([127, 0, 0, 1], 3030)).await;

    Ok(())
}

fn with_db(
    db: mongodb::Database,
) -> impl Filter<Extract = (mongodb::Database,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || db.clone())
}
