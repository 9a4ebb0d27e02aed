pub mod log_handlers;
pub mod project_handlers;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
            project_handlers::rooms::project_rooms_handler,
            log_handlers::daily_entry::daily_entry_handler,
            log_handlers::daily_entry::save_daily_entry_handler,
            log_handlers::equipment::previous_equipment_counts_handler,
            log_handlers::logs::project_logs_handler
        )
    )
]
pub struct DrylogApi;
