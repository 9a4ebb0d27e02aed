use crate::entry::DayEntryForm;
use crate::errors::{BsonRejection, MongoRejection};
use crate::models::{DailyLog, Room};
use crate::utils::utils_functions::parse_visit_date;
use crate::utils::utils_models::{CustomMessage, VisitDateQuery};
use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneOptions, ReplaceOptions};
use mongodb::{Collection, Database};
use utoipa::ToSchema;
use warp::http::StatusCode;
use warp_rate_limit::RateLimitInfo;

#[allow(unused)]
#[derive(ToSchema)]
struct DailyEntryFormResponse {
    date: String,
    notes: Option<String>,
    /// Keyed by `location|chamberId|equipmentId`
    atmospherics: String,
    readings: String,
    #[schema(rename = "equipmentCounts")]
    equipment_counts: String,
}

#[utoipa::path(
        get,
        path = "projects/{projectId}/daily-entry",
        params(VisitDateQuery),
        responses(
            (status = 200, description = "Seeded entry form for the date", body = DailyEntryFormResponse),
            (status = 400, description = "Date parse error", body = CustomMessage),
            (status = 500, description = "Internal Server Error", body = String),
        )
    )
]
pub async fn daily_entry_handler(
    project_id: String,
    opts: VisitDateQuery,
    db: Database,
) -> Result<impl warp::Reply, warp::Rejection> {
    let project_oid = ObjectId::parse_str(&project_id)
        .map_err(|e| warp::reject::custom(BsonRejection(e)))?;

    let date = match parse_visit_date(&opts.date) {
        Ok(date) => date,
        Err(err) => {
            let response = CustomMessage {
                message: err.to_string(),
                code: StatusCode::BAD_REQUEST.as_u16(),
            };

            return Ok(warp::reply::json(&response));
        }
    };

    let log_coll: Collection<DailyLog> = db.collection("DailyLog");

    // One aggregate fetch: notes, atmospherics, readings and counts all come
    // from the saved log for the date.
    let saved = log_coll
        .find_one(
            doc! {
                "projectId": project_oid,
                "date": date.to_string(),
            },
            None,
        )
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?;

    let form = match saved {
        Some(log) => DayEntryForm::from_saved(&log),
        None => {
            // Brand-new visit: seed equipment counts from the nearest prior
            // one so unchanged equipment is not re-entered.
            let prior = log_coll
                .find_one(
                    doc! {
                        "projectId": project_oid,
                        "date": doc! { "$lt": date.to_string() },
                    },
                    FindOneOptions::builder().sort(doc! { "date": -1 }).build(),
                )
                .await
                .map_err(|e| warp::reject::custom(MongoRejection(e)))?;

            match prior {
                Some(prior_log) => DayEntryForm::carry_forward(date, &prior_log),
                None => DayEntryForm::new(date),
            }
        }
    };

    Ok(warp::reply::json(&form))
}

#[utoipa::path(
        post,
        path = "projects/{projectId}/daily-entry",
        request_body = DailyEntryFormResponse,
        responses(
            (status = 200, description = "Daily log saved", body = CustomMessage),
            (status = 400, description = "Nothing entered or bad id", body = CustomMessage),
            (status = 500, description = "Internal Server Error", body = String),
        )
    )
]
pub async fn save_daily_entry_handler(
    project_id: String,
    _rate_limit_info: RateLimitInfo,
    form: DayEntryForm,
    db: Database,
) -> Result<impl warp::Reply, warp::Rejection> {
    let project_oid = ObjectId::parse_str(&project_id)
        .map_err(|e| warp::reject::custom(BsonRejection(e)))?;

    // Save stays disabled client-side with nothing entered; hold the same
    // line here instead of writing an empty log.
    if !form.has_values() {
        let response = CustomMessage {
            message: "no values entered for this date".to_string(),
            code: StatusCode::BAD_REQUEST.as_u16(),
        };
        return Ok(warp::reply::with_status(
            warp::reply::json(&response),
            StatusCode::BAD_REQUEST,
        ));
    }

    let room_coll: Collection<Room> = db.collection("Room");
    let rooms = room_coll
        .find(doc! { "projectId": project_oid }, None)
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?
        .try_collect::<Vec<_>>()
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?;

    let log = form
        .flatten(project_oid, &rooms)
        .map_err(|e| warp::reject::custom(BsonRejection(e)))?;

    // Whole-aggregate replace for the date, last write wins.
    let log_coll: Collection<DailyLog> = db.collection("DailyLog");
    log_coll
        .replace_one(
            doc! {
                "projectId": project_oid,
                "date": log.date.to_string(),
            },
            &log,
            ReplaceOptions::builder().upsert(true).build(),
        )
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?;

    log::info!(
        "saved daily log for project {} on {} ({} rooms, {} atmospheric readings)",
        project_id,
        log.date,
        log.room_entries.len(),
        log.atmospheric_readings.len()
    );

    let response = CustomMessage {
        message: "daily log saved".to_string(),
        code: StatusCode::OK.as_u16(),
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::OK,
    ))
}
