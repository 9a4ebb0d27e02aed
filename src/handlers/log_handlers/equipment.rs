use crate::errors::{AppError, BsonRejection, ErrorType, MongoRejection};
use crate::models::DailyLog;
use crate::utils::responder::respond;
use crate::utils::utils_functions::parse_visit_date;
use crate::utils::utils_models::{CustomMessage, PreviousEquipmentCount, VisitDateQuery};
use bson::oid::ObjectId;
use mongodb::bson::doc;
use mongodb::options::FindOneOptions;
use mongodb::{Collection, Database};
use warp::http::StatusCode;

#[utoipa::path(
        get,
        path = "projects/{projectId}/equipment-counts",
        params(VisitDateQuery),
        responses(
            (status = 200, description = "Counts from the nearest prior visit", body = Vec<PreviousEquipmentCount>),
            (status = 400, description = "Date parse error", body = CustomMessage),
            (status = 500, description = "Internal Server Error", body = String),
        )
    )
]
pub async fn previous_equipment_counts_handler(
    project_id: String,
    opts: VisitDateQuery,
    db: Database,
) -> Result<impl warp::Reply, warp::Rejection> {
    let project_oid = ObjectId::parse_str(&project_id)
        .map_err(|e| warp::reject::custom(BsonRejection(e)))?;

    let date = match parse_visit_date(&opts.date) {
        Ok(date) => date,
        Err(err) => {
            return Err(warp::reject::custom(AppError::new(
                &err.to_string(),
                ErrorType::BadRequest,
            )));
        }
    };

    let log_coll: Collection<DailyLog> = db.collection("DailyLog");
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

    // No prior visit means nothing to carry forward, not an error.
    let mut counts: Vec<PreviousEquipmentCount> = Vec::new();
    if let Some(prior_log) = prior {
        for entry in &prior_log.room_entries {
            for count in &entry.equipment_counts {
                counts.push(PreviousEquipmentCount {
                    equipment_id: count.equipment_id.to_hex(),
                    count: count.count,
                });
            }
        }
    }

    respond(Ok(counts), StatusCode::OK)
}
