use crate::errors::{BsonRejection, MongoRejection};
use crate::models::DailyLog;
use crate::utils::responder::respond;
use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use warp::http::StatusCode;

#[utoipa::path(
        get,
        path = "projects/{projectId}/logs",
        responses(
            (status = 200, description = "Visit dates with a saved log, ascending", body = Vec<String>),
            (status = 500, description = "Internal Server Error", body = String),
        )
    )
]
pub async fn project_logs_handler(
    project_id: String,
    db: Database,
) -> Result<impl warp::Reply, warp::Rejection> {
    let project_oid = ObjectId::parse_str(&project_id)
        .map_err(|e| warp::reject::custom(BsonRejection(e)))?;

    let log_coll: Collection<DailyLog> = db.collection("DailyLog");
    let dates = log_coll
        .find(
            doc! { "projectId": project_oid },
            FindOptions::builder().sort(doc! { "date": 1 }).build(),
        )
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?
        .try_collect::<Vec<_>>()
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?
        .into_iter()
        .map(|log| log.date.to_string())
        .collect::<Vec<_>>();

    respond(Ok(dates), StatusCode::OK)
}
