use crate::errors::{BsonRejection, MongoRejection};
use crate::models::{Chamber, Room};
use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde_json::json;

/// Setup data the entry form renders against: every room with its reference
/// points and equipment, plus the project's containment chambers.
#[utoipa::path(
        get,
        path = "projects/{projectId}/rooms",
        responses(
            (status = 200, description = "Rooms and chambers for the project", body = String),
            (status = 400, description = "Bad project id", body = String),
            (status = 500, description = "Internal Server Error", body = String),
        )
    )
]
pub async fn project_rooms_handler(
    project_id: String,
    db: Database,
) -> Result<impl warp::Reply, warp::Rejection> {
    let project_oid = ObjectId::parse_str(&project_id)
        .map_err(|e| warp::reject::custom(BsonRejection(e)))?;

    let room_coll: Collection<Room> = db.collection("Room");
    let chamber_coll: Collection<Chamber> = db.collection("Chamber");

    let rooms = room_coll
        .find(doc! { "projectId": project_oid }, None)
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?
        .try_collect::<Vec<_>>()
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?;

    let chambers = chamber_coll
        .find(doc! { "projectId": project_oid }, None)
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?
        .try_collect::<Vec<_>>()
        .await
        .map_err(|e| warp::reject::custom(MongoRejection(e)))?;

    Ok(warp::reply::json(&json!({
        "rooms": rooms,
        "chambers": chambers,
    })))
}
