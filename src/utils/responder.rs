use serde::Serialize;
use warp::http::StatusCode;

use crate::errors::AppError;

pub fn respond<T: Serialize>(
    result: Result<T, AppError>,
    status: StatusCode,
) -> Result<impl warp::Reply, warp::Rejection> {
    match result {
        Ok(response) => Ok(warp::reply::with_status(
            warp::reply::json(&response),
            status,
        )),
        Err(err) => Err(warp::reject::custom(err)),
    }
}
