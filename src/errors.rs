use std::convert::Infallible;

use bson::oid::Error as BsonError;
use mongodb::error::Error as MongoError;
use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Rejection, Reply};

use crate::utils::utils_models::CustomMessage;

#[derive(Debug)]
pub enum ErrorType {
    NotFound,
    BadRequest,
    Internal,
}

#[derive(Debug)]
pub struct AppError {
    pub err_type: ErrorType,
    pub message: String,
}

impl AppError {
    pub fn new(message: &str, err_type: ErrorType) -> AppError {
        AppError {
            err_type,
            message: message.to_string(),
        }
    }

    pub fn to_http_status(&self) -> StatusCode {
        match self.err_type {
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct MongoRejection(pub MongoError);

#[derive(Debug)]
pub struct BsonRejection(pub BsonError);

#[derive(Debug)]
pub struct NoRecordFound;

impl Reject for AppError {}
impl Reject for MongoRejection {}
impl Reject for BsonRejection {}
impl Reject for NoRecordFound {}

/// Turn rejections into the `CustomMessage` JSON shape every route speaks.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "route not found".to_string())
    } else if let Some(app_err) = err.find::<AppError>() {
        (app_err.to_http_status(), app_err.message.clone())
    } else if let Some(MongoRejection(mongo_err)) = err.find::<MongoRejection>() {
        log::error!("database error: {}", mongo_err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "database error".to_string(),
        )
    } else if let Some(BsonRejection(bson_err)) = err.find::<BsonRejection>() {
        (
            StatusCode::BAD_REQUEST,
            format!("invalid object id: {}", bson_err),
        )
    } else if err.find::<NoRecordFound>().is_some() {
        (StatusCode::NOT_FOUND, "no record found".to_string())
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, body_err.to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid query string".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else {
        log::error!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };

    let body = warp::reply::json(&CustomMessage {
        message,
        code: status.as_u16(),
    });

    Ok(warp::reply::with_status(body, status))
}
