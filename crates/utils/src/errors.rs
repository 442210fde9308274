use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

/// 单个字段的校验错误，格式与前端约定保持一致
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
    pub path: String,
    pub location: String,
}

impl FieldError {
    pub fn body(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: "field".to_string(),
            msg: msg.into(),
            path: path.into(),
            location: "body".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Validation { message: String, errors: Vec<FieldError> },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("{0}")]
    RequestTimeout(String),
    #[error("{0}")]
    InternalServerErrorWithContext(String),
    #[error(transparent)]
    MongoError(#[from] mongodb::error::Error),
    #[error(transparent)]
    ObjectIdError(#[from] mongodb::bson::oid::Error),
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::InternalServerErrorWithContext(_)
            | AppError::MongoError(_)
            | AppError::ObjectIdError(_)
            | AppError::AnyhowError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对外暴露的消息；服务端内部错误只记录日志，不回传细节
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::from_validation_errors(errors, &[])
    }
}

impl AppError {
    /// 按 DTO 声明的字段顺序展开校验错误，`message` 取第一个字段的第一条错误
    ///
    /// `field_order` 使用驼峰字段名；未列出的字段排在最后并按名称排序。
    /// 同一字段内的多条错误保持 validator 给出的顺序。
    pub fn from_validation_errors(errors: ValidationErrors, field_order: &[&str]) -> Self {
        let mut fields: Vec<(String, Vec<FieldError>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let path = to_camel_case(field);
                let items = errs
                    .iter()
                    .map(|e| {
                        let msg = e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for {}", path));
                        FieldError::body(path.clone(), msg)
                    })
                    .collect();
                (path, items)
            })
            .collect();

        // field_errors() 是 HashMap，顺序需要重新确定
        fields.sort_by(|(a, _), (b, _)| {
            let rank = |name: &str| field_order.iter().position(|f| *f == name).unwrap_or(usize::MAX);
            rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
        });

        let field_errors: Vec<FieldError> = fields.into_iter().flat_map(|(_, items)| items).collect();

        let message = field_errors
            .first()
            .map(|e| e.msg.clone())
            .unwrap_or_else(|| "Validation failed".to_string());

        AppError::Validation {
            message,
            errors: field_errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {} {}", status.as_u16(), self);
        }

        let body = match &self {
            AppError::Validation { message, errors } => json!({
                "success": false,
                "message": message,
                "errors": errors,
            }),
            _ => json!({
                "success": false,
                "message": self.public_message(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// `wallet_address` -> `walletAddress`，已是驼峰的名称保持不变
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
