use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use utils::AppError;
use validator::Validate;

/// 请求体字段的声明顺序（驼峰名），决定校验错误的排列顺序
pub trait FieldOrder {
    const FIELD_ORDER: &'static [&'static str];
}

/// 校验 DTO，错误按 `FieldOrder` 排列
pub fn validate_ordered<T: Validate + FieldOrder>(value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|errors| AppError::from_validation_errors(errors, T::FIELD_ORDER))
}

/// 解析 JSON 请求体并执行 `validator` 校验
///
/// 解析失败返回 400 `{success:false, message}`，
/// 校验失败返回带 `errors` 字段列表的 400。
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationExtractor<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidationExtractor<T>
where
    T: DeserializeOwned + Validate + FieldOrder,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        validate_ordered(&value)?;

        Ok(ValidationExtractor(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Member {
        #[validate(length(min = 3, message = "name too short"))]
        name: String,
        #[validate(email(message = "bad email"))]
        address: String,
    }

    impl FieldOrder for Member {
        const FIELD_ORDER: &'static [&'static str] = &["name", "address"];
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidationExtractor(member) =
            ValidationExtractor::<Member>::from_request(json_request(r#"{"name":"alice","address":"a@b.io"}"#), &())
                .await
                .unwrap();
        assert_eq!(member.name, "alice");
    }

    #[tokio::test]
    async fn test_validation_failure() {
        let error = ValidationExtractor::<Member>::from_request(json_request(r#"{"name":"al","address":"nope"}"#), &())
            .await
            .unwrap_err();

        match error {
            AppError::Validation { message, errors } => {
                assert_eq!(message, "name too short");
                assert_eq!(errors[0].path, "name");
                assert_eq!(errors[1].path, "address");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let error = ValidationExtractor::<Member>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::BadRequest(_)));
    }
}
