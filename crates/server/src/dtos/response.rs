use serde::Serialize;

/// 统一响应信封 `{ success, message?, data? }`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// 只返回数据，不带提示消息
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_omits_missing_message() {
        let value = serde_json::to_value(ApiResponse::data(json!({ "a": 1 }))).unwrap();
        assert_eq!(value, json!({ "success": true, "data": { "a": 1 } }));

        let value = serde_json::to_value(ApiResponse::success("ok", 1)).unwrap();
        assert_eq!(value, json!({ "success": true, "message": "ok", "data": 1 }));
    }
}
