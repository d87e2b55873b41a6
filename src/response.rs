use serde::Serialize;
use utoipa::ToSchema;

/// Listing metadata: number of rows returned.
#[derive(Debug, Serialize, ToSchema, Clone, Default)]
pub struct Meta {
    pub total: Option<i64>,
}

impl Meta {
    pub fn count(total: usize) -> Self {
        Self {
            total: Some(i64::try_from(total).unwrap_or(i64::MAX)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Envelope shared by every response body, errors included.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_message_data_and_meta() {
        let body = ApiResponse::success("Menus", vec!["Es Jeruk"], Some(Meta::count(1)));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Menus",
                "data": ["Es Jeruk"],
                "meta": { "total": 1 }
            })
        );
    }
}
