use crate::modules::models::response::ErrorResponse;
use axum::{
    async_trait,
    body::HttpBody,
    extract::FromRequest,
    http::StatusCode,
    BoxError, Json,
};
use bytes::Bytes;
use http::Request;
use panel_scoreboard_libs::model::RawSubmission;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;
use validator::Validate;

/// Form body posted by the game master device.
#[derive(Debug, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    #[validate(length(max = 64))]
    pub name: String,
    pub team: i32,
    pub difficulty: i32,
    #[validate(range(min = 0))]
    pub red_point: i32,
    #[validate(range(min = 0))]
    pub blue_point: i32,
    #[validate(range(min = 0))]
    pub green_point: i32,
    pub hit_point: i32,
    #[validate(range(min = 0))]
    pub remaining_time: i32,
}

/// Name as it appears on the boards. The stored raw submission keeps the name as received.
pub fn normalize_name(name: &str) -> String {
    name.trim().nfc().collect()
}

impl From<SubmissionForm> for RawSubmission {
    fn from(form: SubmissionForm) -> Self {
        RawSubmission {
            name: form.name,
            team: form.team,
            difficulty: form.difficulty,
            red_point: form.red_point,
            blue_point: form.blue_point,
            green_point: form.green_point,
            hit_point: form.hit_point,
            remaining_time: form.remaining_time,
        }
    }
}

pub struct ValidatedSubmission(pub RawSubmission);

#[async_trait]
impl<S, B> FromRequest<S, B> for ValidatedSubmission
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::error!("Reading body failed: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!(
                    "couldn't read request body: [{}]",
                    rejection
                ))),
            )
        })?;

        let form: SubmissionForm = serde_urlencoded::from_bytes(&body).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!(
                    "invalid format form body: [{}]",
                    rejection
                ))),
            )
        })?;

        form.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Validation error: [{}]", rejection).replace('\n', ", "),
                )),
            )
        })?;

        Ok(ValidatedSubmission(form.into()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::Body;

    const BODY: &str = "team=1&difficulty=2&name=%20alice%20&redPoint=3&bluePoint=4&greenPoint=5&hitPoint=-1&remainingTime=6";

    async fn extract(body: &str) -> Result<RawSubmission, StatusCode> {
        let request = Request::builder()
            .method("POST")
            .uri("/result")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();

        ValidatedSubmission::from_request(request, &())
            .await
            .map(|ValidatedSubmission(raw)| raw)
            .map_err(|(status, _)| status)
    }

    #[test]
    fn test_deserialize() {
        let form: SubmissionForm = serde_urlencoded::from_str(BODY).unwrap();
        let expected = SubmissionForm {
            name: String::from(" alice "),
            team: 1,
            difficulty: 2,
            red_point: 3,
            blue_point: 4,
            green_point: 5,
            hit_point: -1,
            remaining_time: 6,
        };

        assert_eq!(form, expected);
    }

    #[test]
    fn test_normalize_name() {
        let form: SubmissionForm =
            serde_urlencoded::from_str("team=1&difficulty=1&name=%20Cafe%CC%81%20&redPoint=0&bluePoint=0&greenPoint=0&hitPoint=0&remainingTime=0")
                .unwrap();
        assert_eq!(form.name, " Cafe\u{301} ");
        assert_eq!(normalize_name(&form.name), "Caf\u{e9}");
        assert_eq!(normalize_name(""), "");
    }

    #[tokio::test]
    async fn extract_valid_submission() {
        let raw = extract(BODY).await.unwrap();
        assert_eq!(raw.name, " alice ");
        assert_eq!(raw.team, 1);
        assert_eq!(raw.hit_point, -1);
        assert_eq!(raw.remaining_time, 6);
    }

    #[tokio::test]
    async fn reject_missing_field() {
        let status = extract("team=1&difficulty=2&name=alice").await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reject_malformed_number() {
        let status = extract("team=red&difficulty=2&name=alice&redPoint=3&bluePoint=4&greenPoint=5&hitPoint=1&remainingTime=6")
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reject_negative_points() {
        let status = extract("team=1&difficulty=2&name=alice&redPoint=-3&bluePoint=4&greenPoint=5&hitPoint=1&remainingTime=6")
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn accept_empty_name() {
        let raw = extract("team=1&difficulty=2&name=&redPoint=3&bluePoint=4&greenPoint=5&hitPoint=1&remainingTime=6")
            .await
            .unwrap();
        assert_eq!(raw.name, "");
    }

    #[tokio::test]
    async fn reject_long_name() {
        let body = format!(
            "team=1&difficulty=2&name={}&redPoint=3&bluePoint=4&greenPoint=5&hitPoint=1&remainingTime=6",
            "a".repeat(65)
        );
        let status = extract(&body).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
