//! Request validation for bookmark writes.
//!
//! Turns the loosely-typed request bodies into `NewBookmark` (all required
//! fields present) or `BookmarkPatch` (any non-empty subset). Nothing here
//! touches the database.

use crate::models::bookmark::{
    BookmarkPatch, CreateBookmarkRequest, NewBookmark, UpdateBookmarkRequest,
};
use serde_json::Value;
use thiserror::Error;

pub const RATING_MIN: i64 = 0;
pub const RATING_MAX: i64 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is required")]
    MissingField(&'static str),
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),
    #[error("rating must be a number between 0 and 5")]
    InvalidRating,
    #[error("Request body must contain either title, description, url, or rating")]
    EmptyUpdate,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a create request.
///
/// Required fields are checked in order `title`, `url`, `rating`, so the
/// error always names the first one missing. The rating is checked last.
pub fn validate_create(req: CreateBookmarkRequest) -> ValidationResult<NewBookmark> {
    let title = non_blank(req.title).ok_or(ValidationError::MissingField("title"))?;
    let url = non_blank(req.url).ok_or(ValidationError::MissingField("url"))?;
    let rating = match req.rating {
        Some(value) if !is_blank_value(&value) => value,
        _ => return Err(ValidationError::MissingField("rating")),
    };
    let rating = parse_rating(&rating)?;

    Ok(NewBookmark {
        title,
        url,
        description: req.description,
        rating,
    })
}

/// Validate a partial update request.
///
/// Fields left out (or sent as `null`) are untouched. Supplied titles and
/// urls must be non-blank and a supplied rating must be in range.
pub fn validate_update(req: UpdateBookmarkRequest) -> ValidationResult<BookmarkPatch> {
    let rating = req.rating.filter(|value| !value.is_null());

    if req.title.is_none() && req.url.is_none() && req.description.is_none() && rating.is_none()
    {
        return Err(ValidationError::EmptyUpdate);
    }

    let title = match req.title {
        Some(title) => Some(non_blank(Some(title)).ok_or(ValidationError::EmptyField("title"))?),
        None => None,
    };
    let url = match req.url {
        Some(url) => Some(non_blank(Some(url)).ok_or(ValidationError::EmptyField("url"))?),
        None => None,
    };
    let rating = rating.as_ref().map(parse_rating).transpose()?;

    Ok(BookmarkPatch {
        title,
        url,
        description: req.description,
        rating,
    })
}

/// Coerce a JSON rating into an integer within `[RATING_MIN, RATING_MAX]`.
///
/// Accepts integral numbers and numeric strings (`"4"`). Fractions, other
/// JSON types and out-of-range values are rejected.
pub fn parse_rating(value: &Value) -> ValidationResult<i64> {
    let rating = match value {
        Value::Number(n) => match n.as_i64() {
            Some(v) => v,
            None => match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
                _ => return Err(ValidationError::InvalidRating),
            },
        },
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidRating)?,
        _ => return Err(ValidationError::InvalidRating),
    };

    if (RATING_MIN..=RATING_MAX).contains(&rating) {
        Ok(rating)
    } else {
        Err(ValidationError::InvalidRating)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn is_blank_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_req(body: Value) -> CreateBookmarkRequest {
        serde_json::from_value(body).expect("valid create body")
    }

    fn update_req(body: Value) -> UpdateBookmarkRequest {
        serde_json::from_value(body).expect("valid update body")
    }

    #[test]
    fn create_accepts_complete_input() {
        let new = validate_create(create_req(json!({
            "title": "test new bookmark",
            "url": "http://google.com",
            "description": "test description",
            "rating": 4
        })))
        .unwrap();

        assert_eq!(
            new,
            NewBookmark {
                title: "test new bookmark".into(),
                url: "http://google.com".into(),
                description: Some("test description".into()),
                rating: 4,
            }
        );
    }

    #[test]
    fn create_description_is_optional() {
        let new = validate_create(create_req(json!({
            "title": "Rust",
            "url": "https://rust-lang.org",
            "rating": 5
        })))
        .unwrap();
        assert_eq!(new.description, None);
    }

    #[test]
    fn create_reports_first_missing_field_in_order() {
        assert_eq!(
            validate_create(create_req(json!({}))),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            validate_create(create_req(json!({ "url": "http://a.b", "rating": 3 }))),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            validate_create(create_req(json!({ "title": "t", "rating": 3 }))),
            Err(ValidationError::MissingField("url"))
        );
        assert_eq!(
            validate_create(create_req(json!({ "title": "t", "url": "http://a.b" }))),
            Err(ValidationError::MissingField("rating"))
        );
    }

    #[test]
    fn create_treats_blank_and_null_as_missing() {
        assert_eq!(
            validate_create(create_req(json!({ "title": "  ", "url": "u", "rating": 1 }))),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            validate_create(create_req(json!({ "title": "t", "url": null, "rating": 1 }))),
            Err(ValidationError::MissingField("url"))
        );
        assert_eq!(
            validate_create(create_req(json!({ "title": "t", "url": "u", "rating": "" }))),
            Err(ValidationError::MissingField("rating"))
        );
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        for ok in [0, 5] {
            assert_eq!(parse_rating(&json!(ok)), Ok(ok));
        }
        for bad in [-1, 6, 100] {
            assert_eq!(parse_rating(&json!(bad)), Err(ValidationError::InvalidRating));
        }
    }

    #[test]
    fn zero_rating_is_not_treated_as_missing() {
        let new = validate_create(create_req(json!({ "title": "t", "url": "u", "rating": 0 })))
            .unwrap();
        assert_eq!(new.rating, 0);
    }

    #[test]
    fn rating_coerces_numeric_strings_and_rejects_the_rest() {
        assert_eq!(parse_rating(&json!("4")), Ok(4));
        assert_eq!(parse_rating(&json!(" 2 ")), Ok(2));
        assert_eq!(parse_rating(&json!(3.0)), Ok(3));
        assert_eq!(parse_rating(&json!(3.5)), Err(ValidationError::InvalidRating));
        assert_eq!(parse_rating(&json!("four")), Err(ValidationError::InvalidRating));
        assert_eq!(parse_rating(&json!(true)), Err(ValidationError::InvalidRating));
        assert_eq!(parse_rating(&json!([1])), Err(ValidationError::InvalidRating));
    }

    #[test]
    fn error_messages_match_the_api_contract() {
        assert_eq!(
            ValidationError::MissingField("url").to_string(),
            "'url' is required"
        );
        assert_eq!(
            ValidationError::InvalidRating.to_string(),
            "rating must be a number between 0 and 5"
        );
        assert_eq!(
            ValidationError::EmptyUpdate.to_string(),
            "Request body must contain either title, description, url, or rating"
        );
    }

    #[test]
    fn update_requires_at_least_one_known_field() {
        assert_eq!(
            validate_update(update_req(json!({ "incorrectField": "value" }))),
            Err(ValidationError::EmptyUpdate)
        );
        assert_eq!(
            validate_update(update_req(json!({ "rating": null }))),
            Err(ValidationError::EmptyUpdate)
        );
    }

    #[test]
    fn update_keeps_only_supplied_fields() {
        let patch = validate_update(update_req(json!({
            "title": "just the title",
            "fieldToIgnore": "should not be in GET response"
        })))
        .unwrap();
        assert_eq!(
            patch,
            BookmarkPatch {
                title: Some("just the title".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn update_enforces_rating_range_and_non_empty_text() {
        assert_eq!(
            validate_update(update_req(json!({ "rating": 6 }))),
            Err(ValidationError::InvalidRating)
        );
        assert_eq!(
            validate_update(update_req(json!({ "url": "" }))),
            Err(ValidationError::EmptyField("url"))
        );
        assert_eq!(
            validate_update(update_req(json!({ "rating": "5" }))).unwrap().rating,
            Some(5)
        );
    }
}
