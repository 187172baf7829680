use serde_json::Value;

use super::{Fields, ValidationError};
use crate::database::models::NewTestimonial;

const MESSAGE: &str = "Invalid testimonial data";

pub fn new_testimonial(body: &Value) -> Result<NewTestimonial, ValidationError> {
    let mut fields = Fields::new(body, MESSAGE)?;

    let client_id = fields.required_string("clientId");
    let request_id = fields.nullable_string("requestId").flatten();
    let content = fields.required_string("content");
    let rating = fields.required_int_in("rating", 1, 5);
    let property_type = fields.nullable_string("propertyType").flatten();
    let is_public = fields.optional_bool("isPublic");

    fields.finish(MESSAGE)?;
    match (client_id, content, rating) {
        (Some(client_id), Some(content), Some(rating)) => Ok(NewTestimonial {
            client_id,
            request_id,
            content,
            // Bounded to 1..=5 above
            rating: rating as i32,
            property_type,
            is_public: is_public.unwrap_or(true),
        }),
        _ => Err(ValidationError::new(MESSAGE, Vec::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn public_by_default() {
        let testimonial = new_testimonial(&json!({
            "clientId": "c1",
            "content": "Sold above asking!",
            "rating": 5
        }))
        .unwrap();
        assert!(testimonial.is_public);
        assert_eq!(testimonial.request_id, None);
        assert_eq!(testimonial.rating, 5);
    }

    #[test]
    fn rating_must_be_between_one_and_five() {
        for rating in [json!(0), json!(6), json!(4.5), json!("five"), json!(null)] {
            let err = new_testimonial(&json!({
                "clientId": "c1",
                "content": "ok",
                "rating": rating
            }))
            .unwrap_err();
            assert_eq!(err.errors[0].path, vec!["rating".to_string()]);
        }
    }
}
