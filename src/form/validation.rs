use crate::form::inputs::{FormInput, NO_SELECTION};
use crate::models::PredictionRequest;
use thiserror::Error;

/// Reasons a submission is blocked. The display text is the prompt shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid square footage")]
    SquareFootage,
    #[error("Please select number of bedrooms")]
    Bedrooms,
    #[error("Please select number of bathrooms")]
    Bathrooms,
    #[error("Please select a location")]
    Location,
}

/// Positive, finite square footage or `None`
pub fn parse_sqft(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|sqft| sqft.is_finite() && *sqft > 0.0)
}

/// Check the inputs in widget order; the first failing check wins
pub fn validate(form: &FormInput) -> Result<PredictionRequest, ValidationError> {
    let total_sqft = parse_sqft(&form.sqft).ok_or(ValidationError::SquareFootage)?;

    let bhk = form.bhk.value();
    if bhk == NO_SELECTION {
        return Err(ValidationError::Bedrooms);
    }

    let bath = form.bath.value();
    if bath == NO_SELECTION {
        return Err(ValidationError::Bathrooms);
    }

    if form.location.is_empty() {
        return Err(ValidationError::Location);
    }

    Ok(PredictionRequest {
        total_sqft,
        bhk,
        bath,
        location: form.location.clone(),
    })
}
