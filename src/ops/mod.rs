//! High-level operations.
//!
//! This module contains the implementation of Surveyor commands.

pub mod build_survey;
pub mod check;

pub use build_survey::{build_survey, resolve_definition_file, SurveyError};
pub use check::{
    check_credentials, check_product_args, format_report, RequiredFields, ValidationResult,
};
