//! Surveyor - build and validate EDR survey specifications
//!
//! This crate turns backend-agnostic survey options into a validated
//! survey specification for one EDR backend, and checks that the supplied
//! credentials and product arguments fit that backend.

pub mod core;
pub mod ops;
pub mod util;

pub use self::core::{
    backend::BackendId, credentials::CredentialSpec, product_args::ProductArgs,
    survey::SurveyOptions, survey::SurveySpecification,
};

pub use ops::{build_survey, check_credentials, check_product_args, SurveyError, ValidationResult};
pub use util::context::GlobalContext;
