//! Core data structures for Surveyor.
//!
//! This module contains the foundational types used throughout Surveyor:
//! - Backend identifiers and the static capability registry
//! - Credential and product-argument specifications
//! - Survey options and the resolved survey specification

pub mod backend;
pub mod credentials;
pub mod product_args;
pub mod survey;

pub use backend::{BackendDescriptor, BackendId, RegistryError, RuleSupport};
pub use credentials::{build_credentials, CredentialError, CredentialOptions, CredentialSpec};
pub use product_args::{build_product_args, ProductArgs, ProductOptions};
pub use survey::{IocType, OutputFormat, SurveyOptions, SurveySpecification};
