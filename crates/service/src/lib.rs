//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod runtime;
pub mod pagination;
#[cfg(test)]
pub mod test_support;
pub mod category_service;
pub mod provider_service;
pub mod review_service;
pub mod favorites_service;
pub mod ticket_service;
pub mod contact_service;
pub mod newsletter_service;
pub mod featured_service;
pub mod faq;
