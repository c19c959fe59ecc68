pub mod errors;
pub mod db;
pub mod normalize;
pub mod user;
pub mod user_credentials;
pub mod category;
pub mod provider;
pub mod provider_category;
pub mod review;
pub mod faq;
pub mod contact_form;
pub mod support_ticket;
pub mod newsletter_subscription;
pub mod favorite;
pub mod featured_provider;
