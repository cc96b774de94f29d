pub mod gitlab_webhook;
pub mod health;
pub mod payments;
