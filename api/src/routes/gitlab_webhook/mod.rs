pub mod gate;
pub mod gitlab_webhook_event;
pub mod gitlab_webhook_route;
