pub mod sepay_webhook_route;
