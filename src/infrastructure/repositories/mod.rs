// Adapters that implement the domain's storage ports

pub mod redirect;
pub mod sheets_webhook_sink;

pub use sheets_webhook_sink::SheetsWebhookSink;
