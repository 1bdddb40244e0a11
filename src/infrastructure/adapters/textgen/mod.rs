//! Text Generation Adapters

mod fake_text_client;
mod http_text_client;

pub use fake_text_client::FakeTextClient;
pub use http_text_client::{HttpTextClient, HttpTextClientConfig};
