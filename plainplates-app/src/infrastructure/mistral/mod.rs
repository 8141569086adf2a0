mod client;
mod prompt;
mod types;

pub use client::MistralClient;
