mod client;
pub mod util;

pub use client::Gemini;
