pub mod json_loader;

pub use json_loader::{load_analytics, load_generated_content};
