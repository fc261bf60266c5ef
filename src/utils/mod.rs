pub mod errors;
pub mod html;

pub use errors::RenderError;
pub use html::{escape_html, escape_script_json};
