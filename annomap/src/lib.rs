// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export the helpers the command handlers are built from
pub use handlers::{
    load_inputs_from_files, load_settings, mask_token, open_store, resolve_format,
    select_reference, write_output,
};
