// Handler modules
pub mod indent;
pub mod inventory;
pub mod tags;

// Re-export all handler functions
pub use indent::{handle_check_indent, handle_fix_indent};
pub use inventory::{
    handle_inventory_docker, handle_inventory_hygiene, handle_inventory_scripts,
    handle_inventory_tools, handle_inventory_vaults,
};
pub use tags::handle_check_tags;
