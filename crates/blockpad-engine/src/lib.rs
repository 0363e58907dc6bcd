pub mod editing;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{
    commands::*, cursor::*, document::*, error::*, factory::*, history::*, keymap::*, node::*,
    patch::*, snapshot::*, state::*,
};
