pub mod entry;
pub mod loader;
pub mod tree;

pub use entry::MenuEntry;
pub use loader::{LoadError, discover_csv_files, load_dir, load_file};
pub use tree::{MenuTree, build_tree, load_menu};
