//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `estatebook_core` linkage without the desktop shell.
//! - Optionally summarize the books stored in a data directory.
//!
//! Usage: `estatebook_cli [DATA_DIR]`

use estatebook_core::{JsonBookStore, Workspace};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("estatebook_core ping={}", estatebook_core::ping());
    println!("estatebook_core version={}", estatebook_core::core_version());

    let Some(data_dir) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = JsonBookStore::new(data_dir);
    match Workspace::load(&store) {
        Ok(workspace) => {
            println!(
                "contacts={} next_contact_id={}",
                workspace.contacts().len(),
                workspace.contacts().next_identifier_value()
            );
            println!(
                "properties={} next_property_id={}",
                workspace.properties().len(),
                workspace.properties().next_identifier_value()
            );
            println!(
                "dangling_references={}",
                workspace.dangling_references().len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to load books from `{}`: {err}", store.data_dir().display());
            ExitCode::FAILURE
        }
    }
}
