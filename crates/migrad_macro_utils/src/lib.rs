extern crate proc_macro;

mod manifest;

pub use manifest::MigradManifest;
