use proc_macro::TokenStream;
use std::{env, path::PathBuf};
use toml_edit::{DocumentMut, Item};

/// The calling crate's `Cargo.toml`, used to spell paths to migrad crates
/// from generated code whether the caller depends on the facade, the
/// internal crate or the member crate itself.
pub struct MigradManifest {
    manifest: Option<DocumentMut>,
}

impl Default for MigradManifest {
    fn default() -> Self {
        let manifest = env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .map(|path| path.join("Cargo.toml"))
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|text| text.parse::<DocumentMut>().ok());

        Self { manifest }
    }
}

const MIGRAD: &str = "migrad";
const MIGRAD_INTERNAL: &str = "migrad_internal";

impl MigradManifest {
    pub fn maybe_get_path(&self, name: &str) -> Option<syn::Path> {
        // Only the library target of a member may call itself `crate`; its
        // tests and benches see it as an external crate.
        if env::var("CARGO_CRATE_NAME").is_ok_and(|krate| krate == name) {
            return Self::try_parse_str("crate");
        }

        fn dep_package(dep: &Item) -> Option<&str> {
            if dep.as_str().is_some() {
                None
            } else {
                dep.get("package").and_then(|name| name.as_str())
            }
        }

        let find_in_deps = |deps: &Item| -> Option<syn::Path> {
            let package = if let Some(dep) = deps.get(name) {
                return Self::try_parse_str(dep_package(dep).unwrap_or(name));
            } else if let Some(dep) = deps.get(MIGRAD) {
                dep_package(dep).unwrap_or(MIGRAD)
            } else if let Some(dep) = deps.get(MIGRAD_INTERNAL) {
                dep_package(dep).unwrap_or(MIGRAD_INTERNAL)
            } else {
                return None;
            };

            let mut path = Self::try_parse_str::<syn::Path>(&package.replace('-', "_"))?;
            if let Some(module) = name.strip_prefix("migrad_") {
                path.segments.push(Self::try_parse_str(module)?);
            }
            Some(path)
        };

        let manifest = self.manifest.as_ref()?;
        let deps = manifest.get("dependencies");
        let deps_dev = manifest.get("dev-dependencies");

        deps.and_then(find_in_deps).or_else(|| deps_dev.and_then(find_in_deps))
    }

    /// Path to `name` as seen from the calling crate, falling back to the bare
    /// crate name.
    pub fn get_path(&self, name: &str) -> syn::Path {
        let sanitized_name = name.replace('-', "_");

        self.maybe_get_path(&sanitized_name)
            .unwrap_or_else(|| syn::Path::from(syn::Ident::new(&sanitized_name, proc_macro2::Span::call_site())))
    }

    pub fn try_parse_str<T: syn::parse::Parse>(path: &str) -> Option<T> {
        syn::parse(path.parse::<TokenStream>().ok()?).ok()
    }
}
