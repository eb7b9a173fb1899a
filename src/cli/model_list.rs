//! Model listing for the `models` subcommand.

use crate::core::builtin_providers::find_builtin_provider;
use crate::core::catalog::ModelCatalog;

pub fn list_models(catalog: &ModelCatalog) {
    let listing = render_model_list(catalog, |var| {
        std::env::var(var).is_ok_and(|value| !value.trim().is_empty())
    });
    print!("{listing}");
}

/// Render the catalog grouped by provider. `key_is_set` reports whether an
/// API key environment variable is populated.
pub fn render_model_list(catalog: &ModelCatalog, key_is_set: impl Fn(&str) -> bool) -> String {
    let mut out = String::from("🤖 Available Models\n");
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    for group in catalog.providers() {
        out.push('\n');
        match find_builtin_provider(group.provider) {
            Some(provider) => {
                let key_status = if key_is_set(&provider.api_key_env) {
                    "✅ key set"
                } else {
                    "⚠️  key missing"
                };
                out.push_str(&format!(
                    "{} ({}) [{}: {}]\n",
                    group.provider, provider.display_name, provider.api_key_env, key_status
                ));
            }
            None => out.push_str(&format!("{}\n", group.provider)),
        }
        for name in group.model_names() {
            out.push_str(&format!("  • {name}\n"));
        }
    }

    out.push_str("\nStart with: multichat --provider <provider> --model <model>\n");
    out
}
