mod error;
mod escape_args;
mod hoist;
mod ident;
mod scope;
mod types;

pub use error::ScopeSheetError;
pub use hoist::{Binding, StyleSource, hoist};
pub use ident::IdentAllocator;
pub use lightningcss::targets::Browsers;
pub use scope::{reprint_stylesheet, scope_stylesheet};
pub use types::{CompiledStyle, MarkerSyntax, OwnerId, ScopeOptions};

use ident::file_seed;

struct OwnerRecord {
    scope_token: String,
}

// Per-compilation-unit driver. One instance per source file: the allocator
// is seeded from the file identity, every style-owner in the file gets an
// arena slot, and all style definitions of one owner share its scope token.
pub struct ScopeCompiler {
    file_id: String,
    options: ScopeOptions,
    alloc: IdentAllocator,
    owners: Vec<OwnerRecord>,
}

impl ScopeCompiler {
    pub fn new(file_id: impl Into<String>, options: ScopeOptions) -> Self {
        let file_id = file_id.into();
        let alloc = IdentAllocator::seeded(file_seed(&file_id));
        Self {
            file_id,
            options,
            alloc,
            owners: Vec::new(),
        }
    }

    // Mints the owner's scope token. The verbose form keeps the declared
    // name readable for debugging; uniqueness still comes from the encoded
    // suffix alone.
    pub fn register_owner(&mut self, descriptive_name: Option<&str>) -> OwnerId {
        let base = self.alloc.next();
        let id = if self.options.verbose {
            format!("{}-{}", descriptive_name.unwrap_or("Anonymous"), base)
        } else {
            base
        };
        let scope_token = format!("{}{}", self.options.scope_prefix(), id);
        self.owners.push(OwnerRecord { scope_token });
        OwnerId::new(self.owners.len() - 1)
    }

    pub fn scope_token(&self, owner: OwnerId) -> Option<&str> {
        self.owners
            .get(owner.index())
            .map(|record| record.scope_token.as_str())
    }

    pub fn compile_scoped<R>(
        &mut self,
        owner: OwnerId,
        source: StyleSource<R>,
    ) -> Result<CompiledStyle<R>, ScopeSheetError> {
        let var_prefix = self.options.var_prefix();
        let (text, bindings) = hoist::hoist(&mut self.alloc, &var_prefix, source);
        let scope_token = match self.owners.get(owner.index()) {
            Some(record) => record.scope_token.clone(),
            None => {
                return Err(ScopeSheetError::StructuralInvariant(
                    "style definition references an unregistered owner".to_string(),
                ));
            }
        };
        let css = scope::scope_stylesheet(&text, &scope_token, &self.file_id, &self.options)?;
        Ok(CompiledStyle { css, bindings })
    }

    // Non-scoped variant: dynamic values are still hoisted and the sheet
    // still goes through the parser and printer, but selectors and
    // keyframes keep their names.
    pub fn compile_global<R>(
        &mut self,
        source: StyleSource<R>,
    ) -> Result<CompiledStyle<R>, ScopeSheetError> {
        let var_prefix = self.options.var_prefix();
        let (text, bindings) = hoist::hoist(&mut self.alloc, &var_prefix, source);
        let css = scope::reprint_stylesheet(&text, &self.file_id, &self.options)?;
        Ok(CompiledStyle { css, bindings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minified() -> ScopeOptions {
        ScopeOptions {
            minify: true,
            ..ScopeOptions::default()
        }
    }

    #[test]
    fn scope_tokens_are_prefixed_and_unique_per_owner() {
        let mut compiler = ScopeCompiler::new("src/app.tsx", ScopeOptions::default());
        let first = compiler.register_owner(None);
        let second = compiler.register_owner(None);
        let first = compiler.scope_token(first).unwrap().to_string();
        let second = compiler.scope_token(second).unwrap().to_string();
        assert!(first.starts_with("c-"));
        assert!(second.starts_with("c-"));
        assert_ne!(first, second);
    }

    #[test]
    fn verbose_tokens_carry_the_owner_name() {
        let options = ScopeOptions {
            verbose: true,
            ..ScopeOptions::default()
        };
        let mut compiler = ScopeCompiler::new("src/app.tsx", options);
        let named = compiler.register_owner(Some("Header"));
        let anonymous = compiler.register_owner(None);
        assert!(compiler.scope_token(named).unwrap().starts_with("c-Header-"));
        assert!(
            compiler
                .scope_token(anonymous)
                .unwrap()
                .starts_with("c-Anonymous-")
        );
    }

    #[test]
    fn compile_scoped_scopes_selectors_and_returns_bindings() {
        let mut compiler = ScopeCompiler::new("src/app.tsx", minified());
        let owner = compiler.register_owner(None);
        let source = StyleSource::new(
            vec!["h1{color:".to_string(), "}".to_string()],
            vec!["color()"],
        )
        .unwrap();
        let out = compiler.compile_scoped(owner, source).unwrap();
        let token = compiler.scope_token(owner).unwrap();
        assert!(out.css.contains(&format!("[s\\:{}]", token)));
        assert_eq!(out.bindings.len(), 1);
        assert!(out.bindings[0].name.starts_with("--s-v-"));
        assert!(out.css.contains(&format!("var({})", out.bindings[0].name)));
        assert_eq!(out.bindings[0].expression, "color()");
    }

    #[test]
    fn styles_of_one_owner_share_a_scope_token() {
        let mut compiler = ScopeCompiler::new("src/app.tsx", minified());
        let owner = compiler.register_owner(None);
        let first = compiler
            .compile_scoped(owner, StyleSource::<&str>::literal("h1{color:red}"))
            .unwrap();
        let second = compiler
            .compile_scoped(owner, StyleSource::<&str>::literal("h2{color:blue}"))
            .unwrap();
        let token = compiler.scope_token(owner).unwrap();
        assert!(first.css.contains(&format!("[s\\:{}]", token)));
        assert!(second.css.contains(&format!("[s\\:{}]", token)));
    }

    #[test]
    fn compile_global_leaves_selectors_alone() {
        let mut compiler = ScopeCompiler::new("src/app.tsx", minified());
        let out = compiler
            .compile_global(StyleSource::<&str>::literal("h1 { color: red; }"))
            .unwrap();
        assert_eq!(out.css, "h1{color:red}");
    }

    #[test]
    fn compile_global_still_hoists_dynamic_values() {
        let mut compiler = ScopeCompiler::new("src/app.tsx", minified());
        let source = StyleSource::new(
            vec!["h1{color:".to_string(), "}".to_string()],
            vec!["color()"],
        )
        .unwrap();
        let out = compiler.compile_global(source).unwrap();
        assert_eq!(out.bindings.len(), 1);
        assert!(out.css.contains(&format!("var({})", out.bindings[0].name)));
    }

    #[test]
    fn custom_prefix_reaches_tokens_and_vars() {
        let options = ScopeOptions {
            prefix: Some("app".to_string()),
            minify: true,
            ..ScopeOptions::default()
        };
        let mut compiler = ScopeCompiler::new("src/app.tsx", options);
        let owner = compiler.register_owner(None);
        let token = compiler.scope_token(owner).unwrap().to_string();
        assert!(token.starts_with("app-"));
        let source = StyleSource::new(
            vec!["h1{color:".to_string(), "}".to_string()],
            vec!["color()"],
        )
        .unwrap();
        let out = compiler.compile_scoped(owner, source).unwrap();
        assert!(out.bindings[0].name.starts_with("--s-app-"));
    }

    #[test]
    fn different_files_produce_different_tokens() {
        let mut a = ScopeCompiler::new("src/a.tsx", ScopeOptions::default());
        let mut b = ScopeCompiler::new("src/b.tsx", ScopeOptions::default());
        let owner_a = a.register_owner(None);
        let owner_b = b.register_owner(None);
        assert_ne!(a.scope_token(owner_a), b.scope_token(owner_b));
    }
}
