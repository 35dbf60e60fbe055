use crate::hoist::Binding;
use lightningcss::targets::Browsers;

// Namespace shared by the runtime injector: it matches scope attributes by
// presence only, so the serialized name must be bit-exact.
pub const SCOPE_NAMESPACE: &str = "s";

const DEFAULT_SCOPE_PREFIX: &str = "c-";
const DEFAULT_VAR_PREFIX: &str = "v-";

// How the scope marker attribute is rendered: `s:<token>` for renderers
// that understand namespaced attributes, `s-<token>` for the rest.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MarkerSyntax {
    Namespaced,
    Plain,
}

#[derive(Clone, Debug)]
pub struct ScopeOptions {
    pub prefix: Option<String>,
    pub verbose: bool,
    pub targets: Option<Browsers>,
    pub minify: bool,
    pub marker: MarkerSyntax,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            verbose: false,
            targets: None,
            minify: false,
            marker: MarkerSyntax::Namespaced,
        }
    }
}

impl ScopeOptions {
    pub(crate) fn scope_prefix(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}-", prefix),
            None => DEFAULT_SCOPE_PREFIX.to_string(),
        }
    }

    pub(crate) fn var_prefix(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}-", prefix),
            None => DEFAULT_VAR_PREFIX.to_string(),
        }
    }
}

// Index into the per-file owner arena. Owners are registered at discovery
// time and addressed by index from then on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OwnerId(u32);

impl OwnerId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

pub struct CompiledStyle<R> {
    pub css: String,
    pub bindings: Vec<Binding<R>>,
}
