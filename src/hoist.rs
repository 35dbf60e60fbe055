use crate::error::ScopeSheetError;
use crate::ident::IdentAllocator;

// A style definition as extracted by the host: literal text segments
// alternating with opaque expression slots. The expressions are never
// interpreted here, only threaded through to the emitted bindings.
pub struct StyleSource<R> {
    segments: Vec<String>,
    exprs: Vec<R>,
}

impl<R> StyleSource<R> {
    pub fn new(segments: Vec<String>, exprs: Vec<R>) -> Result<Self, ScopeSheetError> {
        if segments.len() != exprs.len() + 1 {
            return Err(ScopeSheetError::StructuralInvariant(format!(
                "style source has {} literal segments for {} expression slots",
                segments.len(),
                exprs.len()
            )));
        }
        Ok(Self { segments, exprs })
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            segments: vec![text.into()],
            exprs: Vec::new(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.exprs.len()
    }
}

pub struct Binding<R> {
    pub name: String,
    pub expression: R,
}

// Replaces every expression slot with a `var(--s-<prefix><id>)` reference
// and returns the bindings in slot order. Slots embedded in selector text
// are a host contract violation and are not detected here; the parser
// rejects the resulting stylesheet instead.
pub fn hoist<R>(
    alloc: &mut IdentAllocator,
    var_prefix: &str,
    source: StyleSource<R>,
) -> (String, Vec<Binding<R>>) {
    let StyleSource { segments, exprs } = source;
    let mut text = String::new();
    let mut bindings = Vec::with_capacity(exprs.len());
    let mut segments = segments.into_iter();
    if let Some(first) = segments.next() {
        text.push_str(&first);
    }
    for expression in exprs {
        let name = format!("--s-{}{}", var_prefix, alloc.next());
        text.push_str("var(");
        text.push_str(&name);
        text.push(')');
        bindings.push(Binding { name, expression });
        if let Some(segment) = segments.next() {
            text.push_str(&segment);
        }
    }
    (text, bindings)
}
