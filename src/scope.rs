use crate::error::ScopeSheetError;
use crate::escape_args::{self, Component, Selector};
use crate::types::{MarkerSyntax, SCOPE_NAMESPACE, ScopeOptions};
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::properties::animation::AnimationName;
use lightningcss::rules::CssRule;
use lightningcss::rules::keyframes::KeyframesName;
use lightningcss::selector::PseudoClass;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::targets::Targets;
use lightningcss::traits::ToCss;
use lightningcss::values::ident::CustomIdent;
use lightningcss::values::ident::Ident as SelectorIdent;
use lightningcss::values::string::CSSString as SelectorString;
use lightningcss::values::string::CowArcStr;
use parcel_selectors::SelectorList;
use parcel_selectors::parser::Combinator;
use std::collections::HashSet;

type RuleList<'i> = lightningcss::rules::CssRuleList<'i>;

fn cow_str<'a, 'i>(value: &'a CowArcStr<'i>) -> &'a str {
    value
}

fn parser_options<'o, 'i>(filename: &str) -> ParserOptions<'o, 'i> {
    ParserOptions {
        filename: filename.to_string(),
        ..ParserOptions::default()
    }
}

fn printer_options<'a>(options: &ScopeOptions) -> PrinterOptions<'a> {
    PrinterOptions {
        minify: options.minify,
        targets: Targets {
            browsers: options.targets,
            ..Targets::default()
        },
        ..PrinterOptions::default()
    }
}

fn syntax_error(
    error: lightningcss::error::Error<lightningcss::error::ParserError<'_>>,
    filename: &str,
) -> ScopeSheetError {
    let (line, column) = match &error.loc {
        Some(loc) => (loc.line, loc.column),
        None => (0, 0),
    };
    ScopeSheetError::StylesheetSyntax {
        message: error.kind.to_string(),
        filename: filename.to_string(),
        line,
        column,
    }
}

// Applies the scoping rewrite to a full stylesheet: the scope marker is
// injected into every selector outside an escape, locally declared
// keyframes and their references are renamed, and `@global` bodies are
// re-emitted verbatim at the top level.
pub fn scope_stylesheet(
    css: &str,
    scope_token: &str,
    filename: &str,
    options: &ScopeOptions,
) -> Result<String, ScopeSheetError> {
    let mut stylesheet = StyleSheet::parse(css, parser_options(filename))
        .map_err(|error| syntax_error(error, filename))?;

    let mut escaped = String::new();
    detach_global_blocks(&mut stylesheet.rules, &mut escaped)?;

    let mut registry = HashSet::new();
    collect_keyframes(&stylesheet.rules, &mut registry);

    let ctx = RewriteCtx::new(scope_token, options.marker, &registry);
    rewrite_rules(&mut stylesheet.rules, &ctx)?;

    let mut code = stylesheet
        .to_css(printer_options(options))
        .map_err(|error| ScopeSheetError::Print(error.kind.to_string()))?
        .code;

    // Escape bodies can themselves contain further block escapes; each round
    // strips one nesting level, so this terminates.
    let mut pending = escaped;
    while !pending.is_empty() {
        let (printed, nested) = {
            let mut sheet = StyleSheet::parse(&pending, parser_options(filename))
                .map_err(|error| syntax_error(error, filename))?;
            let mut nested = String::new();
            detach_global_blocks(&mut sheet.rules, &mut nested)?;
            let printed = sheet
                .to_css(printer_options(options))
                .map_err(|error| ScopeSheetError::Print(error.kind.to_string()))?
                .code;
            (printed, nested)
        };
        if !code.is_empty() && !code.ends_with('\n') && !printed.is_empty() {
            code.push('\n');
        }
        code.push_str(&printed);
        pending = nested;
    }
    Ok(code)
}

// Parse/serialize round trip with no rewriting, for non-scoped style
// definitions. `targets` and `minify` are forwarded to the printer
// untouched.
pub fn reprint_stylesheet(
    css: &str,
    filename: &str,
    options: &ScopeOptions,
) -> Result<String, ScopeSheetError> {
    let stylesheet = StyleSheet::parse(css, parser_options(filename))
        .map_err(|error| syntax_error(error, filename))?;
    Ok(stylesheet
        .to_css(printer_options(options))
        .map_err(|error| ScopeSheetError::Print(error.kind.to_string()))?
        .code)
}

fn is_global_escape(rule: &CssRule) -> bool {
    match rule {
        CssRule::Unknown(unknown) => cow_str(&unknown.name).eq_ignore_ascii_case("global"),
        _ => false,
    }
}

// `@global` parses as an unknown at-rule, so its body is still a raw token
// run. The whole rule is printed, the body is sliced out of the braces and
// collected for top-level re-emission.
fn append_escape_body(rule: &CssRule, out: &mut String) -> Result<(), ScopeSheetError> {
    let printed = rule
        .to_css_string(PrinterOptions::default())
        .map_err(|error| ScopeSheetError::Print(error.to_string()))?;
    if let (Some(open), Some(close)) = (printed.find('{'), printed.rfind('}')) {
        if open + 1 < close {
            let body = printed[open + 1..close].trim();
            if !body.is_empty() {
                out.push_str(body);
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn detach_global_blocks(rules: &mut RuleList, out: &mut String) -> Result<(), ScopeSheetError> {
    let mut kept = Vec::with_capacity(rules.0.len());
    for mut rule in std::mem::take(&mut rules.0) {
        if is_global_escape(&rule) {
            append_escape_body(&rule, out)?;
            continue;
        }
        match &mut rule {
            CssRule::Style(style) => detach_global_blocks(&mut style.rules, out)?,
            CssRule::Media(media) => detach_global_blocks(&mut media.rules, out)?,
            CssRule::Supports(supports) => detach_global_blocks(&mut supports.rules, out)?,
            CssRule::Container(container) => detach_global_blocks(&mut container.rules, out)?,
            CssRule::LayerBlock(layer) => detach_global_blocks(&mut layer.rules, out)?,
            CssRule::MozDocument(document) => detach_global_blocks(&mut document.rules, out)?,
            CssRule::StartingStyle(rule) => detach_global_blocks(&mut rule.rules, out)?,
            _ => {}
        }
        kept.push(rule);
    }
    rules.0 = kept;
    Ok(())
}

fn keyframes_name(name: &KeyframesName) -> String {
    match name {
        KeyframesName::Ident(ident) => cow_str(&ident.0).to_string(),
        KeyframesName::Custom(name) => cow_str(name).to_string(),
    }
}

// First pass: every `@keyframes` left in the tree after escape detachment
// declares a locally scoped animation name.
fn collect_keyframes(rules: &RuleList, registry: &mut HashSet<String>) {
    for rule in &rules.0 {
        match rule {
            CssRule::Keyframes(keyframes) => {
                registry.insert(keyframes_name(&keyframes.name));
            }
            CssRule::Style(style) => collect_keyframes(&style.rules, registry),
            CssRule::Media(media) => collect_keyframes(&media.rules, registry),
            CssRule::Supports(supports) => collect_keyframes(&supports.rules, registry),
            CssRule::Container(container) => collect_keyframes(&container.rules, registry),
            CssRule::LayerBlock(layer) => collect_keyframes(&layer.rules, registry),
            CssRule::MozDocument(document) => collect_keyframes(&document.rules, registry),
            CssRule::StartingStyle(rule) => collect_keyframes(&rule.rules, registry),
            _ => {}
        }
    }
}

struct RewriteCtx<'a> {
    scope_prefix: String,
    marker: String,
    marker_lower: String,
    registry: &'a HashSet<String>,
}

impl<'a> RewriteCtx<'a> {
    fn new(scope_token: &str, syntax: MarkerSyntax, registry: &'a HashSet<String>) -> Self {
        let marker = match syntax {
            MarkerSyntax::Namespaced => format!("{}:{}", SCOPE_NAMESPACE, scope_token),
            MarkerSyntax::Plain => format!("{}-{}", SCOPE_NAMESPACE, scope_token),
        };
        Self {
            scope_prefix: format!("{}-", scope_token),
            marker_lower: marker.to_ascii_lowercase(),
            marker,
            registry,
        }
    }

    // Renaming is prefix-guarded so that re-running the transform over its
    // own output is a no-op.
    fn scoped_name(&self, name: &str) -> Option<String> {
        if name.starts_with(&self.scope_prefix) {
            return None;
        }
        Some(format!("{}{}", self.scope_prefix, name))
    }

    fn marker_component<'i>(&self) -> Component<'i> {
        Component::AttributeInNoNamespaceExists {
            local_name: SelectorIdent(CowArcStr::from(self.marker.clone())),
            local_name_lower: SelectorIdent(CowArcStr::from(self.marker_lower.clone())),
        }
    }

    fn is_marker(&self, component: &Component) -> bool {
        match component {
            Component::AttributeInNoNamespaceExists { local_name, .. } => {
                cow_str(&local_name.0) == self.marker
            }
            _ => false,
        }
    }
}

fn rewrite_rules(rules: &mut RuleList, ctx: &RewriteCtx) -> Result<(), ScopeSheetError> {
    for rule in &mut rules.0 {
        match rule {
            CssRule::Style(style) => {
                let scoped = rewrite_selector_list(&style.selectors, ctx)?;
                style.selectors = scoped;
                rewrite_declarations(&mut style.declarations, ctx);
                rewrite_rules(&mut style.rules, ctx)?;
            }
            CssRule::Keyframes(keyframes) => {
                rename_keyframes_definition(&mut keyframes.name, ctx);
                for keyframe in &mut keyframes.keyframes {
                    rewrite_declarations(&mut keyframe.declarations, ctx);
                }
            }
            CssRule::Media(media) => rewrite_rules(&mut media.rules, ctx)?,
            CssRule::Supports(supports) => rewrite_rules(&mut supports.rules, ctx)?,
            CssRule::Container(container) => rewrite_rules(&mut container.rules, ctx)?,
            CssRule::LayerBlock(layer) => rewrite_rules(&mut layer.rules, ctx)?,
            CssRule::MozDocument(document) => rewrite_rules(&mut document.rules, ctx)?,
            CssRule::StartingStyle(rule) => rewrite_rules(&mut rule.rules, ctx)?,
            _ => {}
        }
    }
    Ok(())
}

// The definition is always renamed when outside an escape; the registry
// only decides whether references elsewhere follow.
fn rename_keyframes_definition(name: &mut KeyframesName, ctx: &RewriteCtx) {
    let current = keyframes_name(name);
    if let Some(renamed) = ctx.scoped_name(&current) {
        match name {
            KeyframesName::Ident(ident) => *ident = CustomIdent(CowArcStr::from(renamed)),
            KeyframesName::Custom(custom) => *custom = CowArcStr::from(renamed),
        }
    }
}

fn rewrite_declarations(
    block: &mut lightningcss::declaration::DeclarationBlock,
    ctx: &RewriteCtx,
) {
    for property in block
        .declarations
        .iter_mut()
        .chain(block.important_declarations.iter_mut())
    {
        match property {
            Property::Animation(animations, _) => {
                for animation in animations.iter_mut() {
                    rename_animation_name(&mut animation.name, ctx);
                }
            }
            Property::AnimationName(names, _) => {
                for name in names.iter_mut() {
                    rename_animation_name(name, ctx);
                }
            }
            _ => {}
        }
    }
}

// Only names declared by a local, non-escaped `@keyframes` are rewritten;
// references to external or global animations pass through.
fn rename_animation_name(name: &mut AnimationName, ctx: &RewriteCtx) {
    let current = match name {
        AnimationName::Ident(ident) => cow_str(&ident.0).to_string(),
        AnimationName::String(value) => cow_str(&value.0).to_string(),
        _ => return,
    };
    if !ctx.registry.contains(&current) {
        return;
    }
    if let Some(renamed) = ctx.scoped_name(&current) {
        match name {
            AnimationName::Ident(ident) => *ident = CustomIdent(CowArcStr::from(renamed)),
            AnimationName::String(value) => *value = SelectorString(CowArcStr::from(renamed)),
            _ => {}
        }
    }
}

fn rewrite_selector_list<'i>(
    list: &lightningcss::selector::SelectorList<'i>,
    ctx: &RewriteCtx,
) -> Result<lightningcss::selector::SelectorList<'i>, ScopeSheetError> {
    let mut scoped = Vec::with_capacity(list.0.len());
    for selector in &list.0 {
        scoped.push(rewrite_selector(selector, ctx)?);
    }
    Ok(SelectorList(scoped.into()))
}

// Selectors are stored in match order: compounds right-to-left with the
// components of each compound in parse order. Splitting at combinators and
// reversing the segments recovers parse order; the operation is its own
// inverse, so the rebuilt component list feeds straight into from_vec2.
fn parse_order_components<'a, 'i>(selector: &'a Selector<'i>) -> Vec<&'a Component<'i>> {
    let raw = selector.iter_raw_match_order().as_slice();
    let mut segments: Vec<&'a [Component<'i>]> = Vec::new();
    let mut start = 0usize;
    for (index, component) in raw.iter().enumerate() {
        if component.is_combinator() {
            if index > start {
                segments.push(&raw[start..index]);
            }
            segments.push(&raw[index..index + 1]);
            start = index + 1;
        }
    }
    if start < raw.len() {
        segments.push(&raw[start..]);
    }
    let mut ordered = Vec::with_capacity(raw.len());
    for segment in segments.iter().rev() {
        ordered.extend(segment.iter());
    }
    ordered
}

fn is_sequence_combinator(combinator: Combinator) -> bool {
    matches!(
        combinator,
        Combinator::Descendant
            | Combinator::Child
            | Combinator::NextSibling
            | Combinator::LaterSibling
    )
}

// Does the compound around `index` already carry this scope marker? Scans
// to the nearest sequence combinator on both sides, so re-running the
// transform never stacks a second copy.
fn compound_has_marker(components: &[&Component], index: usize, ctx: &RewriteCtx) -> bool {
    let is_boundary = |component: &Component| match component {
        Component::Combinator(combinator) => is_sequence_combinator(*combinator),
        _ => false,
    };
    for component in components[..index].iter().rev().copied() {
        if is_boundary(component) {
            break;
        }
        if ctx.is_marker(component) {
            return true;
        }
    }
    for component in components[index..].iter().copied() {
        if is_boundary(component) {
            break;
        }
        if ctx.is_marker(component) {
            return true;
        }
    }
    false
}

fn rewrite_selector<'i>(
    selector: &Selector<'i>,
    ctx: &RewriteCtx,
) -> Result<Selector<'i>, ScopeSheetError> {
    let components = parse_order_components(selector);
    let mut rebuilt: Vec<Component<'i>> = Vec::with_capacity(components.len() + 2);
    // True at selector start and after every combinator: the next compound
    // has not received its marker yet.
    let mut pending = true;

    for (index, component) in components.iter().enumerate() {
        let inject = |rebuilt: &mut Vec<Component<'i>>, pending: &mut bool| {
            if *pending {
                if !compound_has_marker(&components, index, ctx) {
                    rebuilt.push(ctx.marker_component());
                }
                *pending = false;
            }
        };
        match component {
            Component::Combinator(combinator) => {
                if is_sequence_combinator(*combinator) {
                    rebuilt.push((*component).clone());
                    pending = true;
                } else {
                    // Pseudo-element "combinators" stay inside the compound;
                    // the marker lands before them.
                    inject(&mut rebuilt, &mut pending);
                    rebuilt.push((*component).clone());
                }
            }
            // Simple selectors take the marker immediately after them.
            Component::LocalName(_)
            | Component::ExplicitUniversalType
            | Component::ID(_)
            | Component::Class(_)
            | Component::AttributeInNoNamespaceExists { .. }
            | Component::AttributeInNoNamespace { .. }
            | Component::AttributeOther(_) => {
                rebuilt.push((*component).clone());
                inject(&mut rebuilt, &mut pending);
            }
            // Namespace qualifiers and `&` precede the compound's simple
            // selectors; injection waits for what follows.
            Component::ExplicitAnyNamespace
            | Component::ExplicitNoNamespace
            | Component::DefaultNamespace(_)
            | Component::Namespace(..)
            | Component::Nesting => {
                rebuilt.push((*component).clone());
                pending = true;
            }
            Component::NonTSPseudoClass(pseudo) => {
                if let PseudoClass::CustomFunction { name, arguments } = pseudo {
                    if cow_str(name).eq_ignore_ascii_case("global") {
                        // Splice the escape's contents without injecting, and
                        // leave `pending` untouched so components after the
                        // splice still follow the normal rule.
                        let spliced = escape_args::parse_escape_args(arguments)?;
                        if let Some(first) = spliced.into_iter().next() {
                            let inner: Vec<Component<'i>> = parse_order_components(&first)
                                .into_iter()
                                .cloned()
                                .collect();
                            rebuilt.extend(inner);
                        }
                        continue;
                    }
                }
                // The marker attaches to the compound's simple-selector run,
                // not after the pseudo-class.
                inject(&mut rebuilt, &mut pending);
                rebuilt.push((*component).clone());
            }
            Component::PseudoElement(_) | Component::Slotted(_) | Component::Part(_) => {
                inject(&mut rebuilt, &mut pending);
                rebuilt.push((*component).clone());
            }
            // Structural pseudo-classes (:nth-*, :is, :not, :where, ...)
            // behave like any other pseudo-class.
            _ => {
                inject(&mut rebuilt, &mut pending);
                rebuilt.push((*component).clone());
            }
        }
    }

    Ok(Selector::from_vec2(rebuilt))
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

    fn scope(css: &str, token: &str) -> String {
        scope_stylesheet(css, token, "test.css", &minified()).expect("stylesheet should compile")
    }

    #[test]
    fn scopes_type_selectors() {
        assert_eq!(scope("h1{color:red}", "c-0"), "h1[s\\:c-0]{color:red}");
    }

    #[test]
    fn scopes_class_selectors() {
        assert_eq!(
            scope(".example{color:red}", "c-0"),
            ".example[s\\:c-0]{color:red}"
        );
    }

    #[test]
    fn scopes_id_selectors() {
        assert_eq!(scope("#app{color:red}", "c-0"), "#app[s\\:c-0]{color:red}");
    }

    #[test]
    fn scopes_attribute_selectors() {
        assert_eq!(scope("[id]{color:red}", "c-0"), "[id][s\\:c-0]{color:red}");
    }

    #[test]
    fn universal_selector_collapses_into_the_marker() {
        assert_eq!(scope("*{color:red}", "c-0"), "[s\\:c-0]{color:red}");
    }

    #[test]
    fn every_compound_in_a_complex_selector_is_scoped() {
        assert_eq!(
            scope("div a{color:red}", "c-0"),
            "div[s\\:c-0] a[s\\:c-0]{color:red}"
        );
        assert_eq!(
            scope("div>a{color:red}", "c-0"),
            "div[s\\:c-0]>a[s\\:c-0]{color:red}"
        );
    }

    #[test]
    fn every_selector_in_a_list_is_scoped() {
        assert_eq!(
            scope("h1,h2{color:red}", "c-0"),
            "h1[s\\:c-0],h2[s\\:c-0]{color:red}"
        );
    }

    #[test]
    fn marker_attaches_before_pseudo_classes() {
        assert_eq!(
            scope("a:hover{color:red}", "c-0"),
            "a[s\\:c-0]:hover{color:red}"
        );
        assert_eq!(
            scope(":hover{color:red}", "c-0"),
            "[s\\:c-0]:hover{color:red}"
        );
    }

    #[test]
    fn marker_attaches_before_pseudo_elements() {
        assert_eq!(
            scope("p::first-line{color:red}", "c-0"),
            "p[s\\:c-0]::first-line{color:red}"
        );
        assert_eq!(
            scope("::before{content:\"\"}", "c-0"),
            "[s\\:c-0]::before{content:\"\"}"
        );
    }

    #[test]
    fn plain_marker_syntax_skips_the_namespace_colon() {
        let options = ScopeOptions {
            minify: true,
            marker: MarkerSyntax::Plain,
            ..ScopeOptions::default()
        };
        let out = scope_stylesheet("h1{color:red}", "c-0", "test.css", &options)
            .expect("stylesheet should compile");
        assert_eq!(out, "h1[s-c-0]{color:red}");
    }

    #[test]
    fn selectors_inside_media_queries_are_scoped() {
        assert_eq!(
            scope("@media screen{h1{color:red}}", "c-0"),
            "@media screen{h1[s\\:c-0]{color:red}}"
        );
    }

    #[test]
    fn nested_rules_are_scoped() {
        let out = scope("div{color:blue;&:hover{color:red}}", "c-0");
        assert!(out.contains("div[s\\:c-0]"));
        assert!(out.contains("&[s\\:c-0]:hover"));
    }

    #[test]
    fn function_escape_suppresses_the_marker() {
        assert_eq!(scope(":global(h1){color:red}", "c-0"), "h1{color:red}");
    }

    #[test]
    fn function_escape_is_transparent_to_following_components() {
        assert_eq!(
            scope(":global(.foo).bar{color:red}", "c-0"),
            ".foo.bar[s\\:c-0]{color:red}"
        );
    }

    #[test]
    fn function_escape_in_one_compound_leaves_others_scoped() {
        assert_eq!(
            scope("div :global(.foo){color:red}", "c-0"),
            "div[s\\:c-0] .foo{color:red}"
        );
    }

    #[test]
    fn function_escape_keeps_inner_combinators() {
        assert_eq!(
            scope("div :global(* + *){margin-top:1rem}", "c-0"),
            "div[s\\:c-0] *+*{margin-top:1rem}"
        );
    }

    #[test]
    fn block_escape_hoists_rules_verbatim() {
        let out = scope("@global{h1{color:blue}}div{color:red}", "c-0");
        assert!(out.contains("div[s\\:c-0]{color:red}"));
        assert!(out.contains("h1{color:blue}"));
        assert!(!out.contains("h1[s"));
    }

    #[test]
    fn nested_block_escapes_flatten_completely() {
        let out = scope(
            "@global{h1{color:blue}@global{h2{color:green}}}div{color:red}",
            "c-0",
        );
        assert!(out.contains("h1{color:blue}"));
        assert!(out.contains("h2{color:green}"));
        assert!(!out.contains("@global"));
    }

    #[test]
    fn block_escape_inside_nesting_is_still_hoisted() {
        let out = scope("@media screen{@global{h1{color:blue}}}div{color:red}", "c-0");
        assert!(out.contains("h1{color:blue}"));
        assert!(!out.contains("@media screen{h1"));
    }

    #[test]
    fn keyframes_and_references_are_renamed_consistently() {
        let out = scope(
            "@keyframes spin{from{opacity:0}to{opacity:1}}div{animation:spin 1s}",
            "c-1",
        );
        assert!(out.contains("@keyframes c-1-spin"));
        assert_eq!(out.matches("c-1-spin").count(), 2);
        assert_eq!(out.matches("spin").count(), 2);
    }

    #[test]
    fn animation_name_declarations_are_renamed() {
        let out = scope(
            "@keyframes fade{from{opacity:0}to{opacity:1}}div{animation-name:fade}",
            "c-1",
        );
        assert_eq!(out.matches("c-1-fade").count(), 2);
    }

    #[test]
    fn unknown_animation_references_pass_through() {
        let out = scope("div{animation:appear 1s}", "c-0");
        assert!(out.contains("appear"));
        assert!(!out.contains("c-0-appear"));
    }

    #[test]
    fn keyframes_inside_a_block_escape_are_not_renamed() {
        let out = scope(
            "@global{@keyframes spin{from{opacity:0}to{opacity:1}}}div{animation:spin 1s}",
            "c-1",
        );
        assert!(out.contains("@keyframes spin"));
        assert!(!out.contains("c-1-spin"));
    }

    #[test]
    fn transform_is_idempotent() {
        let first = scope(
            "@keyframes spin{from{opacity:0}to{opacity:1}}div a:hover{animation:spin 1s}",
            "c-2",
        );
        let second = scope(&first, "c-2");
        assert_eq!(first, second);
    }

    #[test]
    fn broken_stylesheets_surface_a_syntax_error() {
        let result = scope_stylesheet("h1{color red}", "c-0", "test.css", &minified());
        assert!(matches!(
            result,
            Err(ScopeSheetError::StylesheetSyntax { .. })
        ));
    }

    #[test]
    fn broken_escape_arguments_surface_a_grammar_error() {
        let result = scope_stylesheet(":global(..){color:red}", "c-0", "test.css", &minified());
        assert!(matches!(
            result,
            Err(ScopeSheetError::EscapeGrammar { .. })
        ));
    }

    #[test]
    fn reprint_leaves_selectors_unscoped() {
        let out = reprint_stylesheet("h1 { color: red; }", "test.css", &minified())
            .expect("stylesheet should compile");
        assert_eq!(out, "h1{color:red}");
    }
}
