use crate::error::ScopeSheetError;
use lightningcss::properties::custom::{Function, Token, TokenList, TokenOrValue};
use lightningcss::selector::{Direction, PseudoClass, PseudoElement};
use lightningcss::values::ident::Ident as SelectorIdent;
use lightningcss::values::string::CSSString as SelectorString;
use lightningcss::values::string::CowArcStr;
use lightningcss::vendor_prefix::VendorPrefix;
use parcel_selectors::attr::{
    AttrSelectorOperator, AttrSelectorWithOptionalNamespace, NamespaceConstraint,
    ParsedAttrSelectorOperation, ParsedCaseSensitivity,
};
use parcel_selectors::parser::{Combinator, LocalName};

pub(crate) type Component<'i> = lightningcss::selector::Component<'i>;
pub(crate) type Selector<'i> = lightningcss::selector::Selector<'i>;

// The stylesheet parser treats the argument of an unrecognized functional
// pseudo-class as an opaque token stream. This module turns that stream
// back into structured selectors so the transform engine can splice the
// escape's contents in place of the wrapper.
pub(crate) fn parse_escape_args<'i>(
    tokens: &TokenList<'i>,
) -> Result<Vec<Selector<'i>>, ScopeSheetError> {
    let mut parser = EscapeParser {
        tokens: &tokens.0,
        cursor: 0,
        list: Vec::new(),
        current: Vec::new(),
        pending_descendant: false,
    };
    parser.run()?;
    parser.finish()
}

fn cow_str<'a, 'i>(value: &'a CowArcStr<'i>) -> &'a str {
    value
}

fn lowercase<'i>(value: &CowArcStr<'i>) -> CowArcStr<'i> {
    CowArcStr::from(cow_str(value).to_ascii_lowercase())
}

fn unexpected(production: &'static str, item: &TokenOrValue) -> ScopeSheetError {
    ScopeSheetError::EscapeGrammar {
        production,
        found: token_label(item),
    }
}

fn unexpected_end(production: &'static str) -> ScopeSheetError {
    ScopeSheetError::EscapeGrammar {
        production,
        found: "end of arguments".to_string(),
    }
}

fn grammar(production: &'static str, found: &str) -> ScopeSheetError {
    ScopeSheetError::EscapeGrammar {
        production,
        found: found.to_string(),
    }
}

fn token_label(item: &TokenOrValue) -> String {
    match item {
        TokenOrValue::Token(token) => match token {
            Token::Ident(name) => format!("identifier '{}'", cow_str(name)),
            Token::AtKeyword(name) => format!("at-keyword '@{}'", cow_str(name)),
            Token::Delim(delim) => format!("'{}'", delim),
            Token::String(_) => "string".to_string(),
            Token::Number { .. } => "number".to_string(),
            Token::Dimension { .. } => "dimension".to_string(),
            Token::WhiteSpace(_) => "whitespace".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Semicolon => "';'".to_string(),
            _ => "token".to_string(),
        },
        TokenOrValue::Function(function) => {
            format!("function '{}()'", cow_str(&function.name.0))
        }
        _ => "value".to_string(),
    }
}

fn is_whitespace(item: &TokenOrValue) -> bool {
    matches!(item, TokenOrValue::Token(Token::WhiteSpace(_)))
}

fn local_name<'i>(name: CowArcStr<'i>) -> Component<'i> {
    let lower = lowercase(&name);
    Component::LocalName(LocalName {
        name: SelectorIdent(name),
        lower_name: SelectorIdent(lower),
    })
}

struct EscapeParser<'a, 'i> {
    tokens: &'a [TokenOrValue<'i>],
    cursor: usize,
    list: Vec<Selector<'i>>,
    current: Vec<Component<'i>>,
    pending_descendant: bool,
}

impl<'a, 'i> EscapeParser<'a, 'i> {
    fn bump(&mut self) -> Option<&'a TokenOrValue<'i>> {
        let item = self.tokens.get(self.cursor);
        self.cursor += 1;
        item
    }

    fn peek_delim(&self, delim: char) -> bool {
        matches!(
            self.tokens.get(self.cursor),
            Some(TokenOrValue::Token(Token::Delim(found))) if *found == delim
        )
    }

    fn expect_ident(&mut self, production: &'static str) -> Result<CowArcStr<'i>, ScopeSheetError> {
        match self.bump() {
            Some(TokenOrValue::Token(Token::Ident(name))) => Ok(name.clone()),
            Some(other) => Err(unexpected(production, other)),
            None => Err(unexpected_end(production)),
        }
    }

    // Whitespace is only a descendant combinator once another component
    // follows it; `>`/`+`/`~` and `,` cancel it.
    fn flush_descendant(&mut self) {
        if !self.pending_descendant {
            return;
        }
        self.pending_descendant = false;
        if let Some(last) = self.current.last() {
            if !last.is_combinator() {
                self.current
                    .push(Component::Combinator(Combinator::Descendant));
            }
        }
    }

    fn push_simple(&mut self, component: Component<'i>) {
        self.flush_descendant();
        self.current.push(component);
    }

    fn push_combinator(&mut self, combinator: Combinator) -> Result<(), ScopeSheetError> {
        self.pending_descendant = false;
        match self.current.last() {
            None => return Err(grammar("selector", "leading combinator")),
            Some(last) if last.is_combinator() => {
                return Err(grammar("selector", "consecutive combinators"));
            }
            _ => {}
        }
        self.current.push(Component::Combinator(combinator));
        Ok(())
    }

    fn push_pseudo_element(&mut self, combinator: Combinator, component: Component<'i>) {
        self.flush_descendant();
        self.current.push(Component::Combinator(combinator));
        self.current.push(component);
    }

    fn end_selector(&mut self) -> Result<(), ScopeSheetError> {
        self.pending_descendant = false;
        if self.current.is_empty() {
            return Ok(());
        }
        if let Some(last) = self.current.last() {
            if last.is_combinator() {
                return Err(grammar("selector", "trailing combinator"));
            }
        }
        let components = std::mem::take(&mut self.current);
        self.list.push(Selector::from_vec2(components));
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Selector<'i>>, ScopeSheetError> {
        self.end_selector()?;
        Ok(self.list)
    }

    fn run(&mut self) -> Result<(), ScopeSheetError> {
        while let Some(item) = self.bump() {
            match item {
                TokenOrValue::Token(token) => self.token(token)?,
                other => return Err(unexpected("selector", other)),
            }
        }
        Ok(())
    }

    fn token(&mut self, token: &'a Token<'i>) -> Result<(), ScopeSheetError> {
        match token {
            Token::WhiteSpace(_) => {
                self.pending_descendant = true;
            }
            Token::Delim(delim) => match delim {
                '*' => {
                    if self.peek_delim('|') {
                        self.bump();
                        let name = self.expect_ident("namespaced type selector")?;
                        self.push_simple(Component::ExplicitAnyNamespace);
                        self.current.push(local_name(name));
                    } else {
                        self.push_simple(Component::ExplicitUniversalType);
                    }
                }
                '|' => {
                    let name = self.expect_ident("namespaced type selector")?;
                    self.push_simple(Component::ExplicitNoNamespace);
                    self.current.push(local_name(name));
                }
                '.' => {
                    let name = self.expect_ident("class selector")?;
                    self.push_simple(Component::Class(SelectorIdent(name)));
                }
                '>' => self.push_combinator(Combinator::Child)?,
                '+' => self.push_combinator(Combinator::NextSibling)?,
                '~' => self.push_combinator(Combinator::LaterSibling)?,
                ',' => self.end_selector()?,
                _ => {
                    return Err(unexpected(
                        "selector",
                        &TokenOrValue::Token(Token::Delim(*delim)),
                    ));
                }
            },
            Token::Ident(name) => {
                if self.peek_delim('|') {
                    self.bump();
                    let local = self.expect_ident("namespaced type selector")?;
                    self.push_simple(Component::Namespace(
                        SelectorIdent(name.clone()),
                        SelectorIdent(name.clone()),
                    ));
                    self.current.push(local_name(local));
                } else {
                    self.push_simple(local_name(name.clone()));
                }
            }
            Token::IDHash(name) | Token::Hash(name) => {
                self.push_simple(Component::ID(SelectorIdent(name.clone())));
            }
            Token::Comma => self.end_selector()?,
            Token::Colon => self.pseudo()?,
            Token::SquareBracketBlock => {
                let mut inner: Vec<&'a TokenOrValue<'i>> = Vec::new();
                let mut closed = false;
                while let Some(next) = self.bump() {
                    if matches!(next, TokenOrValue::Token(Token::CloseSquareBracket)) {
                        closed = true;
                        break;
                    }
                    inner.push(next);
                }
                if !closed {
                    return Err(grammar("attribute selector", "unterminated block"));
                }
                let component = parse_attribute(&inner)?;
                self.push_simple(component);
            }
            other => {
                return Err(unexpected(
                    "selector",
                    &TokenOrValue::Token(other.clone()),
                ));
            }
        }
        Ok(())
    }

    fn pseudo(&mut self) -> Result<(), ScopeSheetError> {
        match self.bump() {
            Some(TokenOrValue::Token(Token::Colon)) => match self.bump() {
                Some(TokenOrValue::Token(Token::Ident(name))) => {
                    let (combinator, component) = ident_pseudo_element(name);
                    self.push_pseudo_element(combinator, component);
                    Ok(())
                }
                Some(TokenOrValue::Function(function)) => {
                    let (combinator, component) = function_pseudo_element(function)?;
                    self.push_pseudo_element(combinator, component);
                    Ok(())
                }
                Some(other) => Err(unexpected("pseudo-element selector", other)),
                None => Err(unexpected_end("pseudo-element selector")),
            },
            Some(TokenOrValue::Token(Token::Ident(name))) => {
                let component = ident_pseudo_class(name);
                self.push_simple(component);
                Ok(())
            }
            Some(TokenOrValue::Function(function)) => {
                let component = function_pseudo_class(function)?;
                self.push_simple(component);
                Ok(())
            }
            Some(other) => Err(unexpected("pseudo-class selector", other)),
            None => Err(unexpected_end("pseudo-class selector")),
        }
    }
}

// Historical vendor-prefixed aliases normalize to their unprefixed kind
// plus the recorded prefix.
fn pseudo_class_alias<'a>(name: &'a str) -> (&'a str, VendorPrefix) {
    match name {
        "-webkit-full-screen" => ("fullscreen", VendorPrefix::WebKit),
        "-moz-full-screen" => ("fullscreen", VendorPrefix::Moz),
        "-ms-fullscreen" => ("fullscreen", VendorPrefix::Ms),
        "-webkit-any-link" => ("any-link", VendorPrefix::WebKit),
        "-moz-any-link" => ("any-link", VendorPrefix::Moz),
        "-moz-read-only" => ("read-only", VendorPrefix::Moz),
        "-moz-read-write" => ("read-write", VendorPrefix::Moz),
        "-moz-placeholder" => ("placeholder-shown", VendorPrefix::Moz),
        "-ms-input-placeholder" => ("placeholder-shown", VendorPrefix::Ms),
        "-webkit-autofill" => ("autofill", VendorPrefix::WebKit),
        "-webkit-any" => ("any", VendorPrefix::WebKit),
        "-moz-any" => ("any", VendorPrefix::Moz),
        _ => (name, VendorPrefix::None),
    }
}

fn ident_pseudo_class<'i>(name: &CowArcStr<'i>) -> Component<'i> {
    let lowered = cow_str(name).to_ascii_lowercase();
    let (kind, vendor) = pseudo_class_alias(&lowered);
    let pc = Component::NonTSPseudoClass;
    match kind {
        "first-child" => Component::FirstChild,
        "last-child" => Component::LastChild,
        "only-child" => Component::OnlyChild,
        "first-of-type" => Component::FirstOfType,
        "last-of-type" => Component::LastOfType,
        "only-of-type" => Component::OnlyOfType,
        "root" => Component::Root,
        "empty" => Component::Empty,
        "scope" => Component::Scope,
        "host" => Component::Host(None),
        "hover" => pc(PseudoClass::Hover),
        "active" => pc(PseudoClass::Active),
        "focus" => pc(PseudoClass::Focus),
        "focus-visible" => pc(PseudoClass::FocusVisible),
        "focus-within" => pc(PseudoClass::FocusWithin),
        "current" => pc(PseudoClass::Current),
        "past" => pc(PseudoClass::Past),
        "future" => pc(PseudoClass::Future),
        "playing" => pc(PseudoClass::Playing),
        "paused" => pc(PseudoClass::Paused),
        "seeking" => pc(PseudoClass::Seeking),
        "buffering" => pc(PseudoClass::Buffering),
        "stalled" => pc(PseudoClass::Stalled),
        "muted" => pc(PseudoClass::Muted),
        "volume-locked" => pc(PseudoClass::VolumeLocked),
        "defined" => pc(PseudoClass::Defined),
        "link" => pc(PseudoClass::Link),
        "local-link" => pc(PseudoClass::LocalLink),
        "target" => pc(PseudoClass::Target),
        "target-within" => pc(PseudoClass::TargetWithin),
        "visited" => pc(PseudoClass::Visited),
        "enabled" => pc(PseudoClass::Enabled),
        "disabled" => pc(PseudoClass::Disabled),
        "default" => pc(PseudoClass::Default),
        "checked" => pc(PseudoClass::Checked),
        "indeterminate" => pc(PseudoClass::Indeterminate),
        "blank" => pc(PseudoClass::Blank),
        "valid" => pc(PseudoClass::Valid),
        "invalid" => pc(PseudoClass::Invalid),
        "in-range" => pc(PseudoClass::InRange),
        "out-of-range" => pc(PseudoClass::OutOfRange),
        "required" => pc(PseudoClass::Required),
        "optional" => pc(PseudoClass::Optional),
        "user-valid" => pc(PseudoClass::UserValid),
        "user-invalid" => pc(PseudoClass::UserInvalid),
        "fullscreen" => pc(PseudoClass::Fullscreen(vendor)),
        "any-link" => pc(PseudoClass::AnyLink(vendor)),
        "read-only" => pc(PseudoClass::ReadOnly(vendor)),
        "read-write" => pc(PseudoClass::ReadWrite(vendor)),
        "placeholder-shown" => pc(PseudoClass::PlaceholderShown(vendor)),
        "autofill" => pc(PseudoClass::Autofill(vendor)),
        _ => pc(PseudoClass::Custom { name: name.clone() }),
    }
}

fn selector_list_args<'i>(
    function: &Function<'i>,
) -> Result<Box<[Selector<'i>]>, ScopeSheetError> {
    Ok(parse_escape_args(&function.arguments)?.into_boxed_slice())
}

fn single_selector<'i>(
    function: &Function<'i>,
    production: &'static str,
) -> Result<Selector<'i>, ScopeSheetError> {
    let mut selectors = parse_escape_args(&function.arguments)?;
    if selectors.len() == 1 {
        if let Some(selector) = selectors.pop() {
            return Ok(selector);
        }
    }
    Err(grammar(production, "selector list"))
}

fn function_pseudo_class<'i>(
    function: &Function<'i>,
) -> Result<Component<'i>, ScopeSheetError> {
    let lowered = cow_str(&function.name.0).to_ascii_lowercase();
    let (kind, vendor) = pseudo_class_alias(&lowered);
    match kind {
        "not" => Ok(Component::Negation(selector_list_args(function)?)),
        "is" => Ok(Component::Is(selector_list_args(function)?)),
        "where" => Ok(Component::Where(selector_list_args(function)?)),
        "has" => Ok(Component::Has(selector_list_args(function)?)),
        "any" => Ok(Component::Any(vendor, selector_list_args(function)?)),
        "host" => Ok(Component::Host(Some(single_selector(
            function,
            ":host selector",
        )?))),
        "dir" => {
            let args: Vec<&TokenOrValue<'i>> = function
                .arguments
                .0
                .iter()
                .filter(|item| !is_whitespace(item))
                .collect();
            if args.len() != 1 {
                return Err(grammar(":dir pseudo-class", "argument list"));
            }
            let direction = match args[0] {
                TokenOrValue::Token(Token::Ident(value)) => {
                    match cow_str(value).to_ascii_lowercase().as_str() {
                        "rtl" => Direction::Rtl,
                        "ltr" => Direction::Ltr,
                        _ => return Err(unexpected(":dir pseudo-class", args[0])),
                    }
                }
                other => return Err(unexpected(":dir pseudo-class", other)),
            };
            Ok(Component::NonTSPseudoClass(PseudoClass::Dir { direction }))
        }
        "lang" => {
            let mut languages = Vec::new();
            for item in &function.arguments.0 {
                match item {
                    TokenOrValue::Token(Token::Ident(value))
                    | TokenOrValue::Token(Token::String(value)) => languages.push(value.clone()),
                    TokenOrValue::Token(Token::Comma) | TokenOrValue::Token(Token::WhiteSpace(_)) => {}
                    other => return Err(unexpected(":lang pseudo-class", other)),
                }
            }
            if languages.is_empty() {
                return Err(unexpected_end(":lang pseudo-class"));
            }
            Ok(Component::NonTSPseudoClass(PseudoClass::Lang { languages }))
        }
        "nth-child" => parse_nth(function).map(|(a, b)| Component::NthChild(a, b)),
        "nth-last-child" => parse_nth(function).map(|(a, b)| Component::NthLastChild(a, b)),
        "nth-of-type" => parse_nth(function).map(|(a, b)| Component::NthOfType(a, b)),
        "nth-last-of-type" => parse_nth(function).map(|(a, b)| Component::NthLastOfType(a, b)),
        "nth-col" => parse_nth(function).map(|(a, b)| Component::NthCol(a, b)),
        "nth-last-col" => parse_nth(function).map(|(a, b)| Component::NthLastCol(a, b)),
        _ => Ok(Component::NonTSPseudoClass(PseudoClass::CustomFunction {
            name: function.name.0.clone(),
            arguments: function.arguments.clone(),
        })),
    }
}

// An+B: `even`, `odd`, `n`, `-n`, `An`, each with an optional signed B,
// or a bare signed integer B.
fn parse_nth<'i>(function: &Function<'i>) -> Result<(i32, i32), ScopeSheetError> {
    let production = "An+B expression";
    let args: Vec<&TokenOrValue<'i>> = function
        .arguments
        .0
        .iter()
        .filter(|item| !is_whitespace(item))
        .collect();
    let mut iter = args.into_iter();
    let first = match iter.next() {
        Some(first) => first,
        None => return Err(unexpected_end(production)),
    };
    let a = match first {
        TokenOrValue::Token(Token::Ident(value)) => {
            match cow_str(value).to_ascii_lowercase().as_str() {
                "even" => {
                    ensure_done(&mut iter, production)?;
                    return Ok((2, 0));
                }
                "odd" => {
                    ensure_done(&mut iter, production)?;
                    return Ok((2, 1));
                }
                "n" => 1,
                "-n" => -1,
                _ => return Err(unexpected(production, first)),
            }
        }
        TokenOrValue::Token(Token::Dimension {
            value,
            int_value,
            unit,
            ..
        }) if unit.eq_ignore_ascii_case("n") => int_value.unwrap_or(*value as i32),
        TokenOrValue::Token(Token::Number {
            value, int_value, ..
        }) => {
            let b = int_value.unwrap_or(*value as i32);
            ensure_done(&mut iter, production)?;
            return Ok((0, b));
        }
        other => return Err(unexpected(production, other)),
    };
    let b = match iter.next() {
        None => 0,
        Some(TokenOrValue::Token(Token::Number {
            value, int_value, ..
        })) => {
            ensure_done(&mut iter, production)?;
            int_value.unwrap_or(*value as i32)
        }
        Some(TokenOrValue::Token(Token::Delim(sign))) if *sign == '+' || *sign == '-' => {
            let magnitude = match iter.next() {
                Some(TokenOrValue::Token(Token::Number {
                    value, int_value, ..
                })) => int_value.unwrap_or(*value as i32),
                Some(other) => return Err(unexpected(production, other)),
                None => return Err(unexpected_end(production)),
            };
            ensure_done(&mut iter, production)?;
            if *sign == '-' { -magnitude } else { magnitude }
        }
        Some(other) => return Err(unexpected(production, other)),
    };
    Ok((a, b))
}

fn ensure_done<'a, 'i>(
    iter: &mut impl Iterator<Item = &'a TokenOrValue<'i>>,
    production: &'static str,
) -> Result<(), ScopeSheetError>
where
    'i: 'a,
{
    match iter.next() {
        Some(other) => Err(unexpected(production, other)),
        None => Ok(()),
    }
}

fn pseudo_element_alias<'a>(name: &'a str) -> (&'a str, VendorPrefix) {
    match name {
        "-webkit-backdrop" => ("backdrop", VendorPrefix::WebKit),
        "-ms-backdrop" => ("backdrop", VendorPrefix::Ms),
        "-webkit-file-upload-button" => ("file-selector-button", VendorPrefix::WebKit),
        "-ms-browse" => ("file-selector-button", VendorPrefix::Ms),
        "-webkit-input-placeholder" => ("placeholder", VendorPrefix::WebKit),
        "-moz-placeholder" => ("placeholder", VendorPrefix::Moz),
        "-ms-input-placeholder" => ("placeholder", VendorPrefix::Ms),
        "-moz-selection" => ("selection", VendorPrefix::Moz),
        _ => (name, VendorPrefix::None),
    }
}

fn ident_pseudo_element<'i>(name: &CowArcStr<'i>) -> (Combinator, Component<'i>) {
    let lowered = cow_str(name).to_ascii_lowercase();
    let (kind, vendor) = pseudo_element_alias(&lowered);
    let pe = |element: PseudoElement<'i>| Component::PseudoElement(element);
    let component = match kind {
        "before" => pe(PseudoElement::Before),
        "after" => pe(PseudoElement::After),
        "first-line" => pe(PseudoElement::FirstLine),
        "first-letter" => pe(PseudoElement::FirstLetter),
        "cue" => pe(PseudoElement::Cue),
        "cue-region" => pe(PseudoElement::CueRegion),
        "marker" => pe(PseudoElement::Marker),
        "selection" => pe(PseudoElement::Selection(vendor)),
        "placeholder" => pe(PseudoElement::Placeholder(vendor)),
        "backdrop" => pe(PseudoElement::Backdrop(vendor)),
        "file-selector-button" => pe(PseudoElement::FileSelectorButton(vendor)),
        _ => pe(PseudoElement::Custom { name: name.clone() }),
    };
    (Combinator::PseudoElement, component)
}

fn function_pseudo_element<'i>(
    function: &Function<'i>,
) -> Result<(Combinator, Component<'i>), ScopeSheetError> {
    let lowered = cow_str(&function.name.0).to_ascii_lowercase();
    match lowered.as_str() {
        "slotted" => {
            let selector = single_selector(function, "::slotted selector")?;
            Ok((Combinator::SlotAssignment, Component::Slotted(selector)))
        }
        "part" => {
            let mut names = Vec::new();
            for item in &function.arguments.0 {
                match item {
                    TokenOrValue::Token(Token::Ident(value))
                    | TokenOrValue::Token(Token::String(value)) => {
                        names.push(SelectorIdent(value.clone()));
                    }
                    TokenOrValue::Token(Token::WhiteSpace(_)) => {}
                    other => return Err(unexpected("::part selector", other)),
                }
            }
            if names.is_empty() {
                return Err(unexpected_end("::part selector"));
            }
            Ok((Combinator::Part, Component::Part(names.into_boxed_slice())))
        }
        "cue" => {
            let selector = single_selector(function, "::cue selector")?;
            Ok((
                Combinator::PseudoElement,
                Component::PseudoElement(PseudoElement::CueFunction {
                    selector: Box::new(selector),
                }),
            ))
        }
        "cue-region" => {
            let selector = single_selector(function, "::cue-region selector")?;
            Ok((
                Combinator::PseudoElement,
                Component::PseudoElement(PseudoElement::CueRegionFunction {
                    selector: Box::new(selector),
                }),
            ))
        }
        _ => Ok((
            Combinator::PseudoElement,
            Component::PseudoElement(PseudoElement::CustomFunction {
                name: function.name.0.clone(),
                arguments: function.arguments.clone(),
            }),
        )),
    }
}

fn attr_token<'a, 'i>(tokens: &[&'a TokenOrValue<'i>], index: usize) -> Option<&'a Token<'i>> {
    match tokens.get(index) {
        Some(TokenOrValue::Token(token)) => Some(token),
        _ => None,
    }
}

fn parse_attribute<'i>(tokens: &[&TokenOrValue<'i>]) -> Result<Component<'i>, ScopeSheetError> {
    let production = "attribute selector";
    let filtered: Vec<&TokenOrValue<'i>> = tokens
        .iter()
        .copied()
        .filter(|item| !is_whitespace(item))
        .collect();

    let mut cursor = 0usize;
    let mut namespace: Option<NamespaceConstraint<(SelectorIdent<'i>, SelectorIdent<'i>)>> = None;
    let name: CowArcStr<'i>;
    match attr_token(&filtered, cursor) {
        Some(Token::Delim('*')) => {
            match attr_token(&filtered, cursor + 1) {
                Some(Token::Delim('|')) => {}
                _ => return Err(grammar(production, "'*' without namespace separator")),
            }
            match attr_token(&filtered, cursor + 2) {
                Some(Token::Ident(ident)) => {
                    namespace = Some(NamespaceConstraint::Any);
                    name = ident.clone();
                    cursor += 3;
                }
                _ => return Err(grammar(production, "missing attribute name")),
            }
        }
        Some(Token::Delim('|')) => match attr_token(&filtered, cursor + 1) {
            Some(Token::Ident(ident)) => {
                name = ident.clone();
                cursor += 2;
            }
            _ => return Err(grammar(production, "missing attribute name")),
        },
        Some(Token::Ident(first)) => {
            if let Some(Token::Delim('|')) = attr_token(&filtered, cursor + 1) {
                match attr_token(&filtered, cursor + 2) {
                    Some(Token::Ident(ident)) => {
                        namespace = Some(NamespaceConstraint::Specific((
                            SelectorIdent(first.clone()),
                            SelectorIdent(first.clone()),
                        )));
                        name = ident.clone();
                        cursor += 3;
                    }
                    _ => return Err(grammar(production, "missing attribute name")),
                }
            } else {
                name = first.clone();
                cursor += 1;
            }
        }
        Some(other) => {
            return Err(unexpected(
                production,
                &TokenOrValue::Token(other.clone()),
            ));
        }
        None => return Err(unexpected_end(production)),
    }

    let operator = match attr_token(&filtered, cursor) {
        None => return Ok(build_attribute(namespace, name, None)),
        Some(Token::Delim('=')) => AttrSelectorOperator::Equal,
        Some(Token::IncludeMatch) => AttrSelectorOperator::Includes,
        Some(Token::DashMatch) => AttrSelectorOperator::DashMatch,
        Some(Token::PrefixMatch) => AttrSelectorOperator::Prefix,
        Some(Token::SuffixMatch) => AttrSelectorOperator::Suffix,
        Some(Token::SubstringMatch) => AttrSelectorOperator::Substring,
        Some(other) => {
            return Err(unexpected(
                production,
                &TokenOrValue::Token(other.clone()),
            ));
        }
    };
    cursor += 1;

    let value = match attr_token(&filtered, cursor) {
        Some(Token::String(value)) | Some(Token::Ident(value)) => value.clone(),
        Some(other) => {
            return Err(unexpected(
                production,
                &TokenOrValue::Token(other.clone()),
            ));
        }
        None => return Err(unexpected_end(production)),
    };
    cursor += 1;

    let case_sensitivity = match attr_token(&filtered, cursor) {
        None => match &namespace {
            Some(NamespaceConstraint::Specific(_)) => ParsedCaseSensitivity::CaseSensitive,
            _ => ParsedCaseSensitivity::AsciiCaseInsensitiveIfInHtmlElementInHtmlDocument,
        },
        Some(Token::Ident(flag)) => match cow_str(flag).to_ascii_lowercase().as_str() {
            "i" => ParsedCaseSensitivity::AsciiCaseInsensitive,
            "s" => ParsedCaseSensitivity::ExplicitCaseSensitive,
            _ => return Err(grammar(production, "case sensitivity flag")),
        },
        Some(other) => {
            return Err(unexpected(
                production,
                &TokenOrValue::Token(other.clone()),
            ));
        }
    };
    if cursor + 1 < filtered.len() {
        return Err(grammar(production, "trailing tokens"));
    }

    Ok(build_attribute(
        namespace,
        name,
        Some((operator, value, case_sensitivity)),
    ))
}

fn build_attribute<'i>(
    namespace: Option<NamespaceConstraint<(SelectorIdent<'i>, SelectorIdent<'i>)>>,
    name: CowArcStr<'i>,
    operation: Option<(AttrSelectorOperator, CowArcStr<'i>, ParsedCaseSensitivity)>,
) -> Component<'i> {
    let lower = lowercase(&name);
    match (namespace, operation) {
        (None, None) => Component::AttributeInNoNamespaceExists {
            local_name: SelectorIdent(name),
            local_name_lower: SelectorIdent(lower),
        },
        (None, Some((operator, value, case_sensitivity))) => Component::AttributeInNoNamespace {
            local_name: SelectorIdent(name),
            operator,
            value: SelectorString(value),
            case_sensitivity,
            never_matches: false,
        },
        (Some(namespace), operation) => {
            Component::AttributeOther(Box::new(AttrSelectorWithOptionalNamespace {
                namespace: Some(namespace),
                local_name: SelectorIdent(name),
                local_name_lower: SelectorIdent(lower),
                operation: match operation {
                    None => ParsedAttrSelectorOperation::Exists,
                    Some((operator, value, case_sensitivity)) => {
                        ParsedAttrSelectorOperation::WithValue {
                            operator,
                            case_sensitivity,
                            expected_value: SelectorString(value),
                        }
                    }
                },
                never_matches: false,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightningcss::printer::PrinterOptions;
    use lightningcss::traits::ToCss;
    use lightningcss::values::ident::Ident;
    use parcel_selectors::SelectorList as RawSelectorList;

    fn ident(name: &'static str) -> TokenOrValue<'static> {
        TokenOrValue::Token(Token::Ident(name.into()))
    }

    fn delim(value: char) -> TokenOrValue<'static> {
        TokenOrValue::Token(Token::Delim(value))
    }

    fn ws() -> TokenOrValue<'static> {
        TokenOrValue::Token(Token::WhiteSpace(" "))
    }

    fn colon() -> TokenOrValue<'static> {
        TokenOrValue::Token(Token::Colon)
    }

    fn function(name: &'static str, arguments: Vec<TokenOrValue<'static>>) -> TokenOrValue<'static> {
        TokenOrValue::Function(Function {
            name: Ident(name.into()),
            arguments: TokenList(arguments),
        })
    }

    fn render(tokens: Vec<TokenOrValue<'static>>) -> String {
        let selectors = parse_escape_args(&TokenList(tokens)).expect("escape args should parse");
        RawSelectorList(selectors.into())
            .to_css_string(PrinterOptions::default())
            .expect("selectors should serialize")
    }

    #[test]
    fn parses_type_selectors() {
        assert_eq!(render(vec![ident("h1")]), "h1");
    }

    #[test]
    fn parses_compound_class_selectors() {
        assert_eq!(
            render(vec![delim('.'), ident("foo"), delim('.'), ident("bar")]),
            ".foo.bar"
        );
    }

    #[test]
    fn parses_id_selectors() {
        assert_eq!(
            render(vec![TokenOrValue::Token(Token::IDHash("app".into()))]),
            "#app"
        );
    }

    #[test]
    fn whitespace_becomes_a_descendant_combinator() {
        assert_eq!(render(vec![ident("div"), ws(), ident("a")]), "div a");
    }

    #[test]
    fn explicit_combinators_swallow_surrounding_whitespace() {
        assert_eq!(
            render(vec![ident("div"), ws(), delim('>'), ws(), ident("a")]),
            "div > a"
        );
    }

    #[test]
    fn commas_split_the_selector_list() {
        assert_eq!(
            render(vec![
                ident("h1"),
                TokenOrValue::Token(Token::Comma),
                ws(),
                ident("h2"),
            ]),
            "h1, h2"
        );
    }

    #[test]
    fn parses_bare_attribute_selectors() {
        assert_eq!(
            render(vec![
                TokenOrValue::Token(Token::SquareBracketBlock),
                ident("data-x"),
                TokenOrValue::Token(Token::CloseSquareBracket),
            ]),
            "[data-x]"
        );
    }

    #[test]
    fn parses_attribute_operators_and_case_flags() {
        assert_eq!(
            render(vec![
                TokenOrValue::Token(Token::SquareBracketBlock),
                ident("data-x"),
                delim('='),
                TokenOrValue::Token(Token::String("y".into())),
                ws(),
                ident("i"),
                TokenOrValue::Token(Token::CloseSquareBracket),
            ]),
            "[data-x=\"y\" i]"
        );
    }

    #[test]
    fn parses_known_pseudo_classes() {
        assert_eq!(render(vec![ident("a"), colon(), ident("hover")]), "a:hover");
    }

    #[test]
    fn unknown_pseudo_classes_fall_back_to_custom() {
        assert_eq!(
            render(vec![ident("a"), colon(), ident("made-up")]),
            "a:made-up"
        );
    }

    #[test]
    fn parses_pseudo_elements() {
        assert_eq!(
            render(vec![ident("a"), colon(), colon(), ident("before")]),
            "a::before"
        );
    }

    #[test]
    fn parses_negation() {
        assert_eq!(
            render(vec![
                ident("a"),
                colon(),
                function("not", vec![delim('.'), ident("foo")]),
            ]),
            "a:not(.foo)"
        );
    }

    #[test]
    fn parses_an_plus_b() {
        assert_eq!(
            render(vec![
                ident("li"),
                colon(),
                function(
                    "nth-child",
                    vec![
                        TokenOrValue::Token(Token::Dimension {
                            has_sign: false,
                            value: 2.0,
                            int_value: Some(2),
                            unit: "n".into(),
                        }),
                        TokenOrValue::Token(Token::Number {
                            has_sign: true,
                            value: 1.0,
                            int_value: Some(1),
                        }),
                    ],
                ),
            ]),
            "li:nth-child(2n+1)"
        );
    }

    #[test]
    fn nth_keywords_expand() {
        assert_eq!(
            render(vec![
                ident("li"),
                colon(),
                function("nth-child", vec![ident("odd")]),
            ]),
            "li:nth-child(2n+1)"
        );
    }

    #[test]
    fn rejects_unexpected_delimiters() {
        let result = parse_escape_args(&TokenList(vec![delim('.'), delim('.')]));
        assert!(matches!(
            result,
            Err(ScopeSheetError::EscapeGrammar { .. })
        ));
    }

    #[test]
    fn rejects_leading_combinators() {
        let result = parse_escape_args(&TokenList(vec![delim('>'), ident("div")]));
        assert!(matches!(
            result,
            Err(ScopeSheetError::EscapeGrammar { .. })
        ));
    }

    #[test]
    fn rejects_trailing_combinators() {
        let result = parse_escape_args(&TokenList(vec![ident("div"), delim('>')]));
        assert!(matches!(
            result,
            Err(ScopeSheetError::EscapeGrammar { .. })
        ));
    }
}
