//! Pattern binding: from `MatchPattern`s to compiled sites.
//!
//! Compiling `TypeName(p1, ..., pn)`:
//! 1. resolve `TypeName` to a contract: a user-supplied contract when one
//!    is registered, else one synthesized from the type's declaration
//!    (once per unit);
//! 2. check `n` against the contract's arity (E3004 at the pattern);
//! 3. bind each sub-pattern against the component type at its position;
//! 4. emit a deconstruction node referring to the contract.
//!
//! The same lowering serves `let` destructuring, `match` arms, parameters
//! and nested patterns. A unit with any error yields no compiled unit.

use keel_diagnostic::{
    pattern_arity_mismatch, unknown_deconstructor, Diagnostic, DiagnosticConfig,
    DiagnosticQueue, ErrorCode, ErrorGuaranteed,
};
use keel_ir::{Literal, MatchPattern, Name, SharedInterner, Span, StringInterner, Ty, TypeIdent};
use keel_stack::ensure_sufficient_stack;
use keel_types::{
    synthesize_contract, ProductRegistry, Resolution, SynthesisError, SynthesizedContract,
};
use rustc_hash::FxHashSet;

use crate::{ContractId, ContractTable, FlatPattern, Matcher, ScrutineePath};

/// Limits for one binding run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinderConfig {
    /// Deepest pattern nesting accepted (E3006 beyond it).
    pub max_depth: usize,
    /// Errors reported before giving up on the unit (0 = unlimited).
    pub error_limit: usize,
}

impl Default for BinderConfig {
    fn default() -> Self {
        BinderConfig {
            max_depth: 64,
            error_limit: 10,
        }
    }
}

impl BinderConfig {
    /// No nesting limit, no error limit.
    pub fn unlimited() -> Self {
        BinderConfig {
            max_depth: usize::MAX,
            error_limit: 0,
        }
    }
}

/// Where a pattern appears.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SiteKind {
    Let,
    Match,
    Param,
}

/// A pattern site handed over by the frontend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteDecl {
    pub kind: SiteKind,
    /// Static type of the scrutinee, when known.
    pub scrutinee: Option<Ty>,
    /// One pattern for `let` and parameters, one per arm for `match`.
    pub patterns: Vec<MatchPattern>,
    pub span: Span,
}

impl SiteDecl {
    pub fn let_site(pattern: MatchPattern, scrutinee: Option<Ty>, span: Span) -> Self {
        SiteDecl {
            kind: SiteKind::Let,
            scrutinee,
            patterns: vec![pattern],
            span,
        }
    }

    pub fn match_site(arms: Vec<MatchPattern>, scrutinee: Option<Ty>, span: Span) -> Self {
        SiteDecl {
            kind: SiteKind::Match,
            scrutinee,
            patterns: arms,
            span,
        }
    }

    pub fn param(pattern: MatchPattern, ty: Ty, span: Span) -> Self {
        SiteDecl {
            kind: SiteKind::Param,
            scrutinee: Some(ty),
            patterns: vec![pattern],
            span,
        }
    }
}

/// A compilation unit's pattern sites and declared exports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternUnit {
    pub name: String,
    pub exports: Vec<String>,
    pub sites: Vec<SiteDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledArm {
    pub pattern: FlatPattern,
    /// Bound names and the paths that reach them.
    pub bindings: Vec<(Name, ScrutineePath)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledSite {
    pub kind: SiteKind,
    pub span: Span,
    pub arms: Vec<CompiledArm>,
}

/// Output of a successful binding run.
#[derive(Debug)]
pub struct CompiledUnit {
    name: String,
    interner: SharedInterner,
    sites: Vec<CompiledSite>,
    contracts: ContractTable,
    exported_symbols: Vec<String>,
}

impl CompiledUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sites(&self) -> &[CompiledSite] {
        &self.sites
    }

    /// Contracts referenced by deconstruction nodes. Internal to the unit.
    pub fn contracts(&self) -> &ContractTable {
        &self.contracts
    }

    /// Symbols the unit exports. Contracts are never among them.
    pub fn exported_symbols(&self) -> &[String] {
        &self.exported_symbols
    }

    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.contracts, &self.interner)
    }
}

/// A unit that failed to bind.
#[derive(Debug)]
pub struct BindFailure {
    pub guaranteed: ErrorGuaranteed,
    pub diagnostics: Vec<Diagnostic>,
}

/// Binds the pattern sites of one unit.
pub struct Binder<'r> {
    registry: &'r ProductRegistry,
    config: BinderConfig,
    queue: DiagnosticQueue,
    contracts: ContractTable,
    /// Types whose synthesis failed; reported once per unit.
    rejected: FxHashSet<TypeIdent>,
    site_span: Span,
}

impl<'r> Binder<'r> {
    pub fn new(registry: &'r ProductRegistry, config: BinderConfig) -> Self {
        Binder {
            registry,
            config,
            queue: DiagnosticQueue::with_config(DiagnosticConfig {
                error_limit: config.error_limit,
                ..DiagnosticConfig::default()
            }),
            contracts: ContractTable::new(),
            rejected: FxHashSet::default(),
            site_span: Span::DUMMY,
        }
    }

    fn interner(&self) -> &'r StringInterner {
        self.registry.interner()
    }

    fn error(&mut self, diag: Diagnostic) {
        self.queue.add(diag);
    }

    pub fn bind_site(&mut self, site: &SiteDecl) -> CompiledSite {
        self.site_span = site.span;
        let arms = site
            .patterns
            .iter()
            .map(|pattern| {
                let flat = self.bind_pattern(pattern, site.scrutinee.as_ref());
                let mut bindings = Vec::new();
                flat.collect_bindings(&ScrutineePath::new(), &mut bindings);
                CompiledArm {
                    pattern: flat,
                    bindings,
                }
            })
            .collect();
        CompiledSite {
            kind: site.kind,
            span: site.span,
            arms,
        }
    }

    /// Bind one top-level pattern against the scrutinee type.
    pub fn bind_pattern(&mut self, pattern: &MatchPattern, expected: Option<&Ty>) -> FlatPattern {
        let flat = self.lower(pattern, expected, 0);

        let mut seen = FxHashSet::default();
        let mut reported = FxHashSet::default();
        for name in flat.bound_names() {
            if !seen.insert(name) && reported.insert(name) {
                let span = pattern.span().unwrap_or(self.site_span);
                self.error(
                    Diagnostic::error(ErrorCode::E3005)
                        .with_message(format!(
                            "`{}` is bound more than once in the same pattern",
                            self.interner().lookup(name)
                        ))
                        .with_label(span, "rebound here"),
                );
            }
        }
        flat
    }

    fn lower(&mut self, pattern: &MatchPattern, expected: Option<&Ty>, depth: usize) -> FlatPattern {
        if depth > self.config.max_depth {
            let span = pattern.span().unwrap_or(self.site_span);
            self.error(
                Diagnostic::error(ErrorCode::E3006)
                    .with_message(format!(
                        "pattern nesting exceeds the limit of {}",
                        self.config.max_depth
                    ))
                    .with_label(span, "nested too deeply"),
            );
            return FlatPattern::Wildcard;
        }

        ensure_sufficient_stack(|| match pattern {
            MatchPattern::Wildcard => FlatPattern::Wildcard,
            MatchPattern::Binding(name) => FlatPattern::Binding(*name),
            MatchPattern::Literal(lit) => self.lower_literal(lit, expected),
            MatchPattern::Tuple(elems) => self.lower_tuple(elems, expected, depth),
            MatchPattern::Deconstruct { ty, args, span } => {
                self.lower_deconstruct(*ty, args, *span, expected, depth)
            }
            MatchPattern::Or(alts) => self.lower_or(alts, expected, depth),
            MatchPattern::At { name, inner } => FlatPattern::At {
                name: *name,
                inner: Box::new(self.lower(inner, expected, depth + 1)),
            },
        })
    }

    fn mismatch(&mut self, span: Span, expected: &Ty, found: &str) {
        let expected = expected.display(self.interner()).to_string();
        self.error(
            Diagnostic::error(ErrorCode::E3003)
                .with_message(format!(
                    "pattern does not fit the scrutinee: expected `{expected}`, found {found}"
                ))
                .with_label(span, format!("expected `{expected}`")),
        );
    }

    fn lower_literal(&mut self, lit: &Literal, expected: Option<&Ty>) -> FlatPattern {
        let (flat, ty, kind) = match lit {
            Literal::Int(n) => (FlatPattern::LitInt(*n), Ty::Int, "an int literal"),
            Literal::Bool(b) => (FlatPattern::LitBool(*b), Ty::Bool, "a bool literal"),
            Literal::Str(s) => (FlatPattern::LitStr(*s), Ty::Str, "a str literal"),
            Literal::Char(c) => (FlatPattern::LitChar(*c), Ty::Char, "a char literal"),
        };
        if let Some(expected) = expected {
            if *expected != ty {
                self.mismatch(self.site_span, expected, kind);
            }
        }
        flat
    }

    fn lower_tuple(
        &mut self,
        elems: &[MatchPattern],
        expected: Option<&Ty>,
        depth: usize,
    ) -> FlatPattern {
        let elem_tys: Option<Vec<Ty>> = match expected {
            None => None,
            Some(Ty::Tuple(tys)) if tys.len() == elems.len() => Some(tys.clone()),
            Some(other) => {
                let found = format!("a tuple pattern of {} elements", elems.len());
                self.mismatch(self.site_span, other, &found);
                None
            }
        };
        FlatPattern::Tuple(
            elems
                .iter()
                .enumerate()
                .map(|(i, elem)| {
                    let ty = elem_tys.as_ref().and_then(|tys| tys.get(i));
                    self.lower(elem, ty, depth + 1)
                })
                .collect(),
        )
    }

    fn lower_or(
        &mut self,
        alts: &[MatchPattern],
        expected: Option<&Ty>,
        depth: usize,
    ) -> FlatPattern {
        let flat: Vec<FlatPattern> = alts
            .iter()
            .map(|alt| self.lower(alt, expected, depth + 1))
            .collect();

        let sorted_names = |p: &FlatPattern| {
            let mut names = p.bound_names();
            names.sort();
            names
        };
        if let Some((first, rest)) = flat.split_first() {
            let expected_names = sorted_names(first);
            if rest.iter().any(|alt| sorted_names(alt) != expected_names) {
                self.error(
                    Diagnostic::error(ErrorCode::E3005)
                        .with_message("alternatives of an or-pattern bind different names")
                        .with_label(self.site_span, "every alternative must bind the same names"),
                );
            }
        }
        FlatPattern::Or(flat)
    }

    fn lower_deconstruct(
        &mut self,
        written: Name,
        args: &[MatchPattern],
        span: Span,
        expected: Option<&Ty>,
        depth: usize,
    ) -> FlatPattern {
        let interner = self.interner();
        let written_str = interner.lookup(written);

        let ident = match self.registry.resolve(written) {
            Resolution::Unique(ident) => ident,
            Resolution::Unknown => {
                self.error(unknown_deconstructor(span, written_str));
                return FlatPattern::Wildcard;
            }
            Resolution::Ambiguous(candidates) => {
                let mut paths: Vec<&str> = candidates.iter().map(|c| c.path(interner)).collect();
                paths.sort_unstable();
                self.error(
                    Diagnostic::error(ErrorCode::E3001)
                        .with_message(format!("`{written_str}` is ambiguous"))
                        .with_label(span, "could refer to several types")
                        .with_note(format!("candidates: {}", paths.join(", ")))
                        .with_suggestion("write the fully qualified path"),
                );
                return FlatPattern::Wildcard;
            }
        };

        match expected {
            None => {}
            Some(Ty::Named(want)) if *want == ident => {}
            Some(other) => {
                let found = format!("a `{}` pattern", ident.path(interner));
                self.mismatch(span, other, &found);
                return FlatPattern::Wildcard;
            }
        }

        let Some(contract) = self.contract_for(ident, span) else {
            return FlatPattern::Wildcard;
        };

        let component_types = self
            .contracts
            .component_types(contract)
            .map(<[Ty]>::to_vec)
            .unwrap_or_default();
        if component_types.len() != args.len() {
            let mut diag =
                pattern_arity_mismatch(span, written_str, component_types.len(), args.len());
            if let Some(decl) = self.registry.decl(ident).filter(|d| !d.span.is_empty()) {
                diag = diag.with_secondary_label(decl.span, "type declared here");
            }
            self.error(diag);
            return FlatPattern::Wildcard;
        }

        tracing::trace!(
            ty = ident.path(interner),
            contract = contract.raw(),
            "bound deconstruction pattern"
        );

        let fields = args
            .iter()
            .zip(&component_types)
            .map(|(arg, ty)| self.lower(arg, Some(ty), depth + 1))
            .collect();
        FlatPattern::Deconstruct { contract, fields }
    }

    /// The unit's contract for `ident`, adding it on first use.
    fn contract_for(&mut self, ident: TypeIdent, span: Span) -> Option<ContractId> {
        if let Some(id) = self.contracts.lookup(ident) {
            return Some(id);
        }
        let interner = self.interner();
        let path = ident.path(interner);

        if let Some(user) = self.registry.user_contract(ident) {
            tracing::debug!(ty = path, "using user-supplied destructuring contract");
            return Some(self.contracts.insert(user.clone(), None));
        }

        let no_contract = |reason: &str| {
            Diagnostic::error(ErrorCode::E3002)
                .with_message(format!("`{path}` cannot be deconstructed"))
                .with_label(span, "no destructuring contract")
                .with_note(reason.to_owned())
        };

        if self.rejected.contains(&ident) {
            self.error(no_contract("it is not a structural product type"));
            return None;
        }
        let Some(decl) = self.registry.decl(ident) else {
            self.error(no_contract("the type has no declaration in this session"));
            return None;
        };

        match synthesize_contract(decl, interner) {
            Ok(SynthesizedContract { contract, metadata }) => {
                Some(self.contracts.insert(contract, Some(metadata)))
            }
            Err(SynthesisError::NotAProduct(errors)) => {
                self.rejected.insert(ident);
                let decl_span = decl.span;
                for error in &errors {
                    self.error(error.to_diagnostic(ident, decl_span, interner));
                }
                self.error(no_contract("it is not a structural product type"));
                None
            }
            Err(SynthesisError::Malformed(err)) => {
                self.rejected.insert(ident);
                self.error(
                    Diagnostic::error(ErrorCode::E9001)
                        .with_message(format!("contract synthesis failed: {err}"))
                        .with_label(span, "while binding this pattern"),
                );
                None
            }
        }
    }

    /// Finish the unit: the compiled unit, or every diagnostic if any
    /// error was reported.
    pub fn finish(
        mut self,
        unit: &PatternUnit,
        sites: Vec<CompiledSite>,
    ) -> Result<CompiledUnit, BindFailure> {
        if let Some(guaranteed) = self.queue.has_errors() {
            return Err(BindFailure {
                guaranteed,
                diagnostics: self.queue.flush(),
            });
        }
        tracing::debug!(
            unit = %unit.name,
            sites = sites.len(),
            contracts = self.contracts.len(),
            synthesized = self.contracts.synthesized_count(),
            "bound pattern unit"
        );
        Ok(CompiledUnit {
            name: unit.name.clone(),
            interner: self.registry.interner().clone(),
            sites,
            contracts: self.contracts,
            exported_symbols: unit.exports.clone(),
        })
    }
}

/// Bind every site of `unit` against `registry`.
pub fn compile_unit(
    registry: &ProductRegistry,
    unit: &PatternUnit,
    config: BinderConfig,
) -> Result<CompiledUnit, BindFailure> {
    let mut binder = Binder::new(registry, config);
    // Past the error limit the queue keeps one marker and drops the rest.
    let sites = unit.sites.iter().map(|site| binder.bind_site(site)).collect();
    binder.finish(unit, sites)
}
