use std::fmt;

use lazy_static::lazy_static;
use strum::{EnumCount, IntoEnumIterator};

use super::compound::{
    ArrayLiteral, Assignment, ConstantRef, HashLiteral, HashPair, MethodCall, ParenGroup, SplatArg,
};
use super::leaf::{
    FloatLiteral, IntLiteral, Keyword, NameRef, RootScope, StringLiteral, SymbolLiteral,
};
use super::source_text::SourceText;
use super::Emitter;
use crate::ast::Kind;
use crate::error::RegistryError;

type Table = [Option<&'static dyn Emitter>; Kind::COUNT];

lazy_static! {
    static ref STANDARD: Registry = RegistryBuilder::with_builtins()
        .and_then(RegistryBuilder::build_complete)
        .expect("built-in emitter table covers every kind exactly once");
}

/// Read-only `Kind → Emitter` table.
///
/// Built once through [`RegistryBuilder`]; lookups are an array index.
pub struct Registry {
    table: Table,
}

impl Registry {
    /// The built-in registry, covering every kind
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    pub fn get(&self, kind: Kind) -> Option<&'static dyn Emitter> {
        self.table[kind.index()]
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.get(kind).is_some()
    }

    /// Kinds with no emitter, in declaration order
    pub fn missing_kinds(&self) -> Vec<Kind> {
        Kind::iter().filter(|kind| !self.contains(*kind)).collect()
    }

    /// Registered `(kind, emitter)` pairs, in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (Kind, &'static dyn Emitter)> + '_ {
        Kind::iter().filter_map(|kind| self.get(kind).map(|emitter| (kind, emitter)))
    }

    pub fn len(&self) -> usize {
        self.table.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries().map(|(kind, emitter)| (kind, emitter.name())))
            .finish()
    }
}

/// Assembles a [`Registry`].
///
/// Each kind may be claimed by one emitter only. Registering a second,
/// different emitter for a kind is an error rather than an override.
pub struct RegistryBuilder {
    table: Table,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            table: [None; Kind::COUNT],
        }
    }

    /// Builder pre-populated with every built-in emitter.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        Self::with_builtins_except(&[])
    }

    /// Built-in emitters for every kind not in `excluded`, leaving those kinds
    /// free for custom emitters.
    pub fn with_builtins_except(excluded: &[Kind]) -> Result<Self, RegistryError> {
        let mut builder = Self::new();
        let builtins: [(&[Kind], &'static dyn Emitter); 16] = [
            (&[Kind::Lvar, Kind::Ivar, Kind::Cvar, Kind::Gvar], &NameRef),
            (&[Kind::Cbase], &RootScope),
            (&[Kind::Nil, Kind::True, Kind::False, Kind::SelfRef], &Keyword),
            (&[Kind::Int], &IntLiteral),
            (&[Kind::Float], &FloatLiteral),
            (&[Kind::Str], &StringLiteral),
            (&[Kind::Sym], &SymbolLiteral),
            (&[Kind::Const], &ConstantRef),
            (&[Kind::Array], &ArrayLiteral),
            (&[Kind::Hash], &HashLiteral),
            (&[Kind::Pair], &HashPair),
            (&[Kind::Splat], &SplatArg),
            (&[Kind::Begin], &ParenGroup),
            (
                &[Kind::Lvasgn, Kind::Ivasgn, Kind::Cvasgn, Kind::Gvasgn],
                &Assignment,
            ),
            (&[Kind::Send], &MethodCall),
            (
                &[Kind::Dstr, Kind::Regexp, Kind::Xstr, Kind::Heredoc],
                &SourceText,
            ),
        ];

        for (kinds, emitter) in builtins {
            let kinds: Vec<Kind> = kinds
                .iter()
                .copied()
                .filter(|kind| !excluded.contains(kind))
                .collect();
            builder.register(&kinds, emitter)?;
        }
        Ok(builder)
    }

    /// Associate every kind in `kinds` with `emitter`.
    ///
    /// Nothing is registered if any kind is already claimed by a different
    /// emitter type, even one reporting the same name. Re-registering the
    /// same emitter is a no-op.
    pub fn register(
        &mut self,
        kinds: &[Kind],
        emitter: &'static dyn Emitter,
    ) -> Result<&mut Self, RegistryError> {
        for &kind in kinds {
            if let Some(existing) = self.table[kind.index()] {
                if existing.emitter_type() != emitter.emitter_type() {
                    return Err(RegistryError::DuplicateRegistration {
                        kind,
                        existing: existing.name(),
                        incoming: emitter.name(),
                    });
                }
            }
        }

        for &kind in kinds {
            self.table[kind.index()] = Some(emitter);
        }
        Ok(self)
    }

    /// Build a registry that may leave kinds unhandled.
    pub fn build(self) -> Registry {
        Registry { table: self.table }
    }

    /// Build a registry, failing if any kind has no emitter.
    pub fn build_complete(self) -> Result<Registry, RegistryError> {
        let registry = self.build();
        let missing = registry.missing_kinds();
        if missing.is_empty() {
            Ok(registry)
        } else {
            Err(RegistryError::MissingKinds(missing))
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_covers_every_kind() {
        let registry = Registry::standard();
        assert!(registry.missing_kinds().is_empty());
        assert_eq!(registry.len(), Kind::COUNT);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut builder = RegistryBuilder::new();
        builder.register(&[Kind::Lvar], &NameRef).unwrap();

        let err = builder
            .register(&[Kind::Cbase, Kind::Lvar], &SourceText)
            .err()
            .unwrap();
        assert_eq!(
            err,
            RegistryError::DuplicateRegistration {
                kind: Kind::Lvar,
                existing: "NameRef",
                incoming: "SourceText",
            }
        );

        // The failed call registered nothing.
        let registry = builder.build();
        assert!(!registry.contains(Kind::Cbase));
        assert_eq!(registry.get(Kind::Lvar).unwrap().name(), "NameRef");
    }

    /// Claims to be `NameRef` but renders something else
    struct Impostor;

    impl Emitter for Impostor {
        fn name(&self) -> &'static str {
            "NameRef"
        }

        fn render(
            &self,
            _node: &crate::ast::Node,
            cx: &mut crate::emit::EmitContext<'_>,
        ) -> Result<(), crate::error::EmitError> {
            cx.write("HIJACKED");
            Ok(())
        }
    }

    #[test]
    fn test_same_name_different_emitter_fails() {
        let mut builder = RegistryBuilder::new();
        builder.register(&[Kind::Lvar], &NameRef).unwrap();

        let err = builder.register(&[Kind::Lvar], &Impostor).err().unwrap();
        assert_eq!(
            err,
            RegistryError::DuplicateRegistration {
                kind: Kind::Lvar,
                existing: "NameRef",
                incoming: "NameRef",
            }
        );

        let registry = builder.build();
        let lvar = crate::ast::Node::new(Kind::Lvar, vec!["x".into()]);
        let mut buf = String::new();
        crate::emit::dispatch(&registry, &lvar, &mut buf).unwrap();
        assert_eq!(buf, "x");
    }

    #[test]
    fn test_same_emitter_twice_is_allowed() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(&[Kind::Lvar], &NameRef)
            .unwrap()
            .register(&[Kind::Lvar, Kind::Ivar], &NameRef)
            .unwrap();
        assert_eq!(builder.build().len(), 2);
    }

    #[test]
    fn test_build_complete_reports_missing() {
        let mut builder = RegistryBuilder::new();
        builder.register(&[Kind::Lvar], &NameRef).unwrap();
        match builder.build_complete() {
            Err(RegistryError::MissingKinds(missing)) => {
                assert_eq!(missing.len(), Kind::COUNT - 1);
                assert!(!missing.contains(&Kind::Lvar));
                assert_eq!(missing[0], Kind::Ivar);
            }
            other => panic!("expected MissingKinds, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_builtins_except_leaves_kind_free() {
        let mut builder = RegistryBuilder::with_builtins_except(&[Kind::Str]).unwrap();
        builder.register(&[Kind::Str], &SourceText).unwrap();
        let registry = builder.build_complete().unwrap();
        assert_eq!(registry.get(Kind::Str).unwrap().name(), "SourceText");
        assert_eq!(registry.get(Kind::Sym).unwrap().name(), "SymbolLiteral");
    }

    #[test]
    fn test_builtins_conflict_with_custom() {
        let mut builder = RegistryBuilder::with_builtins().unwrap();
        assert!(builder.register(&[Kind::Str], &SourceText).is_err());
    }

    #[test]
    fn test_debug_lists_emitters() {
        let mut builder = RegistryBuilder::new();
        builder.register(&[Kind::Cbase], &RootScope).unwrap();
        assert_eq!(format!("{:?}", builder.build()), "{Cbase: \"RootScope\"}");
    }
}
