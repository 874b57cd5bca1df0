//! Lowering of surface types to [`Ty`].

use cr_ast::{Body, Qualifiers, TypeRef, TypeRefId};
use cr_intern::Interner;
use cr_span::FileSpan;

use crate::{
    error::{RegionckError, RegionckResult, TypeErrorKind, Unsupported},
    region::{DefiningSite, RegionArena, RegionKind, RegionVid},
    ty::{BorrowKind, Ty},
};

/// Whether deconstruction allocates a region per reference level.
pub(crate) enum RegionAlloc<'r> {
    /// Leave every `region` empty
    Disabled,
    /// Allocate existential regions attributed to `site`
    Fresh {
        regions: &'r mut RegionArena,
        site: DefiningSite,
    },
}

impl RegionAlloc<'_> {
    fn next(&mut self) -> Option<RegionVid> {
        match self {
            Self::Disabled => None,
            Self::Fresh { regions, site } => {
                Some(regions.fresh(RegionKind::Existential, None, Some(*site)))
            }
        }
    }
}

/// Lowers the surface type `ty`.
///
/// Qualifiers on `Qualified` and `Typedef` wrappers are folded into the type
/// they resolve to. Inner reference levels get their regions first, so in
/// `int **pp` the pointee reference has the smaller id.
pub(crate) fn deconstruct_type(
    body: &Body,
    interner: &Interner,
    ty: TypeRefId,
    alloc: &mut RegionAlloc<'_>,
    span: FileSpan,
) -> RegionckResult<Ty> {
    deconstruct_qualified(body, interner, ty, Qualifiers::NONE, alloc, span)
}

fn deconstruct_qualified(
    body: &Body,
    interner: &Interner,
    ty: TypeRefId,
    quals: Qualifiers,
    alloc: &mut RegionAlloc<'_>,
    span: FileSpan,
) -> RegionckResult<Ty> {
    match &body.types[ty] {
        TypeRef::Qualified { qualifiers, inner } => deconstruct_qualified(
            body,
            interner,
            *inner,
            quals.merge(*qualifiers),
            alloc,
            span,
        ),
        TypeRef::Typedef { underlying, .. } => {
            deconstruct_qualified(body, interner, *underlying, quals, alloc, span)
        }
        TypeRef::Builtin(kind) => {
            if quals.is_restrict {
                return Err(RegionckError::type_error(
                    TypeErrorKind::RestrictOnNonPointer,
                    span,
                ));
            }
            Ok(Ty::Builtin {
                kind: *kind,
                is_const: quals.is_const,
            })
        }
        TypeRef::Pointer { pointee } => {
            let pointee =
                deconstruct_qualified(body, interner, *pointee, Qualifiers::NONE, alloc, span)?;
            if pointee.is_const() && quals.is_restrict {
                return Err(RegionckError::type_error(
                    TypeErrorKind::ConstRestrictPointer,
                    span,
                ));
            }
            let borrow_kind = if pointee.is_const() {
                BorrowKind::Shared
            } else {
                BorrowKind::Mutable
            };
            Ok(Ty::Ref {
                borrow_kind,
                pointee: Box::new(pointee),
                region: alloc.next(),
                is_const: quals.is_const,
                is_restrict: quals.is_restrict,
            })
        }
        TypeRef::Elaborated { keyword, name } => Err(RegionckError::unsupported(
            Unsupported::ElaboratedType {
                keyword: *keyword,
                name: interner.try_resolve(*name).unwrap_or_default().to_string(),
            },
            span,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_ast::{BuiltinKind, TagKind};
    use cr_span::FileId;

    fn span() -> FileSpan {
        FileSpan::detached(FileId(0))
    }

    fn lower(body: &Body, ty: TypeRefId) -> RegionckResult<Ty> {
        deconstruct_type(body, &Interner::new(), ty, &mut RegionAlloc::Disabled, span())
    }

    #[test]
    fn test_const_pointee_is_shared() {
        let mut body = Body::new();
        let int = body.builtin(BuiltinKind::Int);
        let const_int = body.qualified(Qualifiers::CONST, int);
        let ptr = body.pointer(const_int);

        let ty = lower(&body, ptr).unwrap();
        assert_eq!(ty.borrow_kind(), Some(BorrowKind::Shared));
        assert_eq!(ty.region(), None);
        assert_eq!(ty.to_string(), body.describe_type(ptr, &Interner::new()));
    }

    #[test]
    fn test_fresh_region_per_level() {
        let mut body = Body::new();
        let int = body.builtin(BuiltinKind::Int);
        let ptr = body.pointer(int);
        let ptr_ptr = body.pointer(ptr);
        let decl_ty = body.builtin(BuiltinKind::Int);
        let decl = body.alloc_decl(cr_ast::VarDecl {
            name: Interner::new().intern("pp"),
            ty: decl_ty,
            init: None,
            is_param: false,
            span: span(),
        });

        let mut regions = RegionArena::new();
        let mut alloc = RegionAlloc::Fresh {
            regions: &mut regions,
            site: DefiningSite::Decl(decl),
        };
        let ty = deconstruct_type(&body, &Interner::new(), ptr_ptr, &mut alloc, span()).unwrap();

        assert_eq!(ty.regions(), vec![RegionVid(2), RegionVid(1)]);
        assert_eq!(regions.len(), 3);
        assert_eq!(
            regions[RegionVid(1)].defining_site,
            Some(DefiningSite::Decl(decl))
        );
        assert_eq!(regions[RegionVid(1)].kind, RegionKind::Existential);
    }

    #[test]
    fn test_restrict_rules() {
        let mut body = Body::new();
        let int = body.builtin(BuiltinKind::Int);
        let restrict_int = body.qualified(Qualifiers::RESTRICT, int);
        let const_int = body.qualified(Qualifiers::CONST, int);
        let const_ptr = body.pointer(const_int);
        let restrict_const_ptr = body.qualified(Qualifiers::RESTRICT, const_ptr);
        let mut_ptr = body.pointer(int);
        let restrict_mut_ptr = body.qualified(Qualifiers::RESTRICT, mut_ptr);

        assert!(matches!(
            lower(&body, restrict_int),
            Err(RegionckError::TypeError {
                kind: TypeErrorKind::RestrictOnNonPointer,
                ..
            })
        ));
        assert!(matches!(
            lower(&body, restrict_const_ptr),
            Err(RegionckError::TypeError {
                kind: TypeErrorKind::ConstRestrictPointer,
                ..
            })
        ));
        let ty = lower(&body, restrict_mut_ptr).unwrap();
        assert_eq!(ty.to_string(), "int * restrict");
    }

    #[test]
    fn test_typedef_qualifiers_merge() {
        let mut interner = Interner::new();
        let mut body = Body::new();
        let int = body.builtin(BuiltinKind::Int);
        let alias = body.alloc_type(TypeRef::Typedef {
            name: interner.intern("my_int"),
            underlying: int,
        });
        let const_alias = body.qualified(Qualifiers::CONST, alias);
        let ptr = body.pointer(const_alias);

        let ty = lower(&body, ptr).unwrap();
        assert_eq!(ty.borrow_kind(), Some(BorrowKind::Shared));
        assert_eq!(ty.to_string(), "const int *");
    }

    #[test]
    fn test_elaborated_is_unsupported() {
        let mut interner = Interner::new();
        let mut body = Body::new();
        let node = body.alloc_type(TypeRef::Elaborated {
            keyword: TagKind::Struct,
            name: interner.intern("node"),
        });
        let ptr = body.pointer(node);

        let err = deconstruct_type(&body, &interner, ptr, &mut RegionAlloc::Disabled, span())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported construct at file#0@0..0: elaborated type `struct node` is not supported"
        );
    }
}
