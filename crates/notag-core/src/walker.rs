//! Language-neutral view of struct declarations.
//!
//! Front ends implement [`SyntaxTree`] for their parsed files. The engine
//! implements [`StructVisitor`] and receives every struct in document order.

use std::path::Path;

use crate::types::Location;

/// One field of a struct declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    /// Field name. Embedded fields use their type name.
    pub name: &'a str,
    /// Raw tag literal including its delimiters, if the field has one.
    pub tag: Option<&'a str>,
    /// Position of the field declaration.
    pub location: Location,
}

/// A struct type with its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl<'a> {
    /// Declared type name, `None` for anonymous struct types.
    pub name: Option<&'a str>,
    /// Position of the struct type.
    pub location: Location,
    /// Fields in declaration order.
    pub fields: Vec<Field<'a>>,
}

/// Receives struct declarations from a [`SyntaxTree`].
pub trait StructVisitor {
    /// Called once per struct type, in document order.
    fn visit_struct(&mut self, decl: &StructDecl<'_>);
}

/// A parsed source file that can enumerate its struct declarations.
pub trait SyntaxTree {
    /// Path of the file relative to the analysis root.
    fn path(&self) -> &Path;

    /// Visits every struct type in the file in document order, including
    /// anonymous and nested ones.
    fn walk_structs(&self, visitor: &mut dyn StructVisitor);
}

impl<T: SyntaxTree + ?Sized> SyntaxTree for &T {
    fn path(&self) -> &Path {
        (**self).path()
    }

    fn walk_structs(&self, visitor: &mut dyn StructVisitor) {
        (**self).walk_structs(visitor);
    }
}
