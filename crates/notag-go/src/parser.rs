//! Go source files parsed with Tree-sitter.

use notag_core::{Field, Location, StructDecl, StructVisitor, SyntaxTree};
use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::GoError;

/// A parsed `.go` file.
pub struct GoFile {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl GoFile {
    /// Parses `source`, recording `path` (relative to the analysis root) for
    /// diagnostics.
    ///
    /// Syntax errors do not fail the parse; Tree-sitter recovers and the
    /// well-formed parts of the file are still walked.
    ///
    /// # Errors
    ///
    /// Returns an error if the Go grammar cannot be loaded or the parser
    /// gives up.
    pub fn parse(path: impl Into<PathBuf>, source: String) -> Result<Self, GoError> {
        let path = path.into();
        let language: Language = tree_sitter_go::LANGUAGE.into();

        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| GoError::Parse { path: path.clone() })?;

        if tree.root_node().has_error() {
            tracing::warn!("Syntax errors in {}, checking recoverable parts", path.display());
        }

        Ok(Self { path, source, tree })
    }

    /// Package name from the `package` clause.
    #[must_use]
    pub fn package_name(&self) -> Option<&str> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        let clause = root
            .children(&mut cursor)
            .find(|n| n.kind() == "package_clause")?;

        let mut cursor = clause.walk();
        let ident = clause
            .children(&mut cursor)
            .find(|n| n.kind() == "package_identifier")?;
        Some(self.text(ident))
    }

    /// Returns true if Tree-sitter had to recover from syntax errors.
    #[must_use]
    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn location(&self, node: Node<'_>) -> Location {
        let start = node.start_position();
        Location::new(self.path.clone(), start.row + 1, start.column + 1)
            .with_span(node.start_byte(), node.end_byte() - node.start_byte())
    }

    fn struct_decl(&self, node: Node<'_>) -> StructDecl<'_> {
        let name = node
            .parent()
            .filter(|p| matches!(p.kind(), "type_spec" | "type_alias"))
            .and_then(|p| p.child_by_field_name("name"))
            .map(|n| self.text(n));

        let mut fields = Vec::new();
        let mut cursor = node.walk();
        for list in node.children(&mut cursor) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            let mut list_cursor = list.walk();
            for decl in list.named_children(&mut list_cursor) {
                if decl.kind() == "field_declaration" {
                    fields.extend(self.field(decl));
                }
            }
        }

        StructDecl {
            name,
            location: self.location(node),
            fields,
        }
    }

    fn field(&self, decl: Node<'_>) -> Option<Field<'_>> {
        let mut cursor = decl.walk();
        let first_name = decl
            .children_by_field_name("name", &mut cursor)
            .next()
            .map(|n| self.text(n));
        let name = match first_name {
            Some(name) => name,
            None => embedded_name(self.text(decl.child_by_field_name("type")?)),
        };

        Some(Field {
            name,
            tag: decl.child_by_field_name("tag").map(|t| self.text(t)),
            location: self.location(decl),
        })
    }
}

/// Name of an embedded field: `*pkg.Base[T]` is named `Base`.
fn embedded_name(ty: &str) -> &str {
    let ty = ty.trim_start_matches('*');
    let ty = ty.split('[').next().unwrap_or(ty);
    ty.rsplit('.').next().unwrap_or(ty).trim()
}

impl SyntaxTree for GoFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn walk_structs(&self, visitor: &mut dyn StructVisitor) {
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if node.kind() == "struct_type" {
                visitor.visit_struct(&self.struct_decl(node));
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }
}

impl std::fmt::Debug for GoFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoFile")
            .field("path", &self.path)
            .field("package", &self.package_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect {
        structs: Vec<(Option<String>, Vec<(String, Option<String>, usize)>)>,
    }

    impl StructVisitor for Collect {
        fn visit_struct(&mut self, decl: &StructDecl<'_>) {
            self.structs.push((
                decl.name.map(str::to_owned),
                decl.fields
                    .iter()
                    .map(|f| (f.name.to_owned(), f.tag.map(str::to_owned), f.location.line))
                    .collect(),
            ));
        }
    }

    fn parse(src: &str) -> GoFile {
        GoFile::parse("test.go", src.to_owned()).unwrap()
    }

    fn walk(src: &str) -> Collect {
        let mut collect = Collect::default();
        parse(src).walk_structs(&mut collect);
        collect
    }

    #[test]
    fn extracts_package_name() {
        assert_eq!(parse("package models\n").package_name(), Some("models"));
        assert_eq!(parse("").package_name(), None);
    }

    #[test]
    fn extracts_named_struct_fields_and_tags() {
        let c = walk(
            "package p\n\ntype User struct {\n\tID   int    `db:\"id\"`\n\tName string `json:\"name\" xml:\"Name\"`\n\tAge  int\n}\n",
        );
        assert_eq!(c.structs.len(), 1);
        let (name, fields) = &c.structs[0];
        assert_eq!(name.as_deref(), Some("User"));
        assert_eq!(
            fields,
            &vec![
                ("ID".to_string(), Some("`db:\"id\"`".to_string()), 4),
                (
                    "Name".to_string(),
                    Some("`json:\"name\" xml:\"Name\"`".to_string()),
                    5
                ),
                ("Age".to_string(), None, 6),
            ]
        );
    }

    #[test]
    fn interpreted_string_tags_are_kept_raw() {
        let c = walk("package p\ntype T struct {\n\tA int \"json:\\\"a\\\"\"\n}\n");
        assert_eq!(c.structs[0].1[0].1.as_deref(), Some("\"json:\\\"a\\\"\""));
    }

    #[test]
    fn multi_name_field_uses_first_name() {
        let c = walk("package p\ntype T struct {\n\tA, B string `json:\"x\"`\n}\n");
        assert_eq!(c.structs[0].1.len(), 1);
        assert_eq!(c.structs[0].1[0].0, "A");
    }

    #[test]
    fn embedded_fields_are_named_after_their_type() {
        let c = walk(
            "package p\nimport \"time\"\ntype T struct {\n\t*Base `json:\"b\"`\n\ttime.Time\n}\n",
        );
        let names: Vec<&str> = c.structs[0].1.iter().map(|f| f.0.as_str()).collect();
        assert_eq!(names, ["Base", "Time"]);
    }

    #[test]
    fn visits_anonymous_and_nested_structs_in_document_order() {
        let c = walk(
            "package p\n\ntype Outer struct {\n\tInner struct {\n\t\tX int `json:\"x\"`\n\t} `json:\"inner\"`\n}\n\nfunc f() {\n\tv := struct {\n\t\tY int `xml:\"y\"`\n\t}{}\n\t_ = v\n}\n\ntype Last struct{ Z int }\n",
        );
        let names: Vec<Option<&str>> = c.structs.iter().map(|s| s.0.as_deref()).collect();
        assert_eq!(names, [Some("Outer"), None, None, Some("Last")]);
        assert_eq!(c.structs[0].1[0].0, "Inner");
        assert_eq!(c.structs[1].1[0].0, "X");
        assert_eq!(c.structs[2].1[0].0, "Y");
    }

    #[test]
    fn grouped_type_declarations() {
        let c = walk("package p\ntype (\n\tA struct{ X int }\n\tB struct{ Y int }\n)\n");
        let names: Vec<Option<&str>> = c.structs.iter().map(|s| s.0.as_deref()).collect();
        assert_eq!(names, [Some("A"), Some("B")]);
    }

    #[test]
    fn non_struct_types_are_ignored() {
        let c = walk("package p\ntype ID int\ntype S interface{ M() }\nvar x = map[string]int{}\n");
        assert!(c.structs.is_empty());
    }

    #[test]
    fn syntax_errors_are_tolerated() {
        let file = parse("package p\ntype T struct {\n\tA int `json:\"a\"`\n}\nfunc (\n");
        assert!(file.has_syntax_errors());
        let mut c = Collect::default();
        file.walk_structs(&mut c);
        assert_eq!(c.structs.len(), 1);
    }

    #[test]
    fn field_location_spans_declaration() {
        let src = "package p\ntype T struct {\n\tA int `json:\"a\"`\n}\n";
        let file = parse(src);
        struct Spans(Vec<Location>);
        impl StructVisitor for Spans {
            fn visit_struct(&mut self, decl: &StructDecl<'_>) {
                self.0.extend(decl.fields.iter().map(|f| f.location.clone()));
            }
        }
        let mut spans = Spans(Vec::new());
        file.walk_structs(&mut spans);

        let loc = &spans.0[0];
        assert_eq!((loc.line, loc.column), (3, 2));
        assert_eq!(&src[loc.offset..loc.offset + loc.length], "A int `json:\"a\"`");
    }

    #[test]
    fn embedded_name_strips_pointer_package_and_generics() {
        assert_eq!(embedded_name("*pkg.Base"), "Base");
        assert_eq!(embedded_name("Base[T]"), "Base");
        assert_eq!(embedded_name("pkg.List[int, string]"), "List");
    }
}
