use std::borrow::Cow;

use heck::{AsPascalCase, AsSnekCase};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

/// A schema name, cleaned for use in TypeScript identifiers
/// and file names.
///
/// All the names derived from one [`CodegenIdent`] are stable: the same
/// schema name always produces the same identifiers, across runs
/// and output modes.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CodegenIdent(String);

impl CodegenIdent {
    pub fn new(name: &str) -> Self {
        Self(clean(name))
    }

    /// Returns the PascalCase type name, like `PetStore`.
    pub fn to_type_name(&self) -> String {
        let name = format!("{}", AsPascalCase(&self.0));
        match name.chars().next() {
            Some(c) if unicode_ident::is_xid_start(c) => name,
            _ => format!("_{name}"),
        }
    }

    /// Returns the validator identifier, like `PetStoreSchema`.
    pub fn to_schema_name(&self) -> String {
        format!("{}Schema", self.to_type_name())
    }

    /// Returns the name of the locally declared type for a
    /// recursive schema, like `PetStoreType`.
    pub fn to_recursive_type_name(&self) -> String {
        format!("{}Type", self.to_type_name())
    }

    /// Returns the snake_case file name without an extension,
    /// like `pet_store`.
    pub fn to_file_name(&self) -> String {
        match &*self.0 {
            "" => "_".to_owned(),
            name => format!("{}", AsSnekCase(name)),
        }
    }
}

/// Assigns every schema an identifier that's unique within one run.
///
/// Distinct schema names can clean to the same identifier: `PetStore`
/// and `pet-store` both become `PetStoreSchema` in `pet_store.ts`.
/// The first name keeps its identifier; later names get a numeric
/// suffix, like `PetStore2Schema` in `pet_store2.ts`.
#[derive(Debug, Default)]
pub struct CodegenNames<'a> {
    idents: IndexMap<&'a str, CodegenIdent>,
}

impl<'a> CodegenNames<'a> {
    /// Assigns identifiers to `names`, in order.
    pub fn new(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut space = NameSpace::default();
        let idents = names
            .into_iter()
            .map(|name| (name, space.uniquify(name)))
            .collect();
        Self { idents }
    }

    /// Returns the identifier for a schema. Names that weren't assigned
    /// an identifier, like missing references, are cleaned as-is.
    pub fn ident(&self, name: &str) -> CodegenIdent {
        self.idents
            .get(name)
            .cloned()
            .unwrap_or_else(|| CodegenIdent::new(name))
    }
}

/// The type and file names taken within one run.
#[derive(Debug, Default)]
struct NameSpace {
    types: IndexSet<String>,
    files: IndexSet<String>,
}

impl NameSpace {
    fn uniquify(&mut self, name: &str) -> CodegenIdent {
        let mut ident = CodegenIdent::new(name);
        let mut count = 1;
        while self.types.contains(&ident.to_type_name())
            || self.files.contains(&ident.to_file_name())
        {
            count += 1;
            ident = CodegenIdent::new(&format!("{name}{count}"));
        }
        self.types.insert(ident.to_type_name());
        self.files.insert(ident.to_file_name());
        ident
    }
}

/// Returns the identifier of the validator for a schema.
#[inline]
pub fn schema_ident(name: &str) -> String {
    CodegenIdent::new(name).to_schema_name()
}

/// Returns the name of the inferred type alias for a schema.
#[inline]
pub fn type_ident(name: &str) -> String {
    CodegenIdent::new(name).to_type_name()
}

/// Returns the name of the declared type for a recursive schema.
#[inline]
pub fn recursive_type_ident(name: &str) -> String {
    CodegenIdent::new(name).to_recursive_type_name()
}

/// Returns the file name, without an extension, for a schema's module.
#[inline]
pub fn file_name(name: &str) -> String {
    CodegenIdent::new(name).to_file_name()
}

/// Returns a property name as an object key: bare if it's a valid
/// identifier, or as a quoted string otherwise.
pub fn property_key(name: &str) -> Cow<'_, str> {
    if is_valid_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(quote(name))
    }
}

/// Returns `true` if `name` is a valid JavaScript identifier name.
///
/// Reserved words are valid identifier names in property position,
/// so they aren't rejected here.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '$' || c == '_' || unicode_ident::is_xid_start(c))
        && chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c))
}

/// Returns a double-quoted string literal.
pub fn quote(s: &str) -> String {
    // Serializing a string never fails.
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

/// Makes a string suitable for inclusion within a TypeScript identifier.
fn clean(s: &str) -> String {
    s.split(|c| !unicode_ident::is_xid_continue(c))
        .filter(|s| !s.is_empty())
        .join("_")
}
