//! Static description of records.
//!
//! A [`Record`] describes itself once with a list of [`FieldDef`]s. From that
//! list [`Schema::new`] works out the flattening plan both directions follow:
//! which fields are visible, what each one is called and whether it opens a
//! scope of its own or is promoted into the parent's.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use tracing::debug;

use crate::de::Input;
use crate::error::Result;
use crate::key;
use crate::tag::Tag;
use crate::values::Values;

/// The broad category of a field's type.
///
/// Known statically through [`Shape::KIND`]; the schema only needs it to
/// decide whether an embedded field can be promoted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Scalar,
    Sequence,
    Mapping,
    Nested,
    Optional,
    Time,
    Custom,
}

/// Compile-time facts about a field type.
pub trait Shape {
    const KIND: Kind;
}

/// A struct that can be flattened into, and rebuilt from, [`Values`].
///
/// Implemented by `#[derive(Record)]`. The field methods receive the index
/// of a [`FieldDef`] in the list passed to [`Schema::new`] together with the
/// key already computed for that field.
pub trait Record {
    fn schema() -> &'static Schema;

    fn encode_field(&self, index: usize, key: &str, tag: &Tag<'_>, out: &mut Values)
    -> Result<()>;

    /// Returns whether the field was populated.
    fn decode_field(
        &mut self,
        index: usize,
        key: &str,
        tag: &Tag<'_>,
        input: &mut Input<'_>,
    ) -> Result<bool>;
}

/// One declared field, as written in the struct.
#[derive(Clone, Debug)]
pub struct FieldDef {
    ident: &'static str,
    raw_tag: &'static str,
    kind: Kind,
    embedded: bool,
    layout: Option<&'static str>,
    delimiter: Option<&'static str>,
}

impl FieldDef {
    pub const fn new(ident: &'static str, raw_tag: &'static str, kind: Kind) -> Self {
        FieldDef {
            ident,
            raw_tag,
            kind,
            embedded: false,
            layout: None,
            delimiter: None,
        }
    }

    /// Marks the field as embedded, so its fields are hoisted into the parent
    /// scope unless the tag gives it a name.
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    pub const fn layout(mut self, layout: &'static str) -> Self {
        self.layout = Some(layout);
        self
    }

    pub const fn delimiter(mut self, delimiter: &'static str) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Stored under `scope[name]`.
    Scoped,
    /// Hoisted into the enclosing scope.
    Promoted,
}

/// A visible field with everything resolved.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    index: usize,
    name: &'static str,
    tag: Tag<'static>,
    kind: Kind,
    placement: Placement,
}

impl FieldSpec {
    /// Position in the [`FieldDef`] list passed to [`Schema::new`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> &Tag<'static> {
        &self.tag
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The key this field is stored under within `scope`.
    pub fn key(&self, scope: &str) -> String {
        match self.placement {
            Placement::Promoted => scope.to_owned(),
            Placement::Scoped => key::compose(scope, self.name),
        }
    }
}

/// The flattening plan of a record type.
///
/// Fields stored under their own name come first, promoted fields after
/// them, each group in declaration order.
#[derive(Clone, Debug)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(defs: Vec<FieldDef>) -> Self {
        let mut scoped = Vec::with_capacity(defs.len());
        let mut promoted = Vec::new();

        for (index, def) in defs.into_iter().enumerate() {
            let mut tag = Tag::parse(def.raw_tag);
            if tag.is_excluded() {
                continue;
            }
            if let Some(layout) = def.layout {
                tag = tag.with_layout(layout);
            }
            if let Some(delimiter) = def.delimiter {
                tag = tag.with_delimiter(delimiter);
            }

            let name = match tag.name() {
                "" => def.ident,
                name => name,
            };
            let placement = if def.embedded && tag.name().is_empty() && def.kind == Kind::Nested
            {
                Placement::Promoted
            } else {
                Placement::Scoped
            };

            let spec = FieldSpec {
                index,
                name,
                tag,
                kind: def.kind,
                placement,
            };
            match placement {
                Placement::Scoped => scoped.push(spec),
                Placement::Promoted => promoted.push(spec),
            }
        }

        debug!(
            fields = scoped.len(),
            promoted = promoted.len(),
            "built record schema"
        );
        scoped.extend(promoted);
        Schema { fields: scoped }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

macro_rules! scalar_shape {
    ($($ty:ty),*) => {
        $(
            impl Shape for $ty {
                const KIND: Kind = Kind::Scalar;
            }
        )*
    };
}

scalar_shape!(
    str, String, bool, char, f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128,
    usize
);

impl<T: Shape> Shape for Option<T> {
    const KIND: Kind = Kind::Optional;
}

impl<T: Shape + ?Sized> Shape for Box<T> {
    const KIND: Kind = T::KIND;
}

impl<T: Shape + ?Sized> Shape for &T {
    const KIND: Kind = T::KIND;
}

impl<T> Shape for [T] {
    const KIND: Kind = Kind::Sequence;
}

impl<T> Shape for Vec<T> {
    const KIND: Kind = Kind::Sequence;
}

impl<T, const N: usize> Shape for [T; N] {
    const KIND: Kind = Kind::Sequence;
}

impl<K, V, S> Shape for HashMap<K, V, S> {
    const KIND: Kind = Kind::Mapping;
}

impl<K, V> Shape for BTreeMap<K, V> {
    const KIND: Kind = Kind::Mapping;
}

impl<K, V, S> Shape for IndexMap<K, V, S> {
    const KIND: Kind = Kind::Mapping;
}

#[cfg(test)]
mod test {
    use super::*;

    fn names(schema: &Schema) -> Vec<(&'static str, Placement)> {
        schema
            .fields()
            .iter()
            .map(|f| (f.name(), f.placement()))
            .collect()
    }

    #[test]
    fn excluded_fields_keep_indices() {
        let schema = Schema::new(vec![
            FieldDef::new("a", "", Kind::Scalar),
            FieldDef::new("hidden", "-", Kind::Scalar),
            FieldDef::new("c", "renamed,omitempty", Kind::Scalar),
        ]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.fields()[1].index(), 2);
        assert_eq!(schema.fields()[1].name(), "renamed");
        assert!(schema.fields()[1].tag().omit_empty());
    }

    #[test]
    fn promoted_fields_go_last() {
        let schema = Schema::new(vec![
            FieldDef::new("inner", "", Kind::Nested).embedded(),
            FieldDef::new("a", "", Kind::Scalar),
            FieldDef::new("named", "n", Kind::Nested).embedded(),
            FieldDef::new("maybe", "", Kind::Optional).embedded(),
        ]);
        assert_eq!(
            names(&schema),
            vec![
                ("a", Placement::Scoped),
                ("n", Placement::Scoped),
                ("maybe", Placement::Scoped),
                ("inner", Placement::Promoted),
            ]
        );
        assert_eq!(schema.fields()[3].index(), 0);
    }

    #[test]
    fn keys_follow_placement() {
        let schema = Schema::new(vec![
            FieldDef::new("inner", "", Kind::Nested).embedded(),
            FieldDef::new("a", "", Kind::Scalar),
        ]);
        let fields = schema.fields();
        assert_eq!(fields[0].key(""), "a");
        assert_eq!(fields[0].key("outer"), "outer[a]");
        assert_eq!(fields[1].key(""), "");
        assert_eq!(fields[1].key("outer"), "outer");
    }

    #[test]
    fn overrides_reach_the_tag() {
        let schema = Schema::new(vec![
            FieldDef::new("t", "", Kind::Time).layout("%Y"),
            FieldDef::new("v", "", Kind::Sequence).delimiter("|"),
        ]);
        assert_eq!(schema.fields()[0].tag().layout(), Some("%Y"));
        assert_eq!(
            schema.fields()[1].tag().sequence_style(),
            crate::tag::SequenceStyle::Joined("|")
        );
    }

    #[test]
    fn shapes_of_std_types() {
        assert_eq!(<Vec<u8> as Shape>::KIND, Kind::Sequence);
        assert_eq!(<Option<String> as Shape>::KIND, Kind::Optional);
        assert_eq!(<Box<i32> as Shape>::KIND, Kind::Scalar);
        assert_eq!(<BTreeMap<String, u8> as Shape>::KIND, Kind::Mapping);
        assert_eq!(<HashMap<u8, u8> as Shape>::KIND, Kind::Mapping);
    }
}
