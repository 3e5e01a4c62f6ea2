//! Schema type tree.
//!
//! This module defines [`SchemaType`], one node of a declarative schema, and
//! [`TypeKind`], the closed set of categories a node can belong to together
//! with their category-specific attributes.
//!
//! # Identity
//!
//! Every node gets a [`TypeId`] when it is constructed. Clones share the id,
//! so a clone refers to the same schema node. Attaching validators or a name
//! yields a new node with a fresh id. Strategy registries key their
//! per-instance overrides by this id rather than by structural equality.

use crate::validators::Validator;
use crate::values::{Context, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity handle of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u64);

impl TypeId {
    fn next() -> Self {
        Self(NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category of a schema node, without its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Any,
    Text,
    Integer,
    Float,
    Boolean,
    DateTime,
    Date,
    Time,
    List,
    Tuple,
    Dict,
    Object,
    Constant,
    OneOf,
    Optional,
    DumpOnly,
    LoadOnly,
    Transform,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Dict => "dict",
            Self::Object => "object",
            Self::Constant => "constant",
            Self::OneOf => "one_of",
            Self::Optional => "optional",
            Self::DumpOnly => "dump_only",
            Self::LoadOnly => "load_only",
            Self::Transform => "transform",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a record value from its generated fields.
#[derive(Clone)]
pub struct Constructor(Arc<dyn Fn(BTreeMap<String, Value>) -> Value + Send + Sync>);

impl Constructor {
    pub fn new(f: impl Fn(BTreeMap<String, Value>) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn build(&self, fields: BTreeMap<String, Value>) -> Value {
        (self.0)(fields)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constructor(..)")
    }
}

/// Post-processing applied to every loaded value of a transform wrapper.
#[derive(Clone)]
pub struct PostLoad(Arc<dyn Fn(Value, &Context) -> Value + Send + Sync>);

impl PostLoad {
    pub fn new(f: impl Fn(Value, &Context) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: Value, context: &Context) -> Value {
        (self.0)(value, context)
    }
}

impl fmt::Debug for PostLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PostLoad(..)")
    }
}

/// Category-specific attributes of a schema node.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Untyped value
    Any,

    /// Text
    Text,

    /// Whole number
    Integer,

    /// Floating point number
    Float,

    /// Boolean
    Boolean,

    /// Timestamp with timezone
    DateTime,

    /// Calendar date
    Date,

    /// Time of day
    Time,

    /// Variable-length sequence of one item type
    List { item: Box<SchemaType> },

    /// Fixed-arity sequence of positional item types
    Tuple { items: Vec<SchemaType> },

    /// Mapping.
    ///
    /// With a `default` value type, any key of `key` type maps to that type.
    /// Without one, the mapping has exactly the named `fields`.
    Dict {
        key: Box<SchemaType>,
        fields: Vec<(String, SchemaType)>,
        default: Option<Box<SchemaType>>,
    },

    /// Record with named fields
    Object {
        fields: Vec<(String, SchemaType)>,
        constructor: Option<Constructor>,
    },

    /// Fixed literal
    Constant { value: Value },

    /// Union of alternatives
    OneOf { alternatives: Vec<SchemaType> },

    /// Nullable wrapper. A non-null `load_default` replaces absent values.
    Optional {
        inner: Box<SchemaType>,
        load_default: Option<Value>,
    },

    /// Field that only appears in output
    DumpOnly { inner: Box<SchemaType> },

    /// Field that only appears in input
    LoadOnly { inner: Box<SchemaType> },

    /// Wrapper applying a post-load function
    Transform {
        inner: Box<SchemaType>,
        post_load: PostLoad,
    },
}

impl TypeKind {
    pub fn category(&self) -> Category {
        match self {
            Self::Any => Category::Any,
            Self::Text => Category::Text,
            Self::Integer => Category::Integer,
            Self::Float => Category::Float,
            Self::Boolean => Category::Boolean,
            Self::DateTime => Category::DateTime,
            Self::Date => Category::Date,
            Self::Time => Category::Time,
            Self::List { .. } => Category::List,
            Self::Tuple { .. } => Category::Tuple,
            Self::Dict { .. } => Category::Dict,
            Self::Object { .. } => Category::Object,
            Self::Constant { .. } => Category::Constant,
            Self::OneOf { .. } => Category::OneOf,
            Self::Optional { .. } => Category::Optional,
            Self::DumpOnly { .. } => Category::DumpOnly,
            Self::LoadOnly { .. } => Category::LoadOnly,
            Self::Transform { .. } => Category::Transform,
        }
    }
}

/// One node of a schema: category attributes plus attached validators.
#[derive(Debug, Clone)]
pub struct SchemaType {
    id: TypeId,
    name: Option<String>,
    validators: Vec<Validator>,
    kind: TypeKind,
}

impl SchemaType {
    /// Create a new node with a fresh identity.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            id: TypeId::next(),
            name: None,
            validators: Vec::new(),
            kind,
        }
    }

    pub fn any() -> Self {
        Self::new(TypeKind::Any)
    }

    pub fn text() -> Self {
        Self::new(TypeKind::Text)
    }

    pub fn integer() -> Self {
        Self::new(TypeKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(TypeKind::Float)
    }

    pub fn boolean() -> Self {
        Self::new(TypeKind::Boolean)
    }

    pub fn datetime() -> Self {
        Self::new(TypeKind::DateTime)
    }

    pub fn date() -> Self {
        Self::new(TypeKind::Date)
    }

    pub fn time() -> Self {
        Self::new(TypeKind::Time)
    }

    pub fn list(item: SchemaType) -> Self {
        Self::new(TypeKind::List {
            item: Box::new(item),
        })
    }

    pub fn tuple(items: Vec<SchemaType>) -> Self {
        Self::new(TypeKind::Tuple { items })
    }

    /// Mapping from text keys to values of one type.
    pub fn dict(value_type: SchemaType) -> Self {
        Self::dict_with_keys(SchemaType::text(), value_type)
    }

    /// Mapping from keys of `key_type` to values of `value_type`.
    pub fn dict_with_keys(key_type: SchemaType, value_type: SchemaType) -> Self {
        Self::new(TypeKind::Dict {
            key: Box::new(key_type),
            fields: Vec::new(),
            default: Some(Box::new(value_type)),
        })
    }

    /// Mapping with exactly the given named entries.
    pub fn fixed_dict<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaType)>,
        K: Into<String>,
    {
        Self::new(TypeKind::Dict {
            key: Box::new(SchemaType::text()),
            fields: collect_fields(fields),
            default: None,
        })
    }

    /// Record built as an open `Value::Object`.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaType)>,
        K: Into<String>,
    {
        Self::new(TypeKind::Object {
            fields: collect_fields(fields),
            constructor: None,
        })
    }

    /// Record built through a custom constructor.
    pub fn object_with_constructor<I, K>(
        fields: I,
        constructor: impl Fn(BTreeMap<String, Value>) -> Value + Send + Sync + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = (K, SchemaType)>,
        K: Into<String>,
    {
        Self::new(TypeKind::Object {
            fields: collect_fields(fields),
            constructor: Some(Constructor::new(constructor)),
        })
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self::new(TypeKind::Constant {
            value: value.into(),
        })
    }

    pub fn one_of(alternatives: Vec<SchemaType>) -> Self {
        Self::new(TypeKind::OneOf { alternatives })
    }

    pub fn optional(inner: SchemaType) -> Self {
        Self::new(TypeKind::Optional {
            inner: Box::new(inner),
            load_default: None,
        })
    }

    /// Optional wrapper that loads `default` when the value is absent.
    pub fn optional_with_default(inner: SchemaType, default: impl Into<Value>) -> Self {
        Self::new(TypeKind::Optional {
            inner: Box::new(inner),
            load_default: Some(default.into()),
        })
    }

    pub fn dump_only(inner: SchemaType) -> Self {
        Self::new(TypeKind::DumpOnly {
            inner: Box::new(inner),
        })
    }

    pub fn load_only(inner: SchemaType) -> Self {
        Self::new(TypeKind::LoadOnly {
            inner: Box::new(inner),
        })
    }

    pub fn transform(
        inner: SchemaType,
        post_load: impl Fn(Value, &Context) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::new(TypeKind::Transform {
            inner: Box::new(inner),
            post_load: PostLoad::new(post_load),
        })
    }

    /// Attach a validator. The result is a new node.
    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self.id = TypeId::next();
        self
    }

    /// Attach several validators. The result is a new node.
    pub fn with_validators(mut self, validators: impl IntoIterator<Item = Validator>) -> Self {
        self.validators.extend(validators);
        self.id = TypeId::next();
        self
    }

    /// Give the node a type name, marking it as a named subtype of its
    /// category (e.g. an `Email` text type). The result is a new node.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.id = TypeId::next();
        self
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Check whether this node belongs to `category`.
    pub fn is_a(&self, category: Category) -> bool {
        self.category() == category
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{}", self.category()),
        }
    }
}

fn collect_fields<I, K>(fields: I) -> Vec<(String, SchemaType)>
where
    I: IntoIterator<Item = (K, SchemaType)>,
    K: Into<String>,
{
    fields
        .into_iter()
        .map(|(name, field_type)| (name.into(), field_type))
        .collect()
}
