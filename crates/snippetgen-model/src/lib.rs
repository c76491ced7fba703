//! Path index, request and property graph types for snippetgen.
//!
//! Everything the pipeline passes between stages lives here: the
//! [`PathIndex`] lookup contract, the [`ResolvedRequest`] the resolver
//! produces and the [`PropertyNode`] graph the body builder emits.

pub mod index;
pub mod node;
pub mod path;
pub mod request;
pub mod schema;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use index::{PathIndex, PathMatch, StaticPathIndex};
pub use node::{
    ADDITIONAL_DATA, BinaryData, BodyGraph, NumberKind, NumberWidth, ODATA_ID, Property,
    PropertyNode, TemporalKind, TypeName, TypeOrigin, ValueType,
};
pub use path::{NodeKind, OperationDescriptor, PathNode};
pub use request::{
    BodySchema, BoundParameter, Header, PathSegment, QueryOptions, QueryParameter,
    RecordedRequest, ResolvedRequest, ScalarValue,
};
pub use schema::{Primitive, PropertyDescriptor, SchemaType, TypeDescriptor, TypeKind};
