//! modelkv: schema-driven marshaling of typed records into a flat key-value
//! store, and back.
//!
//! A record type declares its shape once; the engine classifies the shape
//! into a cached storage plan, encodes records into hash/list/set writes
//! under the `shape:id` namespace, and decodes them back into fresh typed
//! instances with a `decode(encode(x)) == x` round-trip guarantee.
//!
//! # Example
//!
//! ```rust
//! use modelkv::{
//!     Error, FieldMap, FieldMapExt, FieldValue, MemStore, Model, ModelStore, Scalar,
//!     ScalarType, Shape,
//! };
//!
//! #[derive(Default)]
//! struct Person {
//!     id: String,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! impl Model for Person {
//!     fn shape() -> Shape {
//!         Shape::builder("person")
//!             .scalar("Name", ScalarType::Text)
//!             .set("Tags", ScalarType::Text)
//!             .build()
//!     }
//!
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//!
//!     fn set_id(&mut self, id: String) {
//!         self.id = id;
//!     }
//!
//!     fn encode_fields(&self) -> FieldMap {
//!         let mut fields = FieldMap::new();
//!         fields.insert("Name".into(), FieldValue::Scalar(self.name.clone().into()));
//!         fields.insert(
//!             "Tags".into(),
//!             FieldValue::Set(self.tags.iter().map(|t| Scalar::from(t.as_str())).collect()),
//!         );
//!         fields
//!     }
//!
//!     fn decode_fields(mut fields: FieldMap) -> Result<Self, Error> {
//!         Ok(Person {
//!             id: String::new(),
//!             name: fields.take_scalar("Name")?.into_text().unwrap_or_default(),
//!             tags: fields
//!                 .take_set("Tags")?
//!                 .into_iter()
//!                 .filter_map(Scalar::into_text)
//!                 .collect(),
//!         })
//!     }
//! }
//!
//! let store = MemStore::new();
//! let engine = ModelStore::new(store.pool(4));
//!
//! let mut alice = Person {
//!     name: "Alice".to_string(),
//!     tags: vec!["admin".to_string()],
//!     ..Default::default()
//! };
//! engine.save(&mut alice).unwrap();
//!
//! let copy: Person = engine.find_by_id(&alice.id).unwrap();
//! assert_eq!(copy.name, "Alice");
//! ```

pub use modelkv_engine::{
    decode, encode, ensure_id, loose_equals, new_id, validate_id, Error, FieldMap, FieldMapExt,
    FieldValue, Model, ModelStore, RawRecord, WriteOp,
};
pub use modelkv_kv_store::{Conn, ConnFactory, KvError, Pool, PooledConn};
pub use modelkv_mem_store::{MemConn, MemStore};
pub use modelkv_schema::{
    classify, plan_for, root_key, sub_key, FieldDef, FieldPlan, FieldType, PlannedField, Scalar,
    ScalarParseError, ScalarType, SchemaError, Shape, ShapeBuilder, StorageKind, ID_FIELD,
};
