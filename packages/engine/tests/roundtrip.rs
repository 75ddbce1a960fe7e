//! Save/load round trips for every supported storage kind.

use modelkv_engine::{
    loose_equals, Error, FieldMap, FieldMapExt, FieldValue, Model, ModelStore, Scalar, ScalarType,
    Shape,
};
use modelkv_kv_store::Conn;
use modelkv_mem_store::MemStore;

fn engine(mem: &MemStore) -> ModelStore {
    ModelStore::new(mem.pool(4))
}

/// Save a record, load a fresh copy by id, and require loose equality.
fn assert_round_trips<M: Model + Default>(mem: &MemStore, mut model: M) -> M {
    let engine = engine(mem);
    engine.save(&mut model).unwrap();

    let mut copy = M::default();
    engine.scan_by_id(model.id(), &mut copy).unwrap();

    let (equal, diff) = loose_equals(&model, &copy);
    assert!(
        equal,
        "record did not survive the round trip; first difference at {:?}",
        diff
    );
    copy
}

// --- a record of every scalar type ---

#[derive(Clone, Debug, Default)]
struct PrimitiveTypes {
    id: String,
    flag: bool,
    int: i64,
    uint: u64,
    float: f64,
    text: String,
    blob: Vec<u8>,
}

impl Model for PrimitiveTypes {
    fn shape() -> Shape {
        Shape::builder("primitiveTypes")
            .scalar("Flag", ScalarType::Bool)
            .scalar("Int", ScalarType::Int)
            .scalar("Uint", ScalarType::Uint)
            .scalar("Float", ScalarType::Float)
            .scalar("Text", ScalarType::Text)
            .scalar("Blob", ScalarType::Blob)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn encode_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("Flag".into(), FieldValue::Scalar(self.flag.into()));
        fields.insert("Int".into(), FieldValue::Scalar(self.int.into()));
        fields.insert("Uint".into(), FieldValue::Scalar(self.uint.into()));
        fields.insert("Float".into(), FieldValue::Scalar(self.float.into()));
        fields.insert("Text".into(), FieldValue::Scalar(self.text.clone().into()));
        fields.insert("Blob".into(), FieldValue::Scalar(self.blob.clone().into()));
        fields
    }

    fn decode_fields(mut fields: FieldMap) -> Result<Self, Error> {
        Ok(PrimitiveTypes {
            id: String::new(),
            flag: fields.take_scalar("Flag")?.as_bool().unwrap_or_default(),
            int: fields.take_scalar("Int")?.as_int().unwrap_or_default(),
            uint: fields.take_scalar("Uint")?.as_uint().unwrap_or_default(),
            float: fields.take_scalar("Float")?.as_float().unwrap_or_default(),
            text: fields.take_scalar("Text")?.into_text().unwrap_or_default(),
            blob: fields.take_scalar("Blob")?.into_blob().unwrap_or_default(),
        })
    }
}

#[test]
fn primitive_types_round_trip() {
    let mem = MemStore::new();
    assert_round_trips(
        &mem,
        PrimitiveTypes {
            id: String::new(),
            flag: true,
            int: -512,
            uint: 512,
            float: 3.25,
            text: "hello".to_string(),
            blob: vec![0, 1, 2, 255],
        },
    );
}

#[test]
fn zero_valued_record_round_trips() {
    let mem = MemStore::new();
    assert_round_trips(&mem, PrimitiveTypes::default());
}

// --- optional scalars, present and absent ---

#[derive(Clone, Debug, Default)]
struct OptionalTypes {
    id: String,
    int: Option<i64>,
    text: Option<String>,
}

impl Model for OptionalTypes {
    fn shape() -> Shape {
        Shape::builder("optionalTypes")
            .optional_scalar("Int", ScalarType::Int)
            .optional_scalar("Text", ScalarType::Text)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn encode_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(
            "Int".into(),
            FieldValue::OptionalScalar(self.int.map(Scalar::Int)),
        );
        fields.insert(
            "Text".into(),
            FieldValue::OptionalScalar(self.text.clone().map(Scalar::Text)),
        );
        fields
    }

    fn decode_fields(mut fields: FieldMap) -> Result<Self, Error> {
        Ok(OptionalTypes {
            id: String::new(),
            int: fields.take_optional_scalar("Int")?.and_then(|s| s.as_int()),
            text: fields
                .take_optional_scalar("Text")?
                .and_then(Scalar::into_text),
        })
    }
}

#[test]
fn present_optionals_round_trip() {
    let mem = MemStore::new();
    let copy = assert_round_trips(
        &mem,
        OptionalTypes {
            id: String::new(),
            int: Some(-7),
            text: Some("here".to_string()),
        },
    );
    assert_eq!(copy.int, Some(-7));
    assert_eq!(copy.text, Some("here".to_string()));
}

#[test]
fn absent_optionals_stay_absent() {
    let mem = MemStore::new();
    let copy = assert_round_trips(&mem, OptionalTypes::default());
    assert_eq!(copy.int, None);
    assert_eq!(copy.text, None);
}

// --- ordered list field (scenario A) ---

#[derive(Clone, Debug, Default)]
struct ModelWithList {
    id: String,
    name: String,
    list: Vec<String>,
}

impl Model for ModelWithList {
    fn shape() -> Shape {
        Shape::builder("modelWithList")
            .scalar("Name", ScalarType::Text)
            .sequence("List", ScalarType::Text)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn encode_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("Name".into(), FieldValue::Scalar(self.name.clone().into()));
        fields.insert(
            "List".into(),
            FieldValue::Sequence(self.list.iter().map(|s| Scalar::from(s.as_str())).collect()),
        );
        fields
    }

    fn decode_fields(mut fields: FieldMap) -> Result<Self, Error> {
        Ok(ModelWithList {
            id: String::new(),
            name: fields.take_scalar("Name")?.into_text().unwrap_or_default(),
            list: fields
                .take_sequence("List")?
                .into_iter()
                .filter_map(Scalar::into_text)
                .collect(),
        })
    }
}

#[test]
fn list_round_trips_in_exact_order() {
    let mem = MemStore::new();
    let engine = engine(&mem);

    let mut m1 = ModelWithList {
        id: String::new(),
        name: "one".to_string(),
        list: vec!["one".to_string(), "two".to_string(), "three".to_string()],
    };
    // an empty list must save cleanly too
    let mut m2 = ModelWithList::default();
    engine.save_all([&mut m1, &mut m2]).unwrap();

    let loaded: ModelWithList = engine.find_by_id(&m1.id).unwrap();
    assert_eq!(loaded.list, vec!["one", "two", "three"]);

    // saved as a store-native list under the field's sub-key
    let mut conn = mem.conn();
    let list_key = format!("modelWithList:{}:List", m1.id);
    assert_eq!(
        conn.list_range(&list_key).unwrap(),
        vec!["one", "two", "three"]
    );
}

#[test]
fn empty_list_round_trips_to_empty_not_missing() {
    let mem = MemStore::new();
    let copy = assert_round_trips(&mem, ModelWithList::default());
    assert!(copy.list.is_empty());
}

// --- unordered set field (scenario B) ---

#[derive(Clone, Debug, Default)]
struct ModelWithSet {
    id: String,
    name: String,
    set: Vec<String>,
}

impl Model for ModelWithSet {
    fn shape() -> Shape {
        Shape::builder("modelWithSet")
            .scalar("Name", ScalarType::Text)
            .set("Set", ScalarType::Text)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn encode_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("Name".into(), FieldValue::Scalar(self.name.clone().into()));
        fields.insert(
            "Set".into(),
            FieldValue::Set(self.set.iter().map(|s| Scalar::from(s.as_str())).collect()),
        );
        fields
    }

    fn decode_fields(mut fields: FieldMap) -> Result<Self, Error> {
        Ok(ModelWithSet {
            id: String::new(),
            name: fields.take_scalar("Name")?.into_text().unwrap_or_default(),
            set: fields
                .take_set("Set")?
                .into_iter()
                .filter_map(Scalar::into_text)
                .collect(),
        })
    }
}

#[test]
fn set_round_trips_as_a_multiset() {
    let mem = MemStore::new();
    let engine = engine(&mem);

    let mut m1 = ModelWithSet {
        id: String::new(),
        name: "two".to_string(),
        set: vec!["one".to_string(), "two".to_string(), "three".to_string()],
    };
    let mut m2 = ModelWithSet::default();
    engine.save_all([&mut m1, &mut m2]).unwrap();

    let loaded: ModelWithSet = engine.find_by_id(&m1.id).unwrap();
    let mut members = loaded.set.clone();
    members.sort();
    assert_eq!(members, vec!["one", "three", "two"]);

    let (equal, diff) = loose_equals(&m1, &loaded);
    assert!(equal, "unexpected difference at {:?}", diff);

    // saved as a store-native set under the field's sub-key
    let mut conn = mem.conn();
    let set_key = format!("modelWithSet:{}:Set", m1.id);
    let mut stored = conn.set_members(&set_key).unwrap();
    stored.sort();
    assert_eq!(stored, vec!["one", "three", "two"]);
}

// --- embedded and optional embedded records (scenario C) ---

#[derive(Clone, Debug, Default, PartialEq)]
struct Embed {
    int: i64,
}

fn embed_shape() -> Shape {
    Shape::builder("embed")
        .scalar("Int", ScalarType::Int)
        .build()
}

impl Embed {
    fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("Int".into(), FieldValue::Scalar(self.int.into()));
        fields
    }

    fn from_fields(mut fields: FieldMap) -> Result<Self, Error> {
        Ok(Embed {
            int: fields.take_scalar("Int")?.as_int().unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug, Default)]
struct EmbeddedStructModel {
    id: String,
    embed: Embed,
}

impl Model for EmbeddedStructModel {
    fn shape() -> Shape {
        Shape::builder("embeddedStructModel")
            .embedded("Embed", embed_shape)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn encode_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("Embed".into(), FieldValue::Embedded(self.embed.to_fields()));
        fields
    }

    fn decode_fields(mut fields: FieldMap) -> Result<Self, Error> {
        Ok(EmbeddedStructModel {
            id: String::new(),
            embed: Embed::from_fields(fields.take_embedded("Embed")?)?,
        })
    }
}

#[derive(Clone, Debug, Default)]
struct EmbeddedPointerModel {
    id: String,
    embed: Option<Embed>,
}

impl Model for EmbeddedPointerModel {
    fn shape() -> Shape {
        Shape::builder("embeddedPointerModel")
            .optional_embedded("Embed", embed_shape)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn encode_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(
            "Embed".into(),
            FieldValue::OptionalEmbedded(self.embed.as_ref().map(Embed::to_fields)),
        );
        fields
    }

    fn decode_fields(mut fields: FieldMap) -> Result<Self, Error> {
        Ok(EmbeddedPointerModel {
            id: String::new(),
            embed: fields
                .take_optional_embedded("Embed")?
                .map(Embed::from_fields)
                .transpose()?,
        })
    }
}

#[test]
fn embedded_struct_round_trips() {
    let mem = MemStore::new();
    let copy = assert_round_trips(
        &mem,
        EmbeddedStructModel {
            id: String::new(),
            embed: Embed { int: 42 },
        },
    );
    assert_eq!(copy.embed, Embed { int: 42 });
}

#[test]
fn present_optional_embedded_round_trips() {
    let mem = MemStore::new();
    let copy = assert_round_trips(
        &mem,
        EmbeddedPointerModel {
            id: String::new(),
            embed: Some(Embed { int: 42 }),
        },
    );
    assert_eq!(copy.embed, Some(Embed { int: 42 }));
}

#[test]
fn absent_optional_embedded_stays_absent() {
    let mem = MemStore::new();
    let copy = assert_round_trips(&mem, EmbeddedPointerModel::default());
    // absent, not an allocated-but-empty record
    assert_eq!(copy.embed, None);
}

#[derive(Clone, Debug, Default)]
struct SparseEmbed {
    note: Option<String>,
}

fn sparse_embed_shape() -> Shape {
    Shape::builder("sparseEmbed")
        .optional_scalar("Note", ScalarType::Text)
        .build()
}

#[derive(Clone, Debug, Default)]
struct SparsePointerModel {
    id: String,
    embed: Option<SparseEmbed>,
}

impl Model for SparsePointerModel {
    fn shape() -> Shape {
        Shape::builder("sparsePointerModel")
            .optional_embedded("Embed", sparse_embed_shape)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn encode_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(
            "Embed".into(),
            FieldValue::OptionalEmbedded(self.embed.as_ref().map(|e| {
                let mut inner = FieldMap::new();
                inner.insert(
                    "Note".into(),
                    FieldValue::OptionalScalar(e.note.clone().map(Into::into)),
                );
                inner
            })),
        );
        fields
    }

    fn decode_fields(mut fields: FieldMap) -> Result<Self, Error> {
        let embed = match fields.take_optional_embedded("Embed")? {
            Some(mut inner) => Some(SparseEmbed {
                note: inner
                    .take_optional_scalar("Note")?
                    .and_then(|s| s.into_text()),
            }),
            None => None,
        };
        Ok(SparsePointerModel {
            id: String::new(),
            embed,
        })
    }
}

// A present embedded record whose fields are all absent stores nothing, so
// it loads back as `None`. Documented behavior of presence inference.
#[test]
fn empty_optional_embedded_loads_as_absent() {
    let mem = MemStore::new();
    let engine = engine(&mem);

    let mut model = SparsePointerModel {
        id: String::new(),
        embed: Some(SparseEmbed::default()),
    };
    engine.save(&mut model).unwrap();

    let loaded: SparsePointerModel = engine.find_by_id(&model.id).unwrap();
    assert!(loaded.embed.is_none());

    let mut filled = SparsePointerModel {
        id: String::new(),
        embed: Some(SparseEmbed {
            note: Some("n".to_string()),
        }),
    };
    engine.save(&mut filled).unwrap();
    let loaded: SparsePointerModel = engine.find_by_id(&filled.id).unwrap();
    assert_eq!(loaded.embed.unwrap().note.as_deref(), Some("n"));
}

// --- unrepresentable shapes are rejected before any I/O (rejection) ---

#[derive(Clone, Debug, Default)]
struct InconvertibleModel {
    id: String,
}

impl Model for InconvertibleModel {
    fn shape() -> Shape {
        Shape::builder("inconvertibleModel")
            .scalar("Name", ScalarType::Text)
            .opaque("Callback", "fn(String)")
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn encode_fields(&self) -> FieldMap {
        FieldMap::new()
    }

    fn decode_fields(_fields: FieldMap) -> Result<Self, Error> {
        Ok(InconvertibleModel::default())
    }
}

#[test]
fn inconvertible_shape_fails_with_zero_io() {
    let mem = MemStore::new();
    let engine = engine(&mem);

    let mut model = InconvertibleModel::default();
    let err = engine.save(&mut model).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));

    // classification failed before any store operation
    assert_eq!(mem.key_count(), 0);

    let err = engine.find_by_id::<InconvertibleModel>("some-id").unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
    assert_eq!(mem.key_count(), 0);
}

// --- delete removes the whole namespace (scenario D) ---

#[test]
fn delete_removes_root_and_sub_keys() {
    let mem = MemStore::new();
    let engine = engine(&mem);

    let mut model = ModelWithList {
        id: String::new(),
        name: "doomed".to_string(),
        list: vec!["a".to_string(), "b".to_string()],
    };
    engine.save(&mut model).unwrap();

    let root = format!("modelWithList:{}", model.id);
    let sub = format!("{}:List", root);
    {
        let mut conn = mem.conn();
        assert!(conn.exists(&root).unwrap());
        assert!(conn.exists(&sub).unwrap());
    }

    engine.delete(&model).unwrap();

    let mut conn = mem.conn();
    assert!(!conn.exists(&root).unwrap());
    assert!(!conn.exists(&sub).unwrap());

    let err = engine.find_by_id::<ModelWithList>(&model.id).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
