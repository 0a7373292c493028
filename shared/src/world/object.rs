use std::collections::BTreeMap;

use lockview_serde::{ByteReader, ByteWriter, Serde, SerdeErr, VarInt};

/// Stable process-local identifier of a replicated scene object. Unique for
/// the object's lifetime; never reused within a session, even after the
/// object is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    inner: u64,
}

impl ObjectId {
    pub fn new(raw: u64) -> Self {
        Self { inner: raw }
    }

    pub fn to_u64(&self) -> u64 {
        self.inner
    }
}

impl Serde for ObjectId {
    fn ser(&self, writer: &mut ByteWriter) {
        VarInt::new(self.inner).ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            inner: VarInt::de(reader)?.get(),
        })
    }
}

/// Names the concrete kind of a scene object ("Node", "Transform",
/// "Geometry", ...). Compared and transmitted as a plain string, the way the
/// upstream scene graph names its container types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeTag {
    inner: String,
}

impl TypeTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { inner: name.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Serde for TypeTag {
    fn ser(&self, writer: &mut ByteWriter) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            inner: String::de(reader)?,
        })
    }
}

/// The closed set of value shapes a scene object field can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vec3([f32; 3]),
    Matrix4([f32; 16]),
    Str(String),
    Bytes(Vec<u8>),
}

impl Serde for FieldValue {
    fn ser(&self, writer: &mut ByteWriter) {
        match self {
            FieldValue::Bool(value) => {
                writer.write_byte(0);
                value.ser(writer);
            }
            FieldValue::Int(value) => {
                writer.write_byte(1);
                value.ser(writer);
            }
            FieldValue::Float(value) => {
                writer.write_byte(2);
                value.ser(writer);
            }
            FieldValue::Vec3(value) => {
                writer.write_byte(3);
                value.ser(writer);
            }
            FieldValue::Matrix4(value) => {
                writer.write_byte(4);
                value.ser(writer);
            }
            FieldValue::Str(value) => {
                writer.write_byte(5);
                value.ser(writer);
            }
            FieldValue::Bytes(value) => {
                writer.write_byte(6);
                value.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(FieldValue::Bool(bool::de(reader)?)),
            1 => Ok(FieldValue::Int(i64::de(reader)?)),
            2 => Ok(FieldValue::Float(f64::de(reader)?)),
            3 => Ok(FieldValue::Vec3(<[f32; 3]>::de(reader)?)),
            4 => Ok(FieldValue::Matrix4(<[f32; 16]>::de(reader)?)),
            5 => Ok(FieldValue::Str(String::de(reader)?)),
            6 => Ok(FieldValue::Bytes(Vec::<u8>::de(reader)?)),
            _ => Err(SerdeErr),
        }
    }
}

/// Ordered field set of a scene object. A BTreeMap keeps iteration sorted by
/// field name, which is what makes two serializations of unchanged state
/// byte-identical.
pub type FieldSet = BTreeMap<String, FieldValue>;

pub(crate) fn ser_fields(fields: &FieldSet, writer: &mut ByteWriter) {
    VarInt::from_len(fields.len()).ser(writer);
    for (name, value) in fields {
        name.ser(writer);
        value.ser(writer);
    }
}

pub(crate) fn de_fields(reader: &mut ByteReader) -> Result<FieldSet, SerdeErr> {
    let count = VarInt::de(reader)?.to_len();
    let mut fields = FieldSet::new();
    for _ in 0..count {
        let name = String::de(reader)?;
        let value = FieldValue::de(reader)?;
        fields.insert(name, value);
    }
    Ok(fields)
}

/// One typed, named, mutable object in the scene store.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    id: ObjectId,
    type_tag: TypeTag,
    name: Option<String>,
    fields: FieldSet,
}

impl SceneObject {
    pub fn new(
        id: ObjectId,
        type_tag: TypeTag,
        name: Option<String>,
        fields: FieldSet,
    ) -> Self {
        Self {
            id,
            type_tag,
            name,
            fields,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub(crate) fn merge_fields(&mut self, fields: FieldSet) {
        for (name, value) in fields {
            self.fields.insert(name, value);
        }
    }
}

impl Serde for SceneObject {
    fn ser(&self, writer: &mut ByteWriter) {
        self.id.ser(writer);
        self.type_tag.ser(writer);
        self.name.ser(writer);
        ser_fields(&self.fields, writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            id: ObjectId::de(reader)?,
            type_tag: TypeTag::de(reader)?,
            name: Option::<String>::de(reader)?,
            fields: de_fields(reader)?,
        })
    }
}
