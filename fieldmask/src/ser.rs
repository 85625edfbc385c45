//! Masking serializer: a serde `Serializer` adapter.
//!
//! [`MaskedView`] wraps a borrowed value and implements `Serialize`. When any
//! serde format serializes the view, every struct field and every map entry
//! whose key renders as text is resolved against the policy and the schema
//! registry:
//!
//! - unmasked fields are serialized normally, recursing into nested values so
//!   decisions are taken again at every depth;
//! - masked fields are converted to text and emitted as a masked string;
//! - `None` and unit values stay `null` and are never masked.
//!
//! The source value is only borrowed. Nothing here allocates beyond what the
//! target format needs plus the text of masked leaves.

use std::fmt;

use serde::ser::{
    self, Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct,
    SerializeStructVariant, SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
    Serializer,
};

use crate::{
    policy::{MaskDecision, MaskingPolicy},
    schema::SchemaRegistry,
    style::MaskStyle,
};

/// Read-only inputs of one serialization pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MaskContext<'m> {
    policy: &'m MaskingPolicy,
    registry: &'m SchemaRegistry,
}

impl<'m> MaskContext<'m> {
    pub(crate) fn new(policy: &'m MaskingPolicy, registry: &'m SchemaRegistry) -> Self {
        Self { policy, registry }
    }

    fn resolve_field(
        &self,
        type_name: &'static str,
        variant: Option<&'static str>,
        field: &'static str,
    ) -> MaskDecision {
        if !self.policy.enabled() {
            return MaskDecision::Unmasked;
        }
        let field_override = self.registry.field_override(type_name, variant, field);
        self.policy.resolve(field, field_override)
    }

    fn resolve_key(&self, key: &str) -> MaskDecision {
        self.policy.resolve(key, None)
    }
}

/// A borrowed value whose serialization applies the masking policy.
///
/// Works with any serde format:
///
/// ```rust
/// use fieldmask::{MaskingPolicy, MaskingService};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Contact {
///     name: String,
///     email: String,
/// }
///
/// let service = MaskingService::new(MaskingPolicy::new().with_fields(["email"]));
/// let contact = Contact {
///     name: "Jane".into(),
///     email: "jane@example.com".into(),
/// };
/// let json = serde_json::to_string(&service.view(&contact)).unwrap();
/// assert_eq!(json, r#"{"name":"Jane","email":"jane************"}"#);
/// ```
pub struct MaskedView<'a, T: ?Sized> {
    value: &'a T,
    ctx: MaskContext<'a>,
}

impl<'a, T: ?Sized> MaskedView<'a, T> {
    pub(crate) fn new(value: &'a T, ctx: MaskContext<'a>) -> Self {
        Self { value, ctx }
    }
}

impl<T: ?Sized> Clone for MaskedView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for MaskedView<'_, T> {}

impl<T> Serialize for MaskedView<'_, T>
where
    T: ?Sized + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value.serialize(MaskingSerializer {
            inner: serializer,
            ctx: self.ctx,
        })
    }
}

/// A field value that must be emitted in masked form.
struct MaskedLeaf<'a, T: ?Sized> {
    value: &'a T,
    style: MaskStyle,
    mask_char: char,
}

impl<T> Serialize for MaskedLeaf<'_, T>
where
    T: ?Sized + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value.serialize(TextCapture) {
            Ok(Some(text)) => serializer.serialize_str(&self.style.apply(&text, self.mask_char)),
            Ok(None) => serializer.serialize_none(),
            Err(CaptureError::Compound) => {
                // Structured values under a masked field are masked as one JSON text.
                let text = serde_json::to_string(self.value).map_err(ser::Error::custom)?;
                serializer.serialize_str(&self.style.apply(&text, self.mask_char))
            }
            Err(CaptureError::Custom(msg)) => Err(ser::Error::custom(msg)),
        }
    }
}

struct MaskingSerializer<'m, S> {
    inner: S,
    ctx: MaskContext<'m>,
}

impl<'m, S> Serializer for MaskingSerializer<'m, S>
where
    S: Serializer,
{
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = Seq<'m, S::SerializeSeq>;
    type SerializeTuple = Seq<'m, S::SerializeTuple>;
    type SerializeTupleStruct = Seq<'m, S::SerializeTupleStruct>;
    type SerializeTupleVariant = Seq<'m, S::SerializeTupleVariant>;
    type SerializeMap = Map<'m, S::SerializeMap>;
    type SerializeStruct = Struct<'m, S::SerializeStruct>;
    type SerializeStructVariant = Struct<'m, S::SerializeStructVariant>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_i8(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_i16(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_i32(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_i64(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_i128(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_u8(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_u16(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_u32(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_u64(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_u128(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_char(v)
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_str(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_bytes(v)
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_none()
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_some(&MaskedView::new(value, self.ctx))
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.inner
            .serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_newtype_struct(name, &MaskedView::new(value, self.ctx))
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_newtype_variant(
            name,
            variant_index,
            variant,
            &MaskedView::new(value, self.ctx),
        )
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(Seq {
            inner: self.inner.serialize_seq(len)?,
            ctx: self.ctx,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(Seq {
            inner: self.inner.serialize_tuple(len)?,
            ctx: self.ctx,
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(Seq {
            inner: self.inner.serialize_tuple_struct(name, len)?,
            ctx: self.ctx,
        })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(Seq {
            inner: self
                .inner
                .serialize_tuple_variant(name, variant_index, variant, len)?,
            ctx: self.ctx,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(Map {
            inner: self.inner.serialize_map(len)?,
            ctx: self.ctx,
            pending: MaskDecision::Unmasked,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(Struct {
            inner: self.inner.serialize_struct(name, len)?,
            ctx: self.ctx,
            type_name: name,
            variant: None,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(Struct {
            inner: self
                .inner
                .serialize_struct_variant(name, variant_index, variant, len)?,
            ctx: self.ctx,
            type_name: name,
            variant: Some(variant),
        })
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

/// Sequence-like compounds. Elements have no field name, so they are only
/// traversed.
struct Seq<'m, I> {
    inner: I,
    ctx: MaskContext<'m>,
}

impl<I: SerializeSeq> SerializeSeq for Seq<'_, I> {
    type Ok = I::Ok;
    type Error = I::Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_element(&MaskedView::new(value, self.ctx))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<I: SerializeTuple> SerializeTuple for Seq<'_, I> {
    type Ok = I::Ok;
    type Error = I::Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_element(&MaskedView::new(value, self.ctx))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<I: SerializeTupleStruct> SerializeTupleStruct for Seq<'_, I> {
    type Ok = I::Ok;
    type Error = I::Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_field(&MaskedView::new(value, self.ctx))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<I: SerializeTupleVariant> SerializeTupleVariant for Seq<'_, I> {
    type Ok = I::Ok;
    type Error = I::Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_field(&MaskedView::new(value, self.ctx))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

/// Maps. Entries whose key renders as text are resolved like fields named by
/// the key. Keys themselves are never masked.
struct Map<'m, I> {
    inner: I,
    ctx: MaskContext<'m>,
    pending: MaskDecision,
}

impl<I> Map<'_, I> {
    fn decide_key<K>(&self, key: &K) -> MaskDecision
    where
        K: ?Sized + Serialize,
    {
        if !self.ctx.policy.enabled() {
            return MaskDecision::Unmasked;
        }
        match key.serialize(TextCapture) {
            Ok(Some(name)) => self.ctx.resolve_key(&name),
            _ => MaskDecision::Unmasked,
        }
    }
}

impl<I: SerializeMap> SerializeMap for Map<'_, I> {
    type Ok = I::Ok;
    type Error = I::Error;

    fn serialize_key<K>(&mut self, key: &K) -> Result<(), Self::Error>
    where
        K: ?Sized + Serialize,
    {
        self.pending = self.decide_key(key);
        self.inner.serialize_key(key)
    }

    fn serialize_value<V>(&mut self, value: &V) -> Result<(), Self::Error>
    where
        V: ?Sized + Serialize,
    {
        let decision = std::mem::replace(&mut self.pending, MaskDecision::Unmasked);
        match decision {
            MaskDecision::Unmasked => self
                .inner
                .serialize_value(&MaskedView::new(value, self.ctx)),
            MaskDecision::Mask { style, mask_char } => self.inner.serialize_value(&MaskedLeaf {
                value,
                style,
                mask_char,
            }),
        }
    }

    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), Self::Error>
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        match self.decide_key(key) {
            MaskDecision::Unmasked => self
                .inner
                .serialize_entry(key, &MaskedView::new(value, self.ctx)),
            MaskDecision::Mask { style, mask_char } => self.inner.serialize_entry(
                key,
                &MaskedLeaf {
                    value,
                    style,
                    mask_char,
                },
            ),
        }
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

/// Structs and struct variants. Fields are resolved against the registry
/// entry for `type_name` (and `variant`) and the policy's field set.
struct Struct<'m, I> {
    inner: I,
    ctx: MaskContext<'m>,
    type_name: &'static str,
    variant: Option<&'static str>,
}

impl<I: SerializeStruct> SerializeStruct for Struct<'_, I> {
    type Ok = I::Ok;
    type Error = I::Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        match self.ctx.resolve_field(self.type_name, self.variant, key) {
            MaskDecision::Unmasked => self
                .inner
                .serialize_field(key, &MaskedView::new(value, self.ctx)),
            MaskDecision::Mask { style, mask_char } => self.inner.serialize_field(
                key,
                &MaskedLeaf {
                    value,
                    style,
                    mask_char,
                },
            ),
        }
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), Self::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<I: SerializeStructVariant> SerializeStructVariant for Struct<'_, I> {
    type Ok = I::Ok;
    type Error = I::Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        match self.ctx.resolve_field(self.type_name, self.variant, key) {
            MaskDecision::Unmasked => self
                .inner
                .serialize_field(key, &MaskedView::new(value, self.ctx)),
            MaskDecision::Mask { style, mask_char } => self.inner.serialize_field(
                key,
                &MaskedLeaf {
                    value,
                    style,
                    mask_char,
                },
            ),
        }
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), Self::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

// =============================================================================
// TextCapture - scalar to text conversion for masked leaves and map keys
// =============================================================================

#[derive(Debug)]
enum CaptureError {
    /// The value is a sequence, map, struct or non-unit variant.
    Compound,
    Custom(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Compound => f.write_str("value is not a scalar"),
            CaptureError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for CaptureError {}

impl ser::Error for CaptureError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CaptureError::Custom(msg.to_string())
    }
}

/// Renders scalars as their standard text form; `None` and unit become `None`.
struct TextCapture;

type CaptureResult = Result<Option<String>, CaptureError>;
type NoCompound = Impossible<Option<String>, CaptureError>;

impl Serializer for TextCapture {
    type Ok = Option<String>;
    type Error = CaptureError;
    type SerializeSeq = NoCompound;
    type SerializeTuple = NoCompound;
    type SerializeTupleStruct = NoCompound;
    type SerializeTupleVariant = NoCompound;
    type SerializeMap = NoCompound;
    type SerializeStruct = NoCompound;
    type SerializeStructVariant = NoCompound;

    fn serialize_bool(self, v: bool) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_char(self, v: char) -> CaptureResult {
        Ok(Some(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> CaptureResult {
        Ok(Some(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> CaptureResult {
        Ok(Some(String::from_utf8_lossy(v).into_owned()))
    }

    fn serialize_none(self) -> CaptureResult {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> CaptureResult
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> CaptureResult {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> CaptureResult {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> CaptureResult {
        Ok(Some(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> CaptureResult
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> CaptureResult
    where
        T: ?Sized + Serialize,
    {
        Err(CaptureError::Compound)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(CaptureError::Compound)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(CaptureError::Compound)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(CaptureError::Compound)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(CaptureError::Compound)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(CaptureError::Compound)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(CaptureError::Compound)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(CaptureError::Compound)
    }
}
