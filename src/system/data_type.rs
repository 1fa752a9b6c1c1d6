//! Typed values exchanged with a target process
//!
//! `DataType` is the closed set of primitive types the accessor can
//! marshal, `Value` is one value of one of those types (the typed buffer
//! handed to `read_value` / `write_value`), and `Primitive` maps plain Rust
//! types onto them for the generic `read::<T>` / `write::<T>` calls.

use std::ffi::{c_long, c_ulong};
use std::fmt;
use std::mem;

use crate::error::{ValueError, ValueResult};

/// Primitive types supported by the accessor.
///
/// The discriminants are stable numeric tags that can be used on the
/// command line in place of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool = 0,
    Int16 = 1,
    Int32 = 2,
    Int64 = 3,
    Float = 4,
    Double = 5,
    Long = 6,
    ULong = 7,
    LongLong = 8,
    ULongLong = 9,
    SizeT = 10,
    Char = 11,
    Byte = 12,
    WChar = 13,
    VoidPtr = 14,
}

impl DataType {
    /// Every data type, in tag order
    pub const ALL: [DataType; 15] = [
        DataType::Bool,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Float,
        DataType::Double,
        DataType::Long,
        DataType::ULong,
        DataType::LongLong,
        DataType::ULongLong,
        DataType::SizeT,
        DataType::Char,
        DataType::Byte,
        DataType::WChar,
        DataType::VoidPtr,
    ];

    /// Numeric tag of this type
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Looks up a type by numeric tag
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Size in bytes of a value of this type in the target process
    pub fn size(self) -> usize {
        match self {
            DataType::Bool => mem::size_of::<bool>(),
            DataType::Int16 => mem::size_of::<i16>(),
            DataType::Int32 => mem::size_of::<i32>(),
            DataType::Int64 => mem::size_of::<i64>(),
            DataType::Float => mem::size_of::<f32>(),
            DataType::Double => mem::size_of::<f64>(),
            DataType::Long => mem::size_of::<c_long>(),
            DataType::ULong => mem::size_of::<c_ulong>(),
            DataType::LongLong => mem::size_of::<i64>(),
            DataType::ULongLong => mem::size_of::<u64>(),
            DataType::SizeT => mem::size_of::<usize>(),
            DataType::Char => mem::size_of::<u8>(),
            DataType::Byte => mem::size_of::<i8>(),
            DataType::WChar => mem::size_of::<u16>(),
            DataType::VoidPtr => mem::size_of::<usize>(),
        }
    }

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Long => "long",
            DataType::ULong => "ulong",
            DataType::LongLong => "llong",
            DataType::ULongLong => "ullong",
            DataType::SizeT => "size_t",
            DataType::Char => "char",
            DataType::Byte => "byte",
            DataType::WChar => "wchar",
            DataType::VoidPtr => "voidp",
        }
    }

    /// Matching C type, for display
    pub fn c_name(self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int16 => "int16_t",
            DataType::Int32 => "int32_t",
            DataType::Int64 => "int64_t",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Long => "long",
            DataType::ULong => "unsigned long",
            DataType::LongLong => "long long",
            DataType::ULongLong => "unsigned long long",
            DataType::SizeT => "size_t",
            DataType::Char => "char",
            DataType::Byte => "signed char",
            DataType::WChar => "wchar_t",
            DataType::VoidPtr => "void *",
        }
    }

    /// Resolves a type from a name, an alias or a numeric tag.
    ///
    /// Matching is case-insensitive, so `DOUBLE`, `double`, `f64` and `5`
    /// all resolve to `DataType::Double`.
    pub fn from_name(name: &str) -> ValueResult<Self> {
        let lower = name.trim().to_ascii_lowercase();

        if let Ok(tag) = lower.parse::<u8>() {
            return Self::from_tag(tag).ok_or_else(|| ValueError::UnknownType {
                name: name.to_string(),
            });
        }

        let data_type = match lower.as_str() {
            "bool" | "boolean" => DataType::Bool,
            "int16" | "i16" | "short" => DataType::Int16,
            "int32" | "i32" | "int" => DataType::Int32,
            "int64" | "i64" => DataType::Int64,
            "float" | "f32" => DataType::Float,
            "double" | "f64" => DataType::Double,
            "long" => DataType::Long,
            "ulong" => DataType::ULong,
            "llong" | "longlong" => DataType::LongLong,
            "ullong" | "ulonglong" | "u64" => DataType::ULongLong,
            "size_t" | "sizet" | "usize" => DataType::SizeT,
            "char" | "u8" => DataType::Char,
            "byte" | "i8" => DataType::Byte,
            "wchar" | "u16" => DataType::WChar,
            "voidp" | "ptr" | "pointer" => DataType::VoidPtr,
            _ => {
                return Err(ValueError::UnknownType {
                    name: name.to_string(),
                })
            }
        };
        Ok(data_type)
    }

    /// A zero value of this type, ready to be filled by a read
    pub fn zeroed(self) -> Value {
        match self {
            DataType::Bool => Value::Bool(false),
            DataType::Int16 => Value::Int16(0),
            DataType::Int32 => Value::Int32(0),
            DataType::Int64 => Value::Int64(0),
            DataType::Float => Value::Float(0.0),
            DataType::Double => Value::Double(0.0),
            DataType::Long => Value::Long(0),
            DataType::ULong => Value::ULong(0),
            DataType::LongLong => Value::LongLong(0),
            DataType::ULongLong => Value::ULongLong(0),
            DataType::SizeT => Value::SizeT(0),
            DataType::Char => Value::Char(0),
            DataType::Byte => Value::Byte(0),
            DataType::WChar => Value::WChar(0),
            DataType::VoidPtr => Value::VoidPtr(0),
        }
    }

    /// Parses user text into a value of this type.
    ///
    /// Integers accept decimal or `0x` hex with an optional sign. `char`
    /// and `wchar` accept either a single character or its numeric code.
    pub fn parse_value(self, input: &str) -> ValueResult<Value> {
        let text = input.trim();
        let invalid = |reason: &'static str| ValueError::Invalid {
            data_type: self,
            input: input.to_string(),
            reason,
        };

        let value = match self {
            DataType::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Value::Bool(true),
                "false" | "0" | "no" | "off" => Value::Bool(false),
                _ => return Err(invalid("expected true or false")),
            },
            DataType::Float => Value::Float(
                text.parse()
                    .map_err(|_| invalid("not a floating-point number"))?,
            ),
            DataType::Double => Value::Double(
                text.parse()
                    .map_err(|_| invalid("not a floating-point number"))?,
            ),
            DataType::Int16 => Value::Int16(integer(text).map_err(invalid)?),
            DataType::Int32 => Value::Int32(integer(text).map_err(invalid)?),
            DataType::Int64 => Value::Int64(integer(text).map_err(invalid)?),
            DataType::Long => Value::Long(integer(text).map_err(invalid)?),
            DataType::ULong => Value::ULong(integer(text).map_err(invalid)?),
            DataType::LongLong => Value::LongLong(integer(text).map_err(invalid)?),
            DataType::ULongLong => Value::ULongLong(integer(text).map_err(invalid)?),
            DataType::SizeT => Value::SizeT(integer(text).map_err(invalid)?),
            DataType::Byte => Value::Byte(integer(text).map_err(invalid)?),
            DataType::VoidPtr => Value::VoidPtr(integer(text).map_err(invalid)?),
            DataType::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii() => Value::Char(c as u8),
                    (Some(_), None) => {
                        return Err(invalid("expected a single ASCII character or code"))
                    }
                    _ => Value::Char(integer(text).map_err(invalid)?),
                }
            }
            DataType::WChar => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.len_utf16() == 1 => {
                        let mut unit = [0u16; 1];
                        c.encode_utf16(&mut unit);
                        Value::WChar(unit[0])
                    }
                    (Some(_), None) => {
                        return Err(invalid("character does not fit in one UTF-16 unit"))
                    }
                    _ => Value::WChar(integer(text).map_err(invalid)?),
                }
            }
        };
        Ok(value)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a signed decimal or `0x` hex integer.
///
/// Used for pids, addresses and access masks as well as integer values.
pub fn parse_integer(input: &str) -> Option<i128> {
    let text = input.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (body, radix) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (digits, 10),
    };

    // from_str_radix accepts its own sign; only one is allowed
    if body.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i128::from_str_radix(body, radix).ok()?;
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}

/// Parses an integer and narrows it to `T`
fn integer<T: TryFrom<i128>>(text: &str) -> Result<T, &'static str> {
    let wide = parse_integer(text).ok_or("not a number")?;
    T::try_from(wide).map_err(|_| "out of range")
}

/// One value of one `DataType`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Long(c_long),
    ULong(c_ulong),
    LongLong(i64),
    ULongLong(u64),
    SizeT(usize),
    Char(u8),
    Byte(i8),
    WChar(u16),
    VoidPtr(usize),
}

impl Value {
    /// The type tag of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Bool,
            Value::Int16(_) => DataType::Int16,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Long(_) => DataType::Long,
            Value::ULong(_) => DataType::ULong,
            Value::LongLong(_) => DataType::LongLong,
            Value::ULongLong(_) => DataType::ULongLong,
            Value::SizeT(_) => DataType::SizeT,
            Value::Char(_) => DataType::Char,
            Value::Byte(_) => DataType::Byte,
            Value::WChar(_) => DataType::WChar,
            Value::VoidPtr(_) => DataType::VoidPtr,
        }
    }

    /// Native-endian bytes, exactly `data_type().size()` long
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        match *self {
            Value::Bool(v) => vec![v as u8],
            Value::Int16(v) => v.to_ne_bytes().to_vec(),
            Value::Int32(v) => v.to_ne_bytes().to_vec(),
            Value::Int64(v) => v.to_ne_bytes().to_vec(),
            Value::Float(v) => v.to_ne_bytes().to_vec(),
            Value::Double(v) => v.to_ne_bytes().to_vec(),
            Value::Long(v) => v.to_ne_bytes().to_vec(),
            Value::ULong(v) => v.to_ne_bytes().to_vec(),
            Value::LongLong(v) => v.to_ne_bytes().to_vec(),
            Value::ULongLong(v) => v.to_ne_bytes().to_vec(),
            Value::SizeT(v) => v.to_ne_bytes().to_vec(),
            Value::Char(v) => vec![v],
            Value::Byte(v) => v.to_ne_bytes().to_vec(),
            Value::WChar(v) => v.to_ne_bytes().to_vec(),
            Value::VoidPtr(v) => v.to_ne_bytes().to_vec(),
        }
    }

    /// Decodes native-endian bytes as `data_type`.
    ///
    /// Returns `None` when `bytes` is not exactly `data_type.size()` long.
    pub fn from_ne_bytes(data_type: DataType, bytes: &[u8]) -> Option<Self> {
        macro_rules! decode {
            ($ty:ty) => {
                <$ty>::from_ne_bytes(bytes.try_into().ok()?)
            };
        }

        if bytes.len() != data_type.size() {
            return None;
        }

        let value = match data_type {
            DataType::Bool => Value::Bool(bytes[0] != 0),
            DataType::Int16 => Value::Int16(decode!(i16)),
            DataType::Int32 => Value::Int32(decode!(i32)),
            DataType::Int64 => Value::Int64(decode!(i64)),
            DataType::Float => Value::Float(decode!(f32)),
            DataType::Double => Value::Double(decode!(f64)),
            DataType::Long => Value::Long(decode!(c_long)),
            DataType::ULong => Value::ULong(decode!(c_ulong)),
            DataType::LongLong => Value::LongLong(decode!(i64)),
            DataType::ULongLong => Value::ULongLong(decode!(u64)),
            DataType::SizeT => Value::SizeT(decode!(usize)),
            DataType::Char => Value::Char(bytes[0]),
            DataType::Byte => Value::Byte(decode!(i8)),
            DataType::WChar => Value::WChar(decode!(u16)),
            DataType::VoidPtr => Value::VoidPtr(decode!(usize)),
        };
        Some(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::ULong(v) => write!(f, "{}", v),
            Value::LongLong(v) => write!(f, "{}", v),
            Value::ULongLong(v) => write!(f, "{}", v),
            Value::SizeT(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "'{}'", (v as char).escape_default()),
            Value::Byte(v) => write!(f, "{}", v),
            Value::WChar(v) => match char::from_u32(v as u32) {
                Some(c) => write!(f, "'{}'", c.escape_default()),
                None => write!(f, "0x{:04X}", v),
            },
            Value::VoidPtr(v) => write!(f, "0x{:X}", v),
        }
    }
}

mod private {
    pub trait Sealed {}
}

/// Rust types that can be read from or written to a target process.
///
/// Each implementor maps to exactly one `DataType`, so the type is fixed
/// at compile time.
pub trait Primitive: Copy + private::Sealed {
    /// The tag values of this type travel as
    const DATA_TYPE: DataType;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl Primitive for $ty {
                const DATA_TYPE: DataType = DataType::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i8 => Byte,
    u8 => Char,
    i16 => Int16,
    u16 => WChar,
    i32 => Int32,
    i64 => Int64,
    u64 => ULongLong,
    f32 => Float,
    f64 => Double,
    usize => SizeT,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_and_names_resolve() {
        for data_type in DataType::ALL {
            assert_eq!(DataType::from_tag(data_type.tag()), Some(data_type));
            assert_eq!(DataType::from_name(data_type.name()), Ok(data_type));
            assert_eq!(
                DataType::from_name(&data_type.tag().to_string()),
                Ok(data_type)
            );
        }
        assert_eq!(DataType::from_tag(15), None);
    }

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(DataType::from_name("DOUBLE"), Ok(DataType::Double));
        assert_eq!(DataType::from_name("f32"), Ok(DataType::Float));
        assert_eq!(DataType::from_name("SIZE_T"), Ok(DataType::SizeT));
        assert_eq!(DataType::from_name("ULLONG"), Ok(DataType::ULongLong));
        assert!(matches!(
            DataType::from_name("quad"),
            Err(ValueError::UnknownType { .. })
        ));
        assert!(DataType::from_name("99").is_err());
    }

    #[test]
    fn test_sizes() {
        assert_eq!(DataType::Bool.size(), 1);
        assert_eq!(DataType::Int16.size(), 2);
        assert_eq!(DataType::Float.size(), 4);
        assert_eq!(DataType::Double.size(), 8);
        assert_eq!(DataType::WChar.size(), 2);
        assert_eq!(DataType::Long.size(), mem::size_of::<c_long>());
        assert_eq!(DataType::VoidPtr.size(), mem::size_of::<*const u8>());

        for data_type in DataType::ALL {
            assert_eq!(data_type.zeroed().to_ne_bytes().len(), data_type.size());
        }
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(DataType::Double.parse_value("1.5"), Ok(Value::Double(1.5)));
        assert_eq!(DataType::Int32.parse_value("-0x10"), Ok(Value::Int32(-16)));
        assert_eq!(DataType::Bool.parse_value("yes"), Ok(Value::Bool(true)));
        assert_eq!(DataType::Char.parse_value("A"), Ok(Value::Char(b'A')));
        assert_eq!(DataType::Char.parse_value("65"), Ok(Value::Char(b'A')));
        assert_eq!(DataType::WChar.parse_value("é"), Ok(Value::WChar(0xE9)));
        assert_eq!(
            DataType::VoidPtr.parse_value("0x63DE0C"),
            Ok(Value::VoidPtr(0x63DE0C))
        );
    }

    #[test]
    fn test_parse_value_rejects() {
        assert!(DataType::Int16.parse_value("40000").is_err());
        assert!(DataType::ULongLong.parse_value("-1").is_err());
        assert!(DataType::Float.parse_value("one").is_err());
        assert!(DataType::Bool.parse_value("2").is_err());
        assert!(DataType::Byte.parse_value("200").is_err());

        match DataType::Int32.parse_value("abc") {
            Err(ValueError::Invalid { data_type, reason, .. }) => {
                assert_eq!(data_type, DataType::Int32);
                assert_eq!(reason, "not a number");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("4284"), Some(4284));
        assert_eq!(parse_integer(" 0x63DE0C "), Some(0x63DE0C));
        assert_eq!(parse_integer("-0X10"), Some(-16));
        assert_eq!(parse_integer("+7"), Some(7));
    }

    #[test]
    fn test_parse_integer_single_sign() {
        assert_eq!(parse_integer("--5"), None);
        assert_eq!(parse_integer("+-5"), None);
        assert_eq!(parse_integer("-+5"), None);
        assert_eq!(parse_integer("0x-5"), None);
        assert_eq!(parse_integer("0x+5"), None);
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer("0x"), None);
    }

    #[test]
    fn test_parse_integer_extremes_do_not_overflow() {
        assert_eq!(parse_integer("--170141183460469231731687303715884105728"), None);
        assert_eq!(parse_integer("-170141183460469231731687303715884105728"), None);
        assert_eq!(
            parse_integer("-170141183460469231731687303715884105727"),
            Some(-i128::MAX)
        );
        assert!(DataType::LongLong
            .parse_value("--170141183460469231731687303715884105728")
            .is_err());
    }

    #[test]
    fn test_bytes_decode() {
        let value = Value::Double(2.25);
        let bytes = value.to_ne_bytes();
        assert_eq!(Value::from_ne_bytes(DataType::Double, &bytes), Some(value));
        assert_eq!(Value::from_ne_bytes(DataType::Double, &bytes[..4]), None);
        assert_eq!(
            Value::from_ne_bytes(DataType::Bool, &[7]),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_primitive_mapping() {
        assert_eq!(<f64 as Primitive>::DATA_TYPE, DataType::Double);
        assert_eq!(1.5f32.into_value(), Value::Float(1.5));
        assert_eq!(i32::from_value(Value::Int32(7)), Some(7));
        assert_eq!(i32::from_value(Value::Int64(7)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::VoidPtr(0xBEEF).to_string(), "0xBEEF");
        assert_eq!(Value::Char(b'x').to_string(), "'x'");
        assert_eq!(Value::Double(1.5).to_string(), "1.5");
    }
}
