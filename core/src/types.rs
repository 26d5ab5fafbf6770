//! Closed enumerations shared by every generated table.
//!
//! Each enumeration is a fixed, read-only table: a symbolic tag used in the
//! emitted code, and a numeric value (ZCL wire code, transport index, or
//! subsystem ID). Source documents refer to members by tag, by a legacy
//! spelling, or (for the transport enumerations) by integer index; all of
//! those lookups live here and nowhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// A tag or index that does not name a member of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{tag}` is not a known {kind}")]
pub struct ParseTagError {
    /// Name of the enumeration that rejected the tag.
    pub kind: &'static str,
    /// The rejected input.
    pub tag: String,
}

macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal = $value:expr, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )* ];

            /// Symbolic tag used in source documents and emitted code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $tag, )*
                }
            }

            /// Numeric value of this member.
            pub const fn value(self) -> u16 {
                match self {
                    $( $name::$variant => $value, )*
                }
            }

            /// Looks a member up by its exact symbolic tag.
            pub fn from_tag(tag: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|member| member.as_str() == tag)
            }

            /// Looks a member up by its numeric value.
            pub fn from_value(value: u16) -> Option<Self> {
                Self::ALL.iter().copied().find(|member| member.value() == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl $name {
            const KIND: &'static str = $kind;
        }
    };
}

tagged_enum! {
    /// ZCL wire-level value encodings usable for attributes and command
    /// parameters.
    ///
    /// Values below `0x100` are ZCL data type codes. Values from 1000 up are
    /// extended encodings that only appear in command parameter lists.
    ///
    /// # Examples
    ///
    /// ```
    /// use protocol_table_core::DataType;
    ///
    /// assert_eq!("UINT8".parse::<DataType>(), Ok(DataType::Uint8));
    /// assert_eq!("charStr".parse::<DataType>(), Ok(DataType::CharStr));
    /// assert_eq!(DataType::Uint8.value(), 0x20);
    /// assert!("notARealType".parse::<DataType>().is_err());
    /// ```
    DataType: "data type" {
        NoData => "NO_DATA" = 0x00,
        Data8 => "DATA8" = 0x08,
        Data16 => "DATA16" = 0x09,
        Data24 => "DATA24" = 0x0a,
        Data32 => "DATA32" = 0x0b,
        Data40 => "DATA40" = 0x0c,
        Data48 => "DATA48" = 0x0d,
        Data56 => "DATA56" = 0x0e,
        Data64 => "DATA64" = 0x0f,
        Boolean => "BOOLEAN" = 0x10,
        Bitmap8 => "BITMAP8" = 0x18,
        Bitmap16 => "BITMAP16" = 0x19,
        Bitmap24 => "BITMAP24" = 0x1a,
        Bitmap32 => "BITMAP32" = 0x1b,
        Bitmap40 => "BITMAP40" = 0x1c,
        Bitmap48 => "BITMAP48" = 0x1d,
        Bitmap56 => "BITMAP56" = 0x1e,
        Bitmap64 => "BITMAP64" = 0x1f,
        Uint8 => "UINT8" = 0x20,
        Uint16 => "UINT16" = 0x21,
        Uint24 => "UINT24" = 0x22,
        Uint32 => "UINT32" = 0x23,
        Uint40 => "UINT40" = 0x24,
        Uint48 => "UINT48" = 0x25,
        Uint56 => "UINT56" = 0x26,
        Uint64 => "UINT64" = 0x27,
        Int8 => "INT8" = 0x28,
        Int16 => "INT16" = 0x29,
        Int24 => "INT24" = 0x2a,
        Int32 => "INT32" = 0x2b,
        Int40 => "INT40" = 0x2c,
        Int48 => "INT48" = 0x2d,
        Int56 => "INT56" = 0x2e,
        Int64 => "INT64" = 0x2f,
        Enum8 => "ENUM8" = 0x30,
        Enum16 => "ENUM16" = 0x31,
        SemiPrec => "SEMI_PREC" = 0x38,
        SinglePrec => "SINGLE_PREC" = 0x39,
        DoublePrec => "DOUBLE_PREC" = 0x3a,
        OctetStr => "OCTET_STR" = 0x41,
        CharStr => "CHAR_STR" = 0x42,
        LongOctetStr => "LONG_OCTET_STR" = 0x43,
        LongCharStr => "LONG_CHAR_STR" = 0x44,
        Array => "ARRAY" = 0x48,
        Struct => "STRUCT" = 0x4c,
        Set => "SET" = 0x50,
        Bag => "BAG" = 0x51,
        Tod => "TOD" = 0xe0,
        Date => "DATE" = 0xe1,
        Utc => "UTC" = 0xe2,
        ClusterId => "CLUSTER_ID" = 0xe8,
        AttrId => "ATTR_ID" = 0xe9,
        BacOid => "BAC_OID" = 0xea,
        IeeeAddr => "IEEE_ADDR" = 0xf0,
        SecKey => "SEC_KEY" = 0xf1,
        Unknown => "UNKNOWN" = 0xff,
        UseDataType => "USE_DATA_TYPE" = 1000,
        ListUint8 => "LIST_UINT8" = 1001,
        ListUint16 => "LIST_UINT16" = 1002,
        ListUint24 => "LIST_UINT24" = 1003,
        ListUint32 => "LIST_UINT32" = 1004,
        ListZoneInfo => "LIST_ZONEINFO" = 1005,
        ExtensionFieldSets => "EXTENSION_FIELD_SETS" = 1006,
        ListThermoTransitions => "LIST_THERMO_TRANSITIONS" = 1007,
        Buffer => "BUFFER" = 1008,
        GdpFrame => "GDP_FRAME" = 1009,
        StructuredSelector => "STRUCTURED_SELECTOR" = 1010,
        ListTuyaDatapointValues => "LIST_TUYA_DATAPOINT_VALUES" = 1011,
    }
}

/// Legacy parameter encodings whose names do not follow the camelCase rule.
const LEGACY_DATA_TYPE_ALIASES: &[(&str, DataType)] = &[
    ("dynUint8", DataType::ListUint8),
    ("dynUint16", DataType::ListUint16),
    ("dynUint24", DataType::ListUint24),
    ("dynUint32", DataType::ListUint32),
    ("extfieldsets", DataType::ExtensionFieldSets),
];

impl DataType {
    /// Returns `true` for the extended encodings that are only valid in
    /// command parameter lists.
    pub const fn is_extended(self) -> bool {
        self.value() >= 1000
    }

    /// Looks a member up by the camelCase spelling older sources use
    /// (`charStr` for `CHAR_STR`, `uint8` for `UINT8`).
    pub fn from_legacy_name(name: &str) -> Option<Self> {
        if let Some(&(_, data_type)) = LEGACY_DATA_TYPE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
        {
            return Some(data_type);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|member| camel_case(member.as_str()) == name)
    }
}

impl FromStr for DataType {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
            .or_else(|| Self::from_legacy_name(s))
            .ok_or_else(|| ParseTagError {
                kind: Self::KIND,
                tag: s.to_string(),
            })
    }
}

/// `CHAR_STR` -> `charStr`, `UINT8` -> `uint8`.
fn camel_case(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    let mut upper_next = false;
    for ch in tag.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}

tagged_enum! {
    /// Synchronous/asynchronous shape of a transport command.
    ///
    /// The value is the legacy source index.
    CommandType: "command type" {
        Poll => "POLL" = 0,
        Sreq => "SREQ" = 1,
        Areq => "AREQ" = 2,
        Srsp => "SRSP" = 3,
    }
}

tagged_enum! {
    /// Wire encodings of transport command parameters.
    ///
    /// The value is the position in the legacy index list, so the order of
    /// members here is part of the source format and must not change.
    ParameterType: "parameter type" {
        Uint8 => "UINT8" = 0,
        Uint16 => "UINT16" = 1,
        Uint32 => "UINT32" = 2,
        LongAddr => "LONGADDR" = 3,
        ZdoMsgCb => "ZDOMSGCB" = 4,
        DevListBuffer => "DEVLISTBUFFER" = 5,
        NwkListBuffer => "NWKLISTBUFFER" = 6,
        PreLenUint8 => "_PRELENUINT8" = 7,
        PreLenUint16 => "_PRELENUINT16" = 8,
        PreLenList => "PRELENLIST" = 9,
        PreLenBeaconList => "PRELENBEACONLIST" = 10,
        DynBuffer => "DYNBUFFER" = 11,
        ListBuffer => "LISTBUFFER" = 12,
        Buffer => "BUFFER" = 13,
        Buffer8 => "BUFFER8" = 14,
        Buffer16 => "BUFFER16" = 15,
        Buffer18 => "BUFFER18" = 16,
        Buffer32 => "BUFFER32" = 17,
        Buffer42 => "BUFFER42" = 18,
        Buffer100 => "BUFFER100" = 19,
        Uint8ZdoInd => "UINT8ZDOIND" = 20,
        Uint32Be => "UINT32BE" = 21,
    }
}

tagged_enum! {
    /// Command groups of the co-processor serial interface, valued by
    /// subsystem ID.
    Subsystem: "subsystem" {
        Reserved => "RESERVED" = 0,
        Sys => "SYS" = 1,
        Mac => "MAC" = 2,
        Nwk => "NWK" = 3,
        Af => "AF" = 4,
        Zdo => "ZDO" = 5,
        Sapi => "SAPI" = 6,
        Util => "UTIL" = 7,
        Debug => "DEBUG" = 8,
        App => "APP" = 9,
        AppCnf => "APP_CNF" = 15,
        GreenPower => "GREENPOWER" = 21,
    }
}

/// Index-based lookup for the enumerations whose legacy sources refer to
/// members by position.
pub trait IndexedTag: Sized + Copy {
    /// Resolves a raw source index, returning `None` when out of range.
    fn from_index(index: i64) -> Option<Self>;
}

macro_rules! impl_indexed_tag {
    ($($name:ident),*) => {
        $(
            impl IndexedTag for $name {
                fn from_index(index: i64) -> Option<Self> {
                    usize::try_from(index)
                        .ok()
                        .and_then(|pos| Self::ALL.get(pos).copied())
                }
            }

            impl FromStr for $name {
                type Err = ParseTagError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::from_tag(s).ok_or_else(|| ParseTagError {
                        kind: Self::KIND,
                        tag: s.to_string(),
                    })
                }
            }
        )*
    };
}

impl_indexed_tag!(CommandType, ParameterType);

impl FromStr for Subsystem {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ParseTagError {
            kind: Self::KIND,
            tag: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_tags_are_unique() {
        for (i, a) in DataType::ALL.iter().enumerate() {
            for b in &DataType::ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
                assert_ne!(a.value(), b.value());
            }
        }
    }

    #[test]
    fn test_data_type_accepts_legacy_spellings() {
        assert_eq!("uint16".parse(), Ok(DataType::Uint16));
        assert_eq!("longOctetStr".parse(), Ok(DataType::LongOctetStr));
        assert_eq!("ieeeAddr".parse(), Ok(DataType::IeeeAddr));
        assert_eq!("noData".parse(), Ok(DataType::NoData));
        assert_eq!("dynUint8".parse(), Ok(DataType::ListUint8));
        assert_eq!("extfieldsets".parse(), Ok(DataType::ExtensionFieldSets));
        assert_eq!("buffer".parse(), Ok(DataType::Buffer));
    }

    #[test]
    fn test_data_type_rejects_unknown_name() {
        let err = "notARealType".parse::<DataType>().unwrap_err();
        assert_eq!(err.tag, "notARealType");
        assert_eq!(err.to_string(), "`notARealType` is not a known data type");
    }

    #[test]
    fn test_extended_types() {
        assert!(DataType::ListUint8.is_extended());
        assert!(!DataType::Uint8.is_extended());
    }

    #[test]
    fn test_command_type_index_bounds() {
        assert_eq!(CommandType::from_index(0), Some(CommandType::Poll));
        assert_eq!(CommandType::from_index(3), Some(CommandType::Srsp));
        assert_eq!(CommandType::from_index(4), None);
        assert_eq!(CommandType::from_index(-1), None);
    }

    #[test]
    fn test_parameter_type_index_table() {
        assert_eq!(ParameterType::ALL.len(), 22);
        for (pos, member) in ParameterType::ALL.iter().enumerate() {
            assert_eq!(usize::from(member.value()), pos);
            assert_eq!(ParameterType::from_index(pos as i64), Some(*member));
        }
        assert_eq!(ParameterType::from_index(3), Some(ParameterType::LongAddr));
        assert_eq!(ParameterType::from_index(22), None);
    }

    #[test]
    fn test_subsystem_ids() {
        assert_eq!("ZDO".parse::<Subsystem>().unwrap().value(), 5);
        assert_eq!(Subsystem::from_value(21), Some(Subsystem::GreenPower));
        assert!("WIFI".parse::<Subsystem>().is_err());
    }

    #[test]
    fn test_serialize_as_tag() {
        assert_eq!(
            serde_json::to_string(&DataType::CharStr).unwrap(),
            "\"CHAR_STR\""
        );
        assert_eq!(
            serde_json::to_string(&CommandType::Areq).unwrap(),
            "\"AREQ\""
        );
    }
}
