//! `#[serde(with = "...")]` adapters for fields holding an [`Id`](crate::Id).
//!
//! A bare [`Ruid`](crate::Ruid) serializes as its `u64`. Use [`as_base64`]
//! for the 11-character text form instead, or [`as_native`] to spell the
//! native form out for any [`Id`](crate::Id).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::Id;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: Id,
        ID::Ty: Serialize,
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: Id,
        ID::Ty: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        <ID::Ty>::deserialize(d).map(ID::from_raw)
    }
}

pub mod as_base64 {
    use super::{Deserializer, Serializer};
    use crate::Base64Ext;

    /// Serialize an ID as unpadded URL-safe base64 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: Base64Ext,
        S: Serializer,
    {
        s.serialize_str(id.encode().as_str())
    }

    /// Deserialize an ID from unpadded URL-safe base64 text.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string has the wrong length or a byte outside the alphabet
    /// - The last character is not the canonical encoding
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: Base64Ext,
        D: Deserializer<'de>,
    {
        struct Base64Visitor<ID>(core::marker::PhantomData<ID>);

        impl<ID: Base64Ext> serde::de::Visitor<'_> for Base64Visitor<ID> {
            type Value = ID;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("an unpadded URL-safe base64 string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ID::decode(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(Base64Visitor(core::marker::PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeError, Ruid, RingConfig};
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "as_native")]
        native: Ruid,
        #[serde(with = "as_base64")]
        text: Ruid,
        bare: Ruid,
    }

    #[test]
    fn row_roundtrip() {
        let id = Ruid::from_raw(0x0102_0304_0506_0708);
        let row = Row {
            native: id,
            text: id,
            bare: id,
        };

        let value = serde_json::to_value(&row).expect("serialize");
        assert_eq!(
            value,
            json!({
                "native": 0x0102_0304_0506_0708_u64,
                "text": "CAcGBQQDAgE",
                "bare": 0x0102_0304_0506_0708_u64,
            })
        );
        let back: Row = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn native_u128() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Wide {
            #[serde(with = "as_native")]
            id: u128,
        }
        let json = serde_json::to_string(&Wide { id: 7 }).expect("serialize");
        assert_eq!(json, r#"{"id":7}"#);
        let back: Wide = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.id, 7);
    }

    #[test]
    fn base64_rejects_bad_text() {
        #[derive(Debug, Deserialize)]
        struct Text {
            #[serde(with = "as_base64")]
            #[allow(dead_code)]
            id: Ruid,
        }

        let err = serde_json::from_value::<Text>(json!({"id": "short"})).expect_err("length");
        assert!(
            err.to_string()
                .contains(&DecodeError::InvalidLength { expected: 11, len: 5 }.to_string())
        );

        let err =
            serde_json::from_value::<Text>(json!({"id": "AAAAAAAAAA+"})).expect_err("alphabet");
        assert!(err.to_string().contains("invalid ascii"));

        let err = serde_json::from_value::<Text>(json!({"id": "AAAAAAAAAAB"})).expect_err("bits");
        assert!(err.to_string().contains("non-canonical"));

        let err = serde_json::from_value::<Text>(json!({"id": 5})).expect_err("type");
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn ring_config_fills_defaults() {
        let config: RingConfig =
            serde_json::from_value(json!({"virtual_nodes": 200})).expect("deserialize");
        assert_eq!(config, RingConfig::default().with_virtual_nodes(200));
        assert_eq!(
            serde_json::to_value(RingConfig::default()).expect("serialize"),
            json!({"virtual_nodes": 50, "default_weight": 1, "max_replicas": 262_144})
        );
    }
}
