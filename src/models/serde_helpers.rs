//! 宽松的反序列化辅助函数
//!
//! 后端和前端表单对 id 的写法不统一（`"q1"` 或 `1`），这里统一成字符串。

use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;

/// 将字符串或整数形式的 id 反序列化为 `String`
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "super::deserialize_id")]
        id: String,
    }

    #[test]
    fn test_id_from_string_or_number() {
        let a: Holder = serde_json::from_str(r#"{"id": "q1"}"#).unwrap();
        let b: Holder = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(a.id, "q1");
        assert_eq!(b.id, "3");
    }
}
