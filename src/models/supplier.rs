use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

/// A supplier as the service returns it.
///
/// `id` and `rating` are opaque text: the service may send either as a string
/// or a number, and both are kept exactly as received. Missing and `null`
/// fields decode to their empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(default, deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "or_default")]
    pub address: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub rating: String,
    #[serde(default, deserialize_with = "or_default")]
    pub available: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub product_list: Vec<Value>,
}

/// Request body for create and update. The id travels in the path, never here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierPayload {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub rating: String,
    pub available: bool,
    pub product_list: Vec<Value>,
}

impl SupplierPayload {
    /// The supplier the service is expected to echo back for this payload.
    pub fn into_supplier(self, id: impl Into<String>) -> Supplier {
        Supplier {
            id: id.into(),
            name: self.name,
            phone: self.phone,
            address: self.address,
            rating: self.rating,
            available: self.available,
            product_list: self.product_list,
        }
    }
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
