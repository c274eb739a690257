use crate::{IndexData, TensorData, TensorGraph};
use migrad_core::error::{Error, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
struct SerializedTensorData {
    shape: Vec<usize>,
    data: Vec<f64>,
    scalar: bool,
}

#[derive(Serialize, Deserialize)]
struct SerializedIndexData {
    shape: Vec<usize>,
    data: Vec<usize>,
}

impl Serialize for TensorData {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializedTensorData {
            shape: self.shape().to_vec(),
            data: self.to_flatten_vec(),
            scalar: self.is_scalar(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TensorData {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let serialized = SerializedTensorData::deserialize(deserializer)?;
        TensorData::from_parts(&serialized.shape, serialized.data, serialized.scalar).map_err(de::Error::custom)
    }
}

impl Serialize for IndexData {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializedIndexData {
            shape: self.shape().to_vec(),
            data: self.to_flatten_vec(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IndexData {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let serialized = SerializedIndexData::deserialize(deserializer)?;
        IndexData::from_shape_vec(&serialized.shape, serialized.data).map_err(de::Error::custom)
    }
}

impl TensorData {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let config = bincode::config::legacy();
        bincode::serde::encode_to_vec(self, config)
            .map_err(|e| Error::Serialization(format!("Failed to serialize tensor: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::legacy();
        bincode::serde::decode_from_slice(bytes, config)
            .map(|(value, _)| value)
            .map_err(|e| Error::Deserialization(format!("Failed to deserialize tensor: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(format!("Failed to serialize tensor to JSON: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Deserialization(format!("Failed to deserialize tensor from JSON: {}", e)))
    }
}

impl TensorGraph {
    /// JSON dump of every node: data, gradient, parent ids and operation.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.snapshot())
            .map_err(|e| Error::Serialization(format!("Failed to serialize graph to JSON: {}", e)))
    }
}
