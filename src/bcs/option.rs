//! Optional values: `0x00` when absent, `0x01` followed by the value when
//! present. Absent is always exactly one byte.

use super::{BcsDeserialize, BcsSerialize, Deserializer, Serializer};
use crate::error::BcsError;

const NONE_TAG: u8 = 0;
const SOME_TAG: u8 = 1;

impl Serializer {
    /// Write an optional value with a caller-supplied inner encoder.
    pub fn option_with<T>(&mut self, value: Option<&T>, encode: impl FnOnce(&mut Self, &T)) {
        match value {
            None => self.u8(NONE_TAG),
            Some(inner) => {
                self.u8(SOME_TAG);
                encode(self, inner);
            }
        }
    }

    pub fn option<T: BcsSerialize>(&mut self, value: Option<&T>) {
        self.option_with(value, |s, inner| inner.serialize(s));
    }
}

impl<'a> Deserializer<'a> {
    /// Read an optional value; the tag carries no type, so the caller supplies
    /// the decoder for the inner value.
    pub fn option_with<T>(
        &mut self,
        decode: impl FnOnce(&mut Self) -> Result<T, BcsError>,
    ) -> Result<Option<T>, BcsError> {
        match self.u8()? {
            NONE_TAG => Ok(None),
            SOME_TAG => decode(self).map(Some),
            tag => Err(BcsError::invalid(format!("option tag {tag:#04x}"))),
        }
    }

    pub fn option<T: BcsDeserialize>(&mut self) -> Result<Option<T>, BcsError> {
        self.option_with(T::deserialize)
    }
}

impl<T: BcsSerialize> BcsSerialize for Option<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.option(self.as_ref());
    }
}

impl<T: BcsDeserialize> BcsDeserialize for Option<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self, BcsError> {
        deserializer.option()
    }
}
