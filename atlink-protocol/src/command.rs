//! Application commands
//!
//! The platform controls a device by emitting `app-cmd` events:
//!
//! ```text
//! 42["app-cmd",{"operation":{"customCmd":"output","fieldIndex":1,"fieldValue":1}}]
//! ```
//!
//! Every field is optional. A field that is absent or of the wrong type
//! decodes to its sentinel ([`NO_VALUE`] or an empty command name) rather
//! than failing the whole command.

use heapless::String;
use serde_json::Value;

use crate::PayloadError;

/// Sentinel for an absent `fieldIndex` / `fieldValue`
pub const NO_VALUE: i32 = -1;

/// Maximum length of a `customCmd` name
pub const MAX_COMMAND_LEN: usize = 32;

/// A decoded application instruction
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Command name, empty when absent
    pub custom_cmd: String<MAX_COMMAND_LEN>,
    /// Target channel index, [`NO_VALUE`] when absent
    pub field_index: i32,
    /// Value to apply, [`NO_VALUE`] when absent
    pub field_value: i32,
}

impl Default for Command {
    fn default() -> Self {
        Self {
            custom_cmd: String::new(),
            field_index: NO_VALUE,
            field_value: NO_VALUE,
        }
    }
}

impl Command {
    /// Build a command (mostly for tests and simulation)
    pub fn new(custom_cmd: &str, field_index: i32, field_value: i32) -> Result<Self, PayloadError> {
        let mut name = String::new();
        name.push_str(custom_cmd).map_err(|_| PayloadError::TooLong)?;
        Ok(Self {
            custom_cmd: name,
            field_index,
            field_value,
        })
    }

    /// Decode the argument object of an `app-cmd` event
    ///
    /// `arg` must be a JSON object; its `operation` member is optional.
    pub fn from_value(arg: &Value) -> Result<Self, PayloadError> {
        let object = arg.as_object().ok_or(PayloadError::Shape)?;

        let Some(operation) = object.get("operation").and_then(Value::as_object) else {
            return Ok(Self::default());
        };

        let mut command = Self::default();
        if let Some(name) = operation.get("customCmd").and_then(Value::as_str) {
            command
                .custom_cmd
                .push_str(name)
                .map_err(|_| PayloadError::TooLong)?;
        }
        command.field_index = int_field(operation.get("fieldIndex"));
        command.field_value = int_field(operation.get("fieldValue"));
        Ok(command)
    }

    /// Decode from the argument's JSON text
    pub fn decode(arg: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(arg).map_err(|_| PayloadError::Json)?;
        Self::from_value(&value)
    }

    /// Command name
    pub fn name(&self) -> &str {
        self.custom_cmd.as_str()
    }

    /// Field index, if present and non-negative
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.field_index).ok()
    }

    /// Field value, if present and non-negative
    pub fn value(&self) -> Option<i32> {
        (self.field_value >= 0).then_some(self.field_value)
    }
}

fn int_field(field: Option<&Value>) -> i32 {
    field
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(NO_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_command() {
        let cmd =
            Command::decode(r#"{"operation":{"customCmd":"output","fieldIndex":1,"fieldValue":1}}"#)
                .unwrap();
        assert_eq!(cmd, Command::new("output", 1, 1).unwrap());
    }

    #[test]
    fn test_missing_field_value_is_sentinel() {
        let cmd = Command::decode(r#"{"operation":{"customCmd":"output","fieldIndex":1}}"#).unwrap();
        assert_eq!(cmd.name(), "output");
        assert_eq!(cmd.field_index, 1);
        assert_eq!(cmd.field_value, NO_VALUE);
        assert_eq!(cmd.value(), None);
    }

    #[test]
    fn test_missing_operation_is_all_sentinels() {
        let cmd = Command::decode(r#"{"other":true}"#).unwrap();
        assert_eq!(cmd, Command::default());
        assert_eq!(cmd.index(), None);
    }

    #[test]
    fn test_wrong_types_are_sentinels() {
        let cmd =
            Command::decode(r#"{"operation":{"customCmd":7,"fieldIndex":"2","fieldValue":1.5}}"#)
                .unwrap();
        assert_eq!(cmd, Command::default());
    }

    #[test]
    fn test_out_of_range_integer_is_sentinel() {
        let cmd = Command::decode(r#"{"operation":{"fieldIndex":99999999999}}"#).unwrap();
        assert_eq!(cmd.field_index, NO_VALUE);
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(Command::decode("[1,2]"), Err(PayloadError::Shape));
        assert_eq!(Command::decode("{nope"), Err(PayloadError::Json));
    }

    #[test]
    fn test_command_name_too_long() {
        let raw = alloc::format!(
            r#"{{"operation":{{"customCmd":"{}"}}}}"#,
            "x".repeat(MAX_COMMAND_LEN + 1)
        );
        assert_eq!(Command::decode(&raw), Err(PayloadError::TooLong));
    }
}
