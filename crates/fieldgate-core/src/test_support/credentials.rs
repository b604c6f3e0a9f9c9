use crate::{
    message::{Message, MessageError, check_field},
    model::{
        field::{FieldDescriptor, FieldKind, ScalarType},
        message::MessageDescriptor,
    },
    test_support::ADMIN,
    value::Value,
};

pub static CREDENTIALS: MessageDescriptor = MessageDescriptor::new(
    "api.Credentials",
    &[
        FieldDescriptor::new(1, "username", FieldKind::Scalar(ScalarType::Text)).readonly(),
        FieldDescriptor::new(2, "password_hash", FieldKind::Scalar(ScalarType::Bytes)).role(ADMIN),
        FieldDescriptor::new(3, "attempts", FieldKind::Scalar(ScalarType::Int)),
    ],
);

///
/// Credentials
///
/// Hand-written typed message, exercising the capability without going
/// through `DynamicMessage`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password_hash: Vec<u8>,
    pub attempts: i64,
}

impl Message for Credentials {
    fn descriptor(&self) -> &'static MessageDescriptor {
        &CREDENTIALS
    }

    fn get_field(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(Value::Text(self.username.clone())),
            1 => Some(Value::Bytes(self.password_hash.clone())),
            2 => Some(Value::Int(self.attempts)),
            _ => None,
        }
    }

    fn set_field(&mut self, index: usize, value: Value) -> Result<(), MessageError> {
        check_field(&CREDENTIALS, index, &value)?;

        match value {
            Value::Text(v) => self.username = v,
            Value::Bytes(v) => self.password_hash = v,
            Value::Int(v) => self.attempts = v,
            _ => unreachable!("checked against the descriptor"),
        }

        Ok(())
    }
}
