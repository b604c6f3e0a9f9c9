use crate::{
    message::{Message, MessageError},
    model::field::{FieldDescriptor, FieldKind},
    policy::{CallerContext, RedactionReason, RedactionReport},
    value::Value,
    visitor::FieldPath,
};

///
/// redact_for_read
///
/// Clear, in place, every field `caller` may not read. A guarded message
/// field is cleared as a whole; messages that pass are descended into so
/// their own fields are checked independently.
///
pub fn redact_for_read(
    message: &mut dyn Message,
    caller: &CallerContext,
) -> Result<(), MessageError> {
    let mut report = RedactionReport::new();

    redact_for_read_with_report(message, caller, &mut report)
}

/// Same as [`redact_for_read`], recording every cleared non-zero field.
pub fn redact_for_read_with_report(
    message: &mut dyn Message,
    caller: &CallerContext,
    report: &mut RedactionReport,
) -> Result<(), MessageError> {
    let mut redactor = ReadRedactor {
        caller,
        path: FieldPath::new(),
        report,
    };

    redactor.visit(message)
}

///
/// ReadRedactor
///

struct ReadRedactor<'a> {
    caller: &'a CallerContext,
    path: FieldPath,
    report: &'a mut RedactionReport,
}

impl ReadRedactor<'_> {
    fn visit(&mut self, message: &mut dyn Message) -> Result<(), MessageError> {
        let fields = message.descriptor().fields;

        for (index, field) in fields.iter().enumerate() {
            self.path.push(field.name);
            let result = self.visit_field(index, field, message);
            self.path.pop();

            result?;
        }

        Ok(())
    }

    fn visit_field(
        &mut self,
        index: usize,
        field: &FieldDescriptor,
        message: &mut dyn Message,
    ) -> Result<(), MessageError> {
        if let Some(role) = self.caller.missing_role(field) {
            if message.get_field(index).is_some_and(|v| !v.is_zero()) {
                self.report
                    .record(self.path.render(), RedactionReason::MissingRole(role));
            }

            return message.clear_field(index);
        }

        match field.kind {
            FieldKind::Message(_) => {
                let Some(Value::Message(mut nested)) = message.get_field(index) else {
                    return Ok(());
                };

                self.visit(&mut nested)?;
                message.set_field(index, Value::Message(nested))
            }

            FieldKind::RepeatedMessage(_) => {
                let Some(Value::List(mut items)) = message.get_field(index) else {
                    return Ok(());
                };

                for (i, item) in items.iter_mut().enumerate() {
                    if let Value::Message(nested) = item {
                        self.path.push(i);
                        let result = self.visit(nested);
                        self.path.pop();

                        result?;
                    }
                }

                message.set_field(index, Value::List(items))
            }

            FieldKind::Scalar(_) | FieldKind::RepeatedScalar(_) => Ok(()),
        }
    }
}
