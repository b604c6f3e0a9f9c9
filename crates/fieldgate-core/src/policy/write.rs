use crate::{
    message::{DynamicMessage, Message, MessageError},
    model::field::{FieldDescriptor, FieldKind},
    policy::{CallerContext, FieldMask, RedactionReason, RedactionReport},
    value::Value,
    visitor::FieldPath,
};

///
/// merge
///
/// Copy the masked, writable leaves of `input` over a copy of `baseline`.
///
/// Leaves absent from the mask, readonly leaves and leaves guarded by a role
/// the caller lacks keep the baseline value. Nothing here is an error except
/// `input` and `baseline` being of different message types.
///
pub fn merge(
    input: &dyn Message,
    mask: &FieldMask,
    caller: &CallerContext,
    baseline: &DynamicMessage,
) -> Result<DynamicMessage, MessageError> {
    let mut output = baseline.clone();
    let mut report = RedactionReport::new();
    merge_into(input, mask, caller, &mut output, &mut report)?;

    Ok(output)
}

///
/// merge_into
///
/// In-place form of [`merge`]: `output` is the baseline and receives the
/// copied leaves. Requested-but-dropped paths are added to `report`.
///
pub fn merge_into(
    input: &dyn Message,
    mask: &FieldMask,
    caller: &CallerContext,
    output: &mut dyn Message,
    report: &mut RedactionReport,
) -> Result<(), MessageError> {
    let (expected, found) = (output.descriptor(), input.descriptor());
    if !expected.same_type(found) {
        return Err(MessageError::DescriptorMismatch {
            expected: expected.name,
            found: found.name,
        });
    }

    let mut redactor = WriteRedactor {
        mask,
        caller,
        path: FieldPath::new(),
        report,
    };

    redactor.visit(input, output)
}

///
/// WriteRedactor
/// Depth-first walk over the input's descriptor, tracking the mask path.
///

struct WriteRedactor<'a> {
    mask: &'a FieldMask,
    caller: &'a CallerContext,
    path: FieldPath,
    report: &'a mut RedactionReport,
}

impl WriteRedactor<'_> {
    fn visit(&mut self, input: &dyn Message, output: &mut dyn Message) -> Result<(), MessageError> {
        let fields = input.descriptor().fields;

        for (index, field) in fields.iter().enumerate() {
            self.path.push(field.name);
            let result = self.visit_field(index, field, input, output);
            self.path.pop();

            result?;
        }

        Ok(())
    }

    fn visit_field(
        &mut self,
        index: usize,
        field: &FieldDescriptor,
        input: &dyn Message,
        output: &mut dyn Message,
    ) -> Result<(), MessageError> {
        match field.kind {
            // the mask carrier itself is never merged
            FieldKind::Message(nested) if nested.is_field_mask() => Ok(()),

            // authorization is decided at the leaves; readonly on a message
            // field does not stop the descent, a missing role does
            FieldKind::Message(nested) => {
                if let Some(role) = self.caller.missing_role(field) {
                    let path = self.path.render();
                    if self.mask.touches(&path) {
                        self.report.record(path, RedactionReason::MissingRole(role));
                    }
                    return Ok(());
                }

                let Some(Value::Message(source)) = input.get_field(index) else {
                    return Ok(());
                };
                let mut target = match output.get_field(index) {
                    Some(Value::Message(target)) => target,
                    _ => DynamicMessage::new(nested),
                };

                self.visit(&source, &mut target)?;
                output.set_field(index, Value::Message(target))
            }

            _ => self.visit_leaf(index, field, input, output),
        }
    }

    fn visit_leaf(
        &mut self,
        index: usize,
        field: &FieldDescriptor,
        input: &dyn Message,
        output: &mut dyn Message,
    ) -> Result<(), MessageError> {
        let path = self.path.render();
        if !self.mask.contains(&path) {
            return Ok(());
        }

        if field.is_readonly() {
            self.report.record(path, RedactionReason::Readonly);
            return Ok(());
        }

        if let Some(role) = self.caller.missing_role(field) {
            self.report.record(path, RedactionReason::MissingRole(role));
            return Ok(());
        }

        match input.get_field(index) {
            Some(value) => output.set_field(index, value),
            None => Ok(()),
        }
    }
}
