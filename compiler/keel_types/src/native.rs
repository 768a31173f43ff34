//! Direct descriptor synthesis from compile-time metadata.
//!
//! Native instances are [`RecordValue`]s whose fields are already in
//! canonical order, so the constructor packs its arguments and each
//! accessor is a field projection. No reflection and no cache: the shape
//! was established by the compiler.
//!
//! Arguments are checked against the component types and rejected with the
//! same `ReflectiveInvocation`/`ArgumentType` error a reflective host
//! reports, so both descriptor kinds accept and refuse the same inputs.

use std::sync::Arc;

use keel_ir::{StringInterner, Ty};

use crate::{AccessFn, ConstructFn, InvokeError, MetadataParts, MirrorError, ProductShape};
use crate::{RecordValue, TypeMetadata, Value};

/// Build the descriptor of a recognized product.
pub fn synthesize_metadata(
    shape: &ProductShape,
    interner: &StringInterner,
) -> Result<TypeMetadata, MirrorError> {
    let ident = shape.ident;
    let path: Arc<str> = Arc::from(ident.path(interner));

    let constructor: ConstructFn = {
        let path = Arc::clone(&path);
        let params: Vec<(String, Ty, String)> = shape
            .components
            .iter()
            .map(|c| {
                let label = interner.lookup(c.label).to_owned();
                (label, c.ty.clone(), c.ty.display(interner).to_string())
            })
            .collect();
        Arc::new(move |values: &[Value]| {
            for (index, (value, (param, ty, expected))) in values.iter().zip(&params).enumerate() {
                if !value.conforms_to(ty) {
                    return Err(MirrorError::ReflectiveInvocation {
                        ty: path.to_string(),
                        cause: InvokeError::ArgumentType {
                            index,
                            param: param.clone(),
                            expected: expected.clone(),
                            found: value.kind_name().to_owned(),
                        },
                    });
                }
            }
            Ok(Value::record(ident, values.to_vec()))
        })
    };

    let accessors: Vec<AccessFn> = (0..shape.arity())
        .map(|index| {
            let path = Arc::clone(&path);
            let read: AccessFn = Arc::new(move |value: &Value| match value {
                Value::Record(RecordValue { ty, fields }) if *ty == ident => {
                    fields.get(index).cloned().ok_or_else(|| MirrorError::ComponentAccess {
                        ty: path.to_string(),
                        detail: format!("instance has {} fields, wanted {index}", fields.len()),
                    })
                }
                other => Err(MirrorError::ComponentAccess {
                    ty: path.to_string(),
                    detail: format!("receiver is a {}, not an instance", other.kind_name()),
                }),
            });
            read
        })
        .collect();

    tracing::debug!(ty = %path, arity = shape.arity(), "synthesized native descriptor");

    TypeMetadata::new(MetadataParts {
        ident,
        path,
        labels: shape.labels().collect(),
        types: shape.components.iter().map(|c| c.ty.clone()).collect(),
        constructor_arity: shape.arity(),
        constructor,
        accessors,
    })
}
