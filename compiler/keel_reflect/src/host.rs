//! The host's reflection capability and an in-memory implementation.
//!
//! A host resolves type paths to class handles and answers questions about
//! constructors and accessors. Handles are resolved once; invoking through
//! a handle never repeats a lookup.

use std::sync::atomic::{AtomicUsize, Ordering};

use keel_ir::{SharedInterner, Ty, TypeIdent};
use keel_types::{InvokeError, Value};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// A loaded class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassHandle(u32);

/// A resolved constructor of a loaded class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CtorHandle {
    class: ClassHandle,
    index: u32,
}

/// A resolved accessor method of a loaded class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccessorHandle {
    class: ClassHandle,
    index: u32,
}

/// One constructor parameter, as the host reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: String,
    /// `None` when the parameter names no known field.
    pub ty: Option<Ty>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtorInfo {
    pub handle: CtorHandle,
    /// Parameters in declaration order.
    pub params: Vec<ParamInfo>,
    /// Marked canonical by the toolchain that compiled the class.
    pub canonical: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AccessorInfo {
    pub handle: AccessorHandle,
    /// Parameters besides the receiver.
    pub param_count: usize,
}

/// Reflection capability of the host runtime.
///
/// Implementations must be shareable across threads: the descriptor cache
/// calls into them from whichever thread first asks for a type.
pub trait ReflectHost: Send + Sync {
    /// Resolve a fully qualified type path to a loaded class.
    fn resolve(&self, path: &str) -> Option<ClassHandle>;

    /// Every public constructor of `class`.
    fn constructors(&self, class: ClassHandle) -> Vec<CtorInfo>;

    /// Every public method of `class` named `name`, overloads included.
    fn find_accessor(&self, class: ClassHandle, name: &str) -> Vec<AccessorInfo>;

    /// Invoke a constructor with arguments in parameter order.
    fn invoke(&self, ctor: CtorHandle, args: &[Value]) -> Result<Value, InvokeError>;

    /// Invoke a zero-argument accessor on `receiver`.
    fn read(&self, accessor: AccessorHandle, receiver: &Value) -> Result<Value, InvokeError>;
}

/// A class symbol loaded from a foreign binary.
///
/// Instances are records whose fields follow the declared field order.
/// Fields a constructor does not set read as unit.
#[derive(Clone, Debug)]
pub struct ForeignClass {
    ident: TypeIdent,
    path: String,
    fields: Vec<(String, Ty)>,
    ctors: Vec<ForeignCtor>,
    methods: Vec<ForeignMethod>,
}

#[derive(Clone, Debug)]
struct ForeignCtor {
    params: Vec<String>,
    canonical: bool,
}

#[derive(Clone, Debug)]
struct ForeignMethod {
    name: String,
    param_count: usize,
    /// Field returned by the method; `None` for methods that compute.
    field: Option<usize>,
}

impl ForeignClass {
    pub fn new(ident: TypeIdent, path: impl Into<String>) -> Self {
        ForeignClass {
            ident,
            path: path.into(),
            fields: Vec::new(),
            ctors: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: &str, ty: Ty) -> Self {
        self.fields.push((name.to_owned(), ty));
        self
    }

    #[must_use]
    pub fn constructor(mut self, params: &[&str], canonical: bool) -> Self {
        self.ctors.push(ForeignCtor {
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            canonical,
        });
        self
    }

    /// A canonical constructor over every field, in field order.
    #[must_use]
    pub fn canonical_constructor(self) -> Self {
        let params: Vec<String> = self.fields.iter().map(|(n, _)| n.clone()).collect();
        let params: Vec<&str> = params.iter().map(String::as_str).collect();
        self.constructor(&params, true)
    }

    /// A zero-argument method returning the field of the same name.
    #[must_use]
    pub fn accessor(mut self, name: &str) -> Self {
        let field = self.field_index(name);
        self.methods.push(ForeignMethod {
            name: name.to_owned(),
            param_count: 0,
            field,
        });
        self
    }

    /// One accessor per field, in field order.
    #[must_use]
    pub fn accessors(self) -> Self {
        let names: Vec<String> = self.fields.iter().map(|(n, _)| n.clone()).collect();
        names.iter().fold(self, |class, name| class.accessor(name))
    }

    /// A method taking `param_count` arguments that is not a field read.
    #[must_use]
    pub fn method(mut self, name: &str, param_count: usize) -> Self {
        self.methods.push(ForeignMethod {
            name: name.to_owned(),
            param_count,
            field: None,
        });
        self
    }

    pub fn ident(&self) -> TypeIdent {
        self.ident
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    fn field_ty(&self, name: &str) -> Option<Ty> {
        self.field_index(name).map(|i| self.fields[i].1.clone())
    }
}

/// In-memory [`ReflectHost`] over loaded class symbols.
///
/// Classes can be loaded at any time, including while other threads
/// introspect. Counts path resolutions so callers can observe how often
/// introspection actually happened.
#[derive(Debug)]
pub struct SymbolTableHost {
    interner: SharedInterner,
    table: RwLock<SymbolTable>,
    resolutions: AtomicUsize,
}

#[derive(Debug, Default)]
struct SymbolTable {
    classes: Vec<ForeignClass>,
    by_path: FxHashMap<String, ClassHandle>,
}

impl SymbolTableHost {
    /// Type identities of loaded classes are interned in `interner`.
    pub fn new(interner: SharedInterner) -> Self {
        SymbolTableHost {
            interner,
            table: RwLock::new(SymbolTable::default()),
            resolutions: AtomicUsize::new(0),
        }
    }

    /// Load `class`, replacing any class with the same path.
    pub fn load(&self, class: ForeignClass) -> ClassHandle {
        let mut table = self.table.write();
        if let Some(&handle) = table.by_path.get(&class.path) {
            table.classes[handle.0 as usize] = class;
            return handle;
        }
        let index = u32::try_from(table.classes.len())
            .unwrap_or_else(|_| panic!("symbol table exceeded {} classes", u32::MAX));
        let handle = ClassHandle(index);
        table.by_path.insert(class.path.clone(), handle);
        table.classes.push(class);
        tracing::trace!(class = index, "loaded foreign class");
        handle
    }

    /// Number of `resolve` calls served so far.
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    fn with_class<R>(&self, handle: ClassHandle, f: impl FnOnce(&ForeignClass) -> R) -> Option<R> {
        let table = self.table.read();
        table.classes.get(handle.0 as usize).map(f)
    }
}

fn handle_index(index: usize) -> u32 {
    // Handles index vectors that were built from u32-bounded tables.
    u32::try_from(index).unwrap_or(u32::MAX)
}

impl ReflectHost for SymbolTableHost {
    fn resolve(&self, path: &str) -> Option<ClassHandle> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        self.table.read().by_path.get(path).copied()
    }

    fn constructors(&self, class: ClassHandle) -> Vec<CtorInfo> {
        self.with_class(class, |c| {
            c.ctors
                .iter()
                .enumerate()
                .map(|(i, ctor)| CtorInfo {
                    handle: CtorHandle {
                        class,
                        index: handle_index(i),
                    },
                    params: ctor
                        .params
                        .iter()
                        .map(|name| ParamInfo {
                            name: name.clone(),
                            ty: c.field_ty(name),
                        })
                        .collect(),
                    canonical: ctor.canonical,
                })
                .collect()
        })
        .unwrap_or_default()
    }

    fn find_accessor(&self, class: ClassHandle, name: &str) -> Vec<AccessorInfo> {
        self.with_class(class, |c| {
            c.methods
                .iter()
                .enumerate()
                .filter(|(_, m)| m.name == name)
                .map(|(i, m)| AccessorInfo {
                    handle: AccessorHandle {
                        class,
                        index: handle_index(i),
                    },
                    param_count: m.param_count,
                })
                .collect()
        })
        .unwrap_or_default()
    }

    fn invoke(&self, ctor: CtorHandle, args: &[Value]) -> Result<Value, InvokeError> {
        self.with_class(ctor.class, |class| {
            let Some(decl) = class.ctors.get(ctor.index as usize) else {
                return Err(InvokeError::Other {
                    message: format!("`{}` has no constructor #{}", class.path, ctor.index),
                });
            };
            if args.len() != decl.params.len() {
                return Err(InvokeError::ArgumentCount {
                    expected: decl.params.len(),
                    got: args.len(),
                });
            }
            let mut fields = vec![Value::Unit; class.fields.len()];
            for (index, (param, arg)) in decl.params.iter().zip(args).enumerate() {
                let Some(slot) = class.field_index(param) else {
                    return Err(InvokeError::Other {
                        message: format!("`{}` has no field `{param}`", class.path),
                    });
                };
                let expected = &class.fields[slot].1;
                if !arg.conforms_to(expected) {
                    return Err(InvokeError::ArgumentType {
                        index,
                        param: param.clone(),
                        expected: expected.display(&self.interner).to_string(),
                        found: arg.kind_name().to_owned(),
                    });
                }
                fields[slot] = arg.clone();
            }
            Ok(Value::record(class.ident, fields))
        })
        .unwrap_or_else(|| {
            Err(InvokeError::Other {
                message: "constructor of an unloaded class".to_owned(),
            })
        })
    }

    fn read(&self, accessor: AccessorHandle, receiver: &Value) -> Result<Value, InvokeError> {
        self.with_class(accessor.class, |class| {
            let Some(method) = class.methods.get(accessor.index as usize) else {
                return Err(InvokeError::Other {
                    message: format!("`{}` has no method #{}", class.path, accessor.index),
                });
            };
            if method.param_count != 0 {
                return Err(InvokeError::ArgumentCount {
                    expected: method.param_count,
                    got: 0,
                });
            }
            let record = match receiver {
                Value::Record(r) if r.ty == class.ident => r,
                other => {
                    return Err(InvokeError::Receiver {
                        expected: class.path.clone(),
                        found: other.kind_name().to_owned(),
                    })
                }
            };
            method
                .field
                .and_then(|slot| record.fields.get(slot).cloned())
                .ok_or_else(|| InvokeError::Other {
                    message: format!("`{}.{}` does not read a field", class.path, method.name),
                })
        })
        .unwrap_or_else(|| {
            Err(InvokeError::Other {
                message: "accessor of an unloaded class".to_owned(),
            })
        })
    }
}
