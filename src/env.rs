//! Lexical environments.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::trace;

use crate::value::{RuntimeError, Value};

/// One frame of the scope chain.  Lookups and assignments walk towards the root, declarations
/// only touch this frame.
#[derive(Debug, Default)]
pub struct Env {
    parent: Option<Rc<Env>>,
    bindings: RefCell<HashMap<String, Value>>,
    constants: RefCell<HashSet<String>>,
}

impl Env {
    pub fn new() -> Rc<Env> {
        Self::with_parent(None)
    }

    pub fn with_parent(parent: Option<Rc<Env>>) -> Rc<Env> {
        Rc::new(Env {
            parent,
            ..Env::default()
        })
    }

    /// Root frame holding `constants` and nothing else.
    pub fn with_constants<I>(constants: I) -> Rc<Env>
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        let (bindings, constants): (HashMap<_, _>, HashSet<_>) = constants
            .into_iter()
            .map(|(name, value)| ((name.to_owned(), value), name.to_owned()))
            .unzip();
        Rc::new(Env {
            parent: None,
            bindings: RefCell::new(bindings),
            constants: RefCell::new(constants),
        })
    }

    /// Binds `name` in this frame.  Shadowing a binding of an enclosing frame is allowed,
    /// redeclaring one of this frame is not.
    pub fn declare(&self, name: &str, value: Value, constant: bool) -> Result<Value, RuntimeError> {
        match self.bindings.borrow_mut().entry(name.to_owned()) {
            Entry::Occupied(_) => return Err(RuntimeError::DuplicateBinding(name.to_owned())),
            Entry::Vacant(entry) => {
                entry.insert(value.clone());
            }
        }
        if constant {
            self.constants.borrow_mut().insert(name.to_owned());
        }
        trace!(binding = name, constant, "declare");
        Ok(value)
    }

    /// Rebinds `name` in the nearest frame declaring it.
    pub fn assign(&self, name: &str, value: Value) -> Result<Value, RuntimeError> {
        let env = self
            .resolve(name)
            .ok_or_else(|| RuntimeError::UnresolvedName(name.to_owned()))?;
        if env.constants.borrow().contains(name) {
            return Err(RuntimeError::ConstantAssignment(name.to_owned()));
        }
        env.bindings
            .borrow_mut()
            .insert(name.to_owned(), value.clone());
        trace!(binding = name, "assign");
        Ok(value)
    }

    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        match self.bindings.borrow().get(name) {
            Some(value) => Ok(value.clone()),
            None => match &self.parent {
                Some(parent) => parent.lookup(name),
                None => Err(RuntimeError::UnresolvedName(name.to_owned())),
            },
        }
    }

    /// Nearest frame, this one included, that declares `name`.
    pub fn resolve(&self, name: &str) -> Option<&Env> {
        if self.bindings.borrow().contains_key(name) {
            Some(self)
        } else {
            self.parent.as_ref().and_then(|p| p.resolve(name))
        }
    }

    #[cfg(test)]
    pub fn is_constant(&self, name: &str) -> bool {
        self.resolve(name)
            .map_or(false, |env| env.constants.borrow().contains(name))
    }
}
