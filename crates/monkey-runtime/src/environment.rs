//! Lexical scopes
//!
//! An [`Environment`] is a shared handle to one scope. Cloning the handle
//! shares the scope, which is how closures keep their defining scope alive
//! and how a `let`-bound function sees its own binding when it recurses.
//!
//! A function stored in the scope it captured forms an `Rc` cycle. The
//! evaluator breaks it with [`Environment::clear`] when a call returns and
//! nothing created in the call scope escapes; `ReplCore::reset` does the
//! same for the session scope.

use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to a scope
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Scope>>);

/// Non-owning handle to a scope
#[derive(Clone)]
pub struct WeakEnvironment(Weak<RefCell<Scope>>);

#[derive(Default)]
struct Scope {
    bindings: HashMap<String, Object>,
    outer: Option<Environment>,
}

impl Environment {
    /// Create an empty top-level scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a child scope whose lookups fall back to `self`
    pub fn enclosed(&self) -> Self {
        Self(Rc::new(RefCell::new(Scope {
            bindings: HashMap::new(),
            outer: Some(self.clone()),
        })))
    }

    /// Look a name up, walking outward through enclosing scopes
    pub fn get(&self, name: &str) -> Option<Object> {
        let scope = self.0.borrow();
        match scope.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Bind a name in this scope, shadowing any outer binding
    pub fn set(&self, name: impl Into<String>, value: Object) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Names bound directly in this scope, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().bindings.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether two handles refer to the same scope
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether `ancestor` is this scope or one it is nested in
    pub fn is_within(&self, ancestor: &Environment) -> bool {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            if env.ptr_eq(ancestor) {
                return true;
            }
            current = env.0.borrow().outer.clone();
        }
        false
    }

    /// Drop every binding in this scope
    ///
    /// Functions bound here hold this scope alive; removing them is what
    /// lets the scope be freed.
    pub fn clear(&self) {
        let bindings = std::mem::take(&mut self.0.borrow_mut().bindings);
        drop(bindings);
    }

    /// Number of live handles to this scope, including those held by
    /// child scopes and captured functions
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn downgrade(&self) -> WeakEnvironment {
        WeakEnvironment(Rc::downgrade(&self.0))
    }
}

impl WeakEnvironment {
    /// The scope, if anything still owns it
    pub fn upgrade(&self) -> Option<Environment> {
        self.0.upgrade().map(Environment)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.names())
            .field("enclosed", &self.0.borrow().outer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Identifier};
    use crate::object::Function;
    use crate::span::Span;

    #[test]
    fn test_get_walks_outward() {
        let global = Environment::new();
        global.set("x", Object::Integer(1));

        let inner = global.enclosed();
        assert_eq!(inner.get("x"), Some(Object::Integer(1)));
        assert_eq!(inner.get("y"), None);
    }

    #[test]
    fn test_shadowing_leaves_outer_untouched() {
        let global = Environment::new();
        global.set("x", Object::Integer(1));

        let inner = global.enclosed();
        inner.set("x", Object::Integer(2));

        assert_eq!(inner.get("x"), Some(Object::Integer(2)));
        assert_eq!(global.get("x"), Some(Object::Integer(1)));
    }

    #[test]
    fn test_clones_share_scope() {
        let env = Environment::new();
        let alias = env.clone();
        alias.set("late", Object::Integer(7));

        assert!(env.ptr_eq(&alias));
        assert_eq!(env.get("late"), Some(Object::Integer(7)));
    }

    #[test]
    fn test_is_within() {
        let global = Environment::new();
        let inner = global.enclosed();
        let innermost = inner.enclosed();

        assert!(innermost.is_within(&global));
        assert!(innermost.is_within(&innermost));
        assert!(!global.is_within(&inner));
        assert!(!Environment::new().is_within(&global));
    }

    /// A function bound in the scope it captured
    fn bind_closure(env: &Environment) {
        let func = Function {
            params: Vec::<Identifier>::new().into(),
            body: Rc::new(Block {
                statements: Vec::new(),
                span: Span::dummy(),
            }),
            env: env.clone(),
        };
        env.set("f", Object::Function(Rc::new(func)));
    }

    #[test]
    fn test_self_referencing_scope_outlives_handle() {
        let env = Environment::new();
        bind_closure(&env);
        let weak = env.downgrade();

        drop(env);
        assert!(weak.upgrade().is_some());
    }

    #[test]
    fn test_clear_frees_self_referencing_scope() {
        let env = Environment::new();
        bind_closure(&env);
        let weak = env.downgrade();

        env.clear();
        assert!(env.names().is_empty());

        drop(env);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_names_are_local_and_sorted() {
        let global = Environment::new();
        global.set("outer", Object::Null);
        let inner = global.enclosed();
        inner.set("b", Object::Null);
        inner.set("a", Object::Null);

        assert_eq!(inner.names(), vec!["a", "b"]);
    }
}
