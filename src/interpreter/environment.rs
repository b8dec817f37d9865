use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use crate::interpreter::object::Object;

pub type Env = Rc<RefCell<Environment>>;

/// One lexical scope. Lookups fall back to the enclosing scope; writes never
/// leave this one.
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new(outer: Option<Env>) -> Environment {
        Environment {
            store: HashMap::new(),
            outer,
        }
    }

    pub fn new_global() -> Env {
        Rc::new(RefCell::new(Environment::new(None)))
    }

    pub fn new_enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment::new(Some(outer))))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }
}

// Closures stored in a scope point back at it, so the derived impl would
// recurse forever
impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.store.keys().collect();
        names.sort();

        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_outer", &self.outer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::interpreter::object::{NULL, TRUE};
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let global = Environment::new_global();
        global.borrow_mut().set("a", Object::Integer(1));

        let inner = Environment::new_enclosed(Rc::clone(&global));
        let innermost = Environment::new_enclosed(Rc::clone(&inner));

        assert_eq!(innermost.borrow().get("a"), Some(Object::Integer(1)));
        assert_eq!(innermost.borrow().get("b"), None);
    }

    #[test]
    fn test_set_targets_innermost_scope() {
        let global = Environment::new_global();
        global.borrow_mut().set("a", Object::Integer(1));

        let inner = Environment::new_enclosed(Rc::clone(&global));
        inner.borrow_mut().set("a", TRUE);

        assert_eq!(inner.borrow().get("a"), Some(TRUE));
        assert_eq!(global.borrow().get("a"), Some(Object::Integer(1)));
        assert!(inner.borrow().contains("a"));
    }

    #[test]
    fn test_outer_updates_are_visible() {
        let global = Environment::new_global();
        let inner = Environment::new_enclosed(Rc::clone(&global));

        assert_eq!(inner.borrow().get("late"), None);
        global.borrow_mut().set("late", NULL);
        assert_eq!(inner.borrow().get("late"), Some(NULL));
        assert!(!inner.borrow().contains("late"));
    }
}
