//! Equality strategies for values
//!
//! A value's equality function decides whether an update is a change. It is
//! part of the value's identity and is always chosen explicitly: structural
//! equality for plain data, identity equality for shared handles.

use std::rc::Rc;

/// Shared equality function
pub type EqFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// Structural equality via `PartialEq`
pub fn data_equals<T: PartialEq + 'static>() -> EqFn<T> {
    Rc::new(|a: &T, b: &T| a == b)
}

/// Identity equality for shared handles
pub fn ptr_equals<T: ?Sized + 'static>() -> EqFn<Rc<T>> {
    Rc::new(|a: &Rc<T>, b: &Rc<T>| Rc::ptr_eq(a, b))
}

/// Treats every update as a change
pub fn never_equals<T: 'static>() -> EqFn<T> {
    Rc::new(|_: &T, _: &T| false)
}

/// Element-wise equality where each slot uses its own equality function
pub(crate) fn elementwise<T: 'static>(eqs: Vec<EqFn<T>>) -> EqFn<Vec<T>> {
    Rc::new(move |a: &Vec<T>, b: &Vec<T>| {
        a.len() == b.len()
            && a.len() == eqs.len()
            && a.iter().zip(b).zip(&eqs).all(|((x, y), eq)| eq(x, y))
    })
}
