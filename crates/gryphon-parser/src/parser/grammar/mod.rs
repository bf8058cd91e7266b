pub(crate) mod directive;
pub(crate) mod document;
pub(crate) mod enum_;
pub(crate) mod extensions;
pub(crate) mod fragment;
pub(crate) mod input;
pub(crate) mod interface;
pub(crate) mod object;
pub(crate) mod operation;
pub(crate) mod scalar;
pub(crate) mod schema;
pub(crate) mod ty;
pub(crate) mod union_;
pub(crate) mod value;

mod argument;
mod description;
mod field;
mod name;
mod selection;
mod variable;
