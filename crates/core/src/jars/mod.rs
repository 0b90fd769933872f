//! Jars module - earmarked sub-savings with deposits and withdrawals.

mod jars_model;
mod jars_service;
mod jars_traits;


pub use jars_model::{Jar, JarUpdate, NewJar};
pub use jars_service::JarService;
pub use jars_traits::{JarRepositoryTrait, JarServiceTrait};
