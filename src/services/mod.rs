pub mod department;
pub mod employee;
pub mod hierarchy;
pub mod tree;
