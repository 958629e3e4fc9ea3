pub mod logs;
pub mod traces;
pub mod values;
