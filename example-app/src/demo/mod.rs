//! 示例组件

pub mod controller;
pub mod service;
